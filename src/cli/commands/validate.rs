//! `validate`: check configuration files without running them.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning, LoaderOptions};
use crate::error::{ConfigError, TypecycleError};

/// Per-file outcome for JSON output.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    phrases: Option<usize>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

/// Validates every file, reporting each one, and fails if any is invalid.
///
/// # Errors
///
/// Returns an I/O error if a file does not exist, otherwise the first
/// configuration error encountered.
pub fn run(args: &ValidateArgs) -> Result<(), TypecycleError> {
    let loader = ConfigLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let mut first_error: Option<TypecycleError> = None;
    for path in &args.files {
        if !path.exists() {
            return Err(TypecycleError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }
        tracing::info!(file = %path.display(), strict = args.strict, "validating configuration");

        let report = match loader.load(path) {
            Ok(loaded) => {
                tracing::info!(file = %path.display(), "configuration valid");
                report_ok(path, loaded.config.phrases.len(), &loaded.warnings)
            }
            Err(e) => {
                let report = report_err(path, &e);
                first_error.get_or_insert(e.into());
                report
            }
        };
        print_report(&report, args.format)?;
    }

    first_error.map_or(Ok(()), Err)
}

fn report_ok(path: &Path, phrases: usize, warnings: &[LoadWarning]) -> FileReport {
    FileReport {
        file: path.display().to_string(),
        valid: true,
        phrases: Some(phrases),
        warnings: warnings.iter().map(ToString::to_string).collect(),
        errors: Vec::new(),
    }
}

fn report_err(path: &Path, error: &ConfigError) -> FileReport {
    let errors = match error {
        ConfigError::ValidationError { errors, .. } => {
            errors.iter().map(ToString::to_string).collect()
        }
        other => vec![other.to_string()],
    };
    FileReport {
        file: path.display().to_string(),
        valid: false,
        phrases: None,
        warnings: Vec::new(),
        errors,
    }
}

fn print_report(report: &FileReport, format: OutputFormat) -> Result<(), TypecycleError> {
    match format {
        OutputFormat::Human => {
            if report.valid {
                println!(
                    "{}: ok ({} phrases)",
                    report.file,
                    report.phrases.unwrap_or_default()
                );
            } else {
                println!("{}: invalid", report.file);
            }
            for warning in &report.warnings {
                println!("  warning: {warning}");
            }
            for error in &report.errors {
                println!("  {error}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
    }
    Ok(())
}
