//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod frames;
pub mod run;
pub mod validate;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, SourceArgs};
use crate::config::{ConfigLimits, ConfigLoader, RotatorConfig, Validator};
use crate::error::{ConfigError, TypecycleError};
use crate::rotator::Timing;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), TypecycleError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cli.color, cancel).await,
        Commands::Frames(args) => frames::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Builds the rotation settings from the config file (or defaults) with
/// command-line overrides applied on top.
///
/// The merged result is validated again so overrides cannot produce an
/// empty phrase list or a zero delay.
pub(crate) fn resolve_source(source: &SourceArgs) -> Result<RotatorConfig, TypecycleError> {
    let mut config = match &source.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading configuration");
            let loaded = ConfigLoader::with_defaults().load(path)?;
            for warning in &loaded.warnings {
                tracing::warn!(
                    location = warning.location.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    warning.message
                );
            }
            RotatorConfig::clone(&loaded.config)
        }
        None => RotatorConfig::default(),
    };

    if !source.phrases.is_empty() {
        config.phrases.clone_from(&source.phrases);
    }
    if let Some(delay) = source.type_delay {
        config.timing.type_delay = delay;
    }
    if let Some(delay) = source.hold_delay {
        config.timing.hold_delay = delay;
    }
    if let Some(delay) = source.delete_delay {
        config.timing.delete_delay = delay;
    }
    if let Some(speed) = source.speed {
        config.timing = Timing::from(config.timing).scaled(1.0 / speed).into();
    }

    let result = Validator::new().validate(&config, &ConfigLimits::default());
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: source.config.as_ref().map_or_else(
                || "<command line>".to_string(),
                |p| format!("{} (with overrides)", p.display()),
            ),
            errors: result.errors,
        }
        .into());
    }
    if source.config.is_none() {
        for warning in &result.warnings {
            tracing::warn!(location = %warning.path, "{}", warning.message);
        }
    }

    Ok(config)
}
