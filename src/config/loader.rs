//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size limit check
//! 2. UTF-8 BOM removal
//! 3. Environment variable expansion (pre-parse, on raw text)
//! 4. YAML deserialization to [`RotatorConfig`]
//! 5. Validation
//! 6. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::schema::RotatorConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub config_limits: ConfigLimits,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,

    /// Maximum number of phrases.
    pub max_phrases: usize,

    /// Maximum length of a single phrase, in chars.
    pub max_phrase_chars: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TYPECYCLE_MAX_CONFIG_SIZE", 1024 * 1024),
            max_phrases: env_or("TYPECYCLE_MAX_PHRASES", 1000),
            max_phrase_chars: env_or("TYPECYCLE_MAX_PHRASE_CHARS", 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<RotatorConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required environment variable is unset
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let max = self.options.config_limits.max_config_size;
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {max} bytes"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), bytes = raw.len(), "loading configuration");
        self.load_str(&raw, path)
    }

    /// Loads and validates configuration text. `path` is only used in
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus file access.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut env_sub = EnvSubstitution::new(path);
        let substituted = env_sub.substitute(raw)?;
        let mut warnings = env_sub.warnings;

        if substituted.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let config: RotatorConfig =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let mut validator = Validator::new();
        let mut result = validator.validate(&config, &self.options.config_limits);

        if self.options.strict {
            result.errors.append(&mut result.warnings);
        }

        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// A parsed `${...}` reference.
enum VarRef {
    Plain(String),
    WithDefault(String, String),
    Required(String, String),
}

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text so substituted numbers and booleans keep their
/// YAML types.
struct EnvSubstitution {
    source: PathBuf,
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            warnings: Vec::new(),
        }
    }

    /// Expands environment references in `raw`.
    ///
    /// - `${VAR}` expands to the value, or empty with a warning if unset
    /// - `${VAR:-default}` expands to `default` if unset
    /// - `${VAR:?message}` fails if unset
    /// - `$$` is a literal `$`
    fn substitute(&mut self, raw: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(body) = after.strip_prefix('{') {
                let end = closing_brace(body).ok_or_else(|| ConfigError::ParseError {
                    path: self.source.clone(),
                    line: Some(raw[..raw.len() - rest.len() + pos].matches('\n').count() + 1),
                    message: "Unclosed environment variable reference".to_string(),
                })?;
                out.push_str(&self.expand(parse_ref(&body[..end]))?);
                rest = &body[end + 1..];
            } else {
                out.push('$');
                rest = after;
            }
        }
        out.push_str(rest);

        Ok(out)
    }

    fn expand(&mut self, var: VarRef) -> Result<String, ConfigError> {
        match var {
            VarRef::Plain(name) => std::env::var(&name).or_else(|_| {
                self.warnings.push(LoadWarning {
                    message: format!(
                        "Environment variable '{name}' is not set, using empty string"
                    ),
                    location: Some(self.source.display().to_string()),
                });
                Ok(String::new())
            }),
            VarRef::WithDefault(name, default) => Ok(std::env::var(name).unwrap_or(default)),
            VarRef::Required(name, message) => {
                std::env::var(&name).map_err(|_| ConfigError::EnvVarNotSet {
                    var: name,
                    location: message,
                })
            }
        }
    }
}

/// Byte offset of the `}` closing a reference body, honoring nested braces
/// inside defaults.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_ref(body: &str) -> VarRef {
    if let Some((name, default)) = body.split_once(":-") {
        VarRef::WithDefault(name.to_string(), default.to_string())
    } else if let Some((name, message)) = body.split_once(":?") {
        VarRef::Required(name.to_string(), message.to_string())
    } else {
        VarRef::Plain(body.to_string())
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    fn sub(raw: &str) -> (Result<String, ConfigError>, Vec<LoadWarning>) {
        let mut s = EnvSubstitution::new(Path::new("test.yaml"));
        let result = s.substitute(raw);
        (result, s.warnings)
    }

    fn load(yaml: &str) -> Result<LoadResult, ConfigError> {
        ConfigLoader::with_defaults().load_str(yaml, Path::new("inline.yaml"))
    }

    #[test]
    fn test_env_substitution_simple() {
        // PATH is always set
        let (result, warnings) = sub("path: ${PATH}");
        let result = result.unwrap();
        assert!(!result.contains("${PATH}"));
        assert!(result.len() > "path: ".len());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_env_substitution_default() {
        let (result, _) = sub("prefix: ${TYPECYCLE_TEST_UNSET_XYZ123:-I am a }");
        assert_eq!(result.unwrap(), "prefix: I am a ");
    }

    #[test]
    fn test_env_substitution_nested_braces_in_default() {
        let (result, _) = sub("x: ${TYPECYCLE_TEST_UNSET_XYZ123:-{a}}!");
        assert_eq!(result.unwrap(), "x: {a}!");
    }

    #[test]
    fn test_env_substitution_required_missing() {
        let (result, _) = sub("x: ${TYPECYCLE_TEST_REQUIRED_XYZ123:?must be set}");
        match result {
            Err(ConfigError::EnvVarNotSet { var, location }) => {
                assert_eq!(var, "TYPECYCLE_TEST_REQUIRED_XYZ123");
                assert_eq!(location, "must be set");
            }
            other => panic!("Expected EnvVarNotSet, got {other:?}"),
        }
    }

    #[test]
    fn test_env_substitution_escaped_dollar() {
        let (result, _) = sub("prefix: 'Earn $$100 as a '");
        assert_eq!(result.unwrap(), "prefix: 'Earn $100 as a '");
    }

    #[test]
    fn test_env_substitution_lone_dollar_kept() {
        let (result, _) = sub("a: $ b: 1$");
        assert_eq!(result.unwrap(), "a: $ b: 1$");
    }

    #[test]
    fn test_env_substitution_missing_warning() {
        let (result, warnings) = sub("x: ${TYPECYCLE_TEST_WARN_XYZ123}");
        assert_eq!(result.unwrap(), "x: ");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("TYPECYCLE_TEST_WARN_XYZ123"));
    }

    #[test]
    fn test_env_substitution_unclosed() {
        let (result, _) = sub("a: 1\nb: ${OOPS");
        match result {
            Err(ConfigError::ParseError { line, .. }) => assert_eq!(line, Some(2)),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_env_substitution_multibyte_text() {
        let (result, _) = sub("phrases: ['héllo 👋 $$5']");
        assert_eq!(result.unwrap(), "phrases: ['héllo 👋 $5']");
    }

    #[test]
    fn test_load_str_bom_and_defaults() {
        let result = load("\u{feff}phrases: [Rustacean]\n").unwrap();
        assert_eq!(result.config.phrases, vec!["Rustacean"]);
        assert_eq!(result.config.timing.hold_delay, Duration::from_secs(2));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_str_empty_document() {
        assert!(matches!(
            load("   \n"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_str_parse_error_has_line() {
        match load("phrases: [a, b]\ntiming: [oops\n") {
            Err(ConfigError::ParseError { line, .. }) => assert!(line.is_some()),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_str_validation_error() {
        match load("phrases: []") {
            Err(ConfigError::ValidationError { errors, .. }) => {
                assert_eq!(errors[0].path, "phrases");
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let yaml = "phrases: ['', a]";
        assert_eq!(load(yaml).unwrap().warnings.len(), 1);

        let strict = ConfigLoader::new(LoaderOptions {
            strict: true,
            ..LoaderOptions::default()
        });
        assert!(matches!(
            strict.load_str(yaml, Path::new("s.yaml")),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "phrases: [Web Developer, Problem Solver]").unwrap();
        writeln!(file, "timing: {{ type_delay: 80ms }}").unwrap();

        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.config.phrases.len(), 2);
        assert_eq!(result.config.timing.type_delay, Duration::from_millis(80));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/nonexistent/typecycle.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_size_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "phrases: [{}]", "a, ".repeat(64)).unwrap();

        let loader = ConfigLoader::new(LoaderOptions {
            config_limits: ConfigLimits {
                max_config_size: 16,
                ..ConfigLimits::default()
            },
            strict: false,
        });
        match loader.load(file.path()) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "file_size"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_config_limits_default() {
        let limits = ConfigLimits::default();
        assert!(limits.max_config_size > 0);
        assert!(limits.max_phrases > 0);
        assert!(limits.max_phrase_chars > 0);
    }

    #[test]
    fn test_warning_display() {
        let w = LoadWarning {
            message: "Duplicate phrase 'a'".to_string(),
            location: Some("phrases[1]".to_string()),
        };
        assert_eq!(w.to_string(), "Duplicate phrase 'a' at phrases[1]");
    }
}
