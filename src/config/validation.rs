//! Configuration validation
//!
//! Semantic checks on a deserialized [`RotatorConfig`]. Validation collects
//! every issue instead of stopping at the first one.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::loader::ConfigLimits;
use crate::config::schema::RotatorConfig;
use crate::error::{Severity, ValidationIssue};

/// Phrases longer than this (in chars) are unlikely to fit on one line.
const LONG_PHRASE_CHARS: usize = 80;

/// Holds shorter than this make a phrase hard to read.
const SHORT_HOLD: Duration = Duration::from_millis(250);

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &RotatorConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_phrases(&config.phrases, limits);
        self.validate_timing(config);
        self.validate_display(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_phrases(&mut self, phrases: &[String], limits: &ConfigLimits) {
        if phrases.is_empty() {
            self.add_error("phrases", "At least one phrase is required");
            return;
        }

        if phrases.len() > limits.max_phrases {
            self.add_error(
                "phrases",
                &format!(
                    "Too many phrases: {} (max {})",
                    phrases.len(),
                    limits.max_phrases
                ),
            );
        }

        let mut seen = HashSet::new();
        for (i, phrase) in phrases.iter().enumerate() {
            let path = format!("phrases[{i}]");
            let chars = phrase.chars().count();

            if phrase.is_empty() {
                self.add_warning(&path, "Phrase is empty and will render as a blank hold");
            } else if chars > limits.max_phrase_chars {
                self.add_error(
                    &path,
                    &format!(
                        "Phrase is {chars} characters long (max {})",
                        limits.max_phrase_chars
                    ),
                );
            } else if chars > LONG_PHRASE_CHARS {
                self.add_warning(
                    &path,
                    &format!("Phrase is unusually long (> {LONG_PHRASE_CHARS} characters)"),
                );
            }

            if phrase.chars().any(char::is_control) {
                self.add_warning(
                    &path,
                    "Phrase contains control characters that break single-line rendering",
                );
            }

            if !seen.insert(phrase.as_str()) {
                self.add_warning(&path, &format!("Duplicate phrase '{phrase}'"));
            }
        }
    }

    fn validate_timing(&mut self, config: &RotatorConfig) {
        let timing = &config.timing;
        for (field, value) in [
            ("timing.type_delay", timing.type_delay),
            ("timing.hold_delay", timing.hold_delay),
            ("timing.delete_delay", timing.delete_delay),
        ] {
            if value.is_zero() {
                self.add_error(field, "Delay must be greater than zero");
            }
        }

        if !timing.hold_delay.is_zero() && timing.hold_delay < SHORT_HOLD {
            self.add_warning(
                "timing.hold_delay",
                "Hold is shorter than 250ms; phrases will be hard to read",
            );
        }
    }

    fn validate_display(&mut self, config: &RotatorConfig) {
        let display = &config.display;
        if display.prefix.chars().any(char::is_control) {
            self.add_warning(
                "display.prefix",
                "Prefix contains control characters that break single-line rendering",
            );
        }

        if display.cursor.as_deref() == Some("") {
            self.add_warning(
                "display.cursor",
                "Empty cursor glyph; use null to disable the cursor",
            );
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
