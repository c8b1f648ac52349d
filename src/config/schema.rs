//! Configuration schema types
//!
//! The YAML shape of a `typecycle` configuration file:
//!
//! ```yaml
//! phrases: ["Web Developer", "Problem Solver", "Creative Thinker"]
//! timing: { type_delay: 150ms, hold_delay: 2s, delete_delay: 50ms }
//! display: { prefix: "A passionate ", cursor: "|", blink_period: 1s }
//! ```
//!
//! Every section is optional and falls back to the built-in defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::display::{CursorBlink, DEFAULT_BLINK_PERIOD, DEFAULT_CURSOR, DEFAULT_PREFIX, HeroLine};
use crate::error::RotatorError;
use crate::rotator::{
    DEFAULT_DELETE_DELAY, DEFAULT_HOLD_DELAY, DEFAULT_TYPE_DELAY, PhraseList, Timing,
};

/// Phrases rotated when neither a file nor the command line supplies any.
pub const DEFAULT_PHRASES: [&str; 3] = ["Web Developer", "Problem Solver", "Creative Thinker"];

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a rotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotatorConfig {
    /// Phrases in rotation order
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,

    /// Tick delays
    #[serde(default)]
    pub timing: TimingConfig,

    /// Presentation of the hero line
    #[serde(default)]
    pub display: DisplayConfig,
}

impl RotatorConfig {
    /// Builds the validated phrase list.
    ///
    /// # Errors
    ///
    /// Returns [`RotatorError::InvalidArgument`] if `phrases` is empty.
    pub fn phrase_list(&self) -> Result<PhraseList, RotatorError> {
        PhraseList::new(self.phrases.iter().cloned())
    }
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            timing: TimingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|&p| p.to_owned()).collect()
}

// ============================================================================
// Timing
// ============================================================================

/// Tick delays, in humantime syntax (`150ms`, `2s`) or integer milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay after each typed character
    #[serde(default = "default_type_delay", with = "duration_format")]
    pub type_delay: Duration,

    /// Pause once a phrase is fully typed
    #[serde(default = "default_hold_delay", with = "duration_format")]
    pub hold_delay: Duration,

    /// Delay after each deleted character
    #[serde(default = "default_delete_delay", with = "duration_format")]
    pub delete_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Timing::default().into()
    }
}

impl From<TimingConfig> for Timing {
    fn from(c: TimingConfig) -> Self {
        Self::new(c.type_delay, c.hold_delay, c.delete_delay)
    }
}

impl From<Timing> for TimingConfig {
    fn from(t: Timing) -> Self {
        Self {
            type_delay: t.type_delay,
            hold_delay: t.hold_delay,
            delete_delay: t.delete_delay,
        }
    }
}

const fn default_type_delay() -> Duration {
    DEFAULT_TYPE_DELAY
}

const fn default_hold_delay() -> Duration {
    DEFAULT_HOLD_DELAY
}

const fn default_delete_delay() -> Duration {
    DEFAULT_DELETE_DELAY
}

// ============================================================================
// Display
// ============================================================================

/// Hero line presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Static text before the rotating phrase
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Cursor glyph; `null` disables the cursor
    #[serde(default = "default_cursor")]
    pub cursor: Option<String>,

    /// Full blink period; `0s` keeps the cursor solid
    #[serde(default = "default_blink_period", with = "duration_format")]
    pub blink_period: Duration,
}

impl DisplayConfig {
    /// Builds the hero line this configuration describes.
    #[must_use]
    pub fn hero_line(&self) -> HeroLine {
        let cursor = self
            .cursor
            .as_ref()
            .map(|glyph| CursorBlink::new(glyph.clone(), self.blink_period));
        HeroLine::new(self.prefix.clone(), cursor)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            cursor: default_cursor(),
            blink_period: DEFAULT_BLINK_PERIOD,
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_owned()
}

#[allow(clippy::unnecessary_wraps)]
fn default_cursor() -> Option<String> {
    Some(DEFAULT_CURSOR.to_owned())
}

const fn default_blink_period() -> Duration {
    DEFAULT_BLINK_PERIOD
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

/// Serde adapter: humantime strings, or bare integers read as milliseconds.
pub mod duration_format {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Text(String),
    }

    /// Writes `value` in humantime syntax.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    /// Reads a humantime string or integer milliseconds.
    ///
    /// # Errors
    ///
    /// Fails on anything humantime cannot parse.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Millis(ms) => Ok(Duration::from_millis(ms)),
            Raw::Text(text) => humantime::parse_duration(text.trim()).map_err(|e| {
                de::Error::custom(format!("invalid duration '{text}': {e}"))
            }),
        }
    }
}
