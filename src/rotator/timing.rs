//! Tick delays for the typing, hold, and deleting phases.

use std::time::Duration;

/// Delay between two typed characters.
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(150);

/// Pause after a phrase has been fully typed.
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_millis(2000);

/// Delay between two deleted characters.
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_millis(50);

/// Delays applied between ticks of the rotation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay after a growing tick (and after advancing to the next phrase).
    pub type_delay: Duration,
    /// Delay after the tick that completes a phrase.
    pub hold_delay: Duration,
    /// Delay after the hold releases and after each shrinking tick.
    pub delete_delay: Duration,
}

impl Timing {
    /// Creates a timing with explicit delays.
    #[must_use]
    pub const fn new(type_delay: Duration, hold_delay: Duration, delete_delay: Duration) -> Self {
        Self {
            type_delay,
            hold_delay,
            delete_delay,
        }
    }

    /// Returns a copy with every delay multiplied by `factor`.
    ///
    /// The CLI `--speed` flag passes the reciprocal of its factor.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            type_delay: scale(self.type_delay, factor),
            hold_delay: scale(self.hold_delay, factor),
            delete_delay: scale(self.delete_delay, factor),
        }
    }
}

// Whole nanoseconds, rounded, so exact factors give exact delays.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn scale(delay: Duration, factor: f64) -> Duration {
    Duration::from_nanos((delay.as_nanos() as f64 * factor).round() as u64)
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_DELAY, DEFAULT_HOLD_DELAY, DEFAULT_DELETE_DELAY)
    }
}
