//! Blinking cursor decoration.

use std::time::Duration;

/// Cursor glyph drawn after the rotating text.
pub const DEFAULT_CURSOR: &str = "|";

/// One full hidden-then-visible blink.
pub const DEFAULT_BLINK_PERIOD: Duration = Duration::from_secs(1);

/// Step-end blink: the cursor is hidden for the first half of every period
/// and shown for the second half. A zero period disables blinking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBlink {
    glyph: String,
    period: Duration,
}

impl CursorBlink {
    #[must_use]
    pub fn new(glyph: impl Into<String>, period: Duration) -> Self {
        Self {
            glyph: glyph.into(),
            period,
        }
    }

    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Width of the glyph in chars, used to pad the line while hidden.
    #[must_use]
    pub fn width(&self) -> usize {
        self.glyph.chars().count()
    }

    /// Whether the cursor is drawn `elapsed` after the animation started.
    #[must_use]
    pub fn is_visible(&self, elapsed: Duration) -> bool {
        let period = self.period.as_nanos();
        if period == 0 {
            return true;
        }
        elapsed.as_nanos() % period >= period / 2
    }

    /// Time from `elapsed` until the visibility next flips.
    #[must_use]
    pub fn until_toggle(&self, elapsed: Duration) -> Option<Duration> {
        let period = self.period.as_nanos();
        if period == 0 {
            return None;
        }
        let half = period / 2;
        let phase = elapsed.as_nanos() % period;
        let remaining = if phase < half { half - phase } else { period - phase };
        u64::try_from(remaining).ok().map(Duration::from_nanos)
    }
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR, DEFAULT_BLINK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_hidden_first_half_visible_second_half() {
        let cursor = CursorBlink::default();
        assert!(!cursor.is_visible(ms(0)));
        assert!(!cursor.is_visible(ms(499)));
        assert!(cursor.is_visible(ms(500)));
        assert!(cursor.is_visible(ms(999)));
        assert!(!cursor.is_visible(ms(1000)));
        assert!(cursor.is_visible(ms(2750)));
    }

    #[test]
    fn test_zero_period_always_visible() {
        let cursor = CursorBlink::new("_", Duration::ZERO);
        assert!(cursor.is_visible(ms(0)));
        assert!(cursor.is_visible(ms(123_456)));
        assert_eq!(cursor.until_toggle(ms(10)), None);
    }

    #[test]
    fn test_until_toggle() {
        let cursor = CursorBlink::default();
        assert_eq!(cursor.until_toggle(ms(0)), Some(ms(500)));
        assert_eq!(cursor.until_toggle(ms(200)), Some(ms(300)));
        assert_eq!(cursor.until_toggle(ms(500)), Some(ms(500)));
        assert_eq!(cursor.until_toggle(ms(1900)), Some(ms(100)));
    }

    #[test]
    fn test_width_counts_chars() {
        assert_eq!(CursorBlink::new("▌", ms(1)).width(), 1);
        assert_eq!(CursorBlink::new("<|", ms(1)).width(), 2);
    }
}
