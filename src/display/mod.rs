//! Hero line presentation
//!
//! Composes the static prefix, the rotating text, and the blinking cursor
//! into the line a terminal shows.

pub mod cursor;
pub mod terminal;

use std::time::Duration;

pub use cursor::{CursorBlink, DEFAULT_BLINK_PERIOD, DEFAULT_CURSOR};
pub use terminal::{RenderMode, TerminalRenderer};

/// Static text shown before the rotating phrase.
pub const DEFAULT_PREFIX: &str = "A passionate ";

/// `prefix + visible text + cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroLine {
    prefix: String,
    text: String,
    cursor: Option<CursorBlink>,
}

impl HeroLine {
    /// Creates a line with empty rotating text.
    #[must_use]
    pub fn new(prefix: impl Into<String>, cursor: Option<CursorBlink>) -> Self {
        Self {
            prefix: prefix.into(),
            text: String::new(),
            cursor,
        }
    }

    /// Replaces the rotating text. Returns `false` if it was unchanged.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        text.clone_into(&mut self.text);
        true
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<&CursorBlink> {
        self.cursor.as_ref()
    }

    /// Prefix and text without the cursor.
    #[must_use]
    pub fn plain(&self) -> String {
        format!("{}{}", self.prefix, self.text)
    }

    /// Cursor cell at `elapsed`: the glyph while visible, blank padding of the
    /// same width while hidden, empty with no cursor.
    #[must_use]
    pub fn cursor_cell(&self, elapsed: Duration) -> String {
        match &self.cursor {
            Some(c) if c.is_visible(elapsed) => c.glyph().to_owned(),
            Some(c) => " ".repeat(c.width()),
            None => String::new(),
        }
    }

    /// Full line at `elapsed`.
    #[must_use]
    pub fn compose(&self, elapsed: Duration) -> String {
        format!("{}{}", self.plain(), self.cursor_cell(elapsed))
    }
}

impl Default for HeroLine {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, Some(CursorBlink::default()))
    }
}
