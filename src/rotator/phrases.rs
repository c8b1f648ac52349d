//! Immutable phrase list with char-boundary indexing.
//!
//! Visible length is counted in `char`s, so every prefix handed to a
//! renderer is valid UTF-8 regardless of how many bytes a character takes.

use std::sync::Arc;

use crate::error::RotatorError;

/// One phrase plus the byte offset at which each of its prefixes ends.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Phrase {
    text: String,
    /// `ends[n]` is the byte length of the first `n` characters.
    ends: Box<[usize]>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let ends = std::iter::once(0)
            .chain(text.char_indices().map(|(i, c)| i + c.len_utf8()))
            .collect();
        Self { text, ends }
    }

    fn char_len(&self) -> usize {
        self.ends.len() - 1
    }

    fn prefix(&self, visible_len: usize) -> &str {
        let end = self.ends[visible_len.min(self.char_len())];
        &self.text[..end]
    }
}

/// Ordered, non-empty, read-only sequence of phrases.
///
/// Cloning is cheap: the phrases are shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Arc<[Phrase]>,
}

impl PhraseList {
    /// Builds a phrase list.
    ///
    /// # Errors
    ///
    /// Returns [`RotatorError::InvalidArgument`] if `phrases` is empty.
    pub fn new<I, S>(phrases: I) -> Result<Self, RotatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Arc<[Phrase]> = phrases
            .into_iter()
            .map(|s| Phrase::new(s.into()))
            .collect();

        if phrases.is_empty() {
            return Err(RotatorError::InvalidArgument(
                "phrase list must contain at least one phrase".to_string(),
            ));
        }

        Ok(Self { phrases })
    }

    /// Number of phrases. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Full text of the phrase at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.phrases[index].text
    }

    /// Length in characters of the phrase at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn char_len(&self, index: usize) -> usize {
        self.phrases[index].char_len()
    }

    /// The first `visible_len` characters of the phrase at `index`.
    ///
    /// `visible_len` is clamped to the phrase length.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn prefix(&self, index: usize, visible_len: usize) -> &str {
        self.phrases[index].prefix(visible_len)
    }

    /// Iterates over the phrase texts in rotation order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.text.as_str())
    }
}
