//! Text edits and simultaneous application.

use std::fmt;

use thiserror::Error;

use crate::range::TextRange;

/// Replacement of `range` with `text`, expressed in one buffer's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEdit {
    /// Range being replaced.
    pub range: TextRange,
    /// Replacement text.
    pub text: String,
}

impl TextEdit {
    /// Builds an edit replacing `range` with `text`.
    #[must_use]
    pub fn new(range: impl Into<TextRange>, text: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            text: text.into(),
        }
    }

    /// Builds a zero-width insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    /// Builds a deletion of `range`.
    #[must_use]
    pub fn delete(range: impl Into<TextRange>) -> Self {
        Self::new(range, String::new())
    }

    /// Whether the edit leaves the buffer unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.text.is_empty()
    }
}

impl fmt::Display for TextEdit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} -> {:?}", self.range, self.text)
    }
}

/// Errors raised when a set of edits cannot be applied to a buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The edit reaches past the end of the buffer.
    #[error("edit range {range} is out of bounds for text length {text_len}")]
    RangeOutOfBounds {
        /// Offending range.
        range: TextRange,
        /// Length of the buffer in bytes.
        text_len: usize,
    },
    /// The edit starts or ends inside a multi-byte character.
    #[error("offset {offset} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary {
        /// Offending offset.
        offset: usize,
    },
    /// Two edits cannot be applied simultaneously.
    #[error("edit {first} conflicts with edit {second}")]
    ConflictingEdits {
        /// Earlier edit in application order.
        first: TextRange,
        /// Later edit in application order.
        second: TextRange,
    },
}

/// Applies `edits` simultaneously to `text`.
///
/// Every range is interpreted in `text`'s coordinates. Edits are ordered by
/// `(start, end)`, so an insertion at an offset lands before a replacement
/// that starts at the same offset.
///
/// # Errors
///
/// Returns [`EditError`] when a range is out of bounds, splits a character, or
/// conflicts with another edit.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.range.start(), edit.range.end()));

    for edit in &ordered {
        check_range(text, edit.range)?;
    }
    for pair in ordered.windows(2) {
        if let [first, second] = pair
            && first.range.conflicts_with(second.range)
        {
            return Err(EditError::ConflictingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    let growth: usize = ordered.iter().map(|edit| edit.text.len()).sum();
    let mut out = String::with_capacity(text.len() + growth);
    let mut cursor = 0;
    for edit in ordered {
        out.push_str(text.get(cursor..edit.range.start()).unwrap_or_default());
        out.push_str(&edit.text);
        cursor = edit.range.end();
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    Ok(out)
}

/// Checks that `range` lies within `text` on character boundaries.
fn check_range(text: &str, range: TextRange) -> Result<(), EditError> {
    if range.end() > text.len() {
        return Err(EditError::RangeOutOfBounds {
            range,
            text_len: text.len(),
        });
    }
    for offset in [range.start(), range.end()] {
        if !text.is_char_boundary(offset) {
            return Err(EditError::InvalidUtf8Boundary { offset });
        }
    }
    Ok(())
}
