//! Translation between byte offsets and protocol positions.
//!
//! Protocol positions count lines from zero and columns in UTF-16 code units.
//! A [`LineIndex`] records where each line starts so the translation only
//! scans the single line involved.

use lsp_types::Position;
use thiserror::Error;

/// Errors raised while translating offsets and positions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// The requested line does not exist in the buffer.
    #[error("line {line} is out of range for a buffer with {line_count} lines")]
    LineOutOfRange {
        /// Requested line.
        line: u32,
        /// Number of lines in the buffer.
        line_count: usize,
    },
    /// The offset lies past the end of the buffer.
    #[error("offset {offset} is out of range for text length {text_len}")]
    OffsetOutOfRange {
        /// Requested offset.
        offset: usize,
        /// Length of the buffer in bytes.
        text_len: usize,
    },
    /// The offset splits a multi-byte character.
    #[error("offset {offset} is not a UTF-8 character boundary")]
    NotCharBoundary {
        /// Requested offset.
        offset: usize,
    },
}

/// Line start table for one immutable buffer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Indexes `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset into a protocol position.
    ///
    /// `text` must be the buffer this index was built from.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] when the offset is past the end of the
    /// buffer or inside a multi-byte character.
    pub fn position(&self, text: &str, offset: usize) -> Result<Position, PositionError> {
        debug_assert_eq!(text.len(), self.len, "line index used with another buffer");
        if offset > text.len() {
            return Err(PositionError::OffsetOutOfRange {
                offset,
                text_len: text.len(),
            });
        }
        if !text.is_char_boundary(offset) {
            return Err(PositionError::NotCharBoundary { offset });
        }

        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or_default();
        let column: usize = text
            .get(line_start..offset)
            .unwrap_or_default()
            .chars()
            .map(char::len_utf16)
            .sum();
        Ok(Position::new(to_u32(line), to_u32(column)))
    }

    /// Converts a protocol position into a byte offset.
    ///
    /// Columns past the end of the line clamp to the end of the line, before
    /// its terminator. A column that falls inside a surrogate pair resolves to
    /// the start of that character.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::LineOutOfRange`] when the line does not exist.
    pub fn offset(&self, text: &str, position: Position) -> Result<usize, PositionError> {
        debug_assert_eq!(text.len(), self.len, "line index used with another buffer");
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return Err(PositionError::LineOutOfRange {
                line: position.line,
                line_count: self.line_starts.len(),
            });
        };
        let line_end = self.line_end(text, line);

        let mut remaining = position.character as usize;
        let line_text = text.get(line_start..line_end).unwrap_or_default();
        for (index, ch) in line_text.char_indices() {
            let width = ch.len_utf16();
            if remaining < width {
                return Ok(line_start + index);
            }
            remaining -= width;
        }
        Ok(line_end)
    }

    fn line_end(&self, text: &str, line: usize) -> usize {
        let Some(next) = self.line_starts.get(line + 1) else {
            return text.len();
        };
        let newline = next - 1;
        let line_start = self.line_starts.get(line).copied().unwrap_or_default();
        let carriage_return = newline > line_start
            && text.as_bytes().get(newline - 1).is_some_and(|byte| *byte == b'\r');
        if carriage_return { newline - 1 } else { newline }
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
