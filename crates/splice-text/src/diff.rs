//! Character-level buffer differ.

use std::ops::Range;
use std::time::Duration;

use similar::{Algorithm, DiffTag, TextDiff};

use crate::edit::TextEdit;
use crate::range::TextRange;

/// Computes the edits turning one buffer into another.
///
/// Implementations return edits over `before`'s coordinates, sorted by start
/// offset and pairwise non-overlapping, such that applying them to `before`
/// yields `after`. Identical buffers produce no edits.
pub trait BufferDiffer: Send + Sync {
    /// Diffs `before` against `after`.
    fn diff(&self, before: &str, after: &str) -> Vec<TextEdit>;
}

/// Character diff backed by `similar`'s LCS algorithm.
///
/// The common prefix and suffix are trimmed before diffing, and adjacent
/// operations are coalesced, so no two returned edits touch. Operations that
/// do not advance through both buffers in order are discarded in favour of a
/// single replacement of the differing core.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharDiffer {
    timeout: Option<Duration>,
}

impl CharDiffer {
    /// Builds a differ without a time budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the time spent searching for a minimal diff.
    ///
    /// Once the budget is spent the result is still correct but may be
    /// larger than minimal.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl BufferDiffer for CharDiffer {
    fn diff(&self, before: &str, after: &str) -> Vec<TextEdit> {
        if before == after {
            return Vec::new();
        }

        let prefix = common_prefix(before, after);
        let before_rest = before.get(prefix..).unwrap_or_default();
        let after_rest = after.get(prefix..).unwrap_or_default();
        let suffix = common_suffix(before_rest, after_rest);
        let old = before_rest
            .get(..before_rest.len() - suffix)
            .unwrap_or_default();
        let new = after_rest.get(..after_rest.len() - suffix).unwrap_or_default();

        let edits = self
            .diff_core(old, new)
            .unwrap_or_else(|| vec![TextEdit::new(0..old.len(), new)]);
        edits
            .into_iter()
            .map(|edit| {
                let range = TextRange::new(edit.range.start() + prefix, edit.range.end() + prefix);
                TextEdit::new(range, edit.text)
            })
            .collect()
    }
}

impl CharDiffer {
    /// Diffs the differing core of two buffers.
    ///
    /// Returns `None` when the operations reported by `similar` do not walk
    /// both buffers strictly forwards, so the caller can fall back to a single
    /// replacement.
    fn diff_core(&self, old: &str, new: &str) -> Option<Vec<TextEdit>> {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Lcs);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        let diff = config.diff_chars(old, new);

        let old_offsets = char_offsets(old);
        let new_offsets = char_offsets(new);
        let mut old_cursor = 0;
        let mut new_cursor = 0;
        let mut edits: Vec<TextEdit> = Vec::new();
        for op in diff.ops() {
            let (tag, old_chars, new_chars) = op.as_tag_tuple();
            if old_chars.start != old_cursor || new_chars.start != new_cursor {
                return None;
            }
            old_cursor = old_chars.end;
            new_cursor = new_chars.end;
            if tag == DiffTag::Equal {
                continue;
            }

            let replaced = byte_range(&old_offsets, old_chars)?;
            let text = new.get(byte_range(&new_offsets, new_chars)?)?;
            let range = TextRange::from(replaced);
            match edits.last_mut() {
                Some(last) if last.range.end() == range.start() => {
                    last.range = last.range.cover(range);
                    last.text.push_str(text);
                }
                _ => edits.push(TextEdit::new(range, text)),
            }
        }

        let complete = old_cursor + 1 == old_offsets.len() && new_cursor + 1 == new_offsets.len();
        complete.then_some(edits)
    }
}

/// Byte length of the longest common prefix, on a character boundary.
fn common_prefix(before: &str, after: &str) -> usize {
    before
        .char_indices()
        .zip(after.chars())
        .find_map(|((offset, old), new)| (old != new).then_some(offset))
        .unwrap_or_else(|| before.len().min(after.len()))
}

/// Byte length of the longest common suffix, on a character boundary.
fn common_suffix(before: &str, after: &str) -> usize {
    before
        .char_indices()
        .rev()
        .zip(after.chars().rev())
        .find_map(|((offset, old), new)| (old != new).then(|| before.len() - offset - old.len_utf8()))
        .unwrap_or_else(|| before.len().min(after.len()))
}

/// Byte offset of every character plus the end of the buffer.
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Converts a range of character indices into byte offsets.
fn byte_range(offsets: &[usize], chars: Range<usize>) -> Option<Range<usize>> {
    Some(*offsets.get(chars.start)?..*offsets.get(chars.end)?)
}
