//! Reduction of a simulated insertion to resolve-shaped edits.
//!
//! Accepting a proposal can rewrite several disjoint regions of a buffer,
//! while the protocol only lets a resolve step fill in the text of the primary
//! edit (whose range was fixed when the item was offered) plus additional
//! edits elsewhere. [`reconcile`] takes the diff between the untouched and the
//! mutated buffer, marks the caret, and folds every diff edit that touches the
//! primary range or the caret into the primary edit. The remaining edits, plus
//! deletions for any text the merged region covers outside the primary range,
//! become secondary edits.
//!
//! All offsets are byte offsets into the original buffer, except the caret,
//! which is a byte offset into the mutated buffer.

mod caret;
mod merge;

use splice_text::{EditError, TextEdit, TextRange, apply_edits};
use thiserror::Error;

/// Inputs for one reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    /// Buffer the diff and primary range refer to.
    pub original: &'a str,
    /// Sorted, non-overlapping edits turning `original` into the mutated
    /// buffer.
    pub diff: &'a [TextEdit],
    /// Range of the primary edit; it never changes.
    pub primary: TextRange,
    /// Caret offset in the mutated buffer.
    pub caret: usize,
    /// Token embedded where the caret lands.
    pub marker: &'a str,
}

/// Primary edit plus secondary edits, all over the original buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Edit over the fixed primary range.
    pub primary: TextEdit,
    /// Disjoint edits elsewhere, ordered by `(start, end)`.
    pub secondary: Vec<TextEdit>,
}

impl MergeResult {
    /// Applies every edit simultaneously to `original`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] when the edits do not fit `original`.
    pub fn apply(&self, original: &str) -> Result<String, EditError> {
        let mut edits = Vec::with_capacity(self.secondary.len() + 1);
        edits.push(self.primary.clone());
        edits.extend(self.secondary.iter().cloned());
        apply_edits(original, &edits)
    }
}

/// Errors raised while reconciling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The primary range does not lie within the original buffer on
    /// character boundaries.
    #[error("primary range {range} does not fit a buffer of length {text_len}")]
    PrimaryRangeOutOfBounds {
        /// Offending range.
        range: TextRange,
        /// Length of the original buffer in bytes.
        text_len: usize,
    },
    /// The diff violates its contract.
    #[error("malformed diff: {reason}")]
    MalformedDiff {
        /// Which part of the contract was violated.
        reason: String,
    },
    /// The caret lies past the end of the mutated buffer.
    #[error("caret {caret} is past the end of the mutated buffer ({mutated_len} bytes)")]
    CaretOutOfRange {
        /// Requested caret.
        caret: usize,
        /// Length of the mutated buffer in bytes.
        mutated_len: usize,
    },
    /// The caret splits a multi-byte character of the mutated buffer.
    #[error("caret {caret} is not a character boundary")]
    CaretNotOnCharBoundary {
        /// Requested caret.
        caret: usize,
    },
    /// The merged edits would overlap.
    #[error("reconciled edits {first} and {second} conflict")]
    ConflictingOutput {
        /// Earlier edit range.
        first: TextRange,
        /// Later edit range.
        second: TextRange,
    },
}

/// Reconciles a diff into a primary edit and secondary edits.
///
/// Returns `Ok(None)` when the diff is empty: there is nothing to resolve and
/// the originally offered edit stands. Otherwise exactly one returned edit
/// carries the marker, the primary edit keeps `request.primary` as its range,
/// and applying all edits to the original buffer yields the mutated buffer
/// with the marker inserted at the caret.
///
/// # Errors
///
/// Returns [`ReconcileError`] when the inputs violate their contracts, or when
/// the result would contain conflicting edits.
pub fn reconcile(request: &ReconcileRequest<'_>) -> Result<Option<MergeResult>, ReconcileError> {
    if request.diff.is_empty() {
        return Ok(None);
    }
    check_primary(request.original, request.primary)?;
    let mutated_len = check_diff(request.original, request.diff)?;
    if request.caret > mutated_len {
        return Err(ReconcileError::CaretOutOfRange {
            caret: request.caret,
            mutated_len,
        });
    }

    let mut edits = request.diff.to_vec();
    let marker_range = caret::place_marker(request.original, &mut edits, request.caret, request.marker)?;
    let result = merge::merge_around(request.original, edits, request.primary, marker_range);
    merge::ensure_disjoint(&result)?;
    Ok(Some(result))
}

fn check_primary(original: &str, primary: TextRange) -> Result<(), ReconcileError> {
    let fits = primary.end() <= original.len()
        && original.is_char_boundary(primary.start())
        && original.is_char_boundary(primary.end());
    if fits {
        Ok(())
    } else {
        Err(ReconcileError::PrimaryRangeOutOfBounds {
            range: primary,
            text_len: original.len(),
        })
    }
}

/// Validates the diff and returns the length of the mutated buffer.
fn check_diff(original: &str, diff: &[TextEdit]) -> Result<usize, ReconcileError> {
    let mut previous: Option<&TextEdit> = None;
    let mut mutated_len = original.len();
    for edit in diff {
        let range = edit.range;
        if range.end() > original.len() {
            return Err(malformed(format!(
                "edit {edit} is out of bounds for a buffer of length {}",
                original.len()
            )));
        }
        if !original.is_char_boundary(range.start()) || !original.is_char_boundary(range.end()) {
            return Err(malformed(format!("edit {edit} splits a character")));
        }
        if let Some(prev) = previous {
            let ordered = prev.range.end() <= range.start()
                && !(prev.range.is_empty() && range.is_empty() && prev.range.start() == range.start());
            if !ordered {
                return Err(malformed(format!(
                    "edit {edit} overlaps or precedes edit {prev}"
                )));
            }
        }
        mutated_len = mutated_len + edit.text.len() - range.len();
        previous = Some(edit);
    }
    Ok(mutated_len)
}

fn malformed(reason: String) -> ReconcileError {
    ReconcileError::MalformedDiff { reason }
}
