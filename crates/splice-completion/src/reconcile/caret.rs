//! Locating the caret among diff edits.

use splice_text::{TextEdit, TextRange};

use super::ReconcileError;

/// Embeds `marker` at the caret and returns the range of the edit carrying it.
///
/// The diff is replayed against the mutated buffer. A caret that lands inside
/// an untouched gap gets a new zero-width edit holding only the marker. A
/// caret that lands within, or at either end of, an edit's replacement text
/// is spliced into that text instead; at a gap/edit boundary the edit wins.
///
/// `edits` must be valid for `original` and `caret` must not exceed the
/// mutated length.
pub(super) fn place_marker(
    original: &str,
    edits: &mut Vec<TextEdit>,
    caret: usize,
    marker: &str,
) -> Result<TextRange, ReconcileError> {
    let mut previous_end = 0;
    let mut remaining = caret;
    let mut gap_site = None;

    for (index, edit) in edits.iter_mut().enumerate() {
        let gap = edit.range.start() - previous_end;
        if remaining < gap {
            gap_site = Some((index, previous_end + remaining));
            break;
        }
        remaining -= gap;

        if remaining <= edit.text.len() {
            if !edit.text.is_char_boundary(remaining) {
                return Err(ReconcileError::CaretNotOnCharBoundary { caret });
            }
            edit.text.insert_str(remaining, marker);
            return Ok(edit.range);
        }
        remaining -= edit.text.len();
        previous_end = edit.range.end();
    }

    let (index, offset) = gap_site.unwrap_or((edits.len(), previous_end + remaining));
    if offset > original.len() {
        return Err(ReconcileError::CaretOutOfRange {
            caret,
            mutated_len: caret - (offset - original.len()),
        });
    }
    if !original.is_char_boundary(offset) {
        return Err(ReconcileError::CaretNotOnCharBoundary { caret });
    }
    let marker_edit = TextEdit::insert(offset, marker);
    let range = marker_edit.range;
    edits.insert(index, marker_edit);
    Ok(range)
}
