//! Folding diff edits into the primary edit.

use splice_text::{TextEdit, TextRange};

use super::{MergeResult, ReconcileError};

/// Merges every edit touching the primary range or the marker into a single
/// edit over `primary`.
///
/// Touching counts as intersecting, so an edit ending exactly where the
/// collision range starts is merged. Where the merged span reaches past
/// `primary`, the overhang becomes a secondary deletion; where it falls short,
/// the missing original text is copied into the primary text.
pub(super) fn merge_around(
    original: &str,
    edits: Vec<TextEdit>,
    primary: TextRange,
    marker: TextRange,
) -> MergeResult {
    let collision = primary.cover(marker);
    let (merge_set, mut secondary): (Vec<TextEdit>, Vec<TextEdit>) = edits
        .into_iter()
        .partition(|edit| edit.range.touches(collision));
    // The edit carrying the marker always lands in the merge set.
    let span = merge_set
        .iter()
        .map(|edit| edit.range)
        .fold(marker, TextRange::cover);

    let mut text = String::new();
    if span.start() > primary.start() {
        text.push_str(slice(original, primary.start(), span.start()));
    } else if span.start() < primary.start() {
        secondary.push(TextEdit::delete(span.start()..primary.start()));
    }

    let mut cursor = span.start();
    for edit in &merge_set {
        text.push_str(slice(original, cursor, edit.range.start()));
        text.push_str(&edit.text);
        cursor = edit.range.end();
    }

    if span.end() < primary.end() {
        text.push_str(slice(original, span.end(), primary.end()));
    } else if span.end() > primary.end() {
        secondary.push(TextEdit::delete(primary.end()..span.end()));
    }

    secondary.sort_by_key(|edit| (edit.range.start(), edit.range.end()));
    MergeResult {
        primary: TextEdit::new(primary, text),
        secondary,
    }
}

/// Checks that the primary and secondary edits can be applied together.
///
/// A zero-width primary range sitting exactly where an overhang deletion
/// starts or ends touches it without conflicting, so such results pass.
pub(super) fn ensure_disjoint(result: &MergeResult) -> Result<(), ReconcileError> {
    let mut ranges: Vec<TextRange> = result.secondary.iter().map(|edit| edit.range).collect();
    ranges.push(result.primary.range);
    ranges.sort_unstable();

    for pair in ranges.windows(2) {
        if let [first, second] = pair
            && first.conflicts_with(*second)
        {
            return Err(ReconcileError::ConflictingOutput {
                first: *first,
                second: *second,
            });
        }
    }
    Ok(())
}

/// Original text between two validated offsets.
fn slice(original: &str, start: usize, end: usize) -> &str {
    original.get(start..end).unwrap_or_default()
}
