//! Conversion between engine values and protocol completion items.

use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, CompletionItemTag,
    CompletionTextEdit, InsertTextFormat, InsertTextMode, Range,
};
use serde::{Deserialize, Serialize};
use splice_text::{LineIndex, PositionError, TextEdit, TextRange};

use crate::errors::CompletionError;
use crate::proposal::CompletionProposal;
use crate::session::CompletionSession;

/// Token stored in a completion item's `data` so a later resolve can find
/// the proposal again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveToken {
    /// Version of the session that offered the item.
    pub session_version: u64,
    /// Index of the proposal within that session.
    pub proposal_index: usize,
}

impl ResolveToken {
    /// Decodes the token carried by `item`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::MalformedToken`] when the item has no data
    /// or the data is not a token.
    pub fn from_item(item: &CompletionItem) -> Result<Self, CompletionError> {
        let data = item
            .data
            .as_ref()
            .ok_or_else(|| CompletionError::malformed_token("completion item carries no data"))?;
        Self::deserialize(data).map_err(CompletionError::malformed_token)
    }

    fn to_value(self) -> serde_json::Value {
        serde_json::json!({
            "sessionVersion": self.session_version,
            "proposalIndex": self.proposal_index,
        })
    }
}

/// Range the proposal's lookup text replaces when accepted unresolved.
///
/// A prefix that reaches before the start of the buffer, or that would split
/// a character, is dropped and the range collapses to the anchor.
pub(crate) fn offered_range(snapshot: &str, anchor: usize, proposal: &CompletionProposal) -> TextRange {
    match anchor.checked_sub(proposal.prefix_len) {
        Some(start) if snapshot.is_char_boundary(start) => TextRange::new(start, anchor),
        _ => {
            tracing::warn!(
                target: "splice::completion",
                event = "prefix_clamped",
                anchor,
                prefix_len = proposal.prefix_len,
                label = %proposal.label,
                "proposal prefix does not fit before the anchor"
            );
            TextRange::empty(anchor)
        }
    }
}

/// Builds the protocol item offered for `proposal`.
pub(crate) fn completion_item(
    session: &CompletionSession,
    index: usize,
    proposal: &CompletionProposal,
) -> Result<CompletionItem, CompletionError> {
    let offered = offered_range(session.snapshot(), session.anchor(), proposal);
    let range = to_lsp_range(session.line_index(), session.snapshot(), offered)?;
    let token = ResolveToken {
        session_version: session.version(),
        proposal_index: index,
    };

    Ok(CompletionItem {
        label: proposal.label.clone(),
        label_details: proposal
            .tail_text
            .as_ref()
            .map(|tail| CompletionItemLabelDetails {
                detail: Some(tail.clone()),
                description: None,
            }),
        kind: Some(proposal.kind.unwrap_or(CompletionItemKind::KEYWORD)),
        detail: proposal.detail.clone(),
        tags: proposal
            .deprecated
            .then(|| vec![CompletionItemTag::DEPRECATED]),
        filter_text: Some(proposal.lookup.clone()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        insert_text_mode: Some(InsertTextMode::AS_IS),
        text_edit: Some(CompletionTextEdit::Edit(lsp_types::TextEdit::new(
            range,
            proposal.lookup.clone(),
        ))),
        data: Some(token.to_value()),
        ..CompletionItem::default()
    })
}

/// Primary range of an offered item in snapshot offsets.
///
/// Insert/replace edits contribute their replace range. Items without an
/// edit fall back to the range the proposal was offered with.
pub(crate) fn primary_range(
    item: &CompletionItem,
    session: &CompletionSession,
    proposal: &CompletionProposal,
) -> Result<TextRange, PositionError> {
    let range = match &item.text_edit {
        Some(CompletionTextEdit::Edit(edit)) => edit.range,
        Some(CompletionTextEdit::InsertAndReplace(edit)) => edit.replace,
        None => return Ok(offered_range(session.snapshot(), session.anchor(), proposal)),
    };
    from_lsp_range(session.line_index(), session.snapshot(), range)
}

/// Writes the resolved primary text into `item`, keeping the edit's shape.
pub(crate) fn set_primary_text(item: &mut CompletionItem, primary: lsp_types::TextEdit) {
    match item.text_edit.as_mut() {
        Some(CompletionTextEdit::Edit(edit)) => edit.new_text = primary.new_text,
        Some(CompletionTextEdit::InsertAndReplace(edit)) => edit.new_text = primary.new_text,
        None => item.text_edit = Some(CompletionTextEdit::Edit(primary)),
    }
}

pub(crate) fn to_lsp_edit(
    index: &LineIndex,
    text: &str,
    edit: &TextEdit,
) -> Result<lsp_types::TextEdit, PositionError> {
    Ok(lsp_types::TextEdit::new(
        to_lsp_range(index, text, edit.range)?,
        edit.text.clone(),
    ))
}

fn to_lsp_range(index: &LineIndex, text: &str, range: TextRange) -> Result<Range, PositionError> {
    Ok(Range::new(
        index.position(text, range.start())?,
        index.position(text, range.end())?,
    ))
}

fn from_lsp_range(index: &LineIndex, text: &str, range: Range) -> Result<TextRange, PositionError> {
    Ok(TextRange::new(
        index.offset(text, range.start)?,
        index.offset(text, range.end)?,
    ))
}
