//! Shared fixtures and helpers for completion tests.

mod scripted_host;
mod world;

use lsp_types::{CompletionItem, CompletionTextEdit, Position, Range};
use mockall::mock;
use rstest::fixture;
use splice_text::TextEdit;

use crate::host::{HostCapabilitySet, LanguageHost, LanguageHostError};
use crate::proposal::CompletionProposal;

pub use scripted_host::{CallKind, ScriptedHost};
pub use world::TestWorld;

mock! {
    pub Host {}
    impl LanguageHost for Host {
        fn capabilities(&self) -> HostCapabilitySet;
        fn enumerate_proposals(
            &self,
            buffer: &str,
            anchor: usize,
        ) -> Result<Vec<CompletionProposal>, LanguageHostError>;
        fn apply_insertion(
            &self,
            buffer: &mut String,
            anchor: usize,
            proposal: &CompletionProposal,
        ) -> Result<usize, LanguageHostError>;
    }
}

/// Buffer used by the member-call scenario.
pub const MEMBER_CALL_TEXT: &str = "foo.bar";

/// Position just after the typed prefix `foo`.
pub const MEMBER_CALL_POSITION: Position = Position {
    line: 0,
    character: 3,
};

/// Host that completes `foo` to `Foobar` and appends an argument list.
#[fixture]
pub fn member_call_host() -> ScriptedHost {
    ScriptedHost::new(HostCapabilitySet::new(true, true))
        .with_proposal(
            CompletionProposal::new("Foobar")
                .with_prefix_len(3)
                .with_detail("Foobar")
                .with_tail_text("()"),
        )
        .with_proposal(CompletionProposal::new("format").with_prefix_len(1))
        .with_insertion(
            "Foobar",
            vec![TextEdit::new(0..3, "Foobar"), TextEdit::insert(7, "()")],
            11,
        )
        .with_insertion("format", vec![TextEdit::new(0..3, "format")], 6)
}

/// Mock host advertising full support.
pub fn mock_host() -> MockHost {
    let mut host = MockHost::new();
    host.expect_capabilities()
        .return_const(HostCapabilitySet::new(true, true));
    host
}

/// Primary text edit carried by an item.
pub fn primary_edit(item: &CompletionItem) -> (Range, String) {
    match item.text_edit.as_ref() {
        Some(CompletionTextEdit::Edit(edit)) => (edit.range, edit.new_text.clone()),
        Some(CompletionTextEdit::InsertAndReplace(edit)) => (edit.replace, edit.new_text.clone()),
        None => panic!("item {} has no text edit", item.label),
    }
}

/// Range on line zero.
pub const fn line_range(start: u32, end: u32) -> Range {
    Range {
        start: Position {
            line: 0,
            character: start,
        },
        end: Position {
            line: 0,
            character: end,
        },
    }
}

/// Applies a resolved item's edits to an ASCII, single-line `text`.
pub fn apply_resolved(text: &str, item: &CompletionItem) -> String {
    let (range, new_text) = primary_edit(item);
    let mut edits = vec![to_text_edit(range, new_text)];
    edits.extend(
        item.additional_text_edits
            .iter()
            .flatten()
            .map(|edit| to_text_edit(edit.range, edit.new_text.clone())),
    );
    splice_text::apply_edits(text, &edits)
        .unwrap_or_else(|error| panic!("resolved edits should apply: {error}"))
}

fn to_text_edit(range: Range, text: String) -> TextEdit {
    assert_eq!(range.start.line, 0, "helper only handles the first line");
    assert_eq!(range.end.line, 0, "helper only handles the first line");
    TextEdit::new(
        range.start.character as usize..range.end.character as usize,
        text,
    )
}
