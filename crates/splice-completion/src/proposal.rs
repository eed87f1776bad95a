//! Completion proposals produced by language hosts.

use lsp_types::CompletionItemKind;
use serde_json::Value;

/// One candidate offered at a completion position.
///
/// `payload` belongs to the host that produced the proposal; the engine
/// stores it with the session and hands it back unchanged on resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionProposal {
    /// Text shown in the completion list.
    pub label: String,
    /// Text inserted when the item is accepted without resolving.
    pub lookup: String,
    /// Bytes of already-typed prefix immediately before the anchor.
    pub prefix_len: usize,
    /// Type or signature summary.
    pub detail: Option<String>,
    /// Trailing presentation text, such as a parameter list.
    pub tail_text: Option<String>,
    /// Protocol item kind, when the host can classify the proposal.
    pub kind: Option<CompletionItemKind>,
    /// Whether the proposal refers to a deprecated symbol.
    pub deprecated: bool,
    /// Host-owned data.
    pub payload: Value,
}

impl CompletionProposal {
    /// Builds a proposal whose label and lookup text coincide.
    #[must_use]
    pub fn new(lookup: impl Into<String>) -> Self {
        let text = lookup.into();
        Self {
            label: text.clone(),
            lookup: text,
            prefix_len: 0,
            detail: None,
            tail_text: None,
            kind: None,
            deprecated: false,
            payload: Value::Null,
        }
    }

    /// Replaces the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the length of the typed prefix the lookup text replaces.
    #[must_use]
    pub fn with_prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the tail text.
    #[must_use]
    pub fn with_tail_text(mut self, tail_text: impl Into<String>) -> Self {
        self.tail_text = Some(tail_text.into());
        self
    }

    /// Sets the item kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CompletionItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Marks the proposal as deprecated.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Attaches host-owned data.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}
