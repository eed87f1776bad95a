//! Abstraction over the language-specific completion backend.
//!
//! A [`LanguageHost`] knows which proposals apply at a position and what
//! accepting one does to a buffer. Both behaviours are opaque to the engine:
//! it only ever hands the host private copies of a snapshot and observes the
//! result.

use std::error::Error;

use thiserror::Error;

use crate::proposal::CompletionProposal;

/// Features a host advertises before overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilitySet {
    completion: bool,
    resolve: bool,
}

impl HostCapabilitySet {
    /// Describes a host's advertised support.
    #[must_use]
    pub const fn new(completion: bool, resolve: bool) -> Self {
        Self {
            completion,
            resolve,
        }
    }

    /// Whether the host can enumerate proposals.
    #[must_use]
    pub const fn supports_completion(self) -> bool {
        self.completion
    }

    /// Whether the host can simulate accepting a proposal.
    #[must_use]
    pub const fn supports_resolve(self) -> bool {
        self.resolve
    }
}

/// Errors reported by language host implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LanguageHostError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl LanguageHostError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Language-specific completion backend.
///
/// Implementations are shared between concurrent completion and resolve
/// requests, so they take `&self` and must be thread safe.
pub trait LanguageHost: Send + Sync {
    /// Features this host supports.
    fn capabilities(&self) -> HostCapabilitySet;

    /// Lists the proposals applicable at byte offset `anchor` of `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageHostError`] when the backend cannot analyse the
    /// buffer.
    fn enumerate_proposals(
        &self,
        buffer: &str,
        anchor: usize,
    ) -> Result<Vec<CompletionProposal>, LanguageHostError>;

    /// Applies `proposal` to `buffer` in place as if the user accepted it with
    /// the caret at `anchor`.
    ///
    /// The host may rewrite any number of regions. Returns the caret's byte
    /// offset in the mutated buffer.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageHostError`] when the insertion cannot be performed.
    fn apply_insertion(
        &self,
        buffer: &mut String,
        anchor: usize,
        proposal: &CompletionProposal,
    ) -> Result<usize, LanguageHostError>;
}
