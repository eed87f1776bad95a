//! Error types surfaced by the completion engine.

use std::fmt;

use splice_text::PositionError;
use thiserror::Error;

use crate::capability::{CapabilityKind, CapabilitySource};
use crate::host::LanguageHostError;
use crate::language::Language;
use crate::reconcile::ReconcileError;

/// Host call being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOperation {
    /// Listing proposals at a position.
    EnumerateProposals,
    /// Simulating acceptance of a proposal.
    ApplyInsertion,
}

impl fmt::Display for HostOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EnumerateProposals => "proposal enumeration",
            Self::ApplyInsertion => "insertion",
        };
        formatter.write_str(label)
    }
}

/// Cooperative cancellation checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Before the host enumerates proposals.
    BeforeEnumeration,
    /// After the host returned proposals, before the session is installed.
    AfterEnumeration,
    /// Before the insertion is simulated.
    BeforeSimulation,
    /// After the buffers were diffed.
    AfterDiff,
    /// Before the resolved item is returned.
    BeforeResponse,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BeforeEnumeration => "before_enumeration",
            Self::AfterEnumeration => "after_enumeration",
            Self::BeforeSimulation => "before_simulation",
            Self::AfterDiff => "after_diff",
            Self::BeforeResponse => "before_response",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::CompletionService`].
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No host is registered for the language.
    #[error("language '{language}' has no registered host")]
    UnknownLanguage {
        /// Language requested by the caller.
        language: Language,
    },

    /// The language already has a host.
    #[error("language '{language}' already has a registered host")]
    DuplicateLanguage {
        /// Language registered twice.
        language: Language,
    },

    /// A capability is disabled by overrides or missing host support.
    #[error("capability {capability} for {language} is unavailable: {reason}")]
    CapabilityUnavailable {
        /// Language associated with the capability.
        language: Language,
        /// Capability that was requested.
        capability: CapabilityKind,
        /// Why the capability is not available.
        reason: CapabilitySource,
    },

    /// The language host reported a failure.
    #[error("language host for {language} failed during {operation}: {source}")]
    Host {
        /// Language associated with the host.
        language: Language,
        /// Operation that failed.
        operation: HostOperation,
        /// Underlying error.
        #[source]
        source: LanguageHostError,
    },

    /// The item's resolve token is missing or cannot be decoded.
    #[error("malformed resolve token: {reason}")]
    MalformedToken {
        /// What was wrong with the token.
        reason: String,
    },

    /// The token names a proposal the session does not contain.
    #[error("session {version} has {count} proposals, no proposal {index}")]
    UnknownProposal {
        /// Session version named by the token.
        version: u64,
        /// Proposal index named by the token.
        index: usize,
        /// Number of proposals in the session.
        count: usize,
    },

    /// The host placed the caret outside the mutated buffer or inside a
    /// character.
    #[error("host reported caret {caret} for a buffer of length {text_len}")]
    InvalidCaret {
        /// Reported caret offset.
        caret: usize,
        /// Length of the mutated buffer in bytes.
        text_len: usize,
    },

    /// A protocol position or range could not be translated.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// The simulated insertion could not be reconciled into resolve edits.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// The request was cancelled; no partial result was produced.
    #[error("request cancelled at {stage}")]
    Cancelled {
        /// Checkpoint that observed the cancellation.
        stage: Checkpoint,
    },
}

impl CompletionError {
    pub(crate) const fn unknown(language: Language) -> Self {
        Self::UnknownLanguage { language }
    }

    pub(crate) const fn duplicate(language: Language) -> Self {
        Self::DuplicateLanguage { language }
    }

    pub(crate) const fn capability_unavailable(
        language: Language,
        capability: CapabilityKind,
        reason: CapabilitySource,
    ) -> Self {
        Self::CapabilityUnavailable {
            language,
            capability,
            reason,
        }
    }

    pub(crate) const fn host(
        language: Language,
        operation: HostOperation,
        source: LanguageHostError,
    ) -> Self {
        Self::Host {
            language,
            operation,
            source,
        }
    }

    pub(crate) fn malformed_token(reason: impl fmt::Display) -> Self {
        Self::MalformedToken {
            reason: reason.to_string(),
        }
    }

    /// Whether the error reports cooperative cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
