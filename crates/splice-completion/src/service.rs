//! Completion orchestration: listing proposals and resolving items.
//!
//! [`CompletionService`] ties the host registry, the session cache, the
//! insertion simulator, the differ and the reconciler together. Both entry
//! points take `&self`; the session cache is the only state they share.

use lsp_types::{CompletionItem, Position};
use splice_config::Config;
use splice_text::{BufferDiffer, CharDiffer, LineIndex, TextEdit};
use tokio_util::sync::CancellationToken;

use crate::capability::{CapabilityKind, CapabilitySummary};
use crate::errors::{Checkpoint, CompletionError, HostOperation};
use crate::host::LanguageHost;
use crate::language::Language;
use crate::proposal::CompletionProposal;
use crate::protocol::{self, ResolveToken};
use crate::reconcile::{ReconcileRequest, reconcile};
use crate::registry::LanguageHostRegistry;
use crate::session::{CompletionSession, SessionCache};
use crate::simulator::{SimulatedInsertion, simulate_insertion};

/// Entry point for completion-list and completion-resolve requests.
pub struct CompletionService {
    registry: LanguageHostRegistry,
    sessions: SessionCache,
    differ: Box<dyn BufferDiffer>,
    caret_marker: String,
}

impl CompletionService {
    /// Builds a service with no registered hosts and a character differ.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            registry: LanguageHostRegistry::new(config.capability_matrix()),
            sessions: SessionCache::new(),
            differ: Box::new(CharDiffer::new()),
            caret_marker: config.caret_marker.clone(),
        }
    }

    /// Replaces the buffer differ.
    #[must_use]
    pub fn with_differ(mut self, differ: Box<dyn BufferDiffer>) -> Self {
        self.differ = differ;
        self
    }

    /// Registers the host serving `language`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::DuplicateLanguage`] when the language
    /// already has a host.
    pub fn register_language(
        &mut self,
        language: Language,
        host: Box<dyn LanguageHost>,
    ) -> Result<CapabilitySummary, CompletionError> {
        self.registry.register_language(language, host)
    }

    /// Resolved capabilities for a registered language.
    #[must_use]
    pub fn capabilities(&self, language: Language) -> Option<&CapabilitySummary> {
        self.registry.capabilities(language)
    }

    /// Session cache shared by list and resolve requests.
    #[must_use]
    pub const fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    /// Lists completion items at `position` and installs a new session.
    ///
    /// Each item carries a [`ResolveToken`] in its `data` and a primary edit
    /// replacing the typed prefix with the proposal's lookup text.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the language has no usable completion
    /// host, the position does not exist, the host fails, or the request is
    /// cancelled.
    pub fn compute_completions(
        &self,
        language: Language,
        text: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Result<Vec<CompletionItem>, CompletionError> {
        let host = self.registry.require(language, CapabilityKind::Completion)?;
        let anchor = LineIndex::new(text).offset(text, position)?;

        checkpoint(cancel, Checkpoint::BeforeEnumeration)?;
        let proposals = host
            .enumerate_proposals(text, anchor)
            .map_err(|source| {
                CompletionError::host(language, HostOperation::EnumerateProposals, source)
            })?;
        checkpoint(cancel, Checkpoint::AfterEnumeration)?;

        let session = self
            .sessions
            .begin(proposals, anchor, text.to_owned(), language);
        let items = session
            .proposals()
            .iter()
            .enumerate()
            .map(|(index, proposal)| protocol::completion_item(&session, index, proposal))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            target: "splice::completion",
            event = "session_started",
            version = session.version(),
            language = %language,
            anchor,
            items = items.len(),
            "computed completion items"
        );
        Ok(items)
    }

    /// Resolves `item` into its final primary text and additional edits.
    ///
    /// The item comes back unchanged when its session has been superseded,
    /// when resolving is disabled for the language, or when accepting the
    /// proposal would not change the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the token is malformed, names an
    /// unknown proposal, the host fails, the result cannot be reconciled, or
    /// the request is cancelled.
    pub fn resolve_completion(
        &self,
        item: CompletionItem,
        cancel: &CancellationToken,
    ) -> Result<CompletionItem, CompletionError> {
        let token = ResolveToken::from_item(&item)?;
        let Some(session) = self.sessions.get(token.session_version) else {
            tracing::info!(
                target: "splice::resolve",
                event = "stale_session",
                version = token.session_version,
                current = ?self.sessions.current_version(),
                "session superseded; returning item unresolved"
            );
            return Ok(item);
        };
        let language = session.language();
        let host = match self
            .registry
            .require(language, CapabilityKind::CompletionResolve)
        {
            Ok(host) => host,
            Err(CompletionError::CapabilityUnavailable { reason, .. }) => {
                tracing::info!(
                    target: "splice::resolve",
                    event = "resolve_unavailable",
                    language = %language,
                    reason = %reason,
                    "resolve disabled; returning item unresolved"
                );
                return Ok(item);
            }
            Err(error) => return Err(error),
        };
        let proposal = session
            .proposal(token.proposal_index)
            .ok_or(CompletionError::UnknownProposal {
                version: session.version(),
                index: token.proposal_index,
                count: session.proposals().len(),
            })?;

        checkpoint(cancel, Checkpoint::BeforeSimulation)?;
        let simulated = simulate_insertion(host, &session, token.proposal_index)?;
        let diff = self.differ.diff(&simulated.before, &simulated.after);
        checkpoint(cancel, Checkpoint::AfterDiff)?;

        if diff.is_empty() {
            tracing::debug!(
                target: "splice::resolve",
                event = "empty_diff",
                version = session.version(),
                index = token.proposal_index,
                "insertion leaves the buffer unchanged"
            );
            return Ok(item);
        }

        self.finish(
            item,
            &Resolution {
                session: &session,
                proposal,
                index: token.proposal_index,
                simulated: &simulated,
                diff: &diff,
            },
            cancel,
        )
    }

    /// Reconciles a non-empty diff and writes the result into `item`.
    ///
    /// The item is only modified after the final checkpoint passes.
    pub(crate) fn finish(
        &self,
        mut item: CompletionItem,
        resolution: &Resolution<'_>,
        cancel: &CancellationToken,
    ) -> Result<CompletionItem, CompletionError> {
        let session = resolution.session;
        let primary = protocol::primary_range(&item, session, resolution.proposal)?;
        let request = ReconcileRequest {
            original: &resolution.simulated.before,
            diff: resolution.diff,
            primary,
            caret: resolution.simulated.caret,
            marker: &self.caret_marker,
        };
        let reconciled = reconcile(&request).inspect_err(|error| {
            tracing::warn!(
                target: "splice::resolve",
                event = "reconcile_failed",
                version = session.version(),
                index = resolution.index,
                error = %error,
                "could not reconcile simulated insertion"
            );
        })?;
        let Some(merged) = reconciled else {
            return Ok(item);
        };

        let index = session.line_index();
        let primary_edit = protocol::to_lsp_edit(index, session.snapshot(), &merged.primary)?;
        let additional = merged
            .secondary
            .iter()
            .map(|edit| protocol::to_lsp_edit(index, session.snapshot(), edit))
            .collect::<Result<Vec<_>, _>>()?;
        checkpoint(cancel, Checkpoint::BeforeResponse)?;

        tracing::info!(
            target: "splice::resolve",
            event = "resolved",
            version = session.version(),
            index = resolution.index,
            language = %session.language(),
            edits = additional.len() + 1,
            "resolved completion item"
        );
        protocol::set_primary_text(&mut item, primary_edit);
        item.additional_text_edits = Some(additional);
        Ok(item)
    }
}

/// Intermediate products of one resolve request, ready for reconciliation.
pub(crate) struct Resolution<'a> {
    pub(crate) session: &'a CompletionSession,
    pub(crate) proposal: &'a CompletionProposal,
    pub(crate) index: usize,
    pub(crate) simulated: &'a SimulatedInsertion,
    pub(crate) diff: &'a [TextEdit],
}

fn checkpoint(cancel: &CancellationToken, stage: Checkpoint) -> Result<(), CompletionError> {
    if cancel.is_cancelled() {
        tracing::debug!(
            target: "splice::resolve",
            event = "cancelled",
            stage = %stage,
            "request cancelled"
        );
        return Err(CompletionError::Cancelled { stage });
    }
    Ok(())
}
