//! Single-slot cache holding the latest completion session.
//!
//! Every completion-list request installs a new [`CompletionSession`] and
//! thereby retires the previous version. Resolve requests look sessions up by
//! version; a version that is no longer current is simply absent, so stale
//! resolves fail soft instead of observing a newer session.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use splice_text::LineIndex;

use crate::language::Language;
use crate::proposal::CompletionProposal;

/// Immutable result of one completion-list computation.
#[derive(Debug)]
pub struct CompletionSession {
    version: u64,
    language: Language,
    anchor: usize,
    snapshot: String,
    line_index: LineIndex,
    proposals: Vec<CompletionProposal>,
}

impl CompletionSession {
    /// Version identifying this session.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Language of the snapshot.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Byte offset at which completion was requested.
    #[must_use]
    pub const fn anchor(&self) -> usize {
        self.anchor
    }

    /// Buffer contents when completion was requested.
    #[must_use]
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Line index over [`Self::snapshot`].
    #[must_use]
    pub const fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Proposals in the order they were offered.
    #[must_use]
    pub fn proposals(&self) -> &[CompletionProposal] {
        &self.proposals
    }

    /// Proposal at `index`, if present.
    #[must_use]
    pub fn proposal(&self, index: usize) -> Option<&CompletionProposal> {
        self.proposals.get(index)
    }
}

/// Holds at most one live [`CompletionSession`].
#[derive(Debug, Default)]
pub struct SessionCache {
    last_version: AtomicU64,
    current: ArcSwapOption<CompletionSession>,
}

impl SessionCache {
    /// Builds an empty cache. The first session receives version 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new session and returns it.
    ///
    /// Versions are allocated from a counter, so concurrent calls never share
    /// a version. Installation is a compare-and-swap loop that only replaces a
    /// session with a lower version, which keeps the newest session installed
    /// when calls race.
    pub fn begin(
        &self,
        proposals: Vec<CompletionProposal>,
        anchor: usize,
        snapshot: String,
        language: Language,
    ) -> Arc<CompletionSession> {
        let version = self.last_version.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        let session = Arc::new(CompletionSession {
            version,
            language,
            anchor,
            line_index: LineIndex::new(&snapshot),
            snapshot,
            proposals,
        });

        self.current.rcu(|installed| {
            let keep = installed
                .as_ref()
                .filter(|current| current.version > version);
            Some(keep.map_or_else(|| Arc::clone(&session), Arc::clone))
        });
        session
    }

    /// Session with `version`, when it is still the current one.
    ///
    /// Never blocks: the slot is read with a single atomic load.
    #[must_use]
    pub fn get(&self, version: u64) -> Option<Arc<CompletionSession>> {
        self.current
            .load_full()
            .filter(|session| session.version == version)
    }

    /// Version of the installed session, if any.
    #[must_use]
    pub fn current_version(&self) -> Option<u64> {
        self.current.load_full().map(|session| session.version)
    }
}
