//! Language host double driven by scripted insertions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use splice_text::{TextEdit, apply_edits};

use crate::host::{HostCapabilitySet, LanguageHost, LanguageHostError};
use crate::proposal::CompletionProposal;

/// Kind of call recorded by [`ScriptedHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `enumerate_proposals` was invoked.
    Enumerate,
    /// `apply_insertion` was invoked.
    Insert,
}

/// What accepting one proposal does to the buffer.
#[derive(Debug, Clone)]
pub struct ScriptedInsertion {
    /// Edits over the buffer handed to the host.
    pub edits: Vec<TextEdit>,
    /// Caret offset reported after applying `edits`.
    pub caret: usize,
}

/// Host returning fixed proposals and applying fixed edits per lookup text.
#[derive(Clone)]
pub struct ScriptedHost {
    capabilities: HostCapabilitySet,
    proposals: Vec<CompletionProposal>,
    insertions: HashMap<String, ScriptedInsertion>,
    calls: Arc<Mutex<Vec<CallKind>>>,
}

impl ScriptedHost {
    /// Builds a host advertising `capabilities` with no proposals.
    pub fn new(capabilities: HostCapabilitySet) -> Self {
        Self {
            capabilities,
            proposals: Vec::new(),
            insertions: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a proposal to the enumeration result.
    pub fn with_proposal(mut self, proposal: CompletionProposal) -> Self {
        self.proposals.push(proposal);
        self
    }

    /// Scripts the insertion performed for proposals with `lookup`.
    pub fn with_insertion(mut self, lookup: &str, edits: Vec<TextEdit>, caret: usize) -> Self {
        self.insertions
            .insert(lookup.to_owned(), ScriptedInsertion { edits, caret });
        self
    }

    /// Shared log of calls made against this host and its clones.
    pub fn calls(&self) -> Arc<Mutex<Vec<CallKind>>> {
        Arc::clone(&self.calls)
    }
}

impl LanguageHost for ScriptedHost {
    fn capabilities(&self) -> HostCapabilitySet {
        self.capabilities
    }

    fn enumerate_proposals(
        &self,
        _buffer: &str,
        _anchor: usize,
    ) -> Result<Vec<CompletionProposal>, LanguageHostError> {
        self.calls.lock().push(CallKind::Enumerate);
        Ok(self.proposals.clone())
    }

    fn apply_insertion(
        &self,
        buffer: &mut String,
        _anchor: usize,
        proposal: &CompletionProposal,
    ) -> Result<usize, LanguageHostError> {
        self.calls.lock().push(CallKind::Insert);
        let insertion = self.insertions.get(&proposal.lookup).ok_or_else(|| {
            LanguageHostError::new(format!("no insertion scripted for '{}'", proposal.lookup))
        })?;
        *buffer = apply_edits(buffer, &insertion.edits)
            .map_err(|error| LanguageHostError::with_source("scripted edits do not apply", error))?;
        Ok(insertion.caret)
    }
}
