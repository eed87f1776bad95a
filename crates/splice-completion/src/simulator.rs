//! Simulated acceptance of a proposal on private buffers.

use crate::errors::{CompletionError, HostOperation};
use crate::host::LanguageHost;
use crate::session::CompletionSession;

/// Buffers before and after accepting a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedInsertion {
    /// Untouched copy of the session snapshot.
    pub before: String,
    /// Copy mutated by the host.
    pub after: String,
    /// Caret byte offset in `after`.
    pub caret: usize,
}

/// Asks `host` to accept proposal `index` of `session` on a private copy of
/// the snapshot.
///
/// # Errors
///
/// Returns [`CompletionError::UnknownProposal`] for an index outside the
/// session, [`CompletionError::Host`] when the host fails, and
/// [`CompletionError::InvalidCaret`] when the reported caret is not a
/// character boundary of the mutated buffer.
pub fn simulate_insertion(
    host: &dyn LanguageHost,
    session: &CompletionSession,
    index: usize,
) -> Result<SimulatedInsertion, CompletionError> {
    let proposal = session
        .proposal(index)
        .ok_or(CompletionError::UnknownProposal {
            version: session.version(),
            index,
            count: session.proposals().len(),
        })?;

    let before = session.snapshot().to_owned();
    let mut after = before.clone();
    let caret = host
        .apply_insertion(&mut after, session.anchor(), proposal)
        .map_err(|source| {
            CompletionError::host(session.language(), HostOperation::ApplyInsertion, source)
        })?;

    if !after.is_char_boundary(caret) {
        return Err(CompletionError::InvalidCaret {
            caret,
            text_len: after.len(),
        });
    }

    Ok(SimulatedInsertion {
        before,
        after,
        caret,
    })
}
