//! Completion engine: list proposals, then resolve one into exact edits.
#![deny(missing_docs)]
//!
//! A completion-list request asks a [`LanguageHost`] for proposals and caches
//! them in a versioned session. Resolving an item replays the proposal on a
//! private copy of the snapshot, diffs the result against the original, and
//! reconciles the diff into the shape the protocol allows: one primary edit
//! over the range fixed at offer time plus disjoint additional edits, with a
//! caret marker embedded where the cursor should land.
//!
//! Hosts sit behind the [`LanguageHost`] trait so tests and embedders can
//! supply their own backends.

mod capability;
mod errors;
mod host;
mod language;
mod proposal;
mod protocol;
pub mod reconcile;
mod registry;
mod service;
mod session;
mod simulator;
pub mod telemetry;

pub use capability::{CapabilityKind, CapabilitySource, CapabilityState, CapabilitySummary};
pub use errors::{Checkpoint, CompletionError, HostOperation};
pub use host::{HostCapabilitySet, LanguageHost, LanguageHostError};
pub use language::{Language, LanguageParseError};
pub use proposal::CompletionProposal;
pub use protocol::ResolveToken;
pub use reconcile::{MergeResult, ReconcileError, ReconcileRequest, reconcile};
pub use registry::LanguageHostRegistry;
pub use service::CompletionService;
pub use session::{CompletionSession, SessionCache};
pub use simulator::{SimulatedInsertion, simulate_insertion};

#[cfg(test)]
mod tests;
