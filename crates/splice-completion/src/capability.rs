//! Capability modelling and resolution.

use std::collections::BTreeMap;
use std::fmt;

use splice_config::{CapabilityMatrix, CapabilityOverride};

use crate::host::HostCapabilitySet;
use crate::language::Language;

/// Completion feature a host may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    /// Computing the completion list at a position.
    Completion,
    /// Resolving an offered item into its final edits.
    CompletionResolve,
}

impl CapabilityKind {
    const ALL: [Self; 2] = [Self::Completion, Self::CompletionResolve];

    /// Capability key used for overrides.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Completion => "completion.list",
            Self::CompletionResolve => "completion.resolve",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.key())
    }
}

/// Provenance for a capability's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilitySource {
    /// Advertised by the language host.
    ServerAdvertised,
    /// Enabled by a force override.
    ForcedOverride,
    /// Disabled by an explicit deny override.
    DeniedOverride,
    /// Unavailable because the host does not support it.
    MissingOnServer,
}

impl fmt::Display for CapabilitySource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ServerAdvertised => "advertised by host",
            Self::ForcedOverride => "forced by override",
            Self::DeniedOverride => "denied by override",
            Self::MissingOnServer => "missing from host",
        };
        formatter.write_str(label)
    }
}

/// Effective state for a single capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityState {
    /// Capability being described.
    pub kind: CapabilityKind,
    /// Whether the capability is usable.
    pub enabled: bool,
    /// Why the capability is (un)available.
    pub source: CapabilitySource,
}

impl CapabilityState {
    /// Constructs a capability state.
    #[must_use]
    pub const fn new(kind: CapabilityKind, enabled: bool, source: CapabilitySource) -> Self {
        Self {
            kind,
            enabled,
            source,
        }
    }
}

/// Capability summary for a single language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySummary {
    language: Language,
    states: BTreeMap<CapabilityKind, CapabilityState>,
}

impl CapabilitySummary {
    /// Language this summary describes.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// State for the requested capability.
    #[must_use]
    pub fn state(&self, capability: CapabilityKind) -> CapabilityState {
        self.states.get(&capability).copied().unwrap_or_else(|| {
            CapabilityState::new(capability, false, CapabilitySource::MissingOnServer)
        })
    }

    /// All resolved capability states.
    pub fn states(&self) -> impl Iterator<Item = CapabilityState> + '_ {
        self.states.values().copied()
    }
}

/// Combines what a host advertises with configured overrides.
///
/// Force wins over deny, and both win over the advertisement.
pub(crate) fn resolve_capabilities(
    language: Language,
    advertised: HostCapabilitySet,
    overrides: &CapabilityMatrix,
) -> CapabilitySummary {
    let states = CapabilityKind::ALL
        .into_iter()
        .map(|capability| {
            (
                capability,
                resolve_state(language, capability, advertised, overrides),
            )
        })
        .collect();
    CapabilitySummary { language, states }
}

fn resolve_state(
    language: Language,
    capability: CapabilityKind,
    advertised: HostCapabilitySet,
    overrides: &CapabilityMatrix,
) -> CapabilityState {
    match overrides.override_for(language.as_str(), capability.key()) {
        Some(CapabilityOverride::Force) => {
            CapabilityState::new(capability, true, CapabilitySource::ForcedOverride)
        }
        Some(CapabilityOverride::Deny) => {
            CapabilityState::new(capability, false, CapabilitySource::DeniedOverride)
        }
        None | Some(CapabilityOverride::Allow) => {
            let available = match capability {
                CapabilityKind::Completion => advertised.supports_completion(),
                CapabilityKind::CompletionResolve => advertised.supports_resolve(),
            };
            let source = if available {
                CapabilitySource::ServerAdvertised
            } else {
                CapabilitySource::MissingOnServer
            };
            CapabilityState::new(capability, available, source)
        }
    }
}
