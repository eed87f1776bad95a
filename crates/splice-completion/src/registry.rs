//! Capability-indexed registry of language hosts.

use std::collections::HashMap;

use splice_config::CapabilityMatrix;

use crate::capability::{CapabilityKind, CapabilitySummary, resolve_capabilities};
use crate::errors::CompletionError;
use crate::host::LanguageHost;
use crate::language::Language;

struct RegisteredHost {
    host: Box<dyn LanguageHost>,
    summary: CapabilitySummary,
}

/// Hosts keyed by language, each with capabilities resolved at registration.
pub struct LanguageHostRegistry {
    overrides: CapabilityMatrix,
    hosts: HashMap<Language, RegisteredHost>,
}

impl LanguageHostRegistry {
    /// Builds an empty registry applying `overrides` to every host.
    #[must_use]
    pub fn new(overrides: CapabilityMatrix) -> Self {
        Self {
            overrides,
            hosts: HashMap::new(),
        }
    }

    /// Registers the host for `language` and returns its resolved
    /// capabilities.
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
        if self.hosts.contains_key(&language) {
            return Err(CompletionError::duplicate(language));
        }

        let summary = resolve_capabilities(language, host.capabilities(), &self.overrides);
        for state in summary.states() {
            tracing::debug!(
                target: "splice::host",
                event = "capability_resolved",
                language = %language,
                capability = %state.kind,
                enabled = state.enabled,
                source = %state.source,
                "resolved host capability"
            );
        }
        self.hosts.insert(
            language,
            RegisteredHost {
                host,
                summary: summary.clone(),
            },
        );
        Ok(summary)
    }

    /// Resolved capabilities for a registered language.
    #[must_use]
    pub fn capabilities(&self, language: Language) -> Option<&CapabilitySummary> {
        self.hosts.get(&language).map(|entry| &entry.summary)
    }

    /// Host for `language`, provided `capability` is enabled.
    pub(crate) fn require(
        &self,
        language: Language,
        capability: CapabilityKind,
    ) -> Result<&dyn LanguageHost, CompletionError> {
        let entry = self.entry(language)?;
        let state = entry.summary.state(capability);
        if !state.enabled {
            return Err(CompletionError::capability_unavailable(
                language,
                capability,
                state.source,
            ));
        }
        Ok(entry.host.as_ref())
    }

    fn entry(&self, language: Language) -> Result<&RegisteredHost, CompletionError> {
        self.hosts
            .get(&language)
            .ok_or_else(|| CompletionError::unknown(language))
    }
}
