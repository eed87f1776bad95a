//! Capability override directives.
//!
//! Operators can force or deny completion capabilities per language. A
//! directive is written `<language>:<capability>=<force|deny|allow>`, for
//! example `java:completion.resolve=deny`. Keys are compared after trimming
//! and lower-casing so `Java` and ` java ` address the same language.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Directive applied to a capability while resolving what a host offers.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CapabilityOverride {
    /// Enable the capability even when the host does not advertise it.
    Force,
    /// Disable the capability regardless of host support.
    Deny,
    /// Defer to the host's advertisement.
    #[default]
    Allow,
}

/// Errors produced when parsing [`CapabilityDirective`] values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityDirectiveParseError {
    /// Language separator (`:`) was missing from the directive.
    #[error("directive '{0}' is missing the language separator ':'")]
    MissingLanguage(String),
    /// Override assignment (`=`) was missing from the directive.
    #[error("directive '{0}' is missing the override assignment '='")]
    MissingDirective(String),
    /// The override keyword is not one of `force`, `deny` or `allow`.
    #[error("unsupported capability directive '{0}'")]
    InvalidDirective(String),
}

/// One capability override for one language.
///
/// Serialised as its textual form so configuration files can list directives
/// as plain strings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityDirective {
    /// Language identifier such as `java` or `python`.
    pub language: String,
    /// Capability identifier in dot-separated form.
    pub capability: String,
    /// Override applied to the capability.
    pub directive: CapabilityOverride,
}

impl CapabilityDirective {
    /// Creates a directive with normalised keys.
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        capability: impl Into<String>,
        directive: CapabilityOverride,
    ) -> Self {
        Self {
            language: normalise_key(&language.into()),
            capability: normalise_key(&capability.into()),
            directive,
        }
    }

    fn key(&self) -> (String, String) {
        (self.language.clone(), self.capability.clone())
    }
}

impl fmt::Display for CapabilityDirective {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}={}",
            self.language, self.capability, self.directive
        )
    }
}

impl FromStr for CapabilityDirective {
    type Err = CapabilityDirectiveParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (language, rest) = input
            .split_once(':')
            .ok_or_else(|| CapabilityDirectiveParseError::MissingLanguage(input.to_owned()))?;
        let (capability, keyword) = rest
            .split_once('=')
            .ok_or_else(|| CapabilityDirectiveParseError::MissingDirective(input.to_owned()))?;
        let directive = CapabilityOverride::from_str(keyword.trim())
            .map_err(|_| CapabilityDirectiveParseError::InvalidDirective(keyword.to_owned()))?;
        Ok(Self::new(language, capability, directive))
    }
}

impl TryFrom<String> for CapabilityDirective {
    type Error = CapabilityDirectiveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CapabilityDirective> for String {
    fn from(value: CapabilityDirective) -> Self {
        value.to_string()
    }
}

/// Overrides grouped by language and capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityMatrix {
    languages: BTreeMap<String, BTreeMap<String, CapabilityOverride>>,
}

impl CapabilityMatrix {
    /// Builds a matrix from directives; later directives win.
    #[must_use]
    pub fn from_directives<'a, I>(directives: I) -> Self
    where
        I: IntoIterator<Item = &'a CapabilityDirective>,
    {
        let mut matrix = Self::default();
        for directive in directives {
            matrix.set_override(
                directive.language.as_str(),
                directive.capability.as_str(),
                directive.directive,
            );
        }
        matrix
    }

    /// Stores or replaces the override for one capability.
    pub fn set_override(&mut self, language: &str, capability: &str, directive: CapabilityOverride) {
        self.languages
            .entry(normalise_key(language))
            .or_default()
            .insert(normalise_key(capability), directive);
    }

    /// Override for a capability, when one was configured.
    #[must_use]
    pub fn override_for(&self, language: &str, capability: &str) -> Option<CapabilityOverride> {
        self.languages
            .get(&normalise_key(language))
            .and_then(|overrides| overrides.get(&normalise_key(capability)).copied())
    }

    /// Whether no overrides are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.values().all(BTreeMap::is_empty)
    }
}

/// Deduplicates directives in place, keeping the last directive per key.
///
/// The surviving directives are ordered by language, then capability.
pub fn deduplicate_directives(directives: &mut Vec<CapabilityDirective>) {
    let mut merged: BTreeMap<(String, String), CapabilityDirective> = BTreeMap::new();
    for directive in directives.drain(..) {
        merged.insert(directive.key(), directive);
    }
    *directives = merged.into_values().collect();
}

fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase()
}
