//! Configuration for the completion engine.
//!
//! Options arrive as JSON from the client's initialisation request. The crate
//! validates them and exposes the logging settings, the caret marker, and the
//! per-language capability overrides.

mod capability;
mod config;
mod defaults;
mod logging;

pub use capability::{
    CapabilityDirective, CapabilityDirectiveParseError, CapabilityMatrix, CapabilityOverride,
    deduplicate_directives,
};
pub use config::{Config, ConfigError};
pub use defaults::{DEFAULT_CARET_MARKER, DEFAULT_LOG_FILTER};
pub use logging::{LogFormat, LogFormatParseError};

#[cfg(test)]
mod tests;
