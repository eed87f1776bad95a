use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default caret marker: the snippet syntax for the final tab stop.
pub const DEFAULT_CARET_MARKER: &str = "$0";

/// Owned log filter value for serde defaults.
pub fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned caret marker value for serde defaults.
pub fn default_caret_marker() -> String {
    DEFAULT_CARET_MARKER.to_owned()
}
