//! Error types for suffix parsing and configuration

use thiserror::Error;

/// Errors raised while building a [`Suffix`](crate::Suffix) from a path segment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuffixError {
    /// The `{suffix}` path segment was empty
    #[error("suffix segment is empty")]
    Empty,
}

/// Startup configuration errors. Any of these must stop the process before
/// it begins serving traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No backend broker URL was configured
    #[error("backend broker URL is not configured (set {0})")]
    MissingBackendUrl(&'static str),

    /// The backend broker URL could not be parsed
    #[error("invalid backend broker URL '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    /// The configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected layout
    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },
}
