//! Telemetry error types.

use thiserror::Error;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The log format name is not known.
    #[error("unknown log format '{0}', expected json, pretty or compact")]
    UnknownFormat(String),

    /// A global subscriber is already installed.
    #[error("failed to install the log subscriber: {0}")]
    Install(String),
}
