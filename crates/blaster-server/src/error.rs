//! Server error types.

use std::io;

use thiserror::Error;

/// Errors raised while starting or running a server.
///
/// Request-level failures never surface here; they become responses.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Certificate or key loading failed.
    #[error("TLS setup failed: {0}")]
    Tls(String),
}
