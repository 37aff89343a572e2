//! # Blaster Telemetry
//!
//! Structured logging for Blaster services.
//!
//! Every Blaster crate logs through `tracing` macros. This crate installs the
//! subscriber that turns those events into output: JSON lines by default,
//! pretty or compact text for development.
//!
//! | Target | Level | Events |
//! |--------|-------|--------|
//! | `blaster_router` | DEBUG | route registration |
//! | `blaster_server` | DEBUG | dispatch, connections |
//! | `blaster_server` | INFO | listen, shutdown |
//! | `blaster::access` | INFO | one event per request |

#![doc(html_root_url = "https://docs.rs/blaster-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{build_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
