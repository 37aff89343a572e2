//! Built-in middleware stages.
//!
//! - [`access_log`] - one structured event per request
//! - [`request_id`] - generate or propagate `X-Request-ID`

pub mod access_log;
pub mod request_id;

pub use access_log::{AccessLogEntry, AccessLogMiddleware, AccessLogSink};
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
