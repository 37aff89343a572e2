//! # Blaster Server
//!
//! Servers, route registration and the request dispatcher.
//!
//! - [`Routes`] - per-method registration, shared by servers and [`Group`]s
//! - [`Serve`] - request handling and the start operations
//! - [`HttpServe`] / [`HttpsServe`] - plain and TLS servers over hyper
//! - [`dispatcher`] - the terminal handler that resolves routes
//! - [`ShutdownSignal`] - graceful shutdown trigger
//!
//! ## Request flow
//!
//! ```text
//! TCP (+ TLS) -> hyper HTTP/1 -> body buffered -> middleware (outer to inner)
//!     -> dispatcher -> route table lookup -> handler | 404
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use blaster_server::{HttpServe, Routes, Serve};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blaster_server::ServerError> {
//!     let mut server = HttpServe::new();
//!     server.get("/hello", |ctx| Box::pin(async move {
//!         ctx.write_string(StatusCode::OK, "hello");
//!     }));
//!
//!     server.start("0.0.0.0:8080").await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/blaster-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod error;
mod plain;
mod routes;
mod serve;
mod shutdown;
mod tls;
mod transport;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use dispatch::{dispatcher, not_found, NOT_FOUND_BODY};
pub use error::ServerError;
pub use plain::HttpServe;
pub use routes::{Group, Routes};
pub use serve::Serve;
pub use shutdown::{ConnectionGuard, ConnectionTracker, ShutdownSignal};
pub use tls::{load_server_config, HttpsServe};
