//! # Blaster
//!
//! A small HTTP request-dispatch framework: a routing trie, an onion-style
//! middleware chain, and plain or TLS servers on hyper and tokio.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blaster::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let mut server = blaster::default_http();
//!
//!     server.get("/user/:id", |ctx| Box::pin(async move {
//!         match ctx.path_value("id").to_u64() {
//!             Ok(id) => ctx.write_string(StatusCode::OK, format!("user {id}")),
//!             Err(err) => ctx.write_string(err.status_code(), err.to_string()),
//!         }
//!     }));
//!
//!     server.start("0.0.0.0:8080").await
//! }
//! ```
//!
//! ## Routing
//!
//! Paths are `/`-separated segments. A segment is a literal, `*` (any one
//! segment) or `:name` (a parameter). Lookup prefers literal over parameter
//! over wildcard. A parameter edge is taken only when the request segment
//! itself starts with `:`, so `/user/:42` binds `id = 42` while `/user/42`
//! does not.
//!
//! ## Middleware
//!
//! ```text
//! Request → A → B → C → dispatcher → handler
//! Response ← A ← B ← C ←───────────────┘
//! ```
//!
//! The first layer passed to `use_middleware` is the outermost. Calling it
//! again replaces the chain.
//!
//! ## Crates
//!
//! | Module | Crate |
//! |--------|-------|
//! | [`router`] | `blaster-router` |
//! | [`core`] | `blaster-core` |
//! | [`middleware`] | `blaster-middleware` |
//! | [`server`] | `blaster-server` |
//! | [`config`] | `blaster-config` |
//! | [`telemetry`] | `blaster-telemetry` |

#![doc(html_root_url = "https://docs.rs/blaster/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use blaster_config as config;
pub use blaster_core as core;
pub use blaster_middleware as middleware;
pub use blaster_router as router;
pub use blaster_server as server;
pub use blaster_telemetry as telemetry;

pub use app::{default_http, default_https, from_config, Blaster};

/// Prelude module for convenient imports.
///
/// ```rust
/// use blaster::prelude::*;
/// ```
pub mod prelude {
    pub use blaster_config::{BlasterConfig, ConfigLoader};
    pub use blaster_core::{
        BoxFuture, Context, ContextError, HandlerFunc, RequestId, SameSite, SetCookie, Value,
    };
    pub use blaster_middleware::stages::{AccessLogMiddleware, RequestIdMiddleware};
    pub use blaster_middleware::{Middleware, MiddlewareChain};
    pub use blaster_server::{
        HttpServe, HttpsServe, Routes, Serve, ServerConfig, ServerError, ShutdownSignal,
    };
    pub use blaster_telemetry::{init_logging, LogConfig, LogFormat};
    pub use http::{Method, StatusCode};

    pub use crate::Blaster;
}
