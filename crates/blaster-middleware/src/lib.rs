//! # Blaster Middleware
//!
//! Middleware composition for the Blaster HTTP framework.
//!
//! A [`Middleware`] is a named transform from one
//! [`HandlerFunc`](blaster_core::HandlerFunc) to another. A
//! [`MiddlewareChain`] folds an ordered list of them around a terminal
//! handler, first element outermost:
//!
//! ```text
//! Request → A → B → C → dispatcher → route handler
//!                                          ↓
//! Response ← A ← B ← C ←───────────────────┘
//! ```
//!
//! Any layer may stop the flow by not calling its inner handler.
//!
//! ## Built-in stages
//!
//! | Stage | Purpose |
//! |-------|---------|
//! | [`stages::AccessLogMiddleware`] | One structured log event per request |
//! | [`stages::RequestIdMiddleware`] | Generate or propagate `X-Request-ID` (UUID v7) |
//!
//! ## Example
//!
//! ```
//! use blaster_core::{Context, HandlerFunc};
//! use blaster_middleware::{stages::RequestIdMiddleware, MiddlewareChain};
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//!
//! let chain = MiddlewareChain::new(vec![RequestIdMiddleware::new().build()]);
//! let handler = chain.compose(HandlerFunc::new(|ctx| {
//!     Box::pin(async move {
//!         ctx.write_string(StatusCode::OK, "hi");
//!     })
//! }));
//!
//! let mut ctx = Context::new(Request::new(Bytes::new()));
//! tokio_test::block_on(handler.call(&mut ctx));
//! assert!(ctx.response_headers().contains_key("x-request-id"));
//! ```

#![doc(html_root_url = "https://docs.rs/blaster-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;

pub use chain::MiddlewareChain;
pub use middleware::Middleware;
