//! # Blaster Core
//!
//! Request-level types shared by every Blaster crate:
//!
//! - [`Context`] - the request being served and the response being built
//! - [`HandlerFunc`] - the async handler shape used by routes and middleware
//! - [`Value`] - extracted text with a deferred error, plus conversions
//! - [`SetCookie`] - `Set-Cookie` header builder
//! - [`ContextError`] - failures raised by context helpers
//! - [`RequestId`] - UUID v7 request identifier

#![doc(html_root_url = "https://docs.rs/blaster-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod cookie;
mod error;
mod handler;
mod value;

pub use blaster_router::Params;
pub use context::{Context, RequestId};
pub use cookie::{SameSite, SetCookie};
pub use error::{ContextError, ContextResult};
pub use handler::{BoxFuture, HandlerFunc};
pub use value::Value;
