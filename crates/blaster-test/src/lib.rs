//! # Blaster Test
//!
//! In-memory HTTP testing for Blaster servers.
//!
//! [`TestClient`] feeds requests directly into [`Serve::handle`], so tests
//! run the real middleware chain, dispatcher and handlers without binding a
//! port.
//!
//! ## Example
//!
//! ```
//! use blaster_server::{HttpServe, Routes};
//! use blaster_test::TestClient;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut server = HttpServe::new();
//! server.post("/user", |ctx| Box::pin(async move {
//!     let user: serde_json::Value = match ctx.bind_json() {
//!         Ok(user) => user,
//!         Err(err) => return ctx.write_string(err.status_code(), err.to_string()),
//!     };
//!     let _ = ctx.write_json(StatusCode::CREATED, &user);
//! }));
//!
//! let client = TestClient::new(server);
//! let response = client.post("/user").json(&json!({"name": "ann"})).send().await;
//!
//! response.assert_status(StatusCode::CREATED);
//! assert_eq!(response.json::<serde_json::Value>().unwrap()["name"], "ann");
//! # });
//! ```
//!
//! [`Serve::handle`]: blaster_server::Serve::handle

#![doc(html_root_url = "https://docs.rs/blaster-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequest;
pub use response::TestResponse;
