//! # Blaster Config
//!
//! Typed, layered configuration for Blaster servers.
//!
//! - TOML and JSON files
//! - `PREFIX__SECTION__KEY` environment overrides
//! - unknown fields and sections are errors
//! - validation after all layers are applied
//!
//! # File format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_secs = 30
//!
//! # Omit for plain HTTP
//! [tls]
//! cert_file = "certs/server.crt"
//! key_file = "certs/server.key"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment overrides
//!
//! - `BLASTER__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `BLASTER__LOGGING__LEVEL=debug`
//! - `BLASTER__TLS__CERT_FILE=/etc/blaster/server.crt`

#![doc(html_root_url = "https://docs.rs/blaster-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::BlasterConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LoggingSection, ServerSection, TlsSection};
