//! Segment trie router for Blaster.
//!
//! Routes are stored in one trie per HTTP method. Every node is one path
//! segment, and each node has three kinds of outgoing edge:
//!
//! - **Literal**: exact segment text (`user`), any number per node
//! - **Parameter**: a named placeholder (`:order_id`), at most one per node
//! - **Wildcard**: `*`, matching any single segment, at most one per node
//!
//! Leading and trailing slashes are insignificant and query strings are not
//! part of the path.
//!
//! # Example
//!
//! ```rust
//! use blaster_router::RouteTable;
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.add_route(Method::GET, "/user/detail/profile", "profile");
//! table.add_route(Method::GET, "/home/:order_id", "order");
//!
//! let m = table.find_route(&Method::GET, "/user/detail/profile").unwrap();
//! assert_eq!(m.handler(), Some(&"profile"));
//!
//! // A parameter edge is taken when the request segment carries the marker
//! let m = table.find_route(&Method::GET, "/home/:42").unwrap();
//! assert_eq!(m.params().get("order_id"), Some("42"));
//!
//! // Intermediate nodes are not routable
//! assert!(table.find_route(&Method::GET, "/user/detail").is_err());
//! ```
//!
//! # Architecture
//!
//! ```text
//!                  GET (root "/")
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "user"         "home"
//!              │               │
//!          "detail"       ":order_id"
//!              │            [order]
//!          "profile"
//!          [profile]
//! ```
//!
//! Lookup prefers a literal edge, then the parameter edge, then the wildcard
//! edge, and never backtracks.

#![doc(html_root_url = "https://docs.rs/blaster-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod node;
mod params;
mod table;

pub use node::{Node, SegmentKind, PARAM_MARKER, WILDCARD};
pub use params::Params;
pub use table::{MatchError, RouteMatch, RouteTable};
