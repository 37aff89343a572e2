//! Access log middleware.
//!
//! Emits one [`AccessLogEntry`] per request after the inner layers have
//! run, so the entry carries the matched route and the final status.
//!
//! ## Fields
//!
//! - `method` - HTTP method
//! - `path` - request path and query
//! - `route` - registered path of the matched route (empty when unmatched)
//! - `status` - response status code
//! - `body` - request body as lossy UTF-8 (empty when body logging is off)
//! - `duration_ms` - time spent in the inner layers
//!
//! By default entries go to `tracing` at INFO under the `blaster::access`
//! target. A custom [`AccessLogSink`] replaces that.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use blaster_core::Context;
use serde::Serialize;

use crate::middleware::Middleware;

/// One access log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessLogEntry {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub path: String,
    /// Registered path of the matched route.
    pub route: String,
    /// Response status code.
    pub status: u16,
    /// Request body.
    pub body: String,
    /// Time spent in the inner layers, in milliseconds.
    pub duration_ms: f64,
}

impl AccessLogEntry {
    /// Serializes the entry as a single JSON line.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Every field is a plain string or number
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Destination for access log entries.
pub type AccessLogSink = Arc<dyn Fn(&AccessLogEntry) + Send + Sync>;

/// Builds the access log layer.
///
/// # Example
///
/// ```
/// use blaster_middleware::stages::AccessLogMiddleware;
/// use std::sync::{Arc, Mutex};
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink_lines = Arc::clone(&lines);
///
/// let layer = AccessLogMiddleware::new()
///     .sink(move |entry| sink_lines.lock().unwrap().push(entry.to_json()))
///     .build();
/// assert_eq!(layer.name(), "access_log");
/// ```
#[derive(Clone)]
pub struct AccessLogMiddleware {
    sink: Option<AccessLogSink>,
    log_body: bool,
}

impl Default for AccessLogMiddleware {
    fn default() -> Self {
        Self {
            sink: None,
            log_body: true,
        }
    }
}

impl AccessLogMiddleware {
    /// Logs through `tracing`, including request bodies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends entries to `sink` instead of `tracing`.
    #[must_use]
    pub fn sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&AccessLogEntry) + Send + Sync + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Whether to include the request body in entries.
    #[must_use]
    pub fn log_body(mut self, log_body: bool) -> Self {
        self.log_body = log_body;
        self
    }

    /// Turns the configuration into a middleware layer.
    #[must_use]
    pub fn build(self) -> Middleware {
        let Self { sink, log_body } = self;
        Middleware::from_fn("access_log", move |ctx, next| {
            let sink = sink.clone();
            Box::pin(async move {
                let start = Instant::now();
                next.call(ctx).await;
                let entry = entry_for(ctx, log_body, start);

                match sink {
                    Some(sink) => (*sink)(&entry),
                    None => emit(&entry),
                }
            })
        })
    }
}

impl fmt::Debug for AccessLogMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLogMiddleware")
            .field("custom_sink", &self.sink.is_some())
            .field("log_body", &self.log_body)
            .finish()
    }
}

fn entry_for(ctx: &Context, log_body: bool, start: Instant) -> AccessLogEntry {
    let path = ctx
        .uri()
        .path_and_query()
        .map_or_else(|| ctx.path().to_string(), ToString::to_string);
    let body = if log_body {
        String::from_utf8_lossy(ctx.body()).into_owned()
    } else {
        String::new()
    };

    AccessLogEntry {
        method: ctx.method().to_string(),
        path,
        route: ctx.route().to_string(),
        status: ctx.status().as_u16(),
        body,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn emit(entry: &AccessLogEntry) {
    tracing::info!(
        target: "blaster::access",
        method = %entry.method,
        path = %entry.path,
        route = %entry.route,
        status = entry.status,
        body = %entry.body,
        duration_ms = entry.duration_ms,
        "request completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use blaster_core::{HandlerFunc, Params};
    use bytes::Bytes;
    use http::{Request, StatusCode};
    use std::sync::Mutex;

    fn routed_handler() -> HandlerFunc {
        HandlerFunc::new(|ctx| {
            Box::pin(async move {
                ctx.set_route("user/:id", Params::new());
                ctx.write_string(StatusCode::CREATED, "done");
            })
        })
    }

    async fn capture(layer: AccessLogMiddleware, request: Request<Bytes>) -> Vec<AccessLogEntry> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let sink_entries = Arc::clone(&entries);
        let handler = layer
            .sink(move |entry| sink_entries.lock().unwrap().push(entry.clone()))
            .build()
            .wrap(routed_handler());

        let mut ctx = Context::new(request);
        handler.call(&mut ctx).await;

        let captured = entries.lock().unwrap().clone();
        captured
    }

    #[tokio::test]
    async fn test_entry_records_request_and_outcome() {
        let request = Request::post("/user/:7?verbose=1")
            .body(Bytes::from_static(b"{\"name\":\"ann\"}"))
            .unwrap();

        let entries = capture(AccessLogMiddleware::new(), request).await;
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/user/:7?verbose=1");
        assert_eq!(entry.route, "user/:id");
        assert_eq!(entry.status, 201);
        assert_eq!(entry.body, "{\"name\":\"ann\"}");
        assert!(entry.duration_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_body_logging_can_be_disabled() {
        let request = Request::post("/login").body(Bytes::from_static(b"secret")).unwrap();

        let entries = capture(AccessLogMiddleware::new().log_body(false), request).await;
        assert_eq!(entries[0].body, "");
    }

    #[tokio::test]
    async fn test_default_sink_does_not_disturb_response() {
        let handler = AccessLogMiddleware::new().build().wrap(routed_handler());
        let mut ctx = Context::new(Request::get("/").body(Bytes::new()).unwrap());
        handler.call(&mut ctx).await;

        assert_eq!(ctx.status(), StatusCode::CREATED);
        assert_eq!(ctx.response_body(), b"done");
    }

    #[test]
    fn test_to_json() {
        let entry = AccessLogEntry {
            method: "GET".into(),
            path: "/".into(),
            route: "/".into(),
            status: 200,
            body: String::new(),
            duration_ms: 1.5,
        };

        let value: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status"], 200);
        assert_eq!(value["duration_ms"], 1.5);
    }
}
