//! Plain HTTP server.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use blaster_core::{BoxFuture, Context, HandlerFunc};
use blaster_middleware::{Middleware, MiddlewareChain};
use blaster_router::RouteTable;
use bytes::Bytes;
use http::{Method, Request, Response};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::dispatch::dispatcher;
use crate::error::ServerError;
use crate::routes::Routes;
use crate::serve::Serve;
use crate::shutdown::ShutdownSignal;
use crate::transport::{self, Acceptor};

/// An HTTP/1.1 server.
///
/// Routes and middleware are configured through `&mut self`; starting the
/// server consumes it, so the route table can no longer change once
/// requests are being served.
///
/// # Example
///
/// ```rust
/// use blaster_server::{HttpServe, Routes, Serve};
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
///
/// let mut server = HttpServe::new();
/// server.get("/user/:id", |ctx| Box::pin(async move {
///     let id = ctx.path_value("id").into_string().unwrap_or_default();
///     ctx.write_string(StatusCode::OK, id);
/// }));
///
/// let request = Request::get("/user/:42").body(Bytes::new()).unwrap();
/// let response = tokio_test::block_on(server.handle(request));
/// assert_eq!(response.body().as_ref(), b"42");
/// ```
pub struct HttpServe {
    routes: Arc<RouteTable<HandlerFunc>>,
    middleware: MiddlewareChain,
    entry: OnceLock<HandlerFunc>,
    config: ServerConfig,
}

impl HttpServe {
    /// Creates a server with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Creates a server with a custom configuration.
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            routes: Arc::new(RouteTable::new()),
            middleware: MiddlewareChain::default(),
            entry: OnceLock::new(),
            config,
        }
    }

    /// Replaces the middleware chain.
    ///
    /// The first layer is the outermost. Calling this again discards the
    /// previous layers.
    pub fn use_middleware(&mut self, layers: impl IntoIterator<Item = Middleware>) {
        self.entry.take();
        self.middleware = layers.into_iter().collect();
        tracing::debug!(layers = ?self.middleware.names().collect::<Vec<_>>(), "middleware configured");
    }

    /// The current middleware chain.
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// The registered routes.
    pub fn routes(&self) -> &RouteTable<HandlerFunc> {
        &self.routes
    }

    /// Serves on an already bound listener until `shutdown` fires.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let config = self.config.clone();
        self.entry();
        transport::serve(Arc::new(self), listener, Acceptor::Plain, config, shutdown).await
    }

    /// The middleware chain composed around the dispatcher, built on first use.
    fn entry(&self) -> &HandlerFunc {
        self.entry
            .get_or_init(|| self.middleware.compose(dispatcher(Arc::clone(&self.routes))))
    }
}

impl Default for HttpServe {
    fn default() -> Self {
        Self::new()
    }
}

impl Routes for HttpServe {
    fn add_route(&mut self, method: Method, path: &str, handler: HandlerFunc) {
        // Drop the composed chain first so the table is no longer shared
        self.entry.take();
        Arc::make_mut(&mut self.routes).add_route(method, path, handler);
    }
}

impl Serve for HttpServe {
    fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn handle(&self, request: Request<Bytes>) -> BoxFuture<'_, Response<Bytes>> {
        let entry = self.entry().clone();
        Box::pin(async move {
            let mut ctx = Context::new(request);
            entry.call(&mut ctx).await;
            ctx.into_response()
        })
    }

    fn start_with_shutdown(
        self,
        addr: impl Into<String>,
        shutdown: ShutdownSignal,
    ) -> impl Future<Output = Result<(), ServerError>> + Send {
        let addr = addr.into();
        async move {
            let listener = transport::bind(&addr).await?;
            self.serve_listener(listener, shutdown).await
        }
    }
}

impl fmt::Debug for HttpServe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServe")
            .field("methods", &self.routes.methods().collect::<Vec<_>>())
            .field("middleware", &self.middleware.names().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn text(body: &'static str) -> HandlerFunc {
        HandlerFunc::new(move |ctx| {
            Box::pin(async move {
                ctx.write_string(StatusCode::OK, body);
            })
        })
    }

    fn get(server: &HttpServe, uri: &str) -> Response<Bytes> {
        let request = Request::get(uri).body(Bytes::new()).unwrap();
        tokio_test::block_on(server.handle(request))
    }

    fn tag(name: &'static str) -> Middleware {
        Middleware::from_fn(name, move |ctx, next| {
            Box::pin(async move {
                next.call(ctx).await;
                ctx.response_headers_mut()
                    .append("x-layer", http::HeaderValue::from_static(name));
            })
        })
    }

    #[test]
    fn test_routes_after_handle_are_visible() {
        let mut server = HttpServe::new();
        server.add_route(Method::GET, "/a", text("a"));
        assert_eq!(get(&server, "/a").body().as_ref(), b"a");

        server.add_route(Method::GET, "/b", text("b"));
        assert_eq!(get(&server, "/b").body().as_ref(), b"b");
        assert_eq!(get(&server, "/a").body().as_ref(), b"a");
    }

    #[test]
    fn test_re_registration_replaces_handler() {
        let mut server = HttpServe::new();
        server.add_route(Method::GET, "/user", text("first"));
        server.add_route(Method::GET, "/user/", text("second"));

        assert_eq!(get(&server, "/user").body().as_ref(), b"second");
    }

    #[test]
    fn test_use_middleware_replaces_chain() {
        let mut server = HttpServe::new();
        server.add_route(Method::GET, "/", text("root"));

        server.use_middleware([tag("old")]);
        let response = get(&server, "/");
        assert_eq!(response.headers()["x-layer"], "old");

        server.use_middleware([tag("new")]);
        let response = get(&server, "/");
        let layers: Vec<_> = response
            .headers()
            .get_all("x-layer")
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect();
        assert_eq!(layers, vec!["new"]);
        assert_eq!(server.middleware().names().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_middleware_wraps_not_found() {
        let mut server = HttpServe::new();
        server.use_middleware([tag("outer")]);

        let response = get(&server, "/missing");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-layer"], "outer");
    }

    #[test]
    fn test_group_registers_under_prefix() {
        let mut server = HttpServe::new();
        server.group("/api/v1").add_route(Method::GET, "/ping", text("pong"));

        assert_eq!(get(&server, "/api/v1/ping").body().as_ref(), b"pong");
        assert_eq!(get(&server, "/ping").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_debug_lists_layers() {
        let mut server = HttpServe::new();
        server.use_middleware([tag("one")]);
        let debug = format!("{server:?}");
        assert!(debug.contains("\"one\""), "{debug}");
    }
}
