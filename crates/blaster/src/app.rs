//! Ready-made servers.

use std::future::Future;
use std::path::PathBuf;

use blaster_config::BlasterConfig;
use blaster_core::{BoxFuture, HandlerFunc};
use blaster_middleware::stages::AccessLogMiddleware;
use blaster_middleware::Middleware;
use blaster_server::{HttpServe, HttpsServe, Routes, Serve, ServerConfig, ServerError, ShutdownSignal};
use bytes::Bytes;
use http::{Method, Request, Response};

/// An HTTP server with the access log installed.
///
/// ```
/// use blaster::server::Routes;
///
/// let mut server = blaster::default_http();
/// server.get("/", |ctx| Box::pin(async move {
///     ctx.write_string(http::StatusCode::OK, "home");
/// }));
/// assert_eq!(server.middleware().names().collect::<Vec<_>>(), vec!["access_log"]);
/// ```
#[must_use]
pub fn default_http() -> HttpServe {
    let mut server = HttpServe::new();
    server.use_middleware([AccessLogMiddleware::new().build()]);
    server
}

/// An HTTPS server with the access log installed.
///
/// The certificate and key are read when the server starts.
pub fn default_https(cert_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> HttpsServe {
    let mut server = HttpsServe::new(cert_file, key_file);
    server.use_middleware([AccessLogMiddleware::new().build()]);
    server
}

/// Builds the server a configuration describes.
///
/// A `[tls]` section selects HTTPS. Logging is not initialized here; pass
/// `config.logging.log_config()` to [`init_logging`] once at startup.
///
/// ```
/// use blaster::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_string("[server]\nhttp_addr = \"127.0.0.1:9000\"", "toml")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// let server = blaster::from_config(&config);
/// assert!(!server.is_tls());
/// ```
///
/// [`init_logging`]: blaster_telemetry::init_logging
#[must_use]
pub fn from_config(config: &BlasterConfig) -> Blaster {
    let server_config = config.server.server_config();
    let access_log = AccessLogMiddleware::new().build();

    match &config.tls {
        Some(tls) => {
            let mut server =
                HttpsServe::with_config(server_config, tls.cert_file.clone(), tls.key_file.clone());
            server.use_middleware([access_log]);
            Blaster::Https(server)
        }
        None => {
            let mut server = HttpServe::with_config(server_config);
            server.use_middleware([access_log]);
            Blaster::Http(server)
        }
    }
}

/// Either server flavor, chosen at runtime.
#[derive(Debug)]
pub enum Blaster {
    /// Plain HTTP.
    Http(HttpServe),
    /// HTTP over TLS.
    Https(HttpsServe),
}

impl Blaster {
    /// Whether connections are TLS.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Https(_))
    }

    /// Replaces the middleware chain.
    pub fn use_middleware(&mut self, layers: impl IntoIterator<Item = Middleware>) {
        match self {
            Self::Http(server) => server.use_middleware(layers),
            Self::Https(server) => server.use_middleware(layers),
        }
    }
}

impl Routes for Blaster {
    fn add_route(&mut self, method: Method, path: &str, handler: HandlerFunc) {
        match self {
            Self::Http(server) => server.add_route(method, path, handler),
            Self::Https(server) => server.add_route(method, path, handler),
        }
    }
}

impl Serve for Blaster {
    fn config(&self) -> &ServerConfig {
        match self {
            Self::Http(server) => server.config(),
            Self::Https(server) => server.config(),
        }
    }

    fn handle(&self, request: Request<Bytes>) -> BoxFuture<'_, Response<Bytes>> {
        match self {
            Self::Http(server) => server.handle(request),
            Self::Https(server) => server.handle(request),
        }
    }

    fn start_with_shutdown(
        self,
        addr: impl Into<String>,
        shutdown: ShutdownSignal,
    ) -> impl Future<Output = Result<(), ServerError>> + Send {
        let addr = addr.into();
        async move {
            match self {
                Self::Http(server) => server.start_with_shutdown(addr, shutdown).await,
                Self::Https(server) => server.start_with_shutdown(addr, shutdown).await,
            }
        }
    }
}
