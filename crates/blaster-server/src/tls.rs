//! TLS server.
//!
//! [`HttpsServe`] wraps an [`HttpServe`] and only changes how it listens:
//! the PEM certificate chain and private key are loaded when the server
//! starts and every accepted connection goes through a rustls handshake
//! before reaching hyper.

use std::fmt;
use std::fs::File;
use std::future::Future;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blaster_core::{BoxFuture, HandlerFunc};
use blaster_middleware::Middleware;
use bytes::Bytes;
use http::{Method, Request, Response};
use tokio::net::TcpListener;
use tokio_rustls::rustls;
use tokio_rustls::TlsAcceptor;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::plain::HttpServe;
use crate::routes::Routes;
use crate::serve::Serve;
use crate::shutdown::ShutdownSignal;
use crate::transport::{self, Acceptor};

/// An HTTPS server.
///
/// # Example
///
/// ```rust,no_run
/// use blaster_server::{HttpsServe, Routes, Serve};
/// use http::StatusCode;
///
/// # async fn demo() -> Result<(), blaster_server::ServerError> {
/// let mut server = HttpsServe::new("certs/server.crt", "certs/server.key");
/// server.get("/", |ctx| Box::pin(async move {
///     ctx.write_string(StatusCode::OK, "secure");
/// }));
/// server.start("0.0.0.0:8443").await
/// # }
/// ```
pub struct HttpsServe {
    inner: HttpServe,
    cert_file: PathBuf,
    key_file: PathBuf,
}

impl HttpsServe {
    /// Creates a server using the given PEM files.
    pub fn new(cert_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> Self {
        Self::with_config(ServerConfig::default(), cert_file, key_file)
    }

    /// Creates a server with a custom configuration.
    pub fn with_config(
        config: ServerConfig,
        cert_file: impl Into<PathBuf>,
        key_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inner: HttpServe::with_config(config),
            cert_file: cert_file.into(),
            key_file: key_file.into(),
        }
    }

    /// Replaces the middleware chain.
    pub fn use_middleware(&mut self, layers: impl IntoIterator<Item = Middleware>) {
        self.inner.use_middleware(layers);
    }

    /// Path of the certificate chain.
    pub fn cert_file(&self) -> &Path {
        &self.cert_file
    }

    /// Path of the private key.
    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    /// Serves on an already bound listener until `shutdown` fires.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let tls = load_server_config(&self.cert_file, &self.key_file)?;
        self.serve_tls(tls, listener, shutdown).await
    }

    async fn serve_tls(
        self,
        tls: Arc<rustls::ServerConfig>,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let config = self.inner.config().clone();
        let acceptor = Acceptor::Tls(TlsAcceptor::from(tls));
        transport::serve(Arc::new(self), listener, acceptor, config, shutdown).await
    }
}

impl Routes for HttpsServe {
    fn add_route(&mut self, method: Method, path: &str, handler: HandlerFunc) {
        self.inner.add_route(method, path, handler);
    }
}

impl Serve for HttpsServe {
    fn config(&self) -> &ServerConfig {
        self.inner.config()
    }

    fn handle(&self, request: Request<Bytes>) -> BoxFuture<'_, Response<Bytes>> {
        self.inner.handle(request)
    }

    fn start_with_shutdown(
        self,
        addr: impl Into<String>,
        shutdown: ShutdownSignal,
    ) -> impl Future<Output = Result<(), ServerError>> + Send {
        let addr = addr.into();
        async move {
            // Fail on bad certificates before taking the port
            let tls = load_server_config(&self.cert_file, &self.key_file)?;
            let listener = transport::bind(&addr).await?;
            self.serve_tls(tls, listener, shutdown).await
        }
    }
}

impl fmt::Debug for HttpsServe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpsServe")
            .field("inner", &self.inner)
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .finish()
    }
}

/// Loads a PEM certificate chain and private key into a rustls config.
///
/// The server advertises `http/1.1` over ALPN.
pub fn load_server_config(
    cert_file: &Path,
    key_file: &Path,
) -> Result<Arc<rustls::ServerConfig>, ServerError> {
    let mut certs_reader = open(cert_file)?;
    let certs = rustls_pemfile::certs(&mut certs_reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| tls_error(cert_file, &err))?;
    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "no certificates found in {}",
            cert_file.display()
        )));
    }

    let mut key_reader = open(key_file)?;
    let key = rustls_pemfile::private_key(&mut key_reader)
        .map_err(|err| tls_error(key_file, &err))?
        .ok_or_else(|| ServerError::Tls(format!("no private key found in {}", key_file.display())))?;

    let mut config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| ServerError::Tls(err.to_string()))?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    tracing::debug!(cert = %cert_file.display(), key = %key_file.display(), "loaded TLS configuration");
    Ok(Arc::new(config))
}

fn open(path: &Path) -> Result<BufReader<File>, ServerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| tls_error(path, &err))
}

fn tls_error(path: &Path, err: &std::io::Error) -> ServerError {
    ServerError::Tls(format!("{}: {err}", path.display()))
}
