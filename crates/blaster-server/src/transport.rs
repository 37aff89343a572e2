//! hyper/tokio transport.
//!
//! One task per accepted connection; each connection is served by hyper's
//! HTTP/1 implementation and every request body is buffered before the
//! request reaches [`Serve::handle`].

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::serve::Serve;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// How accepted sockets are turned into byte streams.
pub(crate) enum Acceptor {
    Plain,
    Tls(TlsAcceptor),
}

/// Binds a TCP listener.
pub(crate) async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Runs the accept loop until `shutdown` fires, then drains connections.
pub(crate) async fn serve<S: Serve>(
    server: Arc<S>,
    listener: TcpListener,
    acceptor: Acceptor,
    config: ServerConfig,
    shutdown: ShutdownSignal,
) -> Result<(), ServerError> {
    let local = listener.local_addr()?;
    let scheme = match acceptor {
        Acceptor::Plain => "http",
        Acceptor::Tls(_) => "https",
    };
    tracing::info!(addr = %local, scheme, "server listening");

    let tracker = ConnectionTracker::new();
    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to accept connection");
                    continue;
                }
            },
            () = shutdown.recv() => break,
        };

        let guard = tracker.track();
        let server = Arc::clone(&server);
        let shutdown = shutdown.clone();
        let request_timeout = config.request_timeout();

        match &acceptor {
            Acceptor::Plain => {
                tokio::spawn(async move {
                    serve_connection(server, stream, peer, request_timeout, shutdown).await;
                    drop(guard);
                });
            }
            Acceptor::Tls(tls) => {
                let tls = tls.clone();
                tokio::spawn(async move {
                    match tls.accept(stream).await {
                        Ok(stream) => {
                            serve_connection(server, stream, peer, request_timeout, shutdown).await;
                        }
                        Err(err) => tracing::warn!(%peer, error = %err, "TLS handshake failed"),
                    }
                    drop(guard);
                });
            }
        }
    }

    drop(listener);
    tracing::info!(active = tracker.active(), "shutting down, draining connections");

    if tokio::time::timeout(config.shutdown_timeout(), tracker.wait_idle())
        .await
        .is_err()
    {
        tracing::warn!(
            active = tracker.active(),
            timeout_secs = config.shutdown_timeout().as_secs(),
            "shutdown timeout elapsed with connections still open"
        );
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn serve_connection<S, IO>(
    server: Arc<S>,
    stream: IO,
    peer: SocketAddr,
    request_timeout: Duration,
    shutdown: ShutdownSignal,
) where
    S: Serve,
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tracing::debug!(%peer, "connection opened");

    let service = service_fn(move |request| {
        let server = Arc::clone(&server);
        async move { Ok::<_, Infallible>(respond(server.as_ref(), request, request_timeout).await) }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(err) = result {
        tracing::warn!(%peer, error = %err, "connection error");
    }
    tracing::debug!(%peer, "connection closed");
}

/// Buffers the request body and hands the request to the server.
async fn respond<S: Serve>(
    server: &S,
    request: Request<Incoming>,
    request_timeout: Duration,
) -> Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();

    let bytes = match tokio::time::timeout(request_timeout, body.collect()).await {
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "failed to read request body");
            return plain(StatusCode::BAD_REQUEST, "400 BAD REQUEST");
        }
        Err(_) => {
            tracing::debug!(timeout_ms = request_timeout.as_millis(), "request body timed out");
            return plain(StatusCode::REQUEST_TIMEOUT, "408 REQUEST TIMEOUT");
        }
    };

    server
        .handle(Request::from_parts(parts, bytes))
        .await
        .map(Full::new)
}

fn plain(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response() {
        let response = plain(StatusCode::REQUEST_TIMEOUT, "408 REQUEST TIMEOUT");
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_bind_reports_address() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        match bind(&addr).await {
            Err(ServerError::Bind { addr: reported, .. }) => assert_eq!(reported, addr),
            other => panic!("expected a bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
