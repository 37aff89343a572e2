//! The server trait.

use std::future::Future;

use blaster_core::BoxFuture;
use bytes::Bytes;
use http::{Request, Response};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::Routes;
use crate::shutdown::ShutdownSignal;

/// A routable server that can handle requests and listen on an address.
///
/// [`Serve::handle`] is the transport-independent entry point: it runs a
/// buffered request through the middleware chain and the dispatcher. The
/// start operations bind a listener and feed every connection into it.
pub trait Serve: Routes + Send + Sync + 'static {
    /// The server configuration.
    fn config(&self) -> &ServerConfig;

    /// Handles one buffered request.
    fn handle(&self, request: Request<Bytes>) -> BoxFuture<'_, Response<Bytes>>;

    /// Listens on `addr` until `shutdown` fires, then drains connections.
    fn start_with_shutdown(
        self,
        addr: impl Into<String>,
        shutdown: ShutdownSignal,
    ) -> impl Future<Output = Result<(), ServerError>> + Send
    where
        Self: Sized;

    /// Listens on `addr` until SIGINT or SIGTERM.
    fn start(self, addr: impl Into<String>) -> impl Future<Output = Result<(), ServerError>> + Send
    where
        Self: Sized,
    {
        let addr = addr.into();
        async move {
            let shutdown = ShutdownSignal::with_os_signals();
            self.start_with_shutdown(addr, shutdown).await
        }
    }

    /// Listens on the configured address until SIGINT or SIGTERM.
    fn run(self) -> impl Future<Output = Result<(), ServerError>> + Send
    where
        Self: Sized,
    {
        let addr = self.config().http_addr().to_string();
        self.start(addr)
    }
}
