//! Request ID middleware.
//!
//! Every request gets a [`RequestId`]: the incoming `X-Request-ID` header
//! when trusted and valid, otherwise a fresh UUID v7. The id is stored in
//! the request extensions, so handlers read it through
//! [`Context::request_id`](blaster_core::Context::request_id), and echoed
//! on the response.

use blaster_core::{Context, RequestId};
use http::HeaderValue;

use crate::middleware::Middleware;

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the request id layer.
///
/// # Example
///
/// ```
/// use blaster_middleware::stages::RequestIdMiddleware;
///
/// let layer = RequestIdMiddleware::trust_incoming().build();
/// assert_eq!(layer.name(), "request_id");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware {
    /// Whether to keep a valid incoming `X-Request-ID`.
    ///
    /// Leave this off for traffic from outside the trust boundary.
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Always generates new ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps a valid incoming `X-Request-ID` instead of generating one.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    fn extract(self, ctx: &Context) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }

        ctx.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(RequestId::parse)
    }

    /// Turns the configuration into a middleware layer.
    #[must_use]
    pub fn build(self) -> Middleware {
        Middleware::from_fn("request_id", move |ctx, next| {
            Box::pin(async move {
                let request_id = self.extract(ctx).unwrap_or_default();
                ctx.extensions_mut().insert(request_id);

                next.call(ctx).await;

                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    ctx.response_headers_mut().insert(REQUEST_ID_HEADER, value);
                }
            })
        })
    }
}
