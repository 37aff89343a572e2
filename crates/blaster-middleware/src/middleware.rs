//! The middleware type.
//!
//! A [`Middleware`] turns a handler into a new handler that runs extra work
//! around it. Layers are plain values: cheap to clone and freely shared
//! between servers.
//!
//! # Example
//!
//! ```
//! use blaster_middleware::Middleware;
//! use http::StatusCode;
//!
//! // Rejects everything without a token, otherwise continues inward
//! let auth = Middleware::from_fn("auth", |ctx, next| {
//!     Box::pin(async move {
//!         if ctx.headers().contains_key("x-token") {
//!             next.call(ctx).await;
//!         } else {
//!             ctx.write_string(StatusCode::UNAUTHORIZED, "missing token");
//!         }
//!     })
//! });
//! assert_eq!(auth.name(), "auth");
//! ```

use std::fmt;
use std::sync::Arc;

use blaster_core::{BoxFuture, Context, HandlerFunc};

type WrapFn = dyn Fn(HandlerFunc) -> HandlerFunc + Send + Sync;

/// A named transform from handler to handler.
///
/// The wrapping handler decides whether to call the inner one. Not calling
/// it short-circuits every layer further in, including the route handler.
#[derive(Clone)]
pub struct Middleware {
    name: &'static str,
    wrap: Arc<WrapFn>,
}

impl Middleware {
    /// Creates a middleware from a handler transform.
    pub fn new<F>(name: &'static str, wrap: F) -> Self
    where
        F: Fn(HandlerFunc) -> HandlerFunc + Send + Sync + 'static,
    {
        Self {
            name,
            wrap: Arc::new(wrap),
        }
    }

    /// Creates a middleware from an async `(ctx, next)` closure.
    ///
    /// `next` is the handler this layer wraps; await `next.call(ctx)` to
    /// continue inward.
    pub fn from_fn<F>(name: &'static str, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, HandlerFunc) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(name, move |next| {
            let f = Arc::clone(&f);
            HandlerFunc::new(move |ctx| (*f)(ctx, next.clone()))
        })
    }

    /// The name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wraps `next`, producing the handler for this layer.
    #[must_use]
    pub fn wrap(&self, next: HandlerFunc) -> HandlerFunc {
        (self.wrap)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request, StatusCode};

    fn ok_handler() -> HandlerFunc {
        HandlerFunc::new(|ctx| {
            Box::pin(async move {
                ctx.write_string(StatusCode::OK, "inner");
            })
        })
    }

    #[tokio::test]
    async fn test_from_fn_runs_around_inner() {
        let layer = Middleware::from_fn("wrap", |ctx, next| {
            Box::pin(async move {
                ctx.write_string(StatusCode::OK, "before|");
                next.call(ctx).await;
                ctx.write_string(StatusCode::OK, "|after");
            })
        });

        let handler = layer.wrap(ok_handler());
        let mut ctx = Context::new(Request::new(Bytes::new()));
        handler.call(&mut ctx).await;

        assert_eq!(ctx.response_body(), b"before|inner|after");
    }

    #[tokio::test]
    async fn test_plain_transform() {
        let replace = Middleware::new("replace", |_next| {
            HandlerFunc::new(|ctx| {
                Box::pin(async move {
                    ctx.write_string(StatusCode::IM_A_TEAPOT, "replaced");
                })
            })
        });

        let handler = replace.wrap(ok_handler());
        let mut ctx = Context::new(Request::new(Bytes::new()));
        handler.call(&mut ctx).await;

        assert_eq!(ctx.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(ctx.response_body(), b"replaced");
    }

    #[test]
    fn test_debug_shows_name() {
        let layer = Middleware::new("noop", |next| next);
        assert_eq!(layer.name(), "noop");
        assert!(format!("{layer:?}").contains("noop"));
    }
}
