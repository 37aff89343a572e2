//! Request handler type.
//!
//! A [`HandlerFunc`] is a cheaply cloneable, type-erased async function
//! over `&mut Context`. Route handlers, middleware layers and the dispatcher
//! at the center of the chain all share this one shape, which is what lets
//! middleware wrap handlers into new handlers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;

/// A boxed, sendable future borrowing for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type DynHandler = dyn for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync;

/// An async request handler.
///
/// The handler writes its response through the context; there is no
/// return value. Closures return a pinned boxed future so that the future
/// may borrow the context:
///
/// # Example
///
/// ```
/// use blaster_core::{Context, HandlerFunc};
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
///
/// let hello = HandlerFunc::new(|ctx| {
///     Box::pin(async move {
///         ctx.write_string(StatusCode::OK, "hello");
///     })
/// });
///
/// let mut ctx = Context::new(Request::new(Bytes::new()));
/// tokio_test::block_on(hello.call(&mut ctx));
/// assert_eq!(ctx.response_body(), b"hello");
/// ```
#[derive(Clone)]
pub struct HandlerFunc(Arc<DynHandler>);

impl HandlerFunc {
    /// Wraps an async closure.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the handler against `ctx`.
    pub fn call<'a>(&self, ctx: &'a mut Context) -> BoxFuture<'a, ()> {
        (self.0)(ctx)
    }

    /// Returns true if both values share the same underlying function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HandlerFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerFunc(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request, StatusCode};

    fn ctx() -> Context {
        Context::new(Request::new(Bytes::new()))
    }

    #[tokio::test]
    async fn test_handler_writes_response() {
        let handler = HandlerFunc::new(|ctx| {
            Box::pin(async move {
                ctx.write_string(StatusCode::CREATED, "made");
            })
        });

        let mut ctx = ctx();
        handler.call(&mut ctx).await;

        assert_eq!(ctx.status(), StatusCode::CREATED);
        assert_eq!(ctx.response_body(), b"made");
    }

    #[tokio::test]
    async fn test_handler_awaits_inside() {
        let handler = HandlerFunc::new(|ctx| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                ctx.write_string(StatusCode::OK, "after yield");
            })
        });

        let mut ctx = ctx();
        handler.call(&mut ctx).await;
        assert_eq!(ctx.response_body(), b"after yield");
    }

    #[test]
    fn test_clone_shares_function() {
        let a = HandlerFunc::new(|_ctx| Box::pin(async {}));
        let b = a.clone();
        let c = HandlerFunc::new(|_ctx| Box::pin(async {}));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(format!("{a:?}"), "HandlerFunc(..)");
    }
}
