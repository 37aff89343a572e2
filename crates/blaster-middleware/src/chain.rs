//! Onion composition of middleware.
//!
//! ```text
//!   request ──▶ A ──▶ B ──▶ C ──▶ terminal
//!                                   │
//!  response ◀── A ◀── B ◀── C ◀─────┘
//! ```
//!
//! The first middleware in the chain is the outermost layer: it sees the
//! request first and the response last.

use blaster_core::HandlerFunc;

use crate::middleware::Middleware;

/// An ordered list of middleware.
///
/// # Example
///
/// ```
/// use blaster_middleware::{Middleware, MiddlewareChain};
///
/// let chain = MiddlewareChain::new(vec![
///     Middleware::new("a", |next| next),
///     Middleware::new("b", |next| next),
/// ]);
/// assert_eq!(chain.names().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Middleware>,
}

impl MiddlewareChain {
    /// Creates a chain; the first element becomes the outermost layer.
    #[must_use]
    pub fn new(layers: Vec<Middleware>) -> Self {
        Self { layers }
    }

    /// Appends a layer inside all existing ones.
    #[must_use]
    pub fn with(mut self, layer: Middleware) -> Self {
        self.layers.push(layer);
        self
    }

    /// Wraps `terminal` in every layer, last to first.
    ///
    /// Call once per configuration and reuse the result; the returned
    /// handler is cheap to clone.
    #[must_use]
    pub fn compose(&self, terminal: HandlerFunc) -> HandlerFunc {
        tracing::debug!(layers = ?self.names().collect::<Vec<_>>(), "composing middleware chain");
        self.layers
            .iter()
            .rev()
            .fold(terminal, |next, layer| layer.wrap(next))
    }

    /// Layer names, outermost first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.layers.iter().map(Middleware::name)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the chain has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl From<Vec<Middleware>> for MiddlewareChain {
    fn from(layers: Vec<Middleware>) -> Self {
        Self::new(layers)
    }
}

impl FromIterator<Middleware> for MiddlewareChain {
    fn from_iter<I: IntoIterator<Item = Middleware>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blaster_core::Context;
    use bytes::Bytes;
    use http::{Request, StatusCode};

    fn tag(name: &'static str) -> Middleware {
        Middleware::from_fn(name, move |ctx, next| {
            Box::pin(async move {
                ctx.write_string(StatusCode::OK, name);
                next.call(ctx).await;
            })
        })
    }

    fn terminal() -> HandlerFunc {
        HandlerFunc::new(|ctx| {
            Box::pin(async move {
                ctx.write_string(StatusCode::OK, "T");
            })
        })
    }

    #[tokio::test]
    async fn test_empty_chain_is_terminal() {
        let chain = MiddlewareChain::default();
        assert!(chain.is_empty());

        let handler = chain.compose(terminal());
        let mut ctx = Context::new(Request::new(Bytes::new()));
        handler.call(&mut ctx).await;
        assert_eq!(ctx.response_body(), b"T");
    }

    #[tokio::test]
    async fn test_first_layer_is_outermost() {
        let chain: MiddlewareChain = vec![tag("A"), tag("B"), tag("C")].into_iter().collect();
        assert_eq!(chain.len(), 3);

        let handler = chain.compose(terminal());
        let mut ctx = Context::new(Request::new(Bytes::new()));
        handler.call(&mut ctx).await;
        assert_eq!(ctx.response_body(), b"ABCT");
    }

    #[tokio::test]
    async fn test_composed_handler_is_reusable() {
        let handler = MiddlewareChain::new(vec![tag("A")]).with(tag("B")).compose(terminal());

        for _ in 0..3 {
            let mut ctx = Context::new(Request::new(Bytes::new()));
            handler.call(&mut ctx).await;
            assert_eq!(ctx.response_body(), b"ABT");
        }
    }
}
