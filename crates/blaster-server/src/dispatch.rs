//! The terminal handler at the center of every middleware chain.
//!
//! The dispatcher resolves the request against the route table and runs the
//! matched handler. A failed lookup, an intermediate node and a root with no
//! handler all answer `404` with [`NOT_FOUND_BODY`].

use std::sync::Arc;

use blaster_core::{Context, HandlerFunc};
use blaster_router::RouteTable;
use http::StatusCode;

/// Body of every not-found response.
pub const NOT_FOUND_BODY: &str = "404 PAGE NOT FOUND!";

/// Builds the dispatcher for `routes`.
///
/// The table is shared, never copied, so the dispatcher may be built once
/// and reused for every request.
#[must_use]
pub fn dispatcher(routes: Arc<RouteTable<HandlerFunc>>) -> HandlerFunc {
    HandlerFunc::new(move |ctx| {
        let routes = Arc::clone(&routes);
        Box::pin(async move {
            match resolve(&routes, ctx) {
                Some(handler) => handler.call(ctx).await,
                None => not_found(ctx),
            }
        })
    })
}

/// Looks the request up and records the match on the context.
fn resolve(routes: &RouteTable<HandlerFunc>, ctx: &mut Context) -> Option<HandlerFunc> {
    let found = match routes.find_route(ctx.method(), ctx.path()) {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(method = %ctx.method(), path = ctx.path(), reason = %err, "no route");
            return None;
        }
    };

    let Some(handler) = found.handler().cloned() else {
        tracing::debug!(method = %ctx.method(), path = ctx.path(), "route has no handler");
        return None;
    };

    let route = found.registered_path().to_string();
    tracing::debug!(method = %ctx.method(), path = ctx.path(), route = %route, "route matched");
    ctx.set_route(route, found.into_params());
    Some(handler)
}

/// Writes the fixed not-found response.
pub fn not_found(ctx: &mut Context) {
    ctx.write_string(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
}
