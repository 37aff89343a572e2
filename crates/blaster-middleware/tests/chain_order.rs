//! Chain ordering integration tests.
//!
//! Three recording layers A, B, C around a terminal handler verify the
//! onion order and short-circuiting.

use std::sync::{Arc, Mutex};

use blaster_core::{Context, HandlerFunc};
use blaster_middleware::stages::{AccessLogMiddleware, RequestIdMiddleware};
use blaster_middleware::{Middleware, MiddlewareChain};
use bytes::Bytes;
use http::{Request, StatusCode};

type Events = Arc<Mutex<Vec<String>>>;

fn recorder(name: &'static str, events: &Events) -> Middleware {
    let events = Arc::clone(events);
    Middleware::from_fn(name, move |ctx, next| {
        let events = Arc::clone(&events);
        Box::pin(async move {
            events.lock().unwrap().push(format!("{name}:pre"));
            next.call(ctx).await;
            events.lock().unwrap().push(format!("{name}:post"));
        })
    })
}

fn stopper(name: &'static str, events: &Events) -> Middleware {
    let events = Arc::clone(events);
    Middleware::from_fn(name, move |ctx, _next| {
        let events = Arc::clone(&events);
        Box::pin(async move {
            events.lock().unwrap().push(format!("{name}:stop"));
            ctx.write_string(StatusCode::FORBIDDEN, "stopped");
        })
    })
}

fn terminal(events: &Events) -> HandlerFunc {
    let events = Arc::clone(events);
    HandlerFunc::new(move |ctx| {
        let events = Arc::clone(&events);
        Box::pin(async move {
            events.lock().unwrap().push("handler".to_string());
            ctx.write_string(StatusCode::OK, "handled");
        })
    })
}

async fn run(chain: &MiddlewareChain, events: &Events) -> Context {
    let handler = chain.compose(terminal(events));
    let mut ctx = Context::new(Request::get("/").body(Bytes::new()).unwrap());
    handler.call(&mut ctx).await;
    ctx
}

fn recorded(events: &Events) -> Vec<String> {
    events.lock().unwrap().clone()
}

#[tokio::test]
async fn test_onion_order() {
    let events = Events::default();
    let chain = MiddlewareChain::new(vec![
        recorder("A", &events),
        recorder("B", &events),
        recorder("C", &events),
    ]);

    let ctx = run(&chain, &events).await;

    assert_eq!(
        recorded(&events),
        vec!["A:pre", "B:pre", "C:pre", "handler", "C:post", "B:post", "A:post"]
    );
    assert_eq!(ctx.response_body(), b"handled");
}

#[tokio::test]
async fn test_short_circuit_skips_inner_layers() {
    let events = Events::default();
    let chain = MiddlewareChain::new(vec![
        recorder("A", &events),
        stopper("B", &events),
        recorder("C", &events),
    ]);

    let ctx = run(&chain, &events).await;

    assert_eq!(recorded(&events), vec!["A:pre", "B:stop", "A:post"]);
    assert_eq!(ctx.status(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.response_body(), b"stopped");
}

#[tokio::test]
async fn test_built_in_stages_compose() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let sink_entries = Arc::clone(&entries);
    let events = Events::default();

    let chain = MiddlewareChain::new(vec![
        AccessLogMiddleware::new()
            .sink(move |entry| sink_entries.lock().unwrap().push(entry.clone()))
            .build(),
        RequestIdMiddleware::new().build(),
    ]);
    assert_eq!(chain.names().collect::<Vec<_>>(), vec!["access_log", "request_id"]);

    let ctx = run(&chain, &events).await;

    assert!(ctx.request_id().is_some());
    assert!(ctx.response_headers().contains_key("x-request-id"));
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, 200);
}
