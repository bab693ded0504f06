mod common;

use common::{TestTracing, Trail};
use http::Method;
use serde_json::json;
use std::sync::Arc;
use switchyard::handler::HandlerResult;
use switchyard::message::{RequestView, Response};
use switchyard::middleware::{
    from_fn, AuthMiddleware, CorsMiddleware, MetricsMiddleware, Middleware, Next, Pipeline,
    TracingMiddleware,
};
use switchyard::HttpError;

fn ok_terminal(req: RequestView) -> HandlerResult {
    Ok(Response::ok(json!({ "path": req.path() })))
}

#[test]
fn test_onion_order() {
    let trail = Trail::default();
    let mut pipeline = Pipeline::new();
    pipeline.append(trail.layer("A")).append(trail.layer("B"));

    let terminal = |_req: RequestView| -> HandlerResult {
        trail.push("handler");
        Ok(Response::no_content())
    };
    pipeline
        .run(RequestView::new(Method::GET, "/"), &terminal)
        .unwrap();

    assert_eq!(
        trail.entries(),
        ["A-before", "B-before", "handler", "B-after", "A-after"]
    );
}

#[test]
fn test_empty_pipeline_calls_terminal() {
    let pipeline = Pipeline::new();
    assert!(pipeline.is_empty());
    let resp = pipeline
        .run(RequestView::new(Method::GET, "/x"), &ok_terminal)
        .unwrap();
    assert_eq!(resp.body, Some(json!({ "path": "/x" })));
}

#[test]
fn test_short_circuit_skips_rest_of_chain() {
    let trail = Trail::default();
    let mut pipeline = Pipeline::new();
    pipeline
        .append(trail.layer("outer"))
        .append(from_fn("deny", |_req: RequestView, _next: Next<'_>| {
            Ok(Response::unauthorized("Unauthorized"))
        }))
        .append(trail.layer("inner"));

    let terminal = |_req: RequestView| -> HandlerResult {
        trail.push("handler");
        Ok(Response::no_content())
    };
    let resp = pipeline
        .run(RequestView::new(Method::GET, "/"), &terminal)
        .unwrap();

    assert_eq!(resp.status, 401);
    assert_eq!(trail.entries(), ["outer-before", "outer-after"]);
}

#[test]
fn test_middleware_can_replace_request() {
    let mut pipeline = Pipeline::new();
    pipeline.append(from_fn("inject", |req: RequestView, next: Next<'_>| {
        next.run(req.with_header("X-User", "ada"))
    }));

    let terminal =
        |req: RequestView| -> HandlerResult { Ok(Response::ok(json!({ "user": req.header("x-user") }))) };
    let resp = pipeline
        .run(RequestView::new(Method::GET, "/"), &terminal)
        .unwrap();
    assert_eq!(resp.body, Some(json!({ "user": "ada" })));
}

#[test]
fn test_middleware_can_modify_response() {
    let mut pipeline = Pipeline::new();
    pipeline.append(from_fn("stamp", |req: RequestView, next: Next<'_>| {
        let resp = next.run(req)?;
        Ok(resp.with_header("X-Stamp", "1"))
    }));

    let resp = pipeline
        .run(RequestView::new(Method::GET, "/"), &ok_terminal)
        .unwrap();
    assert_eq!(resp.get_header("x-stamp"), Some("1"));
}

#[test]
fn test_errors_propagate_outward() {
    let trail = Trail::default();
    let mut pipeline = Pipeline::new();
    pipeline.append(trail.layer("A"));

    let terminal = |_req: RequestView| -> HandlerResult { Err(HttpError::forbidden("nope").into()) };
    let err = pipeline
        .run(RequestView::new(Method::GET, "/"), &terminal)
        .unwrap_err();

    assert_eq!(err.as_http().map(|e| e.status), Some(403));
    assert_eq!(trail.entries(), ["A-before", "A-after"]);
}

#[test]
fn test_extended_keeps_original() {
    let trail = Trail::default();
    let mut global = Pipeline::new();
    global.append(trail.layer("global"));

    let combined = global.extended(&[trail.layer("route")]);
    assert_eq!(global.len(), 1);
    assert_eq!(combined.len(), 2);

    let terminal = |_req: RequestView| -> HandlerResult {
        trail.push("handler");
        Ok(Response::no_content())
    };
    combined
        .run(RequestView::new(Method::GET, "/"), &terminal)
        .unwrap();
    assert_eq!(
        trail.entries(),
        ["global-before", "route-before", "handler", "route-after", "global-after"]
    );
}

#[test]
fn test_auth_middleware_rejects_missing_or_wrong_token() {
    let mut pipeline = Pipeline::new();
    pipeline.append(Arc::new(AuthMiddleware::new("secret")));

    let resp = pipeline
        .run(RequestView::new(Method::GET, "/"), &ok_terminal)
        .unwrap();
    assert_eq!(resp.status, 401);
    assert_eq!(resp.body, Some(json!({ "error": "Unauthorized" })));

    let wrong = RequestView::new(Method::GET, "/").with_header("Authorization", "Bearer nope");
    assert_eq!(pipeline.run(wrong, &ok_terminal).unwrap().status, 401);

    let good = RequestView::new(Method::GET, "/").with_header("Authorization", "Bearer secret");
    assert_eq!(pipeline.run(good, &ok_terminal).unwrap().status, 200);
}

#[test]
fn test_cors_preflight_short_circuits() {
    let mut pipeline = Pipeline::new();
    pipeline.append(Arc::new(CorsMiddleware::default()));

    let called = std::sync::atomic::AtomicBool::new(false);
    let terminal = |_req: RequestView| -> HandlerResult {
        called.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(Response::ok(json!({})))
    };
    let resp = pipeline
        .run(RequestView::new(Method::OPTIONS, "/pets"), &terminal)
        .unwrap();

    assert_eq!(resp.status, 204);
    assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(resp.get_header("access-control-allow-origin"), Some("*"));
    assert!(resp
        .get_header("access-control-allow-methods")
        .unwrap()
        .contains("POST"));
}

#[test]
fn test_cors_echoes_only_allowed_origin() {
    let cors = CorsMiddleware::new(
        vec!["https://example.com".to_string()],
        vec!["Content-Type".to_string()],
        vec![Method::GET],
    );
    let mut pipeline = Pipeline::new();
    pipeline.append(Arc::new(cors));

    let allowed = RequestView::new(Method::GET, "/").with_header("Origin", "https://example.com");
    let resp = pipeline.run(allowed, &ok_terminal).unwrap();
    assert_eq!(
        resp.get_header("Access-Control-Allow-Origin"),
        Some("https://example.com")
    );
    assert_eq!(resp.get_header("Access-Control-Allow-Methods"), Some("GET"));

    let denied = RequestView::new(Method::GET, "/").with_header("Origin", "https://evil.test");
    let resp = pipeline.run(denied, &ok_terminal).unwrap();
    assert_eq!(resp.status, 200);
    assert!(resp.get_header("Access-Control-Allow-Origin").is_none());
}

#[test]
fn test_metrics_middleware_counts() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut pipeline = Pipeline::new();
    pipeline.append(Arc::clone(&metrics) as Arc<dyn Middleware>);

    for _ in 0..3 {
        pipeline
            .run(RequestView::new(Method::GET, "/"), &ok_terminal)
            .unwrap();
    }
    let not_found = |_req: RequestView| -> HandlerResult { Ok(Response::not_found("gone")) };
    pipeline
        .run(RequestView::new(Method::GET, "/"), &not_found)
        .unwrap();
    let failing = |_req: RequestView| -> HandlerResult { Err(anyhow::anyhow!("db down").into()) };
    assert!(pipeline
        .run(RequestView::new(Method::GET, "/"), &failing)
        .is_err());

    assert_eq!(metrics.request_count(), 5);
    assert_eq!(metrics.status_class_count(2), 3);
    assert_eq!(metrics.status_class_count(4), 1);
    assert_eq!(metrics.status_class_count(9), 0);
    assert_eq!(metrics.failures(), 1);
    assert!(metrics.average_latency() <= std::time::Duration::from_secs(1));
}

#[test]
fn test_tracing_middleware_passes_through() {
    let _tracing = TestTracing::init();
    let mut pipeline = Pipeline::new();
    pipeline.append(Arc::new(TracingMiddleware));

    let resp = pipeline
        .run(RequestView::new(Method::GET, "/traced"), &ok_terminal)
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(format!("{pipeline:?}"), "[\"tracing\"]");
}
