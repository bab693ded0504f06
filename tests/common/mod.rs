#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use switchyard::handler::Handler;
use switchyard::message::{RequestView, Response};
use switchyard::middleware::{from_fn, Middleware, Next};

/// Installs a thread-local subscriber writing through the test harness, so log lines
/// show up for failing tests only.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

/// Shared, ordered record of what ran.
#[derive(Clone, Default)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

impl Trail {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Interceptor recording `<label>-before` and `<label>-after` around the rest of the chain.
    pub fn layer(&self, label: &'static str) -> Arc<dyn Middleware> {
        let trail = self.clone();
        from_fn(label, move |req: RequestView, next: Next<'_>| {
            trail.push(format!("{label}-before"));
            let resp = next.run(req);
            trail.push(format!("{label}-after"));
            resp
        })
    }

    /// Handler recording `handler` and answering 200 with `{"tag": tag}`.
    pub fn handler(&self, tag: &'static str) -> Handler {
        let trail = self.clone();
        Handler::func(move |_| {
            trail.push("handler");
            Ok(Response::ok(json!({ "tag": tag })))
        })
    }
}

/// Handler answering 200 with `{"tag": tag}`.
pub fn tagged(tag: &'static str) -> Handler {
    Handler::func(move |_| Ok(Response::ok(json!({ "tag": tag }))))
}

/// Handler echoing every bound path parameter as a JSON object.
pub fn echo_params() -> Handler {
    Handler::func(|req| Ok(Response::ok(json!(req.params_map()))))
}
