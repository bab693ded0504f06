use std::time::Instant;

use tracing::{field, info, info_span};

use super::{Middleware, Next};
use crate::handler::HandlerResult;
use crate::message::RequestView;

/// Opens one `request` span per dispatch; everything logged further down the chain is
/// nested inside it. Status and latency are recorded on the span when the response
/// comes back.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult {
        let span = info_span!(
            "request",
            request_id = %req.request_id(),
            method = %req.method(),
            path = %req.path(),
            status = field::Empty,
            latency_ms = field::Empty,
        );
        let _entered = span.enter();
        let start = Instant::now();

        let result = next.run(req);

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        span.record("latency_ms", latency_ms);
        match &result {
            Ok(resp) => {
                span.record("status", resp.status);
                info!(status = resp.status, latency_ms, "Request completed");
            }
            Err(e) => info!(error = %e, latency_ms, "Request failed"),
        }
        result
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
