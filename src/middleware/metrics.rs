use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::{Middleware, Next};
use crate::handler::HandlerResult;
use crate::message::RequestView;

/// Request counters kept with atomics only.
///
/// Metrics collected:
/// - Total request count
/// - Average latency across completed dispatches
/// - Responses per status class (1xx through 5xx)
/// - Dispatches that ended in an error instead of a response
///
/// Structured `HttpError`s are turned into responses by the dispatcher outside this
/// interceptor, so they are counted as failures here, not under their status class.
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    status_classes: [AtomicUsize; 5],
    failures: AtomicUsize,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean processing time; zero before the first request.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Responses whose status falls in `class` (1 for 1xx, 2 for 2xx, ...).
    #[must_use]
    pub fn status_class_count(&self, class: u16) -> usize {
        match class {
            1..=5 => self.status_classes[usize::from(class - 1)].load(Ordering::Relaxed),
            _ => 0,
        }
    }

    /// Dispatches that returned an error.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    fn record_status(&self, status: u16) {
        if let Some(counter) = (status / 100)
            .checked_sub(1)
            .and_then(|i| self.status_classes.get(usize::from(i)))
        {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let result = next.run(req);
        let latency_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(latency_ns, Ordering::Relaxed);
        match &result {
            Ok(resp) => self.record_status(resp.status),
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        result
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}
