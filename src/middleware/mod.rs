//! # Middleware Module
//!
//! Onion-model interceptors. A [`Pipeline`] holds an ordered list of [`Middleware`];
//! the first one appended is the outermost layer. Each interceptor receives the request
//! and a [`Next`] continuation:
//!
//! ```text
//! A before -> B before -> handler -> B after -> A after
//! ```
//!
//! The dispatcher composes the pipeline lazily on every request from the global list
//! followed by the route's named interceptors, so route-specific middleware always runs
//! inside global middleware.
//!
//! Stock interceptors:
//! - [`AuthMiddleware`]: bearer-token gate (401 short-circuit)
//! - [`CorsMiddleware`]: preflight answer and CORS response headers
//! - [`MetricsMiddleware`]: lock-free request counters
//! - [`TracingMiddleware`]: one `tracing` span per request

mod auth;
mod core;
mod cors;
mod metrics;
mod tracing;

pub use self::auth::AuthMiddleware;
pub use self::core::{from_fn, Middleware, Next, Pipeline, Terminal};
pub use self::cors::CorsMiddleware;
pub use self::metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
