//! # Router Module
//!
//! Route table and path matching.
//!
//! ## Overview
//!
//! Routes are registered with a method, a path template and a [`Handler`](crate::handler::Handler).
//! Templates use `{name}` placeholders, each matching exactly one non-empty path segment:
//!
//! - `/users/{id}` matches `/users/42` with `id = "42"`
//! - `/users/{id}` does not match `/users/42/orders` or `/users/`
//! - `/users/` does not match `/users` (no trailing-slash normalisation)
//!
//! Literal text is matched exactly; regex metacharacters in a template are escaped.
//!
//! ## Matching
//!
//! Matching is a linear scan in registration order and the first hit wins. Method
//! comparison is exact. A path that matches under a different method is still a miss;
//! the dispatcher reports every miss as 404.
//!
//! ## Groups
//!
//! [`Router::group`] pushes a prefix that applies to every route registered inside the
//! closure. Nested groups concatenate outermost first:
//!
//! ```rust
//! use serde_json::json;
//! use switchyard::handler::Handler;
//! use switchyard::message::Response;
//! use switchyard::router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.group("/admin", |r| {
//!     r.group("/v2", |r| {
//!         r.get("/stats", Handler::func(|_| Ok(Response::ok(json!({"ok": true})))))?
//!             .middleware(["auth"]);
//!         Ok(())
//!     })
//! }).unwrap();
//!
//! let m = router.route(&Method::GET, "/admin/v2/stats").unwrap();
//! assert_eq!(m.route.middleware_ids(), ["auth".to_string()]);
//! ```

mod core;
mod route;

pub use self::core::{RouteMatch, Router};
pub use self::route::{CompiledPattern, Route};
