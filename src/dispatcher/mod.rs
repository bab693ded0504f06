//! # Dispatcher Module
//!
//! The dispatcher composes the container, the router and the middleware pipeline into
//! one synchronous call: a parsed [`RequestView`](crate::message::RequestView) in, a
//! [`Response`](crate::message::Response) out.
//!
//! ## Request Flow
//!
//! 1. The request id is taken from `x-request-id` (when it is a valid ULID), otherwise
//!    the view's own id is kept
//! 2. The router finds the first matching route, or the dispatcher answers 404
//! 3. Captured placeholders are bound into a new request view
//! 4. Global middleware, then the route's named middleware, wrap the handler
//! 5. The handler runs; controller actions are built through the container
//! 6. The request id is echoed on the response
//!
//! ## Error Handling
//!
//! - A route miss returns 404 with `{"error": "Route not found", "method", "path"}`
//! - [`HttpError`](crate::error::HttpError) raised by middleware or a handler becomes an
//!   error response with its status and `{"error": message}` (plus `errors` when present)
//! - Anything else (container failures, unknown middleware names, collaborator faults)
//!   propagates as [`DispatchError`](crate::error::DispatchError)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use serde_json::json;
//! use switchyard::container::Container;
//! use switchyard::dispatcher::Dispatcher;
//! use switchyard::handler::Handler;
//! use switchyard::message::{RequestView, Response};
//! use switchyard::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/{id}", Handler::func(|req| {
//!         Ok(Response::ok(json!({ "id": req.param("id") })))
//!     }))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(Arc::new(Container::new()), router);
//! let resp = dispatcher.handle(RequestView::new(Method::GET, "/users/42")).unwrap();
//! assert_eq!(resp.body, Some(json!({ "id": "42" })));
//!
//! let missing = dispatcher.handle(RequestView::new(Method::GET, "/nope")).unwrap();
//! assert_eq!(missing.status, 404);
//! ```

mod core;

pub use self::core::Dispatcher;
