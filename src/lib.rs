//! # switchyard
//!
//! **switchyard** is a small, synchronous request-dispatch runtime: an already-parsed
//! HTTP-style request goes in, a JSON response comes out. In between, a route is matched,
//! the handler's dependencies are assembled by an autowiring container, and a chain of
//! onion-model interceptors runs around the handler.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`container`]** - Dependency container with factory bindings, singletons and autowiring
//! - **[`router`]** - `{name}` path templates, first-match-wins route table, route groups
//! - **[`middleware`]** - Onion-model interceptor pipeline and stock interceptors
//! - **[`dispatcher`]** - Composes the three into `handle(request) -> response`
//! - **[`handler`]** - Function handlers and container-built controller actions
//! - **[`message`]** - Request and response value objects
//! - **[`error`]** - Error taxonomy shared by every layer
//! - **[`config`]** / **[`logging`]** / **[`bootstrap`]** - Ambient setup
//!
//! Transport (accepting connections, parsing bytes) is deliberately absent. Whatever
//! serves requests builds a [`RequestView`](message::RequestView) and calls
//! [`Dispatcher::handle`](dispatcher::Dispatcher::handle).
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher
//!     participant Router
//!     participant Global as Global Middleware
//!     participant Named as Route Middleware
//!     participant Container
//!     participant Handler
//!
//!     Caller->>Dispatcher: handle(RequestView)
//!     Dispatcher->>Dispatcher: Resolve request id<br/>(x-request-id or new ULID)
//!     Dispatcher->>Router: route(method, path)
//!
//!     alt No Route Match
//!         Router-->>Dispatcher: None
//!         Dispatcher-->>Caller: 404 {"error": "Route not found"}
//!     end
//!
//!     Router-->>Dispatcher: RouteMatch (route, params)
//!     Dispatcher->>Dispatcher: Bind params into new RequestView
//!     Dispatcher->>Global: run(req, next)
//!     Global->>Named: next.run(req)
//!
//!     alt Interceptor short-circuits
//!         Named-->>Global: Response (e.g. 401)
//!     end
//!
//!     Named->>Handler: next.run(req)
//!     opt Controller action
//!         Handler->>Container: make::<Controller>()
//!         Container-->>Handler: Arc<Controller>
//!     end
//!     Handler-->>Named: Ok(Response) or Err(HttpError)
//!     Named-->>Global: Response on the way out
//!     Global-->>Dispatcher: HandlerResult
//!
//!     alt HttpError
//!         Dispatcher->>Dispatcher: Convert to error response
//!     end
//!     Dispatcher-->>Caller: Response + x-request-id
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use serde_json::json;
//! use switchyard::bootstrap::bootstrap;
//! use switchyard::config::AppConfig;
//! use switchyard::container::Container;
//! use switchyard::handler::Handler;
//! use switchyard::message::{RequestView, Response};
//!
//! let dispatcher = bootstrap(&AppConfig::default(), Container::new(), |router| {
//!     router.get("/health", Handler::func(|_| Ok(Response::ok(json!({"status": "ok"})))))?;
//!     Ok(())
//! })
//! .expect("bootstrap");
//!
//! let resp = dispatcher.handle(RequestView::new(Method::GET, "/health")).unwrap();
//! assert_eq!(resp.status, 200);
//! assert!(resp.get_header("x-request-id").is_some());
//! ```
//!
//! ## Concurrency
//!
//! Dispatch is synchronous and runs on the caller's thread. A [`Dispatcher`](dispatcher::Dispatcher)
//! is `Send + Sync`; share it behind an `Arc` and call `handle` from as many threads as
//! needed. Registration requires `&mut`, so nothing can be registered once it is shared.

pub mod bootstrap;
pub mod config;
pub mod container;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod message;
pub mod middleware;
pub mod router;

pub use container::{Container, Injectable};
pub use dispatcher::Dispatcher;
pub use error::{ContainerError, DispatchError, HttpError, RouteError};
pub use handler::{Handler, HandlerResult};
pub use message::{RequestView, Response};
pub use router::Router;
