use serde_json::json;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::RuntimeConfig;
use crate::container::Container;
use crate::error::DispatchError;
use crate::handler::HandlerResult;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::message::{RequestView, Response};
use crate::middleware::{Middleware, Pipeline};
use crate::router::{Route, Router};

/// Turns one parsed request into one response.
///
/// Built once at bootstrap, then shared (typically behind an `Arc`) by whatever serves
/// requests. All registration methods take `&mut self`.
pub struct Dispatcher {
    container: Arc<Container>,
    router: Router,
    pipeline: Pipeline,
    named: HashMap<String, Arc<dyn Middleware>>,
    runtime: RuntimeConfig,
}

impl Dispatcher {
    #[must_use]
    pub fn new(container: Arc<Container>, router: Router) -> Self {
        Self {
            container,
            router,
            pipeline: Pipeline::new(),
            named: HashMap::new(),
            runtime: RuntimeConfig::default(),
        }
    }

    #[must_use]
    pub fn with_runtime_config(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Append a global interceptor. Global interceptors wrap every matched route, in
    /// the order they were added.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        debug!(middleware = middleware.name(), "Global middleware added");
        self.pipeline.append(middleware);
        self
    }

    /// Make `middleware` available to routes under `name`.
    pub fn register_middleware(
        &mut self,
        name: impl Into<String>,
        middleware: Arc<dyn Middleware>,
    ) -> &mut Self {
        let name = name.into();
        if self.named.insert(name.clone(), middleware).is_some() {
            warn!(name = %name, "Replaced named middleware");
        } else {
            debug!(name = %name, "Named middleware registered");
        }
        self
    }

    /// Check that every middleware name used by a route is registered.
    pub fn validate_middleware(&self) -> Result<(), DispatchError> {
        for route in self.router.routes() {
            self.route_middleware(route)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn runtime_config(&self) -> &RuntimeConfig {
        &self.runtime
    }

    /// Dispatch one request.
    ///
    /// A route miss becomes a 404 and a [`DispatchError::Http`] raised anywhere in the
    /// chain becomes an error response with that status. Every other error is returned
    /// to the caller.
    ///
    /// A valid ULID in `x-request-id` becomes the request id; otherwise the view keeps
    /// the id it was built with.
    pub fn handle(&self, req: RequestView) -> Result<Response, DispatchError> {
        let request_id = RequestId::from_header_or(req.header(REQUEST_ID_HEADER), req.request_id());
        let req = req.with_request_id(request_id);
        let method = req.method().clone();
        let path = req.path().to_string();
        let start = Instant::now();

        let result = self.dispatch(req);

        let elapsed = start.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(mut resp) => {
                if self.runtime.expose_request_id {
                    resp.set_header(REQUEST_ID_HEADER, request_id.to_string());
                }
                if elapsed > self.runtime.slow_dispatch_threshold() {
                    warn!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        status = resp.status,
                        duration_ms,
                        threshold_ms = self.runtime.slow_dispatch_ms,
                        "Slow dispatch"
                    );
                } else {
                    info!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        status = resp.status,
                        duration_ms,
                        "Request dispatched"
                    );
                }
                Ok(resp)
            }
            Err(e) => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    duration_ms,
                    "Dispatch failed"
                );
                Err(e)
            }
        }
    }

    fn dispatch(&self, req: RequestView) -> HandlerResult {
        let Some(matched) = self.router.route(req.method(), req.path()) else {
            return Ok(Response::json(
                404,
                json!({
                    "error": "Route not found",
                    "method": req.method().as_str(),
                    "path": req.path(),
                }),
            ));
        };
        let route = matched.route;

        let route_middleware = self.route_middleware(route)?;
        let pipeline = if route_middleware.is_empty() {
            Cow::Borrowed(&self.pipeline)
        } else {
            Cow::Owned(self.pipeline.extended(&route_middleware))
        };

        let bound = req.with_params(matched.params);
        let terminal = |req: RequestView| route.handler().call(&self.container, &req);

        match pipeline.run(bound, &terminal) {
            Err(DispatchError::Http(e)) => {
                debug!(
                    status = e.status,
                    message = %e.message,
                    field_errors = e.errors.len(),
                    "Structured failure converted to response"
                );
                Ok(Response::from_http_error(&e))
            }
            other => other,
        }
    }

    fn route_middleware(&self, route: &Route) -> Result<Vec<Arc<dyn Middleware>>, DispatchError> {
        route
            .middleware_ids()
            .iter()
            .map(|name| {
                self.named
                    .get(name)
                    .map(Arc::clone)
                    .ok_or_else(|| DispatchError::UnknownMiddleware(name.clone()))
            })
            .collect()
    }
}
