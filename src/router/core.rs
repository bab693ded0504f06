use http::Method;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::route::Route;
use crate::error::RouteError;
use crate::handler::Handler;
use crate::message::ParamVec;

/// Result of successfully matching a request to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The first registered route that matched
    pub route: &'r Route,
    /// Captured placeholder values, in template order
    pub params: ParamVec,
}

/// Ordered route table with group prefixes.
///
/// Routes are tried in registration order and the first match wins, so a literal
/// route registered before an overlapping parameterised one takes precedence.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
    group_stack: Vec<String>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. The stored path is every open group prefix (outermost first)
    /// followed by `path`.
    pub fn route_to(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<&mut Route, RouteError> {
        let mut full_path = self.group_stack.concat();
        full_path.push_str(path);

        let route = Route::new(method, full_path, handler)?;
        info!(
            method = %route.method(),
            path = %route.path(),
            handler = %route.handler().describe(),
            params = ?route.param_names(),
            "Route registered"
        );
        self.routes.push(route);
        let last = self.routes.len() - 1;
        Ok(&mut self.routes[last])
    }

    pub fn get(&mut self, path: &str, handler: Handler) -> Result<&mut Route, RouteError> {
        self.route_to(Method::GET, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> Result<&mut Route, RouteError> {
        self.route_to(Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: Handler) -> Result<&mut Route, RouteError> {
        self.route_to(Method::PUT, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: Handler) -> Result<&mut Route, RouteError> {
        self.route_to(Method::PATCH, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: Handler) -> Result<&mut Route, RouteError> {
        self.route_to(Method::DELETE, path, handler)
    }

    /// Register every route added by `register` under `prefix`. Groups nest; the prefix
    /// is removed again when `register` returns, whether or not it failed.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use switchyard::handler::Handler;
    /// use switchyard::message::Response;
    /// use switchyard::router::Router;
    ///
    /// let mut router = Router::new();
    /// router
    ///     .group("/api", |r| {
    ///         r.group("/v1", |r| {
    ///             r.get("/items", Handler::func(|_| Ok(Response::ok(json!([])))))?;
    ///             Ok(())
    ///         })
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(router.path_patterns(), vec!["/api/v1/items".to_string()]);
    /// ```
    pub fn group<F>(&mut self, prefix: &str, register: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut Router) -> Result<(), RouteError>,
    {
        self.group_stack.push(prefix.to_string());
        let result = register(self);
        self.group_stack.pop();
        result
    }

    /// First route, in registration order, matching `method` and `path`.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        let found = self
            .routes
            .iter()
            .find_map(|route| route.matches(method, path).map(|params| (route, params)));

        let duration_us = u64::try_from(match_start.elapsed().as_micros()).unwrap_or(u64::MAX);
        match found {
            Some((route, params)) => {
                debug!(
                    method = %method,
                    path = %path,
                    route_pattern = %route.path(),
                    path_params = ?params,
                    duration_us,
                    "Route matched"
                );
                Some(RouteMatch { route, params })
            }
            None => {
                warn!(method = %method, path = %path, duration_us, "No route matched");
                None
            }
        }
    }

    /// Every route in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered path templates with group prefixes applied.
    #[must_use]
    pub fn path_patterns(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.path().to_string()).collect()
    }

    /// Log the route table, one event per route.
    pub fn dump_routes(&self) {
        info!(count = self.routes.len(), "Route table");
        for route in &self.routes {
            info!(
                method = %route.method(),
                path = %route.path(),
                handler = %route.handler().describe(),
                middleware = ?route.middleware_ids(),
                "Route"
            );
        }
    }
}
