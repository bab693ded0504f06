use http::Method;
use tracing::{debug, warn};

use super::{Middleware, Next};
use crate::config::CorsConfig;
use crate::handler::HandlerResult;
use crate::message::{RequestView, Response};

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Answers preflight `OPTIONS` requests with 204 without running the handler and adds
/// the CORS headers to every response on the way out. Preflight only reaches this
/// interceptor when an `OPTIONS` route exists for the path; unmatched requests are
/// answered with 404 before any interceptor runs.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    allowed_origins: Vec<String>,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsMiddleware {
    /// # Example
    ///
    /// ```rust
    /// use switchyard::middleware::CorsMiddleware;
    /// use http::Method;
    ///
    /// let cors = CorsMiddleware::new(
    ///     vec!["https://example.com".to_string()],
    ///     vec!["Content-Type".to_string()],
    ///     vec![Method::GET, Method::POST],
    /// );
    /// # let _ = cors;
    /// ```
    #[must_use]
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_headers: Vec<String>,
        allowed_methods: Vec<Method>,
    ) -> Self {
        Self {
            allowed_origins,
            allowed_headers,
            allowed_methods,
        }
    }

    /// Build from configuration. Unparseable method names are skipped with a warning.
    #[must_use]
    pub fn from_config(config: &CorsConfig) -> Self {
        let allowed_methods = config
            .allowed_methods
            .iter()
            .filter_map(|m| match Method::from_bytes(m.as_bytes()) {
                Ok(method) => Some(method),
                Err(_) => {
                    warn!(method = %m, "Ignoring invalid CORS method");
                    None
                }
            })
            .collect();
        Self::new(
            config.allowed_origins.clone(),
            config.allowed_headers.clone(),
            allowed_methods,
        )
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` when the origin is not allowed.
    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.allowed_origins.iter().any(|o| o == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.allowed_origins
            .iter()
            .find(|o| o.as_str() == origin)
            .cloned()
    }

    fn decorate(&self, mut resp: Response, origin: Option<&str>) -> Response {
        match self.allow_origin(origin) {
            Some(allowed) => resp.set_header("Access-Control-Allow-Origin", allowed),
            None => {
                debug!(origin = ?origin, "Origin not in CORS allow list");
                return resp;
            }
        }
        resp.set_header("Access-Control-Allow-Headers", self.allowed_headers.join(", "));
        let methods = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        resp.set_header("Access-Control-Allow-Methods", methods);
        resp
    }
}

/// Default CORS policy allowing all origins and common methods
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ],
        }
    }
}

impl Middleware for CorsMiddleware {
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult {
        let origin = req.header("origin").map(str::to_string);
        let resp = if *req.method() == Method::OPTIONS {
            Response::no_content()
        } else {
            next.run(req)?
        };
        Ok(self.decorate(resp, origin.as_deref()))
    }

    fn name(&self) -> &'static str {
        "cors"
    }
}
