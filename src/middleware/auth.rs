use tracing::warn;

use super::{Middleware, Next};
use crate::handler::HandlerResult;
use crate::message::{RequestView, Response};

/// Bearer-token gate. Requests without `Authorization: Bearer <token>` are answered
/// with 401 and never reach the handler.
pub struct AuthMiddleware {
    expected: String,
}

impl AuthMiddleware {
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Self {
        Self {
            expected: format!("Bearer {}", token.as_ref()),
        }
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult {
        let presented = req.header("authorization");
        if presented == Some(self.expected.as_str()) {
            return next.run(req);
        }
        warn!(
            request_id = %req.request_id(),
            path = %req.path(),
            header_present = presented.is_some(),
            "Authorization rejected"
        );
        Ok(Response::unauthorized("Unauthorized"))
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}
