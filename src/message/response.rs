use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::HeaderVec;
use crate::error::HttpError;

/// Response value produced by a handler or short-circuiting middleware.
///
/// Every constructor except [`Response::new`] sets `content-type: application/json`.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// JSON payload; `None` for bodiless responses such as 204
    pub body: Option<Value>,
}

impl Response {
    /// Create a response with exactly the given status, headers and body.
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Option<Value>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    #[must_use]
    pub fn created(body: Value) -> Self {
        Self::json(201, body)
    }

    /// 204 with the default content type and no payload.
    #[must_use]
    pub fn no_content() -> Self {
        let mut resp = Self::json(204, Value::Null);
        resp.body = None;
        resp
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self::error(404, message)
    }

    #[must_use]
    pub fn unauthorized(message: &str) -> Self {
        Self::error(401, message)
    }

    #[must_use]
    pub fn unprocessable(errors: &BTreeMap<String, Vec<String>>) -> Self {
        Self::json(
            422,
            json!({ "error": "Validation failed", "errors": errors }),
        )
    }

    /// Render a structured failure. `errors` is only present when field errors exist.
    #[must_use]
    pub fn from_http_error(err: &HttpError) -> Self {
        let body = if err.errors.is_empty() {
            json!({ "error": err.message })
        } else {
            json!({ "error": err.message, "errors": err.errors })
        };
        Self::json(err.status, body)
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_sets_content_type() {
        let resp = Response::ok(json!({"status": "ok"}));
        assert_eq!(resp.get_header("Content-Type"), Some("application/json"));
        assert!(resp.is_success());
    }

    #[test]
    fn test_no_content_has_no_body() {
        let resp = Response::no_content();
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_none());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = Response::ok(Value::Null);
        resp.set_header("CONTENT-TYPE", "text/plain".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_from_http_error_with_fields() {
        let err = HttpError::new(422, "Validation failed").with_field_error("email", "required");
        let resp = Response::from_http_error(&err);
        assert_eq!(resp.status, 422);
        assert_eq!(
            resp.body,
            Some(json!({"error": "Validation failed", "errors": {"email": ["required"]}}))
        );
    }
}
