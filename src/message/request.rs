use http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{last_value, HeaderVec, ParamVec};
use crate::ids::RequestId;

/// Immutable snapshot of an already-parsed request.
///
/// `params` is filled exactly once, when the router matches; binding produces a new
/// view via [`RequestView::with_params`] and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use switchyard::message::RequestView;
///
/// let req = RequestView::new(Method::GET, "/users")
///     .with_query("limit", "10")
///     .with_header("X-Api-Key", "secret");
///
/// assert_eq!(req.query("limit"), Some("10"));
/// assert_eq!(req.header("x-api-key"), Some("secret"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestView {
    request_id: RequestId,
    method: Method,
    path: String,
    query: ParamVec,
    body: Value,
    headers: HeaderVec,
    params: ParamVec,
}

impl RequestView {
    /// Create a view with an empty body, no query, no headers and a fresh request id.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            query: ParamVec::new(),
            body: Value::Object(Map::new()),
            headers: HeaderVec::new(),
            params: ParamVec::new(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((Arc::from(name), value.into()));
        self
    }

    /// Header names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .push((Arc::from(name.to_ascii_lowercase()), value.into()));
        self
    }

    /// Replace the decoded body. Usually a JSON object.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Copy of this view carrying `params`. The receiver is not modified.
    #[must_use]
    pub fn with_params(&self, params: ParamVec) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameter by name (last occurrence wins for `?a=1&a=2`).
    #[inline]
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        last_value(&self.query, name)
    }

    /// Top-level body field by name.
    #[inline]
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// The whole decoded body.
    #[inline]
    #[must_use]
    pub fn all(&self) -> &Value {
        &self.body
    }

    /// Path parameter bound at match time (always a string, never coerced).
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        last_value(&self.params, name)
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// Header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap.
    /// Note: This allocates - use param() in hot paths
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
