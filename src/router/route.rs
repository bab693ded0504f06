use http::Method;
use regex::Regex;
use std::sync::Arc;

use crate::error::RouteError;
use crate::handler::{Handler, HandlerResult};
use crate::message::{ParamVec, RequestView};

/// A path template compiled to an anchored regex.
///
/// Each `{name}` placeholder becomes a `([^/]+)` capture group; everything else is
/// matched literally.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

impl CompiledPattern {
    /// Compile a path template such as `/users/{userId}/orders/{orderId}`.
    ///
    /// Placeholder names must be identifiers (`[A-Za-z_][A-Za-z0-9_]*`).
    pub fn compile(path: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());
        let mut rest = path;

        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(invalid("unmatched `}`"));
            }
            pattern.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed `{`"))?;
            let name = &after[..close];
            if !is_identifier(name) {
                return Err(invalid(&format!("placeholder `{{{name}}}` is not an identifier")));
            }
            pattern.push_str("([^/]+)");
            param_names.push(Arc::from(name));
            rest = &after[close + 1..];
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self { regex, param_names })
    }

    /// Full-path match. Captured values are returned as strings, in template order.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (Arc::clone(name), m.as_str().to_string()))
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    #[must_use]
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// One routing rule: method + path template + handler + named middleware.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    raw_path: String,
    pattern: CompiledPattern,
    handler: Handler,
    middleware: Vec<String>,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>, handler: Handler) -> Result<Self, RouteError> {
        let raw_path = path.into();
        let pattern = CompiledPattern::compile(&raw_path)?;
        Ok(Self {
            method,
            raw_path,
            pattern,
            handler,
            middleware: Vec::new(),
        })
    }

    /// Exact method equality plus a full-path match. No trailing-slash normalisation.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> Option<ParamVec> {
        if self.method != *method {
            return None;
        }
        self.pattern.captures(path)
    }

    /// Append middleware names; they run in append order, inside global middleware.
    pub fn middleware<I>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.middleware.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Call a function handler directly. Controller actions need the dispatcher's
    /// container; see [`Handler::call`].
    pub fn invoke(&self, req: &RequestView) -> HandlerResult {
        self.handler.invoke(req)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full template including any group prefixes.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.raw_path
    }

    #[must_use]
    pub fn middleware_ids(&self) -> &[String] {
        &self.middleware
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        self.pattern.param_names()
    }
}
