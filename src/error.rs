//! # Error Taxonomy
//!
//! Every failure the dispatch pipeline can produce lives here. Only two kinds are
//! ever recovered into responses by the [`Dispatcher`](crate::dispatcher::Dispatcher):
//! a route miss (404) and a structured [`HttpError`]. Everything else is returned
//! to the caller of `handle` untouched.

use std::collections::BTreeMap;

use thiserror::Error;

/// Failure raised while resolving an abstract id from the [`Container`](crate::container::Container).
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The id is not cached, not bound, and cannot be autowired (e.g. an unbound trait object).
    #[error("cannot resolve type [{id}]: no instance, binding or constructor available")]
    UnresolvableType { id: &'static str },

    /// A constructor dependency could not be satisfied and has no default.
    #[error("cannot resolve parameter [{param}] of [{owner}]")]
    UnresolvableParameter {
        param: &'static str,
        owner: &'static str,
        #[source]
        source: Box<ContainerError>,
    },

    /// Resolution re-entered a type that is still being built.
    #[error("circular dependency detected: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<&'static str> },

    /// A factory failed for a reason of its own.
    #[error("factory for [{id}] failed: {source}")]
    Factory {
        id: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ContainerError {
    /// Wrap a factory's own failure for abstract id `T`.
    pub fn factory<T: ?Sized + 'static>(source: impl Into<anyhow::Error>) -> Self {
        Self::Factory {
            id: std::any::type_name::<T>(),
            source: source.into(),
        }
    }

    /// Re-attribute a missing dependency to the constructor parameter that needed it.
    /// Cycles and factory failures keep their own shape.
    pub(crate) fn into_parameter(self, owner: &'static str, param: &'static str) -> Self {
        match self {
            Self::UnresolvableType { .. } | Self::UnresolvableParameter { .. } => {
                Self::UnresolvableParameter {
                    param,
                    owner,
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }
}

/// Route registration failure.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern [{path}]: {reason}")]
    InvalidPattern { path: String, reason: String },
}

/// Structured failure signal carrying an HTTP status, a message and optional field errors.
///
/// Handlers and middleware return this (wrapped in [`DispatchError::Http`]) when they want
/// the dispatcher to answer with a specific error response instead of failing the dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct HttpError {
    pub status: u16,
    pub message: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl HttpError {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    /// Attach a field-keyed error message.
    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.errors.entry(field.into()).or_default().push(error.into());
        self
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    /// 422 with a field-keyed error list.
    #[must_use]
    pub fn unprocessable(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: 422,
            message: "Validation failed".to_string(),
            errors,
        }
    }
}

/// Everything that can go wrong inside a single dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Structured failure; recovered by the dispatcher into an error response.
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A route names middleware that was never registered with the dispatcher.
    #[error("middleware [{0}] is not registered")]
    UnknownMiddleware(String),

    /// A controller action was invoked without a container to build its controller.
    #[error("action [{controller}::{action}] needs a container to be invoked")]
    UnboundAction {
        controller: &'static str,
        action: &'static str,
    },

    /// Collaborator fault (persistence, IO, ...). Never recovered by the dispatcher.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DispatchError {
    /// Structured failure carried by this error, if any.
    #[must_use]
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}
