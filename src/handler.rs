//! Handler references attached to routes.
//!
//! A route points either at a plain function of the request or at a controller
//! action: an instance method on a type the [`Container`] can build. Controllers are
//! resolved per call, so whatever lifetime the container gives them (transient or
//! singleton) is respected.

use std::fmt;
use std::sync::Arc;

use crate::container::{Container, Injectable};
use crate::error::DispatchError;
use crate::message::{RequestView, Response};

/// What every handler and interceptor produces.
pub type HandlerResult = Result<Response, DispatchError>;

/// A direct function handler.
pub type HandlerFn = Arc<dyn Fn(&RequestView) -> HandlerResult + Send + Sync>;

type ActionFn = Arc<dyn Fn(&Container, &RequestView) -> HandlerResult + Send + Sync>;

/// `Controller@action` reference whose controller is built through the container.
#[derive(Clone)]
pub struct ActionRef {
    controller: &'static str,
    action: &'static str,
    call: ActionFn,
}

impl ActionRef {
    #[must_use]
    pub fn controller(&self) -> &'static str {
        self.controller
    }

    #[must_use]
    pub fn action(&self) -> &'static str {
        self.action
    }
}

/// A route's target.
#[derive(Clone)]
pub enum Handler {
    Func(HandlerFn),
    Action(ActionRef),
}

impl Handler {
    /// Wrap a closure or function taking the bound request.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use switchyard::handler::Handler;
    /// use switchyard::message::Response;
    ///
    /// let health = Handler::func(|_req| Ok(Response::ok(json!({"status": "ok"}))));
    /// # let _ = health;
    /// ```
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&RequestView) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Func(Arc::new(f))
    }

    /// Reference an action on controller `C`. The controller is obtained with
    /// [`Container::make`] on every call.
    #[must_use]
    pub fn action<C: Injectable>(
        action: &'static str,
        method: fn(&C, &RequestView) -> HandlerResult,
    ) -> Self {
        let call: ActionFn = Arc::new(move |container: &Container, req: &RequestView| {
            let controller = container.make::<C>()?;
            method(&controller, req)
        });
        Handler::Action(ActionRef {
            controller: std::any::type_name::<C>(),
            action,
            call,
        })
    }

    /// Invoke a function handler. Actions cannot run without a container and fail
    /// with [`DispatchError::UnboundAction`].
    pub fn invoke(&self, req: &RequestView) -> HandlerResult {
        match self {
            Handler::Func(f) => f(req),
            Handler::Action(action) => Err(DispatchError::UnboundAction {
                controller: action.controller,
                action: action.action,
            }),
        }
    }

    /// Invoke the handler, building the controller through `container` if needed.
    pub fn call(&self, container: &Container, req: &RequestView) -> HandlerResult {
        match self {
            Handler::Func(f) => f(req),
            Handler::Action(action) => (action.call)(container, req),
        }
    }

    /// Short label for logs: `closure` or `Controller@action`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Handler::Func(_) => "closure".to_string(),
            Handler::Action(action) => {
                let short = action
                    .controller
                    .rsplit("::")
                    .next()
                    .unwrap_or(action.controller);
                format!("{short}@{}", action.action)
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
