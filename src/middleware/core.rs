use std::fmt;
use std::sync::Arc;

use crate::handler::HandlerResult;
use crate::message::RequestView;

/// The innermost step of a chain: route dispatch.
pub type Terminal<'a> = &'a (dyn Fn(RequestView) -> HandlerResult + 'a);

/// An interceptor wrapped around every dispatch it is attached to.
///
/// Code before `next.run(req)` sees the request on the way in, code after it sees the
/// response on the way out. Returning without calling `next` short-circuits the rest
/// of the chain and the handler.
pub trait Middleware: Send + Sync {
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult;

    /// Label used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The remainder of a chain, handed to each interceptor.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    terminal: Terminal<'a>,
}

impl<'a> Next<'a> {
    /// Continue with the next interceptor, or the terminal once the chain is exhausted.
    pub fn run(self, req: RequestView) -> HandlerResult {
        match self.chain.split_first() {
            Some((head, rest)) => head.handle(
                req,
                Next {
                    chain: rest,
                    terminal: self.terminal,
                },
            ),
            None => (self.terminal)(req),
        }
    }
}

struct FnMiddleware<F> {
    name: &'static str,
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(RequestView, Next<'a>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, req: RequestView, next: Next<'_>) -> HandlerResult {
        (self.f)(req, next)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Build an interceptor from a closure.
///
/// ```rust
/// use switchyard::middleware::{from_fn, Middleware, Next};
/// use switchyard::message::RequestView;
///
/// let stamp = from_fn("stamp", |req: RequestView, next: Next<'_>| {
///     let resp = next.run(req)?;
///     Ok(resp.with_header("x-stamped", "1"))
/// });
/// assert_eq!(stamp.name(), "stamp");
/// ```
pub fn from_fn<F>(name: &'static str, f: F) -> Arc<dyn Middleware>
where
    F: for<'a> Fn(RequestView, Next<'a>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(FnMiddleware { name, f })
}

/// Ordered list of interceptors; the first appended runs outermost.
#[derive(Clone, Default)]
pub struct Pipeline {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// This pipeline followed by `extra`, without modifying `self`.
    #[must_use]
    pub fn extended(&self, extra: &[Arc<dyn Middleware>]) -> Pipeline {
        let mut middleware = Vec::with_capacity(self.middleware.len() + extra.len());
        middleware.extend(self.middleware.iter().map(Arc::clone));
        middleware.extend(extra.iter().map(Arc::clone));
        Pipeline { middleware }
    }

    /// Run `req` through every interceptor and finally `terminal`.
    pub fn run(&self, req: RequestView, terminal: Terminal<'_>) -> HandlerResult {
        Next {
            chain: &self.middleware,
            terminal,
        }
        .run(req)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.middleware.iter().map(|m| m.name()))
            .finish()
    }
}
