//! Composition root.
//!
//! There is no process-wide application object. [`bootstrap`] takes a fully registered
//! [`Container`], builds the route table, installs the standard middleware and hands
//! back a [`Dispatcher`] that the caller owns and shares however it likes.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::container::Container;
use crate::dispatcher::Dispatcher;
use crate::error::RouteError;
use crate::middleware::{AuthMiddleware, CorsMiddleware, MetricsMiddleware, TracingMiddleware};
use crate::router::Router;

/// Build a ready-to-serve dispatcher.
///
/// - `register_routes` populates the route table
/// - [`TracingMiddleware`] and [`MetricsMiddleware`] wrap every route, outermost first
/// - the metrics instance is registered in the container so handlers can report it
/// - `auth` and `cors` named middleware are registered when configured
///
/// Fails when a route cannot be registered or names middleware that does not exist.
pub fn bootstrap<F>(config: &AppConfig, mut container: Container, register_routes: F) -> Result<Dispatcher>
where
    F: FnOnce(&mut Router) -> Result<(), RouteError>,
{
    let mut router = Router::new();
    register_routes(&mut router).context("Failed to register routes")?;

    let metrics = Arc::new(MetricsMiddleware::new());
    container.register_instance(Arc::clone(&metrics));

    let mut dispatcher =
        Dispatcher::new(Arc::new(container), router).with_runtime_config(config.runtime);
    dispatcher
        .add_middleware(Arc::new(TracingMiddleware))
        .add_middleware(metrics);

    if let Some(auth) = &config.auth {
        dispatcher.register_middleware("auth", Arc::new(AuthMiddleware::new(&auth.token)));
    }
    if let Some(cors) = &config.cors {
        dispatcher.register_middleware("cors", Arc::new(CorsMiddleware::from_config(cors)));
    }

    dispatcher
        .validate_middleware()
        .context("Route references unregistered middleware")?;

    dispatcher.router().dump_routes();
    info!(
        routes = dispatcher.router().len(),
        global_middleware = ?dispatcher.pipeline(),
        registered = dispatcher.container().len(),
        "Dispatcher ready"
    );
    Ok(dispatcher)
}
