//! # Container Module
//!
//! Dependency-resolution container used by the dispatcher to build controllers and
//! their collaborators.
//!
//! ## Resolution Order
//!
//! 1. **Cached instance** - anything registered with `register_instance` or produced
//!    by a singleton binding; always returns the same `Arc`
//! 2. **Binding** - a factory closure or an autowire rule registered with `bind*` /
//!    `singleton*`
//! 3. **Autowire** - only for [`Container::make`]: the concrete type builds itself from
//!    its [`Injectable`] constructor
//! 4. **Failure** - [`ContainerError::UnresolvableType`](crate::error::ContainerError)
//!
//! There is no runtime reflection. Each concrete type declares its constructor
//! dependencies in [`Injectable::inject`], asking for them by parameter name so that a
//! missing one surfaces as `UnresolvableParameter { param, owner }`. Parameters with a
//! declared default use [`Container::dependency_or`].
//!
//! ## Cycles
//!
//! A type that (directly or transitively) depends on itself fails fast with
//! `CircularDependency`, listing the chain from the first repeated type.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use switchyard::container::Container;
//!
//! trait Greeting: Send + Sync {
//!     fn text(&self) -> String;
//! }
//! struct Hello;
//! impl Greeting for Hello {
//!     fn text(&self) -> String {
//!         "hello".into()
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.singleton::<dyn Greeting, _>(|_| Ok(Arc::new(Hello) as Arc<dyn Greeting>));
//!
//! let a = container.resolve::<dyn Greeting>().unwrap();
//! let b = container.resolve::<dyn Greeting>().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

mod core;

pub use self::core::{AbstractId, Container, Injectable};
