use parking_lot::{ReentrantMutex, RwLock};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ContainerError;

/// Type-erased resolved object. Always holds an `Arc<T>` for the id it was stored under.
type Instance = Arc<dyn Any + Send + Sync>;

/// Type-erased factory producing an [`Instance`].
type Factory = Arc<dyn Fn(&Container) -> Result<Instance, ContainerError> + Send + Sync>;

/// Lookup key for the container: the identity of a type, including unsized trait objects.
#[derive(Debug, Clone, Copy)]
pub struct AbstractId {
    type_id: TypeId,
    name: &'static str,
}

impl AbstractId {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for AbstractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for AbstractId {}

impl Hash for AbstractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// A type the container can build on its own from its constructor dependencies.
///
/// This is the autowiring seam: `inject` asks the container for each dependency by
/// parameter name so failures point at the exact constructor argument.
///
/// ```rust
/// use std::sync::Arc;
/// use switchyard::container::{Container, Injectable};
/// use switchyard::error::ContainerError;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn inject(_: &Container) -> Result<Self, ContainerError> {
///         Ok(Clock)
///     }
/// }
///
/// struct Greeter {
///     clock: Arc<Clock>,
///     greeting: String,
/// }
///
/// impl Injectable for Greeter {
///     fn inject(c: &Container) -> Result<Self, ContainerError> {
///         Ok(Greeter {
///             clock: c.autowire::<Clock>("Greeter", "clock")?,
///             // primitive parameter: declared default
///             greeting: "hello".to_string(),
///         })
///     }
/// }
///
/// let container = Container::new();
/// let greeter = container.make::<Greeter>().unwrap();
/// assert_eq!(greeter.greeting, "hello");
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    fn inject(container: &Container) -> Result<Self, ContainerError>;
}

#[derive(Clone)]
enum Resolver {
    /// User-supplied closure.
    Factory(Factory),
    /// Concrete type built through [`Injectable::inject`].
    Autowire { concrete: &'static str, build: Factory },
}

impl Resolver {
    fn factory(&self) -> &Factory {
        match self {
            Resolver::Factory(f) => f,
            Resolver::Autowire { build, .. } => build,
        }
    }
}

#[derive(Clone)]
struct Binding {
    resolver: Resolver,
    shared: bool,
}

thread_local! {
    /// Ids currently being built on this thread, outermost first, tagged with the
    /// owning container so two containers never see each other's frames.
    static RESOLVING: RefCell<Vec<(usize, AbstractId)>> = const { RefCell::new(Vec::new()) };
}

/// Pops its frame from [`RESOLVING`] when the build finishes or fails.
struct ResolutionFrame;

impl ResolutionFrame {
    fn enter(container: &Container, id: AbstractId) -> Result<Self, ContainerError> {
        let owner = container as *const Container as usize;
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|frame| *frame == (owner, id)) {
                let mut chain: Vec<&'static str> =
                    stack[start..].iter().map(|(_, frame)| frame.name).collect();
                chain.push(id.name);
                return Err(ContainerError::CircularDependency { chain });
            }
            stack.push((owner, id));
            Ok(ResolutionFrame)
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

fn restore<T: ?Sized + Send + Sync + 'static>(
    id: AbstractId,
    instance: &Instance,
) -> Result<Arc<T>, ContainerError> {
    instance
        .downcast_ref::<Arc<T>>()
        .map(Arc::clone)
        .ok_or(ContainerError::UnresolvableType { id: id.name })
}

/// Registry and resolver mapping abstract ids to instances.
///
/// Registration takes `&mut self` and happens during bootstrap. Once the container is
/// shared (usually inside an `Arc` held by the dispatcher) only resolution remains,
/// which is safe from any number of threads. The singleton cache is the single piece
/// of state written after bootstrap; first resolutions are serialised so a singleton
/// factory runs at most once.
#[derive(Default)]
pub struct Container {
    bindings: HashMap<AbstractId, Binding>,
    instances: RwLock<HashMap<AbstractId, Instance>>,
    singleton_gate: ReentrantMutex<()>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a factory for `T`. Every resolution runs the factory again.
    pub fn bind<T, F>(&mut self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.insert::<T>(Resolver::Factory(Self::erase_factory(factory)), false);
    }

    /// Register `T` to be autowired through its own constructor on every resolution.
    pub fn bind_autowired<T: Injectable>(&mut self) {
        self.insert::<T>(Self::autowire_resolver::<T>(), false);
    }

    /// Register a factory whose first result is cached and returned from then on.
    pub fn singleton<T, F>(&mut self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.insert::<T>(Resolver::Factory(Self::erase_factory(factory)), true);
    }

    /// Autowire `T` once and cache it.
    pub fn singleton_autowired<T: Injectable>(&mut self) {
        self.insert::<T>(Self::autowire_resolver::<T>(), true);
    }

    /// Seed the cache directly. Takes precedence over any binding for `T`.
    pub fn register_instance<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        let id = AbstractId::of::<T>();
        debug!(abstract_id = id.name, "Instance registered");
        self.instances.get_mut().insert(id, erase(instance));
    }

    /// Resolve an abstract id: cached instance, then binding, otherwise
    /// [`ContainerError::UnresolvableType`].
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        let id = AbstractId::of::<T>();
        if let Some(hit) = self.cached(&id) {
            return restore::<T>(id, &hit);
        }
        match self.bindings.get(&id) {
            Some(binding) => restore::<T>(id, &self.invoke(id, binding)?),
            None => {
                debug!(abstract_id = id.name, "No instance or binding");
                Err(ContainerError::UnresolvableType { id: id.name })
            }
        }
    }

    /// Resolve a concrete type: cached instance, then binding, otherwise autowire `T`
    /// directly. The autowired value is not cached.
    pub fn make<T: Injectable>(&self) -> Result<Arc<T>, ContainerError> {
        let id = AbstractId::of::<T>();
        if let Some(hit) = self.cached(&id) {
            return restore::<T>(id, &hit);
        }
        match self.bindings.get(&id) {
            Some(binding) => restore::<T>(id, &self.invoke(id, binding)?),
            None => {
                let _frame = ResolutionFrame::enter(self, id)?;
                debug!(abstract_id = id.name, "Autowiring unregistered type");
                T::inject(self).map(Arc::new)
            }
        }
    }

    /// Constructor dependency on an abstract id. A missing dependency is reported as
    /// [`ContainerError::UnresolvableParameter`] naming `param` and `owner`.
    pub fn dependency<T: ?Sized + Send + Sync + 'static>(
        &self,
        owner: &'static str,
        param: &'static str,
    ) -> Result<Arc<T>, ContainerError> {
        self.resolve::<T>()
            .map_err(|e| e.into_parameter(owner, param))
    }

    /// Constructor dependency with a declared default used when `T` cannot be resolved.
    pub fn dependency_or<T, D>(
        &self,
        owner: &'static str,
        param: &'static str,
        default: D,
    ) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        D: FnOnce() -> Arc<T>,
    {
        match self.resolve::<T>() {
            Ok(found) => Ok(found),
            Err(ContainerError::UnresolvableType { .. }) => {
                debug!(owner, param, "Dependency unresolvable, using declared default");
                Ok(default())
            }
            Err(e) => Err(e.into_parameter(owner, param)),
        }
    }

    /// Constructor dependency on a concrete, autowirable type.
    pub fn autowire<T: Injectable>(
        &self,
        owner: &'static str,
        param: &'static str,
    ) -> Result<Arc<T>, ContainerError> {
        self.make::<T>().map_err(|e| e.into_parameter(owner, param))
    }

    /// Concrete dependency that falls back to `default` when `T` cannot be built because
    /// one of its own dependencies is missing.
    pub fn autowire_or<T, D>(
        &self,
        owner: &'static str,
        param: &'static str,
        default: D,
    ) -> Result<Arc<T>, ContainerError>
    where
        T: Injectable,
        D: FnOnce() -> Arc<T>,
    {
        match self.make::<T>() {
            Ok(found) => Ok(found),
            Err(ContainerError::UnresolvableType { .. })
            | Err(ContainerError::UnresolvableParameter { .. }) => {
                debug!(owner, param, "Dependency unresolvable, using declared default");
                Ok(default())
            }
            Err(e) => Err(e.into_parameter(owner, param)),
        }
    }

    /// Resolve `T` once at startup so a missing binding fails bootstrap instead of the
    /// first request. Singletons resolved here are cached.
    pub fn validate<T: ?Sized + Send + Sync + 'static>(&self) -> Result<(), ContainerError> {
        self.resolve::<T>().map(drop)
    }

    /// True iff a binding or cached instance exists for `T`. Autowirable but
    /// unregistered types report `false`.
    #[must_use]
    pub fn has<T: ?Sized + 'static>(&self) -> bool {
        let id = AbstractId::of::<T>();
        self.bindings.contains_key(&id) || self.instances.read().contains_key(&id)
    }

    /// Number of ids with a binding or a cached instance; the ids [`Container::has`]
    /// reports `true` for.
    #[must_use]
    pub fn len(&self) -> usize {
        let instances = self.instances.read();
        self.bindings.len()
            + instances
                .keys()
                .filter(|id| !self.bindings.contains_key(*id))
                .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.instances.read().is_empty()
    }

    /// Drop every binding and cached instance.
    pub fn reset(&mut self) {
        debug!(
            bindings = self.bindings.len(),
            instances = self.instances.get_mut().len(),
            "Container reset"
        );
        self.bindings.clear();
        self.instances.get_mut().clear();
    }

    fn insert<T: ?Sized + 'static>(&mut self, resolver: Resolver, shared: bool) {
        let id = AbstractId::of::<T>();
        let concrete = match &resolver {
            Resolver::Autowire { concrete, .. } => *concrete,
            Resolver::Factory(_) => "<factory>",
        };
        if self.bindings.insert(id, Binding { resolver, shared }).is_some() {
            warn!(abstract_id = id.name, concrete, "Replaced existing binding");
        } else {
            debug!(abstract_id = id.name, concrete, shared, "Binding registered");
        }
    }

    fn erase_factory<T, F>(factory: F) -> Factory
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        Arc::new(move |c: &Container| factory(c).map(erase))
    }

    fn autowire_resolver<T: Injectable>() -> Resolver {
        Resolver::Autowire {
            concrete: std::any::type_name::<T>(),
            build: Arc::new(|c: &Container| T::inject(c).map(|v| erase(Arc::new(v)))),
        }
    }

    fn cached(&self, id: &AbstractId) -> Option<Instance> {
        self.instances.read().get(id).map(Arc::clone)
    }

    fn invoke(&self, id: AbstractId, binding: &Binding) -> Result<Instance, ContainerError> {
        if !binding.shared {
            return self.build(id, &binding.resolver);
        }

        // Double-checked: another thread may have finished the build while we waited.
        let _gate = self.singleton_gate.lock();
        if let Some(hit) = self.cached(&id) {
            return Ok(hit);
        }
        let instance = self.build(id, &binding.resolver)?;
        self.instances.write().insert(id, Arc::clone(&instance));
        debug!(abstract_id = id.name, "Singleton cached");
        Ok(instance)
    }

    fn build(&self, id: AbstractId, resolver: &Resolver) -> Result<Instance, ContainerError> {
        let _frame = ResolutionFrame::enter(self, id)?;
        (resolver.factory())(self)
    }
}
