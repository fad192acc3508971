//! Module: resolve
//! Responsibility: turning scope and sort references into callable targets.
//! Does not own: the working query or filter routing.
//! Boundary: components are injected through a [`Resolver`]; nothing here
//! reaches into global state.

mod scope;
mod sort;


pub use scope::{PairTarget, ScopeKind, ScopeRef};
pub use sort::{SortEntry, SortHandler, SortRegistry, SortRoute};

pub(crate) use scope::resolve_scope;
pub(crate) use sort::plan_sort;

use crate::query::{Direction, Query};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Shared `Query -> Query` transformation.
pub type ScopeFn = Arc<dyn Fn(Query) -> Query + Send + Sync>;

/// Shared sort callback receiving the query, sort key, and direction.
pub type SortFn = Arc<dyn Fn(Query, &str, Direction) -> Query + Send + Sync>;

///
/// QueryScope
/// The `query()` capability.
///

pub trait QueryScope: Send + Sync {
    fn query(&self, query: Query) -> Query;
}

///
/// SortBuild
/// The `build()` capability.
///

pub trait SortBuild: Send + Sync {
    fn build(&self, query: Query, key: &str, direction: Direction) -> Query;
}

///
/// Component
///
/// A live object produced by a [`Resolver`].
/// Capabilities are probed rather than assumed; a component advertises only
/// what it implements.
///

pub trait Component: Send + Sync {
    fn as_scope(&self) -> Option<&dyn QueryScope> {
        None
    }

    fn as_sort(&self) -> Option<&dyn SortBuild> {
        None
    }

    /// Named query method, used by `Object@method` and pair references.
    fn method(&self, _name: &str) -> Option<ScopeFn> {
        None
    }
}

///
/// Resolver
///
/// Maps an identifier to a live component.
///

pub trait Resolver {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Component>>;
}

///
/// NoResolver
/// Resolves nothing; for assemblers that only use closures.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn resolve(&self, _id: &str) -> Option<Arc<dyn Component>> {
        None
    }
}

///
/// Registry
/// Identifier → component map.
///

#[derive(Clone, Default)]
pub struct Registry {
    components: BTreeMap<String, Arc<dyn Component>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, id: impl Into<String>, component: impl Component + 'static) -> Self {
        self.components.insert(id.into(), Arc::new(component));
        self
    }

    #[must_use]
    pub fn register_shared(mut self, id: impl Into<String>, component: Arc<dyn Component>) -> Self {
        self.components.insert(id.into(), component);
        self
    }
}

impl Resolver for Registry {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Component>> {
        self.components.get(id).cloned()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

///
/// Methods
///
/// Component exposing a table of named query methods and nothing else.
///

#[derive(Clone, Default)]
pub struct Methods {
    methods: BTreeMap<String, ScopeFn>,
}

impl Methods {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }
}

impl Component for Methods {
    fn method(&self, name: &str) -> Option<ScopeFn> {
        self.methods.get(name).cloned()
    }
}
