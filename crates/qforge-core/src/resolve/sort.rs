use crate::{
    error::{Capability, ConfigurationError},
    query::{ColumnRef, Direction, Query},
    resolve::{Component, Resolver, SortFn},
};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// SortHandler
///

#[derive(Clone)]
pub enum SortHandler {
    Callback(SortFn),

    /// Component that must expose the `build()` capability.
    Class(String),
}

impl fmt::Debug for SortHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
        }
    }
}

///
/// SortEntry
///
/// One whitelisted sort key. `column` applies the default ordering on the
/// primary table; a handler, when present, runs after it.
///

#[derive(Clone, Debug, Default)]
pub struct SortEntry {
    pub column: bool,
    pub handler: Option<SortHandler>,
}

impl SortEntry {
    /// Plain sortable column.
    #[must_use]
    pub const fn column() -> Self {
        Self {
            column: true,
            handler: None,
        }
    }

    #[must_use]
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Query, &str, Direction) -> Query + Send + Sync + 'static,
    {
        Self::default().with_callback(f)
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::default().with_class(name)
    }

    #[must_use]
    pub fn with_callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Query, &str, Direction) -> Query + Send + Sync + 'static,
    {
        self.handler = Some(SortHandler::Callback(Arc::new(f)));
        self
    }

    #[must_use]
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.handler = Some(SortHandler::Class(name.into()));
        self
    }
}

///
/// SortRegistry
/// Whitelist of permitted sort keys.
///

#[derive(Clone, Debug, Default)]
pub struct SortRegistry {
    entries: BTreeMap<String, SortEntry>,
}

impl SortRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, entry: SortEntry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    /// Register several plain sortable columns at once.
    #[must_use]
    pub fn columns<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .fold(self, |registry, key| registry.entry(key, SortEntry::column()))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SortEntry> {
        self.entries.get(key)
    }
}

///
/// SortRoute
/// What a sort request ended up doing.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortRoute {
    Column,
    Handler,
    ColumnAndHandler,
    Ignored,
}

///
/// SortPlan
///
/// A resolved sort request. Building the plan performs every fallible
/// lookup, so applying it cannot fail.
///

pub(crate) struct SortPlan {
    column: Option<ColumnRef>,
    handler: Option<ResolvedSortHandler>,
}

enum ResolvedSortHandler {
    Callback(SortFn),
    Builder(Arc<dyn Component>),
}

impl SortPlan {
    pub(crate) const fn route(&self) -> SortRoute {
        match (&self.column, &self.handler) {
            (Some(_), Some(_)) => SortRoute::ColumnAndHandler,
            (Some(_), None) => SortRoute::Column,
            (None, Some(_)) => SortRoute::Handler,
            (None, None) => SortRoute::Ignored,
        }
    }

    pub(crate) fn apply(self, query: Query, key: &str, direction: Direction) -> Query {
        let query = match self.column {
            Some(column) => query.order_by(column, direction),
            None => query,
        };

        match self.handler {
            Some(ResolvedSortHandler::Callback(f)) => f(query, key, direction),
            Some(ResolvedSortHandler::Builder(component)) => match component.as_sort() {
                Some(builder) => builder.build(query, key, direction),
                None => query,
            },
            None => query,
        }
    }
}

/// Resolve a sort request against the registry.
pub(crate) fn plan_sort(
    registry: &SortRegistry,
    table: &str,
    key: &str,
    resolver: &dyn Resolver,
) -> Result<SortPlan, ConfigurationError> {
    let Some(entry) = registry.get(key) else {
        return Ok(SortPlan {
            column: None,
            handler: None,
        });
    };

    let column = entry.column.then(|| ColumnRef::new(table, key));
    let handler = match &entry.handler {
        None => None,
        Some(SortHandler::Callback(f)) => Some(ResolvedSortHandler::Callback(Arc::clone(f))),
        Some(SortHandler::Class(name)) => {
            let component =
                resolver
                    .resolve(name)
                    .ok_or_else(|| ConfigurationError::UnresolvedTarget {
                        target: name.clone(),
                    })?;
            if component.as_sort().is_none() {
                return Err(ConfigurationError::MissingCapability {
                    target: name.clone(),
                    capability: Capability::Build,
                });
            }

            Some(ResolvedSortHandler::Builder(component))
        }
    };

    Ok(SortPlan { column, handler })
}
