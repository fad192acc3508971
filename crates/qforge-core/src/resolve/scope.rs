use crate::{
    error::{Capability, ConfigurationError},
    model::EntitySchema,
    query::Query,
    resolve::{Component, Resolver, ScopeFn},
};
use std::{fmt, sync::Arc};

/// Separator between object and method in string scope references.
const METHOD_DELIMITER: char = '@';

///
/// ScopeRef
///
/// Reference to a reusable query modifier. Exactly one variant is active;
/// resolution is an exhaustive match over this set.
///

#[derive(Clone)]
pub enum ScopeRef {
    /// Component that must expose the `query()` capability.
    Class(String),

    /// `Object@method`: a named method on a resolved component.
    ObjectMethod { object: String, method: String },

    /// Closure applied directly.
    Closure(ScopeFn),

    /// `(target, method)` pair.
    Pair { target: PairTarget, method: String },
}

impl ScopeRef {
    /// Parse a string reference: `Object@method` or a bare class name.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(METHOD_DELIMITER) {
            Some((object, method)) => Self::ObjectMethod {
                object: object.to_string(),
                method: method.to_string(),
            },
            None => Self::Class(reference.to_string()),
        }
    }

    #[must_use]
    pub fn closure<F>(scope: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        Self::Closure(Arc::new(scope))
    }

    #[must_use]
    pub fn pair(target: PairTarget, method: impl Into<String>) -> Self {
        Self::Pair {
            target,
            method: method.into(),
        }
    }
}

impl From<&str> for ScopeRef {
    fn from(reference: &str) -> Self {
        Self::parse(reference)
    }
}

impl fmt::Debug for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
            Self::ObjectMethod { object, method } => f
                .debug_struct("ObjectMethod")
                .field("object", object)
                .field("method", method)
                .finish(),
            Self::Closure(_) => f.write_str("Closure(..)"),
            Self::Pair { target, method } => f
                .debug_struct("Pair")
                .field("target", target)
                .field("method", method)
                .finish(),
        }
    }
}

///
/// PairTarget
///

#[derive(Clone)]
pub enum PairTarget {
    /// The assembler's own entity; the method is one of its local scopes.
    Entity,

    /// Identifier handed to the resolver. Naming the assembler's own
    /// entity is equivalent to [`PairTarget::Entity`].
    Named(String),

    /// Already-live component.
    Instance(Arc<dyn Component>),
}

impl fmt::Debug for PairTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => f.write_str("Entity"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

///
/// ScopeKind
/// Which resolution branch handled a scope.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeKind {
    Class,
    ObjectMethod,
    Closure,
    Pair,
    LocalScope,
}

///
/// ScopeTarget
///
/// A scope reference after resolution. Applying it cannot fail; every
/// capability check has already happened.
///

pub(crate) enum ScopeTarget {
    Scope(Arc<dyn Component>),
    Function(ScopeFn),
}

impl ScopeTarget {
    pub(crate) fn apply(&self, query: Query) -> Query {
        match self {
            Self::Scope(component) => match component.as_scope() {
                Some(scope) => scope.query(query),
                None => query,
            },
            Self::Function(f) => f(query),
        }
    }
}

/// Resolve `scope` into exactly one callable target.
pub(crate) fn resolve_scope(
    scope: &ScopeRef,
    schema: &dyn EntitySchema,
    resolver: &dyn Resolver,
) -> Result<(ScopeTarget, ScopeKind), ConfigurationError> {
    match scope {
        ScopeRef::Class(name) => {
            let component = resolve_component(resolver, name)?;
            if component.as_scope().is_none() {
                return Err(ConfigurationError::MissingCapability {
                    target: name.clone(),
                    capability: Capability::Query,
                });
            }

            Ok((ScopeTarget::Scope(component), ScopeKind::Class))
        }

        ScopeRef::ObjectMethod { object, method } => {
            let component = resolve_component(resolver, object)?;
            let f = component_method(component.as_ref(), object, method)?;

            Ok((ScopeTarget::Function(f), ScopeKind::ObjectMethod))
        }

        ScopeRef::Closure(f) => Ok((ScopeTarget::Function(Arc::clone(f)), ScopeKind::Closure)),

        ScopeRef::Pair { target, method } => match target {
            PairTarget::Entity => local_scope(schema, method),
            PairTarget::Named(name) if name == schema.entity_name() => local_scope(schema, method),
            PairTarget::Named(name) => {
                let component = resolve_component(resolver, name)?;
                let f = component_method(component.as_ref(), name, method)?;

                Ok((ScopeTarget::Function(f), ScopeKind::Pair))
            }
            PairTarget::Instance(component) => {
                let f = component_method(component.as_ref(), "<instance>", method)?;

                Ok((ScopeTarget::Function(f), ScopeKind::Pair))
            }
        },
    }
}

fn resolve_component(
    resolver: &dyn Resolver,
    id: &str,
) -> Result<Arc<dyn Component>, ConfigurationError> {
    resolver
        .resolve(id)
        .ok_or_else(|| ConfigurationError::UnresolvedTarget {
            target: id.to_string(),
        })
}

fn component_method(
    component: &dyn Component,
    target: &str,
    method: &str,
) -> Result<ScopeFn, ConfigurationError> {
    component
        .method(method)
        .ok_or_else(|| ConfigurationError::UnknownMethod {
            target: target.to_string(),
            method: method.to_string(),
        })
}

fn local_scope(
    schema: &dyn EntitySchema,
    method: &str,
) -> Result<(ScopeTarget, ScopeKind), ConfigurationError> {
    schema
        .local_scope(method)
        .map(|f| (ScopeTarget::Function(f), ScopeKind::LocalScope))
        .ok_or_else(|| ConfigurationError::UnknownLocalScope {
            entity: schema.entity_name().to_string(),
            method: method.to_string(),
        })
}
