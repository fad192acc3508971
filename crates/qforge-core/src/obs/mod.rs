//! Assembly tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! assembly semantics.

use crate::{
    error::{ErrorClass, ErrorOrigin},
    filter::SkipReason,
    query::Direction,
    resolve::{ScopeKind, SortRoute},
};
use std::fmt;

///
/// AssemblyTraceSink
///

pub trait AssemblyTraceSink: Send + Sync {
    fn on_event(&self, event: &AssemblyEvent);
}

///
/// FilterRoute
/// Which branch of per-element assembly produced the predicate.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterRoute {
    Custom,
    Translation,
    Relation,
    Direct,
}

impl fmt::Display for FilterRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Custom => "custom",
            Self::Translation => "translation",
            Self::Relation => "relation",
            Self::Direct => "direct",
        };
        write!(f, "{label}")
    }
}

///
/// AssemblyEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssemblyEvent {
    FilterSkipped {
        id: String,
        reason: SkipReason,
    },
    FilterApplied {
        id: String,
        route: FilterRoute,
    },
    ScopeApplied {
        kind: ScopeKind,
    },
    SortApplied {
        key: String,
        direction: Direction,
        route: SortRoute,
    },
    Failed {
        origin: ErrorOrigin,
        class: ErrorClass,
        message: String,
    },
}

impl fmt::Display for AssemblyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilterSkipped { id, reason } => write!(f, "filter '{id}' skipped ({reason})"),
            Self::FilterApplied { id, route } => write!(f, "filter '{id}' applied ({route})"),
            Self::ScopeApplied { kind } => write!(f, "scope applied ({kind:?})"),
            Self::SortApplied {
                key,
                direction,
                route,
            } => write!(f, "sort '{key}' {direction} ({route:?})"),
            Self::Failed {
                origin,
                class,
                message,
            } => write!(f, "{origin}:{class}: {message}"),
        }
    }
}
