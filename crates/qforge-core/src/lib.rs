//! Core runtime for qforge: the query model, predicate synthesis, scope and
//! sort resolution, and the assembler that drives them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod assemble;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod model;
pub mod obs;
pub mod query;
pub mod resolve;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the assembler entry point.
/// No errors, trace sinks, or compilation internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        assemble::Assembler,
        context::RequestContext,
        filter::{ControlType, FilterElement},
        model::{
            ColumnCatalog, ColumnKind, ColumnMap, EntityModel, EntitySchema, RelationDescriptor,
            StaticCatalog,
        },
        query::{ColumnRef, Condition, Direction, Query},
        resolve::{
            Component, Methods, NoResolver, PairTarget, QueryScope, Registry, Resolver, ScopeRef,
            SortBuild, SortEntry, SortRegistry,
        },
        types::Date,
        value::Value,
    };
}
