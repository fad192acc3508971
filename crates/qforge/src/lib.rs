//! ## Crate layout
//! - `core`: query model, filter synthesis, scope and sort resolution, and
//!   the assembler.
//!
//! The `prelude` module mirrors the surface used by request handlers:
//! declare filters, register scope and sort components, then drive an
//! [`Assembler`](crate::core::assemble::Assembler) per request.

pub use qforge_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{
    Error,
    config::{AssemblerConfig, TextMode},
    obs::{AssemblyEvent, AssemblyTraceSink},
};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        config::AssemblerConfig,
        context::RequestContext as _,
        model::{ColumnCatalog as _, EntitySchema as _},
        prelude::{
            Assembler, ColumnKind, ColumnMap, ColumnRef, Component, Condition, ControlType, Date,
            Direction, EntityModel, FilterElement, Methods, NoResolver, PairTarget, Query,
            QueryScope, Registry, RelationDescriptor, Resolver, ScopeRef, SortBuild, SortEntry,
            SortRegistry, StaticCatalog, Value,
        },
    };
}
