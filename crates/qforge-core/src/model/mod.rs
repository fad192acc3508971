//! Module: model
//! Responsibility: schema contracts for the primary entity and its tables.
//! Does not own: query construction or filter routing.
//! Boundary: read-only lookups consumed by the assembler.

mod column;
mod entity;


pub use column::{ColumnCatalog, ColumnKind, ColumnMap, ColumnMeta, StaticCatalog};
pub use entity::{
    Cardinality, EntityModel, EntitySchema, JoinKeys, RelationDescriptor, RelationKind,
};
