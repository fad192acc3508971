use crate::{
    config::TextMode,
    model::JoinKeys,
    query::Direction,
    types::Date,
    value::Value,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Query AST
///
/// Schema-agnostic representation of the assembled SELECT. Conditions are
/// implicitly AND-ed in insertion order; nothing here knows about filters,
/// scopes, or catalogs.
///

///
/// ColumnRef
/// Table-qualified column.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[display("{table}.{column}")]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    #[must_use]
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

///
/// Projection
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Projection {
    /// Bare `*`.
    #[default]
    All,

    /// `<table>.*`, keeping joined columns out of the result.
    AllOf(String),
}

///
/// Condition
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Condition {
    /// Substring match.
    Contains {
        column: ColumnRef,
        value: String,
        mode: TextMode,
    },

    /// Membership in a fixed set.
    In {
        column: ColumnRef,
        values: Vec<Value>,
    },

    /// Exact equality.
    Eq { column: ColumnRef, value: Value },

    /// Column truncated to its date equals `date`.
    DateEq { column: ColumnRef, date: Date },

    /// Column truncated to its date lies within `from..=to`.
    DateBetween {
        column: ColumnRef,
        from: Date,
        to: Date,
    },

    Exists(ExistsClause),

    /// Caller-supplied SQL fragment with positional bindings.
    Raw { sql: String, bindings: Vec<Value> },
}

impl Condition {
    /// Column the condition constrains, if it constrains exactly one.
    #[must_use]
    pub const fn column(&self) -> Option<&ColumnRef> {
        match self {
            Self::Contains { column, .. }
            | Self::In { column, .. }
            | Self::Eq { column, .. }
            | Self::DateEq { column, .. }
            | Self::DateBetween { column, .. } => Some(column),
            Self::Exists(_) | Self::Raw { .. } => None,
        }
    }
}

///
/// ExistsClause
///
/// WHERE-EXISTS sub-predicate scoped to a named relation. `conditions`
/// apply to rows of `table`, correlated with the outer row through `join`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExistsClause {
    pub relation: String,
    pub table: String,
    pub join: JoinKeys,
    pub conditions: Vec<Condition>,
}

///
/// OrderTarget
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderTarget {
    Column(ColumnRef),
    Raw(String),
}

///
/// OrderClause
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderClause {
    pub target: OrderTarget,
    pub direction: Direction,
}
