//! Module: query
//! Responsibility: the composable SELECT model and its SQL compilation.
//! Does not own: filter interpretation, scope or sort resolution.
//! Boundary: the single concrete query type every delegation step returns.

mod ast;
mod compile;
mod direction;


pub use ast::{
    ColumnRef, Condition, ExistsClause, OrderClause, OrderTarget, Projection,
};
pub use compile::CompiledQuery;
pub use direction::{Direction, ParseDirectionError};

use crate::{model::RelationDescriptor, value::Value};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Query
///
/// Mutable SELECT against one table.
///
/// Every mutator consumes and returns `Self`, so scope and sort handlers
/// can be written as plain `Query -> Query` functions. The assembler owns
/// the only live instance while assembly is running.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Query {
    table: String,
    projection: Projection,
    conditions: Vec<Condition>,
    orders: Vec<OrderClause>,
}

impl Query {
    /// Create an unfiltered `SELECT * FROM <table>`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Create a `SELECT <table>.* FROM <table>`.
    #[must_use]
    pub fn select_all_from(table: impl Into<String>) -> Self {
        let table = table.into();

        Self {
            projection: Projection::AllOf(table.clone()),
            table,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// AND a condition onto the query.
    #[must_use]
    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// AND a raw SQL fragment with positional bindings.
    #[must_use]
    pub fn where_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.conditions.push(Condition::Raw {
            sql: sql.into(),
            bindings,
        });
        self
    }

    /// AND an EXISTS sub-query scoped to `relation`.
    ///
    /// `build` receives an empty query over the related table; the
    /// conditions it adds become the body of the EXISTS clause.
    #[must_use]
    pub fn where_has(
        mut self,
        relation: impl Into<String>,
        descriptor: &RelationDescriptor,
        build: impl FnOnce(Self) -> Self,
    ) -> Self {
        let sub = build(Self::new(descriptor.related_table.clone()));

        self.conditions.push(Condition::Exists(ExistsClause {
            relation: relation.into(),
            table: sub.table,
            join: descriptor.join.clone(),
            conditions: sub.conditions,
        }));
        self
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Append an ORDER BY term for a qualified column.
    #[must_use]
    pub fn order_by(mut self, column: ColumnRef, direction: Direction) -> Self {
        self.orders.push(OrderClause {
            target: OrderTarget::Column(column),
            direction,
        });
        self
    }

    /// Append an ORDER BY term for a raw expression.
    #[must_use]
    pub fn order_by_raw(mut self, expr: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(OrderClause {
            target: OrderTarget::Raw(expr.into()),
            direction,
        });
        self
    }

    /// Drop every ORDER BY term.
    #[must_use]
    pub fn clear_orders(mut self) -> Self {
        self.orders.clear();
        self
    }

    /// Compile into SQL text with `?` placeholders.
    #[must_use]
    pub fn to_sql(&self) -> CompiledQuery {
        compile::compile(self)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql().sql)
    }
}
