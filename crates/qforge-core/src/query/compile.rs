//! SQL compilation for assembled queries.
//!
//! Output is dialect-neutral text with `?` placeholders; bindings are
//! collected in placeholder order. Identifiers that are not plain
//! `[A-Za-z_][A-Za-z0-9_]*` names are double-quoted; raw fragments are
//! emitted verbatim.

use crate::{
    config::TextMode,
    query::{ColumnRef, Condition, ExistsClause, OrderTarget, Projection, Query},
    value::Value,
};
use std::fmt::{self, Write};

///
/// CompiledQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub bindings: Vec<Value>,
}

pub(super) fn compile(query: &Query) -> CompiledQuery {
    let mut out = Compiler::default();

    out.sql.push_str("SELECT ");
    match query.projection() {
        Projection::All => out.sql.push('*'),
        Projection::AllOf(table) => {
            let _ = write!(out.sql, "{}.*", Ident(table));
        }
    }
    let _ = write!(out.sql, " FROM {}", Ident(query.table()));

    if query.has_conditions() {
        out.sql.push_str(" WHERE ");
        out.conditions(query.conditions(), query.table());
    }

    if !query.orders().is_empty() {
        out.sql.push_str(" ORDER BY ");
        for (i, order) in query.orders().iter().enumerate() {
            if i > 0 {
                out.sql.push_str(", ");
            }
            match &order.target {
                OrderTarget::Column(column) => {
                    let _ = write!(out.sql, "{}", Column(column));
                }
                OrderTarget::Raw(expr) => out.sql.push_str(expr),
            }
            let _ = write!(out.sql, " {}", order.direction.as_sql());
        }
    }

    CompiledQuery {
        sql: out.sql,
        bindings: out.bindings,
    }
}

///
/// Compiler
///

#[derive(Default)]
struct Compiler {
    sql: String,
    bindings: Vec<Value>,
}

impl Compiler {
    // `outer` is the table correlated EXISTS clauses join back to.
    fn conditions(&mut self, conditions: &[Condition], outer: &str) {
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(" AND ");
            }
            self.condition(condition, outer);
        }
    }

    fn condition(&mut self, condition: &Condition, outer: &str) {
        match condition {
            Condition::Contains {
                column,
                value,
                mode: TextMode::Cs,
            } => {
                let _ = write!(self.sql, "{} LIKE ?", Column(column));
                self.bind(Value::Text(format!("%{value}%")));
            }
            Condition::Contains {
                column,
                value,
                mode: TextMode::Ci,
            } => {
                let _ = write!(self.sql, "LOWER({}) LIKE LOWER(?)", Column(column));
                self.bind(Value::Text(format!("%{value}%")));
            }
            Condition::In { column, values } => self.membership(column, values),
            Condition::Eq { column, value } => {
                let _ = write!(self.sql, "{} = ?", Column(column));
                self.bind(value.clone());
            }
            Condition::DateEq { column, date } => {
                let _ = write!(self.sql, "DATE({}) = ?", Column(column));
                self.bind(Value::Date(*date));
            }
            Condition::DateBetween { column, from, to } => {
                let _ = write!(self.sql, "DATE({}) BETWEEN ? AND ?", Column(column));
                self.bind(Value::Date(*from));
                self.bind(Value::Date(*to));
            }
            Condition::Exists(clause) => self.exists(clause, outer),
            Condition::Raw { sql, bindings } => {
                let _ = write!(self.sql, "({sql})");
                self.bindings.extend(bindings.iter().cloned());
            }
        }
    }

    fn membership(&mut self, column: &ColumnRef, values: &[Value]) {
        // IN () is not valid SQL; an empty set matches nothing.
        if values.is_empty() {
            self.sql.push_str("1 = 0");
            return;
        }

        let _ = write!(self.sql, "{} IN (", Column(column));
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.sql.push('?');
            self.bind(value.clone());
        }
        self.sql.push(')');
    }

    fn exists(&mut self, clause: &ExistsClause, outer: &str) {
        let inner = clause.table.as_str();
        let _ = write!(
            self.sql,
            "EXISTS (SELECT * FROM {} WHERE {}.{} = {}.{}",
            Ident(inner),
            Ident(inner),
            Ident(&clause.join.related),
            Ident(outer),
            Ident(&clause.join.parent),
        );
        if !clause.conditions.is_empty() {
            self.sql.push_str(" AND ");
            self.conditions(&clause.conditions, inner);
        }
        self.sql.push(')');
    }

    fn bind(&mut self, value: Value) {
        self.bindings.push(value);
    }
}

///
/// Ident
/// Table or column name as it appears in SQL text.
///

struct Ident<'a>(&'a str);

impl Ident<'_> {
    fn is_plain(&self) -> bool {
        let mut bytes = self.0.bytes();

        bytes
            .next()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
            && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            f.write_str(self.0)
        } else {
            write!(f, "\"{}\"", self.0.replace('"', "\"\""))
        }
    }
}

struct Column<'a>(&'a ColumnRef);

impl fmt::Display for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", Ident(&self.0.table), Ident(&self.0.column))
    }
}
