use derive_more::Deref;
use std::collections::BTreeMap;

///
/// ColumnKind
///
/// Storage-level column type. Only used for diagnostics; filter routing
/// depends on column presence, never on kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ColumnKind {
    Bool,
    Date,
    Float,
    Int,
    Json,
    Text,
    Timestamp,
    Unknown,
}

///
/// ColumnMeta
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

///
/// ColumnMap
/// Column name → metadata for one table.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct ColumnMap(BTreeMap<String, ColumnMeta>);

impl ColumnMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-null column.
    #[must_use]
    pub fn column(self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.insert(name.into(), kind, false)
    }

    /// Add a nullable column.
    #[must_use]
    pub fn nullable(self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.insert(name.into(), kind, true)
    }

    fn insert(mut self, name: String, kind: ColumnKind, nullable: bool) -> Self {
        self.0.insert(
            name.clone(),
            ColumnMeta {
                name,
                kind,
                nullable,
            },
        );
        self
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnKind)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (S, ColumnKind)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (name, kind)| map.column(name, kind))
    }
}

///
/// ColumnCatalog
///
/// Read-only lookup of a table's columns.
///

pub trait ColumnCatalog {
    /// Column mapping for `table`, or `None` when the table is unknown.
    fn columns(&self, table: &str) -> Option<&ColumnMap>;

    /// An unknown table has no columns.
    fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns(table)
            .is_some_and(|columns| columns.contains_key(column))
    }
}

///
/// StaticCatalog
/// In-memory catalog populated up front.
///

#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    tables: BTreeMap<String, ColumnMap>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the column mapping for `name`.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>, columns: ColumnMap) -> Self {
        self.tables.insert(name.into(), columns);
        self
    }
}

impl ColumnCatalog for StaticCatalog {
    fn columns(&self, table: &str) -> Option<&ColumnMap> {
        self.tables.get(table)
    }
}
