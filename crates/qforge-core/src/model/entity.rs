use crate::{query::Query, resolve::ScopeFn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RelationKind {
    /// The primary row holds the foreign key.
    BelongsTo,
    /// The related row holds the foreign key; at most one related row.
    HasOne,
    /// The related row holds the foreign key; any number of related rows.
    HasMany,
}

///
/// JoinKeys
///
/// Correlation between an outer row and rows of a related table:
/// `related_table.related = outer_table.parent`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JoinKeys {
    pub parent: String,
    pub related: String,
}

///
/// RelationDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    pub related_table: String,
    pub join: JoinKeys,
}

impl RelationDescriptor {
    /// `foreign_key` lives on the primary table and points at `owner_key`.
    #[must_use]
    pub fn belongs_to(
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        owner_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            related_table: related_table.into(),
            join: JoinKeys {
                parent: foreign_key.into(),
                related: owner_key.into(),
            },
        }
    }

    /// `foreign_key` lives on the related table and points at `local_key`.
    #[must_use]
    pub fn has_one(
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::owned(RelationKind::HasOne, related_table, foreign_key, local_key)
    }

    #[must_use]
    pub fn has_many(
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::owned(RelationKind::HasMany, related_table, foreign_key, local_key)
    }

    fn owned(
        kind: RelationKind,
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            related_table: related_table.into(),
            join: JoinKeys {
                parent: local_key.into(),
                related: foreign_key.into(),
            },
        }
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        match self.kind {
            RelationKind::BelongsTo | RelationKind::HasOne => Cardinality::One,
            RelationKind::HasMany => Cardinality::Many,
        }
    }

    /// Has-one or belongs-to.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self.cardinality(), Cardinality::One)
    }
}

///
/// EntitySchema
///
/// What the assembler needs to know about the primary entity.
///

pub trait EntitySchema {
    /// Stable entity name, used to recognise self-referencing scope pairs.
    fn entity_name(&self) -> &str;

    fn primary_table(&self) -> &str;

    fn relation(&self, name: &str) -> Option<&RelationDescriptor>;

    /// Relation to the per-locale shadow table, if the entity has one.
    fn translation_relation(&self) -> Option<&RelationDescriptor>;

    /// Native query scope declared on the entity itself.
    fn local_scope(&self, _name: &str) -> Option<ScopeFn> {
        None
    }

    fn is_translatable(&self) -> bool {
        self.translation_relation().is_some()
    }

    fn translation_table(&self) -> Option<&str> {
        self.translation_relation()
            .map(|relation| relation.related_table.as_str())
    }
}

///
/// EntityModel
///
/// Owned, builder-constructed [`EntitySchema`].
///

#[derive(Clone)]
pub struct EntityModel {
    name: String,
    table: String,
    primary_key: String,
    translation: Option<RelationDescriptor>,
    relations: BTreeMap<String, RelationDescriptor>,
    scopes: BTreeMap<String, ScopeFn>,
}

impl EntityModel {
    /// Primary key defaults to `id`.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: "id".to_string(),
            translation: None,
            relations: BTreeMap::new(),
            scopes: BTreeMap::new(),
        }
    }

    /// Also re-points an already declared translation relation.
    #[must_use]
    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        if let Some(translation) = &mut self.translation {
            translation.join.parent.clone_from(&self.primary_key);
        }
        self
    }

    /// Mark the entity translatable; translation rows reference the
    /// primary key through `foreign_key`.
    #[must_use]
    pub fn translatable(mut self, table: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        self.translation = Some(RelationDescriptor::has_many(
            table,
            foreign_key,
            self.primary_key.clone(),
        ));
        self
    }

    #[must_use]
    pub fn with_relation(
        mut self,
        name: impl Into<String>,
        descriptor: RelationDescriptor,
    ) -> Self {
        self.relations.insert(name.into(), descriptor);
        self
    }

    /// Declare a native query scope callable through a self-referencing
    /// scope pair.
    #[must_use]
    pub fn scope<F>(mut self, name: impl Into<String>, scope: F) -> Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        self.scopes.insert(name.into(), Arc::new(scope));
        self
    }
}

impl EntitySchema for EntityModel {
    fn entity_name(&self) -> &str {
        &self.name
    }

    fn primary_table(&self) -> &str {
        &self.table
    }

    fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.get(name)
    }

    fn translation_relation(&self) -> Option<&RelationDescriptor> {
        self.translation.as_ref()
    }

    fn local_scope(&self, name: &str) -> Option<ScopeFn> {
        self.scopes.get(name).cloned()
    }
}

impl fmt::Debug for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityModel")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("translation", &self.translation)
            .field("relations", &self.relations)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .finish()
    }
}
