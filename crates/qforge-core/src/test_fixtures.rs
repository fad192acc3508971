use crate::{
    model::{ColumnKind, ColumnMap, EntityModel, RelationDescriptor, StaticCatalog},
    obs::{AssemblyEvent, AssemblyTraceSink},
    query::Query,
};
use std::sync::Mutex;

///
/// post_model
///
/// `Post` over `posts`, translatable through `post_translations`, with one
/// relation of each cardinality and a `published` local scope.
///
pub(crate) fn post_model() -> EntityModel {
    EntityModel::new("Post", "posts")
        .translatable("post_translations", "post_id")
        .with_relation(
            "author",
            RelationDescriptor::belongs_to("users", "author_id", "id"),
        )
        .with_relation(
            "profile",
            RelationDescriptor::has_one("post_profiles", "post_id", "id"),
        )
        .with_relation(
            "comments",
            RelationDescriptor::has_many("comments", "post_id", "id"),
        )
        .scope("published", |q: Query| {
            q.where_raw("posts.published_at IS NOT NULL", vec![])
        })
}

///
/// post_catalog
///
/// `title` exists on both `posts` and `post_translations` so precedence
/// can be observed.
///
pub(crate) fn post_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .table(
            "posts",
            ColumnMap::new()
                .column("id", ColumnKind::Int)
                .column("title", ColumnKind::Text)
                .column("author_id", ColumnKind::Int)
                .column("status", ColumnKind::Text)
                .column("views", ColumnKind::Int)
                .column("featured", ColumnKind::Bool)
                .nullable("published_at", ColumnKind::Timestamp),
        )
        .table(
            "post_translations",
            ColumnMap::new()
                .column("id", ColumnKind::Int)
                .column("post_id", ColumnKind::Int)
                .column("locale", ColumnKind::Text)
                .column("title", ColumnKind::Text)
                .column("body", ColumnKind::Text),
        )
        .table(
            "users",
            ColumnMap::new()
                .column("id", ColumnKind::Int)
                .column("author_name", ColumnKind::Text),
        )
        .table(
            "comments",
            ColumnMap::new()
                .column("id", ColumnKind::Int)
                .column("post_id", ColumnKind::Int)
                .column("content", ColumnKind::Text),
        )
}

///
/// RecordingSink
/// Trace sink that keeps every event for later inspection.
///
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<AssemblyEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<AssemblyEvent> {
        self.events.lock().expect("sink lock").clone()
    }
}

impl AssemblyTraceSink for RecordingSink {
    fn on_event(&self, event: &AssemblyEvent) {
        self.events.lock().expect("sink lock").push(event.clone());
    }
}
