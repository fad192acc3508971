use super::*;
use crate::{
    config::TextMode,
    error::{ConfigurationError, ErrorOrigin},
    filter::ControlType,
    model::{EntityModel, StaticCatalog},
    query::{ColumnRef, Condition, OrderTarget, Projection},
    resolve::{Component, Methods, NoResolver, PairTarget, Registry, SortEntry},
    test_fixtures::{RecordingSink, post_catalog, post_model},
    types::Date,
    value::Value,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn requested(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(ToString::to_string).collect()
}

fn assembled(elements: &[FilterElement]) -> Query {
    let model = post_model();
    let catalog = post_catalog();
    let ctx: BTreeSet<String> = elements.iter().map(|e| e.id.clone()).collect();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler.filters(elements, &ctx);
    assembler.into_query()
}

// ----------------------------------------------------------------------
// Seeding and callbacks
// ----------------------------------------------------------------------

#[test]
fn new_assembler_selects_primary_table_columns() {
    let model = post_model();
    let catalog = post_catalog();
    let assembler = Assembler::new(&model, &catalog, &NoResolver);

    assert_eq!(
        assembler.query().projection(),
        &Projection::AllOf("posts".to_string())
    );
    assert!(!assembler.query().has_conditions());
}

#[test]
fn query_callback_replaces_the_working_query() {
    let model = post_model();
    let catalog = post_catalog();
    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);

    assembler
        .apply_query_callback(|q| q.where_raw("posts.id > ?", vec![Value::Int(5)]))
        .apply_query_callback(|q| q.where_raw("posts.id < ?", vec![Value::Int(9)]));

    assert_eq!(assembler.query().conditions().len(), 2);
}

// ----------------------------------------------------------------------
// Filters
// ----------------------------------------------------------------------

#[test]
fn direct_columns_filter_on_the_primary_table() {
    let query = assembled(&[FilterElement::new("status", "select").value("live")]);

    assert_eq!(
        query.conditions(),
        &[Condition::In {
            column: ColumnRef::new("posts", "status"),
            values: vec![Value::from("live")],
        }]
    );
}

#[test]
fn filters_absent_from_the_request_are_skipped() {
    let model = post_model();
    let catalog = post_catalog();
    let elements = [
        FilterElement::new("title", "text").value("rust"),
        FilterElement::new("status", "select").value("live"),
    ];

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler.filters(&elements, &requested(&["status"]));

    let query = assembler.into_query();
    assert_eq!(query.conditions().len(), 1);
    assert_eq!(
        query.conditions()[0].column(),
        Some(&ColumnRef::new("posts", "status"))
    );
}

#[test]
fn null_values_contribute_nothing() {
    let query = assembled(&[
        FilterElement::new("title", "text"),
        FilterElement::new("status", "select").value(Value::Null),
    ]);

    assert!(!query.has_conditions());
}

#[test]
fn filters_apply_in_input_order_without_deduplication() {
    let query = assembled(&[
        FilterElement::new("views", "number").value("3"),
        FilterElement::new("title", "text").value("a"),
        FilterElement::new("views", "number").value("3"),
    ]);

    let columns: Vec<_> = query
        .conditions()
        .iter()
        .filter_map(|c| c.column().map(|col| col.column.clone()))
        .collect();
    assert_eq!(columns, vec!["views", "title", "views"]);
}

#[test]
fn custom_executor_overrides_type_logic() {
    let query = assembled(&[FilterElement::new("title", "text")
        .value("rust")
        .executor(|q, value| {
            Some(
                q.clone()
                    .where_raw("MATCH(posts.title) AGAINST (?)", vec![value.clone()]),
            )
        })]);

    assert_eq!(
        query.conditions(),
        &[Condition::Raw {
            sql: "MATCH(posts.title) AGAINST (?)".to_string(),
            bindings: vec![Value::from("rust")],
        }]
    );
}

#[test]
fn custom_executor_returning_none_falls_through() {
    let query = assembled(&[FilterElement::new("title", "text")
        .value("rust")
        .executor(|_, _| None)]);

    assert!(matches!(
        query.conditions(),
        [Condition::Contains { column, .. }] if *column == ColumnRef::new("posts", "title")
    ));
}

#[test]
fn translation_columns_filter_inside_translations_exists() {
    let query = assembled(&[FilterElement::new("body", "text").value("hello")]);

    let [Condition::Exists(clause)] = query.conditions() else {
        panic!("expected a single EXISTS clause, got {:?}", query.conditions());
    };
    assert_eq!(clause.relation, "translations");
    assert_eq!(clause.table, "post_translations");
    assert_eq!(
        clause.conditions,
        vec![Condition::Contains {
            column: ColumnRef::new("post_translations", "body"),
            value: "hello".to_string(),
            mode: TextMode::Cs,
        }]
    );
    assert!(
        !query
            .conditions()
            .iter()
            .any(|c| c.column() == Some(&ColumnRef::new("posts", "body"))),
        "no direct predicate on posts.body"
    );
}

#[test]
fn primary_columns_win_over_translation_columns() {
    let query = assembled(&[FilterElement::new("title", "text").value("rust")]);

    assert!(matches!(
        query.conditions(),
        [Condition::Contains { column, .. }] if *column == ColumnRef::new("posts", "title")
    ));
}

#[test]
fn translation_relation_name_is_configurable() {
    let model = post_model();
    let catalog = post_catalog();
    let config = AssemblerConfig {
        translation_relation: "i18n".to_string(),
        ..AssemblerConfig::default()
    };

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver).with_config(config);
    assembler.apply_filter(&FilterElement::new("body", "text").value("hello"));

    let [Condition::Exists(clause)] = assembler.query().conditions() else {
        panic!("expected EXISTS");
    };
    assert_eq!(clause.relation, "i18n");
}

#[test]
fn single_record_relations_filter_inside_relation_exists() {
    let query = assembled(&[FilterElement::new("author_name", "text")
        .value("Jane")
        .relation("author")]);

    let [Condition::Exists(clause)] = query.conditions() else {
        panic!("expected a single EXISTS clause");
    };
    assert_eq!(clause.relation, "author");
    assert_eq!(clause.table, "users");
    assert_eq!(
        clause.conditions,
        vec![Condition::Contains {
            column: ColumnRef::new("users", "author_name"),
            value: "Jane".to_string(),
            mode: TextMode::Cs,
        }]
    );
    assert_eq!(
        query.to_string(),
        "SELECT posts.* FROM posts WHERE EXISTS (SELECT * FROM users WHERE users.id = posts.author_id AND users.author_name LIKE ?)"
    );
}

#[test]
fn has_one_relations_are_single_record() {
    let query = assembled(&[FilterElement::new("bio", "text")
        .value("x")
        .relation("profile")]);

    assert!(matches!(
        query.conditions(),
        [Condition::Exists(clause)] if clause.relation == "profile"
    ));
}

#[test]
fn many_record_relations_fall_back_to_the_primary_table() {
    let query = assembled(&[FilterElement::new("content", "text")
        .value("spam")
        .relation("comments")]);

    assert!(matches!(
        query.conditions(),
        [Condition::Contains { column, .. }] if *column == ColumnRef::new("posts", "content")
    ));
}

#[test]
fn unknown_relations_fall_back_to_the_primary_table() {
    let query = assembled(&[FilterElement::new("editor_name", "text")
        .value("x")
        .relation("editor")]);

    assert!(matches!(
        query.conditions(),
        [Condition::Contains { column, .. }] if column.table == "posts"
    ));
}

#[test]
fn relation_is_ignored_when_the_column_is_on_the_primary_table() {
    let query = assembled(&[FilterElement::new("author_id", "number")
        .value(4)
        .relation("author")]);

    assert_eq!(
        query.conditions(),
        &[Condition::Eq {
            column: ColumnRef::new("posts", "author_id"),
            value: Value::Int(4),
        }]
    );
}

#[test]
fn uncatalogued_filter_ids_cannot_inject_sql() {
    let query = assembled(&[FilterElement::new("views) OR (1", "number").value(1)]);

    assert_eq!(
        query.to_string(),
        "SELECT posts.* FROM posts WHERE posts.\"views) OR (1\" = ?"
    );
}

#[test]
fn non_translatable_entities_never_route_to_translations() {
    let model = EntityModel::new("Post", "posts");
    let catalog = post_catalog();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler.apply_filter(&FilterElement::new("body", "text").value("hello"));

    assert!(matches!(
        assembler.query().conditions(),
        [Condition::Contains { column, .. }] if column.table == "posts"
    ));
}

#[test]
fn unsupported_controls_and_malformed_values_add_nothing() {
    let query = assembled(&[
        FilterElement::new("title", "colorpicker").value("red"),
        FilterElement::new("published_at", "daterange").value("2020-01-01"),
        FilterElement::new("body", "colorpicker").value("red"),
    ]);

    assert!(!query.has_conditions(), "no EXISTS is added for an empty body");
}

#[test]
fn daterange_filters_bind_exact_bounds() {
    let query = assembled(&[
        FilterElement::new("published_at", ControlType::Daterange).value("2020-01-01 - 2020-01-31")
    ]);

    let compiled = query.to_sql();
    assert_eq!(
        compiled.sql,
        "SELECT posts.* FROM posts WHERE DATE(posts.published_at) BETWEEN ? AND ?"
    );
    assert_eq!(
        compiled.bindings,
        vec![
            Value::Date(Date::parse("2020-01-01").expect("date")),
            Value::Date(Date::parse("2020-01-31").expect("date")),
        ]
    );
}

#[test]
fn filter_events_describe_each_route() {
    let model = post_model();
    let catalog = post_catalog();
    let sink = Arc::new(RecordingSink::default());
    let elements = [
        FilterElement::new("title", "text").value("a"),
        FilterElement::new("body", "text").value("b"),
        FilterElement::new("author_name", "text").value("c").relation("author"),
        FilterElement::new("status", "select"),
        FilterElement::new("views", "number").value(1),
    ];

    let mut assembler =
        Assembler::new(&model, &catalog, &NoResolver).with_trace(sink.clone());
    assembler.filters(&elements, &requested(&["title", "body", "author_name", "status"]));

    assert_eq!(
        sink.events(),
        vec![
            AssemblyEvent::FilterApplied {
                id: "title".to_string(),
                route: FilterRoute::Direct,
            },
            AssemblyEvent::FilterApplied {
                id: "body".to_string(),
                route: FilterRoute::Translation,
            },
            AssemblyEvent::FilterApplied {
                id: "author_name".to_string(),
                route: FilterRoute::Relation,
            },
            AssemblyEvent::FilterSkipped {
                id: "status".to_string(),
                reason: SkipReason::NullValue,
            },
            AssemblyEvent::FilterSkipped {
                id: "views".to_string(),
                reason: SkipReason::NotRequested,
            },
        ]
    );
}

#[test]
fn request_maps_work_as_context() {
    let model = post_model();
    let catalog = post_catalog();
    let ctx = BTreeMap::from([("views".to_string(), "3".to_string())]);

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler.filters(&[FilterElement::new("views", "number").value("3")], &ctx);

    assert_eq!(assembler.query().conditions().len(), 1);
}

#[test]
fn missing_catalog_entries_are_treated_as_empty() {
    let model = post_model();
    let catalog = StaticCatalog::new();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler.apply_filter(&FilterElement::new("body", "text").value("hello"));

    assert!(matches!(
        assembler.query().conditions(),
        [Condition::Contains { column, .. }] if column.table == "posts"
    ));
}

// ----------------------------------------------------------------------
// Scopes
// ----------------------------------------------------------------------

struct Bare;

impl Component for Bare {}

#[test]
fn scopes_mutate_the_working_query() {
    let model = post_model();
    let catalog = post_catalog();
    let registry = Registry::new().register(
        "PostFilters",
        Methods::new().method("live", |q: Query| {
            q.where_condition(Condition::In {
                column: ColumnRef::new("posts", "status"),
                values: vec![Value::from("live")],
            })
        }),
    );

    let mut assembler = Assembler::new(&model, &catalog, &registry);
    assembler
        .scope("PostFilters@live")
        .expect("object method scope")
        .scope(ScopeRef::pair(PairTarget::Entity, "published"))
        .expect("local scope");

    assert_eq!(assembler.query().conditions().len(), 2);
}

#[test]
fn failed_scopes_keep_prior_predicates() {
    let model = post_model();
    let catalog = post_catalog();
    let registry = Registry::new().register("Bare", Bare);
    let sink = Arc::new(RecordingSink::default());

    let mut assembler = Assembler::new(&model, &catalog, &registry).with_trace(sink.clone());
    assembler.apply_filter(&FilterElement::new("title", "text").value("rust"));

    let err = assembler.scope("Bare").err().expect("missing capability");

    assert!(err.is_configuration());
    assert_eq!(err.origin, ErrorOrigin::Scope);
    assert!(matches!(
        err.configuration_detail(),
        Some(ConfigurationError::MissingCapability { .. })
    ));
    assert_eq!(assembler.query().conditions().len(), 1);
    assert!(matches!(
        sink.events().last(),
        Some(AssemblyEvent::Failed {
            origin: ErrorOrigin::Scope,
            ..
        })
    ));
}

#[test]
fn closure_scopes_apply_once() {
    let model = post_model();
    let catalog = post_catalog();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
    assembler
        .scope(ScopeRef::closure(|q| q.where_raw("posts.views > 0", vec![])))
        .expect("closure scope");

    assert_eq!(
        assembler.query().conditions(),
        &[Condition::Raw {
            sql: "posts.views > 0".to_string(),
            bindings: vec![],
        }]
    );
}

// ----------------------------------------------------------------------
// Sorting
// ----------------------------------------------------------------------

#[test]
fn sortable_columns_order_on_the_primary_table() {
    let model = post_model();
    let catalog = post_catalog();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver)
        .with_sortables(SortRegistry::new().columns(["title"]));
    assembler.sort("title", Direction::Desc).expect("sort");
    assembler.sort("secret", Direction::Asc).expect("no-op sort");

    assert_eq!(
        assembler.query().to_string(),
        "SELECT posts.* FROM posts ORDER BY posts.title DESC"
    );
}

#[test]
fn textual_directions_are_validated() {
    let model = post_model();
    let catalog = post_catalog();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver)
        .with_sortables(SortRegistry::new().columns(["title"]));
    assembler.sort_str("title", "asc").expect("valid direction");
    let err = assembler.sort_str("title", "sideways").err().expect("invalid direction");

    assert_eq!(err.origin, ErrorOrigin::Sort);
    assert_eq!(assembler.query().orders().len(), 1);
}

#[test]
fn sort_handlers_that_cannot_build_fail() {
    let model = post_model();
    let catalog = post_catalog();
    let registry = Registry::new().register("Bare", Bare);

    let mut assembler = Assembler::new(&model, &catalog, &registry).with_sortables(
        SortRegistry::new().entry("score", SortEntry::column().with_class("Bare")),
    );
    let err = assembler.sort("score", Direction::Asc).err().expect("missing build");

    assert_eq!(err.origin, ErrorOrigin::Sort);
    assert!(
        assembler.query().orders().is_empty(),
        "default ordering is not applied when the handler fails"
    );
}

#[test]
fn sort_callbacks_follow_default_ordering() {
    let model = post_model();
    let catalog = post_catalog();

    let mut assembler = Assembler::new(&model, &catalog, &NoResolver).with_sortables(
        SortRegistry::new().entry(
            "title",
            SortEntry::column().with_callback(|q, _key, _direction| {
                q.order_by(ColumnRef::new("posts", "id"), Direction::Asc)
            }),
        ),
    );
    assembler.sort("title", Direction::Desc).expect("sort");

    let targets: Vec<_> = assembler
        .query()
        .orders()
        .iter()
        .map(|order| order.target.clone())
        .collect();
    assert_eq!(
        targets,
        vec![
            OrderTarget::Column(ColumnRef::new("posts", "title")),
            OrderTarget::Column(ColumnRef::new("posts", "id")),
        ]
    );
}

// ----------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------

fn arb_control() -> impl Strategy<Value = ControlType> {
    prop_oneof![
        Just(ControlType::Text),
        Just(ControlType::Datalist),
        Just(ControlType::Select),
        Just(ControlType::Multiselect),
        Just(ControlType::Boolean),
        Just(ControlType::Number),
        Just(ControlType::Date),
        Just(ControlType::Daterange),
    ]
}

fn arb_column() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("title"), Just("body"), Just("status"), Just("author_name")]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z0-9 -]{0,12}".prop_map(Value::Text),
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
    ]
}

proptest! {
    #[test]
    fn null_valued_filters_never_add_predicates(
        column in arb_column(),
        control in arb_control(),
        with_relation in any::<bool>(),
    ) {
        let mut element = FilterElement::new(column, control).value(Value::Null);
        if with_relation {
            element = element.relation("author");
        }

        prop_assert!(!assembled(&[element]).has_conditions());
    }

    #[test]
    fn unrequested_filters_are_skipped_regardless_of_value(
        column in arb_column(),
        control in arb_control(),
        value in arb_value(),
    ) {
        let model = post_model();
        let catalog = post_catalog();
        let element = FilterElement::new(column, control).value(value);

        let mut assembler = Assembler::new(&model, &catalog, &NoResolver);
        assembler.filters([&element], &requested(&[]));

        prop_assert!(!assembler.query().has_conditions());
    }
}
