//! Module: filter
//! Responsibility: filter element vocabulary and predicate synthesis.
//! Does not own: routing to translation or relation sub-queries.
//! Boundary: pure mapping from (table, column, control, value) to a condition.

mod synth;


pub use synth::{SkipReason, synthesize};

use crate::{query::Query, value::Value};
use std::{convert::Infallible, fmt, str::FromStr, sync::Arc};

///
/// ControlType
///
/// Semantic category of a filter input; decides the predicate shape.
/// Names outside the known set parse to `Other` and synthesize nothing.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ControlType {
    Boolean,
    Datalist,
    Date,
    Daterange,
    Multiselect,
    Number,
    Other(String),
    Select,
    Text,
}

impl ControlType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::Datalist => "datalist",
            Self::Date => "date",
            Self::Daterange => "daterange",
            Self::Multiselect => "multiselect",
            Self::Number => "number",
            Self::Other(name) => name,
            Self::Select => "select",
            Self::Text => "text",
        }
    }
}

impl FromStr for ControlType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "boolean" => Self::Boolean,
            "datalist" => Self::Datalist,
            "date" => Self::Date,
            "daterange" => Self::Daterange,
            "multiselect" => Self::Multiselect,
            "number" => Self::Number,
            "select" => Self::Select,
            "text" => Self::Text,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for ControlType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(control) => control,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// FilterExecutor
///
/// Custom query executor attached to a filter input. Returning `Some`
/// replaces the working query outright; `None` falls through to the
/// type-driven predicate.
///

#[derive(Clone)]
pub struct FilterExecutor(Arc<dyn Fn(&Query, &Value) -> Option<Query> + Send + Sync>);

impl FilterExecutor {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Query, &Value) -> Option<Query> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, query: &Query, value: &Value) -> Option<Query> {
        (self.0)(query, value)
    }
}

impl fmt::Debug for FilterExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilterExecutor(..)")
    }
}

///
/// FilterInput
/// Input descriptor produced by the form layer.
///

#[derive(Clone, Debug)]
pub struct FilterInput {
    pub control: ControlType,
    pub value: Option<Value>,
    pub executor: Option<FilterExecutor>,
    pub relation: Option<String>,
}

///
/// FilterElement
///
/// One declared filter. `id` doubles as the column name and as the key
/// looked up in the request context.
///

#[derive(Clone, Debug)]
pub struct FilterElement {
    pub id: String,
    pub input: FilterInput,
}

impl FilterElement {
    #[must_use]
    pub fn new(id: impl Into<String>, control: impl Into<ControlType>) -> Self {
        Self {
            id: id.into(),
            input: FilterInput {
                control: control.into(),
                value: None,
                executor: None,
                relation: None,
            },
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.input.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: impl Into<String>) -> Self {
        self.input.relation = Some(relation.into());
        self
    }

    #[must_use]
    pub fn executor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Query, &Value) -> Option<Query> + Send + Sync + 'static,
    {
        self.input.executor = Some(FilterExecutor::new(f));
        self
    }

    /// The resolved value, treating an explicit null as absent.
    #[must_use]
    pub fn present_value(&self) -> Option<&Value> {
        self.input.value.as_ref().filter(|value| !value.is_null())
    }
}
