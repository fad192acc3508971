//! Module: assemble
//! Responsibility: driving filters, scopes, and sorts into one query.
//! Does not own: predicate shapes, scope/sort resolution rules, execution.
//! Boundary: the public entry point; one assembler per request.

#[cfg(test)]
mod tests;

use crate::{
    config::AssemblerConfig,
    context::RequestContext,
    error::Error,
    filter::{FilterElement, SkipReason, synthesize},
    model::{ColumnCatalog, EntitySchema, RelationDescriptor},
    obs::{AssemblyEvent, AssemblyTraceSink, FilterRoute},
    query::{Direction, Query},
    resolve::{Resolver, ScopeRef, SortRegistry, plan_sort, resolve_scope},
};
use std::{mem, sync::Arc};

///
/// Assembler
///
/// Owns the working query for one assembly session and applies filters,
/// scopes, and sorts to it in call order.
///
/// The query is seeded as `SELECT <primary>.* FROM <primary>` so that
/// joins added by scopes never leak ambiguous columns into the result.
/// Not shareable across requests; build a fresh assembler each time.
///

pub struct Assembler<'a> {
    schema: &'a dyn EntitySchema,
    catalog: &'a dyn ColumnCatalog,
    resolver: &'a dyn Resolver,
    sortables: SortRegistry,
    config: AssemblerConfig,
    trace: Option<Arc<dyn AssemblyTraceSink>>,
    query: Query,
}

impl<'a> Assembler<'a> {
    #[must_use]
    pub fn new(
        schema: &'a dyn EntitySchema,
        catalog: &'a dyn ColumnCatalog,
        resolver: &'a dyn Resolver,
    ) -> Self {
        Self {
            schema,
            catalog,
            resolver,
            sortables: SortRegistry::default(),
            config: AssemblerConfig::default(),
            trace: None,
            query: Query::select_all_from(schema.primary_table()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_sortables(mut self, sortables: SortRegistry) -> Self {
        self.sortables = sortables;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn AssemblyTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    // ------------------------------------------------------------------
    // Public contract
    // ------------------------------------------------------------------

    /// Replace the working query with `f(query)`. No validation.
    pub fn apply_query_callback(&mut self, f: impl FnOnce(Query) -> Query) -> &mut Self {
        self.query = f(mem::take(&mut self.query));
        self
    }

    /// Apply filters in input order, skipping any whose id the request
    /// context does not carry.
    pub fn filters<'e, C>(
        &mut self,
        elements: impl IntoIterator<Item = &'e FilterElement>,
        ctx: &C,
    ) -> &mut Self
    where
        C: RequestContext + ?Sized,
    {
        for element in elements {
            if ctx.has(&element.id) {
                self.apply_filter(element);
            } else {
                self.emit(AssemblyEvent::FilterSkipped {
                    id: element.id.clone(),
                    reason: SkipReason::NotRequested,
                });
            }
        }
        self
    }

    /// Apply one filter element without consulting a request context.
    pub fn apply_filter(&mut self, element: &FilterElement) -> &mut Self {
        let Some(value) = element.present_value() else {
            return self.skip(element, SkipReason::NullValue);
        };

        // A custom executor that returns a query overrides everything else.
        if let Some(executor) = &element.input.executor
            && let Some(query) = executor.call(&self.query, value)
        {
            self.query = query;
            self.emit(AssemblyEvent::FilterApplied {
                id: element.id.clone(),
                route: FilterRoute::Custom,
            });
            return self;
        }

        let schema = self.schema;
        let placement = placement(schema, self.catalog, element);
        let table = match &placement {
            Placement::Direct => schema.primary_table(),
            Placement::Translation(descriptor) | Placement::Relation { descriptor, .. } => {
                descriptor.related_table.as_str()
            }
        };

        let condition = match synthesize(
            table,
            &element.id,
            &element.input.control,
            value,
            &self.config,
        ) {
            Ok(condition) => condition,
            Err(reason) => return self.skip(element, reason),
        };

        let query = mem::take(&mut self.query);
        let (query, route) = match placement {
            Placement::Direct => (query.where_condition(condition), FilterRoute::Direct),
            Placement::Translation(descriptor) => (
                query.where_has(
                    self.config.translation_relation.as_str(),
                    descriptor,
                    |sub| sub.where_condition(condition),
                ),
                FilterRoute::Translation,
            ),
            Placement::Relation { name, descriptor } => (
                query.where_has(name, descriptor, |sub| sub.where_condition(condition)),
                FilterRoute::Relation,
            ),
        };
        self.query = query;

        self.emit(AssemblyEvent::FilterApplied {
            id: element.id.clone(),
            route,
        });
        self
    }

    /// Resolve and apply a scope. On error the query keeps every
    /// predicate accumulated so far.
    pub fn scope(&mut self, scope: impl Into<ScopeRef>) -> Result<&mut Self, Error> {
        let scope = scope.into();
        let (target, kind) = resolve_scope(&scope, self.schema, self.resolver)
            .map_err(|err| self.fail(Error::scope_configuration(err)))?;

        self.query = target.apply(mem::take(&mut self.query));
        self.emit(AssemblyEvent::ScopeApplied { kind });

        Ok(self)
    }

    /// Apply the registered ordering for `key`. Unregistered keys are a
    /// no-op.
    pub fn sort(&mut self, key: &str, direction: Direction) -> Result<&mut Self, Error> {
        let plan = plan_sort(
            &self.sortables,
            self.schema.primary_table(),
            key,
            self.resolver,
        )
        .map_err(|err| self.fail(Error::sort_configuration(err)))?;

        let route = plan.route();
        self.query = plan.apply(mem::take(&mut self.query), key, direction);
        self.emit(AssemblyEvent::SortApplied {
            key: key.to_string(),
            direction,
            route,
        });

        Ok(self)
    }

    /// [`Assembler::sort`] with a textual `asc`/`desc` direction.
    pub fn sort_str(&mut self, key: &str, direction: &str) -> Result<&mut Self, Error> {
        let direction = direction.parse::<Direction>().map_err(Error::from)?;

        self.sort(key, direction)
    }

    /// Borrow the query assembled so far.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Hand the assembled query off, ending the session.
    #[must_use]
    pub fn into_query(self) -> Query {
        self.query
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn skip(&mut self, element: &FilterElement, reason: SkipReason) -> &mut Self {
        self.emit(AssemblyEvent::FilterSkipped {
            id: element.id.clone(),
            reason,
        });
        self
    }

    fn fail(&self, err: Error) -> Error {
        self.emit(AssemblyEvent::Failed {
            origin: err.origin,
            class: err.class,
            message: err.message.clone(),
        });
        err
    }

    fn emit(&self, event: AssemblyEvent) {
        if self.config.debug {
            println!("[debug] {event}");
        }
        if let Some(sink) = &self.trace {
            sink.on_event(&event);
        }
    }
}

///
/// Placement
/// Where a filter's predicate lands.
///

enum Placement<'s> {
    Direct,
    Translation(&'s RelationDescriptor),
    Relation {
        name: &'s str,
        descriptor: &'s RelationDescriptor,
    },
}

// Primary-table columns always win; translation columns come next, then
// single-record relations. Anything else falls back to the primary table.
fn placement<'s>(
    schema: &'s dyn EntitySchema,
    catalog: &dyn ColumnCatalog,
    element: &'s FilterElement,
) -> Placement<'s> {
    let column = element.id.as_str();
    if catalog.has_column(schema.primary_table(), column) {
        return Placement::Direct;
    }

    if schema.is_translatable()
        && let Some(descriptor) = schema.translation_relation()
        && catalog.has_column(&descriptor.related_table, column)
    {
        return Placement::Translation(descriptor);
    }

    if let Some(name) = element.input.relation.as_deref()
        && let Some(descriptor) = schema.relation(name)
        && descriptor.is_single()
    {
        return Placement::Relation { name, descriptor };
    }

    Placement::Direct
}
