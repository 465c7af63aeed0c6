//! Array filtering
//!
//! Compiles the query once, keeps matching documents, then sorts and
//! projects them. The input slice is never modified.

use serde_json::Value;

use super::projection::Selection;
use super::sorter::{ResultSorter, SortSpec};
use crate::compiler::Compiler;
use crate::observability::{log_event, Event, Severity};
use crate::query::{Query, QueryError, QueryResult};

/// Options for [`filter`]
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Absent matches every document
    pub query: Option<Query>,
    pub sort_by: Option<SortSpec>,
    pub select: Option<Selection>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn sort_by(mut self, sort_by: SortSpec) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn select(mut self, select: Selection) -> Self {
        self.select = Some(select);
        self
    }

    /// Parse `{ "query": .., "sortBy": .., "select": .. }`; every key is optional
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let Some(map) = value.as_object() else {
            return Err(QueryError::InvalidQuery(crate::query::kind_name(value)));
        };

        let mut options = Self::new();
        if let Some(query) = map.get("query").filter(|q| !q.is_null()) {
            options.query = Some(Query::try_from(query.clone())?);
        }
        if let Some(sort_by) = map.get("sortBy").filter(|s| !s.is_null()) {
            options.sort_by = Some(SortSpec::from_json(sort_by)?);
        }
        if let Some(select) = map.get("select").filter(|s| !s.is_null()) {
            options.select = Some(Selection::from_json(select)?);
        }
        Ok(options)
    }
}

/// Filter, sort and project a slice of documents
pub fn filter(
    compiler: &Compiler,
    documents: &[Value],
    options: &FilterOptions,
) -> QueryResult<Vec<Value>> {
    let predicate = compiler.compile_optional(options.query.as_ref())?;

    let mut matched: Vec<&Value> = documents
        .iter()
        .filter(|doc| predicate.matches(doc))
        .collect();

    if let Some(sort_spec) = &options.sort_by {
        ResultSorter::sort(&mut matched, sort_spec);
    }

    let results: Vec<Value> = match &options.select {
        Some(selection) => matched.into_iter().map(|doc| selection.project(doc)).collect(),
        None => matched.into_iter().cloned().collect(),
    };

    log_event(
        Event::FilterComplete,
        Severity::Trace,
        &[
            ("returned", &results.len().to_string()),
            ("scanned", &documents.len().to_string()),
        ],
    );
    Ok(results)
}
