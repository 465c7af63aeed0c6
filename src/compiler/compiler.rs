//! Query compiler
//!
//! Walks a query once and returns a single [`Predicate`]:
//!
//! 1. a regex value is shorthand for `{ $regex: value }`
//! 2. a registered outer operator key takes the whole value
//! 3. a mapping value is a set of inner operators on that field
//! 4. any other value under a plain key is an equality assertion, collected
//!    into one "subset" predicate that checks every field in one pass
//!
//! Everything is AND-ed together. The subset predicate is always first in
//! the list, so the list is never empty.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::config::CompilerConfig;
use super::operators::REGEX;
use super::predicate::{reduce, BoolOp, Predicate};
use super::registry::{InnerCtor, OperatorName, OuterCtor, Registry};
use crate::observability::{log_event, Event, Severity};
use crate::query::{field, strict_equals, Query, QueryError, QueryResult, Term};

/// Compiles queries against an operator registry
#[derive(Debug)]
pub struct Compiler {
    registry: Registry,
    config: CompilerConfig,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Compiler with the built-in operators and default config
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    /// Compiler with the built-in operators
    pub fn with_config(config: CompilerConfig) -> Self {
        Self::with_registry(Registry::with_builtins(), config)
    }

    /// Compiler over a caller-supplied registry
    pub fn with_registry(registry: Registry, config: CompilerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Register an inner operator. Its `$not` twin is derived automatically.
    ///
    /// ```
    /// use querify::compiler::{Compiler, Predicate};
    /// use querify::query::Query;
    /// use serde_json::json;
    ///
    /// let mut compiler = Compiler::new();
    /// compiler
    ///     .define("$meh", |key, _| {
    ///         let key = key.to_string();
    ///         Ok(Predicate::from_document(move |doc| doc.get(&key) == Some(&json!("meh"))))
    ///     })
    ///     .unwrap();
    ///
    /// let query = Query::try_from(json!({"a": {"$notmeh": 1}})).unwrap();
    /// let predicate = compiler.compile(&query).unwrap();
    /// assert!(!predicate.matches(&json!({"a": "meh"})));
    /// assert!(predicate.matches(&json!({"a": 1})));
    /// ```
    pub fn define<F>(&mut self, name: &str, ctor: F) -> QueryResult<()>
    where
        F: Fn(&str, &Term) -> QueryResult<Predicate> + Send + Sync + 'static,
    {
        self.registry.define_inner(name, Arc::new(ctor))
    }

    /// Register several inner operators, one registration per entry
    pub fn define_all<I, N>(&mut self, definitions: I) -> QueryResult<()>
    where
        I: IntoIterator<Item = (N, InnerCtor)>,
        N: AsRef<str>,
    {
        for (name, ctor) in definitions {
            self.registry.define_inner(name.as_ref(), ctor)?;
        }
        Ok(())
    }

    /// Register an outer operator. Its `$not` twin is derived automatically.
    pub fn define_outer<F>(&mut self, name: &str, ctor: F) -> QueryResult<()>
    where
        F: Fn(&Compiler, &Term) -> QueryResult<Predicate> + Send + Sync + 'static,
    {
        let ctor: OuterCtor = Arc::new(ctor);
        self.registry.define_outer(name, ctor)
    }

    /// Compile a query into a predicate
    pub fn compile(&self, query: &Query) -> QueryResult<Predicate> {
        let predicate = self.compile_fields(query.fields())?;

        if self.config.log_compiles {
            log_event(
                Event::QueryCompiled,
                Severity::Trace,
                &[("fields", &query.len().to_string())],
            );
        }
        Ok(predicate)
    }

    /// Compile a query that may be absent. Absent matches everything.
    pub fn compile_optional(&self, query: Option<&Query>) -> QueryResult<Predicate> {
        match query {
            Some(query) => self.compile(query),
            None => Ok(Predicate::always()),
        }
    }

    /// Compile a JSON query. `null` matches everything.
    pub fn compile_json(&self, query: &Value) -> QueryResult<Predicate> {
        if query.is_null() {
            return Ok(Predicate::always());
        }
        self.compile(&Query::try_from(query.clone())?)
    }

    /// Compile an ordered field list. Used recursively by `$or`.
    pub fn compile_fields(&self, fields: &[(String, Term)]) -> QueryResult<Predicate> {
        let mut subset = Map::new();
        let mut predicates = Vec::with_capacity(fields.len() + 1);

        for (key, term) in fields {
            if let Term::Regex(_) = term {
                if let Some(ctor) = self.registry.inner(REGEX) {
                    predicates.push(ctor(key, term)?);
                    continue;
                }
            }

            if let Some(ctor) = self.registry.outer(key) {
                predicates.push(ctor(self, term)?);
                continue;
            }

            match term {
                Term::Map(operators) => {
                    for (name, operand) in operators {
                        match self.registry.inner(name) {
                            Some(ctor) => predicates.push(ctor(key, operand)?),
                            None => self.skip_unknown(name)?,
                        }
                    }
                }
                Term::Regex(_) => self.skip_unknown(REGEX)?,
                _ if Self::is_operator_key(key) => self.skip_unknown(key)?,
                _ => {
                    subset.insert(key.clone(), term.to_json());
                }
            }
        }

        predicates.insert(0, Self::subset(subset));
        Ok(reduce(BoolOp::And, predicates))
    }

    fn is_operator_key(key: &str) -> bool {
        key.starts_with(OperatorName::SIGIL)
    }

    fn skip_unknown(&self, name: &str) -> QueryResult<()> {
        if self.config.strict {
            return Err(QueryError::UnknownOperator(name.to_string()));
        }
        log_event(Event::OperatorSkipped, Severity::Trace, &[("operator", name)]);
        Ok(())
    }

    /// One predicate for all plain equality assertions
    fn subset(subset: Map<String, Value>) -> Predicate {
        if subset.is_empty() {
            return Predicate::always();
        }
        Predicate::from_document(move |doc| {
            subset
                .iter()
                .all(|(key, expected)| strict_equals(field(doc, key), Some(expected)))
        })
    }
}
