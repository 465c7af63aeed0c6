//! # Operator Registry
//!
//! Two namespaces of operator constructors:
//!
//! - **outer** operators take the whole value of a top-level `$key`
//!   (`$or`, `$has`)
//! - **inner** operators take a `(field, operand)` pair from
//!   `{ field: { $op: operand } }`
//!
//! Every registration also installs the negated twin (`$gt` gets
//! `$notgt`), so user-defined operators are negatable for free.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::compiler::Compiler;
use super::operators;
use super::predicate::Predicate;
use crate::observability::{log_event, Event, Severity};
use crate::query::{QueryError, QueryResult, Term};

/// Constructor for an inner operator: `(field, operand) -> predicate`
pub type InnerCtor = Arc<dyn Fn(&str, &Term) -> QueryResult<Predicate> + Send + Sync>;

/// Constructor for an outer operator: `(compiler, operand) -> predicate`
pub type OuterCtor = Arc<dyn Fn(&Compiler, &Term) -> QueryResult<Predicate> + Send + Sync>;

/// Wrap a closure as an inner operator constructor
pub fn inner_ctor<F>(ctor: F) -> InnerCtor
where
    F: Fn(&str, &Term) -> QueryResult<Predicate> + Send + Sync + 'static,
{
    Arc::new(ctor)
}

/// Wrap a closure as an outer operator constructor
pub fn outer_ctor<F>(ctor: F) -> OuterCtor
where
    F: Fn(&Compiler, &Term) -> QueryResult<Predicate> + Send + Sync + 'static,
{
    Arc::new(ctor)
}

/// A validated operator identifier such as `$gt`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorName {
    name: String,
}

impl OperatorName {
    /// Marks operator keys in queries
    pub const SIGIL: char = '$';

    const NEGATION: &'static str = "not";

    /// Parse a full name. It must start with `$` and have a non-empty body.
    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.strip_prefix(Self::SIGIL) {
            Some(body) if !body.is_empty() => Ok(Self {
                name: name.to_string(),
            }),
            _ => Err(QueryError::InvalidOperatorName(name.to_string())),
        }
    }

    /// Built-in names are known to be well formed
    pub(super) fn builtin(name: &'static str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Name without the sigil
    pub fn body(&self) -> &str {
        &self.name[Self::SIGIL.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The negated twin: `$gt` becomes `$notgt`
    pub fn negated(&self) -> Self {
        Self {
            name: format!("{}{}{}", Self::SIGIL, Self::NEGATION, self.body()),
        }
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Borrow<str> for OperatorName {
    fn borrow(&self) -> &str {
        &self.name
    }
}

/// How an entry got into the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Defined,
    Derived,
}

struct Entry<C> {
    ctor: C,
    origin: Origin,
}

/// Operator tables consulted by the compiler
#[derive(Default)]
pub struct Registry {
    inner: HashMap<OperatorName, Entry<InnerCtor>>,
    outer: HashMap<OperatorName, Entry<OuterCtor>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in operators and their negations
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        operators::install(&mut registry);
        registry
    }

    /// Register an inner operator and derive its negation
    pub fn define_inner(&mut self, name: &str, ctor: InnerCtor) -> QueryResult<()> {
        self.register_inner(OperatorName::parse(name)?, ctor);
        Ok(())
    }

    /// Register an outer operator and derive its negation
    pub fn define_outer(&mut self, name: &str, ctor: OuterCtor) -> QueryResult<()> {
        self.register_outer(OperatorName::parse(name)?, ctor);
        Ok(())
    }

    pub(super) fn register_inner(&mut self, name: OperatorName, ctor: InnerCtor) {
        let negated: InnerCtor = {
            let positive = ctor.clone();
            Arc::new(move |field: &str, operand: &Term| -> QueryResult<Predicate> {
                Ok(positive(field, operand)?.negate())
            })
        };

        Self::announce(&name, self.inner.get(&name).map(|e| e.origin));
        self.inner.insert(name.negated(), Entry {
            ctor: negated,
            origin: Origin::Derived,
        });
        self.inner.insert(name, Entry {
            ctor,
            origin: Origin::Defined,
        });
    }

    pub(super) fn register_outer(&mut self, name: OperatorName, ctor: OuterCtor) {
        let negated: OuterCtor = {
            let positive = ctor.clone();
            Arc::new(move |compiler: &Compiler, operand: &Term| -> QueryResult<Predicate> {
                Ok(positive(compiler, operand)?.negate())
            })
        };

        Self::announce(&name, self.outer.get(&name).map(|e| e.origin));
        self.outer.insert(name.negated(), Entry {
            ctor: negated,
            origin: Origin::Derived,
        });
        self.outer.insert(name, Entry {
            ctor,
            origin: Origin::Defined,
        });
    }

    fn announce(name: &OperatorName, previous: Option<Origin>) {
        match previous {
            Some(Origin::Defined) => log_event(
                Event::OperatorOverridden,
                Severity::Info,
                &[("operator", name.as_str())],
            ),
            _ => log_event(
                Event::OperatorDefined,
                Severity::Trace,
                &[("operator", name.as_str())],
            ),
        }
    }

    pub fn inner(&self, name: &str) -> Option<&InnerCtor> {
        self.inner.get(name).map(|entry| &entry.ctor)
    }

    pub fn outer(&self, name: &str) -> Option<&OuterCtor> {
        self.outer.get(name).map(|entry| &entry.ctor)
    }

    pub fn has_inner(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn has_outer(&self, name: &str) -> bool {
        self.outer.contains_key(name)
    }

    /// Inner operator names, sorted
    pub fn inner_names(&self) -> Vec<&str> {
        Self::sorted_names(&self.inner)
    }

    /// Outer operator names, sorted
    pub fn outer_names(&self) -> Vec<&str> {
        Self::sorted_names(&self.outer)
    }

    /// Whether the entry was derived by negation rather than defined
    pub fn is_derived(&self, name: &str) -> bool {
        self.inner
            .get(name)
            .map(|e| e.origin)
            .or_else(|| self.outer.get(name).map(|e| e.origin))
            == Some(Origin::Derived)
    }

    fn sorted_names<C>(table: &HashMap<OperatorName, Entry<C>>) -> Vec<&str> {
        let mut names: Vec<&str> = table.keys().map(OperatorName::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("inner", &self.inner_names())
            .field("outer", &self.outer_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn equals_meh() -> InnerCtor {
        Arc::new(|field: &str, _: &Term| -> QueryResult<Predicate> {
            let key = field.to_string();
            Ok(Predicate::from_document(move |doc| doc.get(&key) == Some(&json!("meh"))))
        })
    }

    #[test]
    fn test_operator_name_rules() {
        assert_eq!(OperatorName::parse("$gt").unwrap().body(), "gt");
        assert!(OperatorName::parse("gt").is_err());
        assert!(OperatorName::parse("$").is_err());
        assert!(OperatorName::parse("").is_err());
    }

    #[test]
    fn test_negated_name() {
        let name = OperatorName::parse("$gt").unwrap();
        assert_eq!(name.negated().as_str(), "$notgt");
        assert_eq!(OperatorName::parse("$or").unwrap().negated().to_string(), "$notor");
    }

    #[test]
    fn test_builtins_have_negations() {
        let registry = Registry::with_builtins();
        for name in ["$exists", "$nil", "$any", "$like", "$regex", "$gt", "$gte", "$lt",
                     "$lte", "$mod", "$not", "$changed", "$from", "$to"] {
            assert!(registry.has_inner(name), "{name}");
            let negated = OperatorName::parse(name).unwrap().negated();
            assert!(registry.has_inner(negated.as_str()), "{negated}");
            assert!(registry.is_derived(negated.as_str()));
        }
        for name in ["$or", "$has", "$notor", "$nothas"] {
            assert!(registry.has_outer(name), "{name}");
        }
    }

    #[test]
    fn test_define_derives_negation() {
        let mut registry = Registry::new();
        registry.define_inner("$meh", equals_meh()).unwrap();

        let positive = registry.inner("$meh").unwrap()("a", &Term::from(1)).unwrap();
        let negative = registry.inner("$notmeh").unwrap()("a", &Term::from(1)).unwrap();

        for doc in [json!({"a": "meh"}), json!({"a": 1}), json!({})] {
            assert_eq!(positive.matches(&doc), !negative.matches(&doc));
        }
        assert!(!registry.is_derived("$meh"));
    }

    #[test]
    fn test_define_rejects_bad_name() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.define_inner("meh", equals_meh()),
            Err(QueryError::InvalidOperatorName(_))
        ));
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = Registry::new();
        registry.define_inner("$meh", equals_meh()).unwrap();
        registry
            .define_inner("$meh", inner_ctor(|_, _| Ok(Predicate::always())))
            .unwrap();

        let negative = registry.inner("$notmeh").unwrap()("a", &Term::from(1)).unwrap();
        assert!(!negative.matches(&json!({"a": "anything"})));
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = Registry::with_builtins();
        let names = registry.outer_names();
        assert_eq!(names, vec!["$has", "$nothas", "$notor", "$or"]);
    }
}
