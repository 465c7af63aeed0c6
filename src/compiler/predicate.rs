//! Compiled predicates and the boolean reducer
//!
//! A [`Predicate`] is an immutable shared closure over a document and,
//! in transition mode, its previous version. Predicates compose by
//! capturing other predicates; evaluation has no side effects.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::query::{QueryResult, Term};

type MatchFn = dyn Fn(&Value, Option<&Value>) -> bool + Send + Sync;

/// A compiled document test
#[derive(Clone)]
pub struct Predicate {
    test: Arc<MatchFn>,
}

impl Predicate {
    /// Wrap a closure taking the document and optional previous document
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    /// Wrap a closure that only looks at the current document
    pub fn from_document<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |doc, _| test(doc))
    }

    /// The universal matcher
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    /// Evaluate against a document with no previous version
    pub fn matches(&self, document: &Value) -> bool {
        (self.test)(document, None)
    }

    /// Evaluate in transition mode
    pub fn matches_transition(&self, document: &Value, previous: Option<&Value>) -> bool {
        (self.test)(document, previous)
    }

    /// Invert the result. Arguments are forwarded unchanged.
    pub fn negate(self) -> Self {
        let inner = self.test;
        Self::new(move |doc, prev| !inner(doc, prev))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

/// Boolean relation used to fold predicate lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Folds a list of predicates into one.
///
/// - One predicate is returned unchanged.
/// - Two predicates get a dedicated short-circuiting pair.
/// - Otherwise the list is walked in order, stopping at the first
///   deciding result. An empty list yields `true` for AND, `false` for OR.
pub fn reduce(op: BoolOp, mut predicates: Vec<Predicate>) -> Predicate {
    if predicates.len() == 1 {
        if let Some(only) = predicates.pop() {
            return only;
        }
    }

    if predicates.len() == 2 {
        let b = predicates.pop().map(|p| p.test);
        let a = predicates.pop().map(|p| p.test);
        if let (Some(a), Some(b)) = (a, b) {
            return match op {
                BoolOp::And => Predicate::new(move |doc, prev| a(doc, prev) && b(doc, prev)),
                BoolOp::Or => Predicate::new(move |doc, prev| a(doc, prev) || b(doc, prev)),
            };
        }
    }

    let list: Vec<Arc<MatchFn>> = predicates.into_iter().map(|p| p.test).collect();
    match op {
        BoolOp::And => Predicate::new(move |doc, prev| list.iter().all(|p| p(doc, prev))),
        BoolOp::Or => Predicate::new(move |doc, prev| list.iter().any(|p| p(doc, prev))),
    }
}

/// Applies a constructor to an operand that may be a single term or a list.
///
/// A single term goes straight to `ctor`; a list maps every element
/// through `ctor` and folds the results with `op`.
pub fn map_reduce<F>(op: BoolOp, operand: &Term, mut ctor: F) -> QueryResult<Predicate>
where
    F: FnMut(&Term) -> QueryResult<Predicate>,
{
    match operand {
        Term::List(items) => {
            let predicates = items.iter().map(&mut ctor).collect::<QueryResult<Vec<_>>>()?;
            Ok(reduce(op, predicates))
        }
        single => ctor(single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn field_is(key: &'static str, expected: i64) -> Predicate {
        Predicate::from_document(move |doc| doc.get(key) == Some(&json!(expected)))
    }

    fn counting(result: bool, calls: Arc<AtomicUsize>) -> Predicate {
        Predicate::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    #[test]
    fn test_single_is_identity() {
        let only = field_is("a", 1);
        let reduced = reduce(BoolOp::And, vec![only.clone()]);
        assert!(Arc::ptr_eq(&only.test, &reduced.test));
    }

    #[test]
    fn test_pair_and_or() {
        let and = reduce(BoolOp::And, vec![field_is("a", 1), field_is("b", 1)]);
        assert!(and.matches(&json!({"a": 1, "b": 1})));
        assert!(!and.matches(&json!({"a": 1})));

        let or = reduce(BoolOp::Or, vec![field_is("a", 1), field_is("b", 1)]);
        assert!(or.matches(&json!({"b": 1})));
        assert!(!or.matches(&json!({"a": 2})));
    }

    #[test]
    fn test_list_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let and = reduce(
            BoolOp::And,
            vec![
                counting(true, calls.clone()),
                counting(false, calls.clone()),
                counting(true, calls.clone()),
            ],
        );
        assert!(!and.matches(&json!({})));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        calls.store(0, Ordering::SeqCst);
        let or = reduce(
            BoolOp::Or,
            vec![
                counting(false, calls.clone()),
                counting(true, calls.clone()),
                counting(false, calls.clone()),
            ],
        );
        assert!(or.matches(&json!({})));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_list() {
        assert!(reduce(BoolOp::And, vec![]).matches(&json!({})));
        assert!(!reduce(BoolOp::Or, vec![]).matches(&json!({})));
    }

    #[test]
    fn test_previous_is_forwarded() {
        let saw_previous = Predicate::new(|_, prev| prev.is_some());
        let reduced = reduce(
            BoolOp::And,
            vec![saw_previous.clone(), saw_previous.clone(), saw_previous],
        );
        assert!(reduced.matches_transition(&json!({}), Some(&json!({}))));
        assert!(!reduced.matches(&json!({})));
    }

    #[test]
    fn test_negate() {
        let negated = field_is("a", 1).negate();
        assert!(!negated.matches(&json!({"a": 1})));
        assert!(negated.matches(&json!({})));
    }

    #[test]
    fn test_map_reduce_single_and_list() {
        let ctor = |term: &Term| -> QueryResult<Predicate> {
            let expected = term.as_value().unwrap_or(Value::Null);
            Ok(Predicate::from_document(move |doc| doc.get("a") == Some(&expected)))
        };

        let single = map_reduce(BoolOp::Or, &Term::from(1), ctor).unwrap();
        assert!(single.matches(&json!({"a": 1})));

        let any = map_reduce(BoolOp::Or, &Term::from(vec![1, 2]), ctor).unwrap();
        assert!(any.matches(&json!({"a": 2})));
        assert!(!any.matches(&json!({"a": 3})));
    }
}
