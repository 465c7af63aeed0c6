//! Transition Mode Tests
//!
//! Predicates evaluated against a document and its previous version.

use querify::compiler::{Compiler, Predicate};
use serde_json::{json, Value};

fn compile(query: Value) -> Predicate {
    Compiler::new().compile_json(&query).unwrap()
}

#[test]
fn test_changed_without_previous() {
    let predicate = compile(json!({"a": {"$changed": true}}));
    assert!(predicate.matches_transition(&json!({"a": 1}), None));
    assert!(predicate.matches(&json!({"a": 1})));
}

#[test]
fn test_changed_compares_previous() {
    let changed = compile(json!({"a": {"$changed": true}}));
    let unchanged = compile(json!({"a": {"$changed": false}}));

    let (current, same, other) = (json!({"a": 1}), json!({"a": 1}), json!({"a": 2}));
    assert!(!changed.matches_transition(&current, Some(&same)));
    assert!(changed.matches_transition(&current, Some(&other)));
    assert!(unchanged.matches_transition(&current, Some(&same)));

    // Appearing or disappearing counts as a change
    assert!(changed.matches_transition(&current, Some(&json!({}))));
    assert!(changed.matches_transition(&json!({}), Some(&current)));
}

#[test]
fn test_to() {
    let predicate = compile(json!({"a": {"$to": [1]}}));
    assert!(predicate.matches_transition(&json!({"a": 1}), Some(&json!({"a": 0}))));
    assert!(!predicate.matches_transition(&json!({"a": 1}), Some(&json!({"a": 1}))));
    assert!(!predicate.matches_transition(&json!({"a": 0}), Some(&json!({"a": 1}))));
    assert!(predicate.matches_transition(&json!({"a": 1}), None));
}

#[test]
fn test_from() {
    let predicate = compile(json!({"status": {"$from": ["open", "pending"]}}));
    let closed = json!({"status": "closed"});

    assert!(predicate.matches_transition(&closed, Some(&json!({"status": "open"}))));
    assert!(predicate.matches_transition(&closed, Some(&json!({"status": "pending"}))));
    assert!(!predicate.matches_transition(&closed, Some(&json!({"status": "closed"}))));
    assert!(!predicate.matches_transition(&closed, None));
}

#[test]
fn test_negated_transition_operators() {
    let to = compile(json!({"a": {"$to": [1]}}));
    let not_to = compile(json!({"a": {"$notto": [1]}}));
    let changed = compile(json!({"a": {"$changed": true}}));
    let not_changed = compile(json!({"a": {"$notchanged": true}}));

    let pairs = [
        (json!({"a": 1}), Some(json!({"a": 0}))),
        (json!({"a": 1}), Some(json!({"a": 1}))),
        (json!({"a": 0}), None),
        (json!({}), Some(json!({"a": 1}))),
    ];
    for (current, previous) in &pairs {
        let previous = previous.as_ref();
        assert_eq!(
            to.matches_transition(current, previous),
            !not_to.matches_transition(current, previous)
        );
        assert_eq!(
            changed.matches_transition(current, previous),
            !not_changed.matches_transition(current, previous)
        );
    }
}

#[test]
fn test_transition_inside_or() {
    let predicate = compile(json!({
        "$or": [
            {"a": {"$to": [1]}},
            {"b": {"$changed": true}}
        ]
    }));

    let previous = json!({"a": 1, "b": 1});
    assert!(!predicate.matches_transition(&json!({"a": 1, "b": 1}), Some(&previous)));
    assert!(predicate.matches_transition(&json!({"a": 1, "b": 2}), Some(&previous)));
}

#[test]
fn test_plain_operators_ignore_previous() {
    let predicate = compile(json!({"a": 1, "b": {"$gt": 0}}));
    let previous = json!({"a": 0, "b": 0});

    assert!(predicate.matches_transition(&json!({"a": 1, "b": 1}), Some(&previous)));
    assert!(!predicate.matches_transition(&json!({"a": 0, "b": 1}), Some(&previous)));
}
