//! Property-based tests for the query compiler using proptest.

use proptest::prelude::*;
use querify::compiler::Compiler;
use serde_json::{json, Map, Value};

// ============================================================================
// Test helpers
// ============================================================================

const FIELDS: [&str; 3] = ["a", "b", "c"];

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-5i64..5).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ]
}

// Documents over a small field set so generated queries hit often
fn document_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::option::of(scalar_strategy()), FIELDS.len()).prop_map(|values| {
        let mut doc = Map::new();
        for (key, value) in FIELDS.iter().zip(values) {
            if let Some(value) = value {
                doc.insert(key.to_string(), value);
            }
        }
        Value::Object(doc)
    })
}

fn operator_strategy() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        any::<bool>().prop_map(|b| ("$exists", json!(b))),
        any::<bool>().prop_map(|b| ("$nil", json!(b))),
        (-5i64..5).prop_map(|n| ("$gt", json!(n))),
        (-5i64..5).prop_map(|n| ("$lte", json!(n))),
        prop::collection::vec(scalar_strategy(), 1..3).prop_map(|v| ("$any", json!(v))),
        "[a-c]{1,2}".prop_map(|s| ("$like", json!(s))),
        scalar_strategy().prop_map(|v| ("$not", v)),
        (1i64..4, 0i64..3).prop_map(|(d, r)| ("$mod", json!([d, r]))),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// The empty query matches any document.
    #[test]
    fn empty_query_matches_everything(doc in document_strategy()) {
        let predicate = Compiler::new().compile_json(&json!({})).unwrap();
        prop_assert!(predicate.matches(&doc));
    }

    /// `$notX` always disagrees with `$X`.
    #[test]
    fn negation_inverts((name, operand) in operator_strategy(), doc in document_strategy()) {
        let compiler = Compiler::new();
        let negated = format!("$not{}", &name[1..]);

        let positive = compiler.compile_json(&json!({"a": {name: operand.clone()}})).unwrap();
        let negative = compiler.compile_json(&json!({"a": {negated: operand}})).unwrap();

        prop_assert_eq!(positive.matches(&doc), !negative.matches(&doc));
    }

    /// Plain fields match exactly when every field is equal.
    #[test]
    fn subset_is_conjunction(a in scalar_strategy(), b in scalar_strategy(), doc in document_strategy()) {
        let predicate = Compiler::new()
            .compile_json(&json!({"a": a.clone(), "b": b.clone()}))
            .unwrap();
        let expected = doc.get("a") == Some(&a) && doc.get("b") == Some(&b);
        prop_assert_eq!(predicate.matches(&doc), expected);
    }

    /// `$or` matches exactly when some branch matches.
    #[test]
    fn or_is_disjunction(a in scalar_strategy(), b in scalar_strategy(), doc in document_strategy()) {
        let compiler = Compiler::new();
        let either = compiler.compile_json(&json!({"$or": [{"a": a.clone()}, {"b": b.clone()}]})).unwrap();
        let left = compiler.compile_json(&json!({"a": a})).unwrap();
        let right = compiler.compile_json(&json!({"b": b})).unwrap();

        prop_assert_eq!(either.matches(&doc), left.matches(&doc) || right.matches(&doc));
    }

    /// Adding a condition can only narrow the matches.
    #[test]
    fn extra_condition_never_widens(
        (name, operand) in operator_strategy(),
        b in scalar_strategy(),
        docs in prop::collection::vec(document_strategy(), 0..20),
    ) {
        let compiler = Compiler::new();
        let base = compiler.compile_json(&json!({"a": {name: operand.clone()}})).unwrap();
        let narrowed = compiler.compile_json(&json!({"a": {name: operand}, "b": b})).unwrap();

        let base_count = docs.iter().filter(|d| base.matches(d)).count();
        let narrowed_count = docs.iter().filter(|d| narrowed.matches(d)).count();
        prop_assert!(narrowed_count <= base_count);
    }
}
