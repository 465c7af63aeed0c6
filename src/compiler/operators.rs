//! Built-in operators
//!
//! | Operator | Matches when |
//! |---|---|
//! | `$exists` | field presence equals the boolean operand |
//! | `$nil` | "null or missing" equals the boolean operand |
//! | `$any` | value equals at least one operand |
//! | `$like` | value is a string containing every operand, ignoring case |
//! | `$regex` | value matches the regex (native or `"/source/flags"`) |
//! | `$gt` `$gte` `$lt` `$lte` | ordered comparison against the operand |
//! | `$mod` | `value % divisor == remainder` |
//! | `$not` | value differs from the operand (or fails a regex operand) |
//! | `$changed` | no previous document, or the value differs from it |
//! | `$from` | previous value equaled an operand and the current one does not |
//! | `$to` | current value equals an operand and the previous one did not |
//!
//! Outer operators: `$or` (any sub-query matches) and `$has` (every named
//! field is present).

use std::cmp::Ordering;

use serde_json::Value;

use super::compiler::Compiler;
use super::predicate::{map_reduce, BoolOp, Predicate};
use super::registry::{inner_ctor, outer_ctor, OperatorName, Registry};
use crate::query::{
    compare_values, field, strict_equals, Pattern, QueryError, QueryResult, Term,
};

/// Name of the operator the regex shorthand expands to
pub const REGEX: &str = "$regex";

/// Installs every built-in operator, deriving negations as it goes
pub(super) fn install(registry: &mut Registry) {
    registry.register_outer(OperatorName::builtin("$has"), outer_ctor(has));
    registry.register_outer(OperatorName::builtin("$or"), outer_ctor(or));

    registry.register_inner(OperatorName::builtin("$not"), inner_ctor(not));
    registry.register_inner(OperatorName::builtin("$exists"), inner_ctor(exists));
    registry.register_inner(OperatorName::builtin("$nil"), inner_ctor(nil));
    registry.register_inner(OperatorName::builtin("$any"), inner_ctor(any));
    registry.register_inner(OperatorName::builtin("$like"), inner_ctor(like));
    registry.register_inner(OperatorName::builtin(REGEX), inner_ctor(regex));
    registry.register_inner(
        OperatorName::builtin("$gt"),
        inner_ctor(|key, operand| ordered("$gt", key, operand, |o| o == Ordering::Greater)),
    );
    registry.register_inner(
        OperatorName::builtin("$gte"),
        inner_ctor(|key, operand| ordered("$gte", key, operand, |o| o != Ordering::Less)),
    );
    registry.register_inner(
        OperatorName::builtin("$lt"),
        inner_ctor(|key, operand| ordered("$lt", key, operand, |o| o == Ordering::Less)),
    );
    registry.register_inner(
        OperatorName::builtin("$lte"),
        inner_ctor(|key, operand| ordered("$lte", key, operand, |o| o != Ordering::Greater)),
    );
    registry.register_inner(OperatorName::builtin("$mod"), inner_ctor(modulo));

    registry.register_inner(OperatorName::builtin("$changed"), inner_ctor(changed));
    registry.register_inner(OperatorName::builtin("$from"), inner_ctor(from));
    registry.register_inner(OperatorName::builtin("$to"), inner_ctor(to));
}

// ==================
// Outer
// ==================

fn has(_: &Compiler, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::And, operand, |term| {
        let key = term
            .as_str()
            .ok_or_else(|| QueryError::invalid_operand("$has", "a field name or list of field names"))?
            .to_string();
        Ok(Predicate::from_document(move |doc| field(doc, &key).is_some()))
    })
}

fn or(compiler: &Compiler, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::Or, operand, |term| match term.as_map() {
        Some(fields) => compiler.compile_fields(fields),
        None => Err(QueryError::invalid_operand("$or", "a list of sub-queries")),
    })
}

// ==================
// Inner
// ==================

fn bool_operand(operator: &str, operand: &Term) -> QueryResult<bool> {
    operand
        .as_bool()
        .ok_or_else(|| QueryError::invalid_operand(operator, "a boolean"))
}

fn value_operand(operator: &str, operand: &Term) -> QueryResult<Value> {
    operand
        .as_value()
        .ok_or_else(|| QueryError::invalid_operand(operator, "a value"))
}

fn equals(key: &str, expected: Value) -> Predicate {
    let key = key.to_string();
    Predicate::from_document(move |doc| strict_equals(field(doc, &key), Some(&expected)))
}

fn not(key: &str, operand: &Term) -> QueryResult<Predicate> {
    if let Term::Regex(_) = operand {
        return Ok(regex(key, operand)?.negate());
    }
    Ok(equals(key, value_operand("$not", operand)?).negate())
}

fn exists(key: &str, operand: &Term) -> QueryResult<Predicate> {
    let expected = bool_operand("$exists", operand)?;
    let key = key.to_string();
    Ok(Predicate::from_document(move |doc| field(doc, &key).is_some() == expected))
}

fn nil(key: &str, operand: &Term) -> QueryResult<Predicate> {
    let expected = bool_operand("$nil", operand)?;
    let key = key.to_string();
    Ok(Predicate::from_document(move |doc| {
        field(doc, &key).map_or(true, Value::is_null) == expected
    }))
}

fn any(key: &str, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::Or, operand, |term| Ok(equals(key, value_operand("$any", term)?)))
}

fn like(key: &str, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::And, operand, |term| {
        let needle = term
            .as_str()
            .ok_or_else(|| QueryError::invalid_operand("$like", "a string or list of strings"))?
            .to_lowercase();
        let key = key.to_string();

        Ok(Predicate::from_document(move |doc| {
            field(doc, &key)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        }))
    })
}

fn regex(key: &str, operand: &Term) -> QueryResult<Predicate> {
    let pattern = match operand {
        Term::Regex(pattern) => pattern.clone(),
        Term::Scalar(Value::String(literal)) => Pattern::parse_normalized(literal)?,
        _ => {
            return Err(QueryError::invalid_operand(
                REGEX,
                "a regex or a \"/source/flags\" string",
            ))
        }
    };
    let key = key.to_string();

    Ok(Predicate::from_document(move |doc| {
        field(doc, &key).is_some_and(|value| pattern.matches_value(value))
    }))
}

fn ordered<F>(operator: &str, key: &str, operand: &Term, accept: F) -> QueryResult<Predicate>
where
    F: Fn(Ordering) -> bool + Send + Sync + 'static,
{
    let bound = operand
        .as_scalar()
        .cloned()
        .ok_or_else(|| QueryError::invalid_operand(operator, "a number, string or boolean"))?;
    let key = key.to_string();

    Ok(Predicate::from_document(move |doc| {
        field(doc, &key)
            .and_then(|value| compare_values(value, &bound))
            .is_some_and(&accept)
    }))
}

fn modulo(key: &str, operand: &Term) -> QueryResult<Predicate> {
    let invalid = || QueryError::invalid_operand("$mod", "a [divisor, remainder] list of numbers");

    let (divisor, remainder) = match operand.as_list() {
        Some([divisor, remainder]) => (
            divisor.as_f64().ok_or_else(invalid)?,
            remainder.as_f64().ok_or_else(invalid)?,
        ),
        _ => return Err(invalid()),
    };
    let key = key.to_string();

    Ok(Predicate::from_document(move |doc| {
        field(doc, &key)
            .and_then(Value::as_f64)
            .is_some_and(|value| value % divisor == remainder)
    }))
}

// ==================
// Transition
// ==================

fn changed(key: &str, operand: &Term) -> QueryResult<Predicate> {
    let expected = bool_operand("$changed", operand)?;
    let key = key.to_string();

    Ok(Predicate::new(move |doc, previous| {
        let changed = match previous {
            None => true,
            Some(previous) => !strict_equals(field(doc, &key), field(previous, &key)),
        };
        changed == expected
    }))
}

fn from(key: &str, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::Or, operand, |term| {
        let expected = value_operand("$from", term)?;
        let key = key.to_string();

        Ok(Predicate::new(move |doc, previous| {
            previous.is_some_and(|previous| {
                strict_equals(field(previous, &key), Some(&expected))
                    && !strict_equals(field(doc, &key), Some(&expected))
            })
        }))
    })
}

fn to(key: &str, operand: &Term) -> QueryResult<Predicate> {
    map_reduce(BoolOp::Or, operand, |term| {
        let expected = value_operand("$to", term)?;
        let key = key.to_string();

        Ok(Predicate::new(move |doc, previous| {
            strict_equals(field(doc, &key), Some(&expected))
                && previous
                    .map_or(true, |previous| !strict_equals(field(previous, &key), Some(&expected)))
        }))
    })
}
