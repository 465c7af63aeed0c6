//! JSON-safe query form
//!
//! JSON has no regex literal, so field-level regexes are rewritten into the
//! `{ "$regex": "/source/flags" }` operator form before a query is sent or
//! stored. The `$regex` operator parses that string back.

use super::errors::QueryResult;
use super::term::{Query, Term};

/// Rewrites regex-valued fields in place and returns the query.
///
/// Sub-query lists under `$`-keys (such as `$or`) are normalized too.
/// Regexes used as operator operands are left alone.
pub fn normalize(query: &mut Query) -> &mut Query {
    normalize_fields(query.fields_mut());
    query
}

/// Normalizes a copy of the query and encodes it as a JSON string
pub fn stringify(query: &Query) -> QueryResult<String> {
    let mut normalized = query.clone();
    normalize(&mut normalized);
    Ok(serde_json::to_string(&normalized)?)
}

fn normalize_fields(fields: &mut [(String, Term)]) {
    for (key, term) in fields.iter_mut() {
        if let Term::Regex(pattern) = term {
            let literal = pattern.to_string();
            *term = Term::op("$regex", literal);
            continue;
        }

        if !key.starts_with('$') {
            continue;
        }

        match term {
            Term::List(items) => {
                for item in items.iter_mut() {
                    if let Term::Map(sub) = item {
                        normalize_fields(sub);
                    }
                }
            }
            Term::Map(sub) => normalize_fields(sub),
            _ => {}
        }
    }
}
