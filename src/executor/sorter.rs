//! Result sorting for array filtering
//!
//! Multi-key, stable, deterministic.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::{field, QueryError, QueryResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(d) if d > 0.0 => Some(SortDirection::Asc),
                Some(d) if d < 0.0 => Some(SortDirection::Desc),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "asc" => Some(SortDirection::Asc),
                "desc" => Some(SortDirection::Desc),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Ordered list of sort keys. Ties on one key fall through to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    keys: Vec<(String, SortDirection)>,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self::default().then_asc(field)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::default().then_desc(field)
    }

    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.keys.push((field.into(), SortDirection::Asc));
        self
    }

    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.keys.push((field.into(), SortDirection::Desc));
        self
    }

    pub fn keys(&self) -> &[(String, SortDirection)] {
        &self.keys
    }

    /// Parse a sort specification.
    ///
    /// - `"field"` sorts ascending by one field
    /// - `{ "a": 1, "b": -1 }` sorts by `a` ascending, then `b` descending;
    ///   `"asc"` / `"desc"` are accepted as directions too
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        match value {
            Value::String(field) => Ok(Self::asc(field.as_str())),
            Value::Object(map) => {
                let mut spec = Self::default();
                for (field, direction) in map {
                    let direction = SortDirection::from_json(direction).ok_or_else(|| {
                        QueryError::InvalidSort(format!("bad direction for {field:?}"))
                    })?;
                    spec.keys.push((field.clone(), direction));
                }
                Ok(spec)
            }
            _ => Err(QueryError::InvalidSort(
                "expected a field name or an object".to_string(),
            )),
        }
    }
}

/// Sorts documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents according to sort specification.
    ///
    /// Sort is stable and deterministic.
    pub fn sort(documents: &mut [&Value], sort_spec: &SortSpec) {
        documents.sort_by(|a, b| Self::compare_documents(a, b, sort_spec));
    }

    fn compare_documents(a: &Value, b: &Value, sort_spec: &SortSpec) -> Ordering {
        for (key, direction) in &sort_spec.keys {
            let ordering = Self::compare_values(field(a, key), field(b, key));
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - absent < null < bool < number < string < array < object
    /// - For same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);

                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                crate::query::compare_values(a_val, b_val).unwrap_or(Ordering::Equal)
            }
        }
    }
}
