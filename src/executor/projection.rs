//! Field projection for filter results

use serde_json::{Map, Value};

use crate::query::{QueryError, QueryResult};

/// Fields to keep in each result document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    fields: Vec<String>,
}

impl Selection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Parse `{ "a": true, "b": false }` or `["a", "c"]`.
    ///
    /// Only fields mapped to `true` (or a non-zero number) are kept.
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        match value {
            Value::Object(map) => {
                let mut fields = Vec::new();
                for (name, keep) in map {
                    let keep = match keep {
                        Value::Bool(b) => *b,
                        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                        _ => {
                            return Err(QueryError::InvalidSelection(format!(
                                "expected a boolean for {name:?}"
                            )))
                        }
                    };
                    if keep {
                        fields.push(name.clone());
                    }
                }
                Ok(Self { fields })
            }
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        QueryError::InvalidSelection("field names must be strings".to_string())
                    })
                })
                .collect::<QueryResult<Vec<_>>>()
                .map(|fields| Self { fields }),
            _ => Err(QueryError::InvalidSelection(
                "expected an object or a list of field names".to_string(),
            )),
        }
    }

    /// Copy the selected fields that the document actually has
    pub fn project(&self, document: &Value) -> Value {
        let Some(source) = document.as_object() else {
            return Value::Object(Map::new());
        };

        let mut projected = Map::new();
        for name in &self.fields {
            if let Some(value) = source.get(name) {
                projected.insert(name.clone(), value.clone());
            }
        }
        Value::Object(projected)
    }
}
