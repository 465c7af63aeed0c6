//! Query grammar
//!
//! A query is an ordered mapping from field name to a [`Term`]. The shape of
//! each term is decided once, when the query is built or parsed from JSON,
//! so the compiler dispatches on a variant instead of inspecting values.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::pattern::Pattern;
use super::value::kind_name;

/// A single value in the query language
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Null, boolean, number or string
    Scalar(Value),
    /// Native regular expression
    Regex(Pattern),
    /// Ordered mapping: an operator map or a sub-query
    Map(Vec<(String, Term)>),
    /// List operand
    List(Vec<Term>),
}

impl Term {
    /// Classify a JSON value into the query grammar
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Term::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Term::from_json(value)))
                    .collect(),
            ),
            Value::Array(items) => Term::List(items.into_iter().map(Term::from_json).collect()),
            scalar => Term::Scalar(scalar),
        }
    }

    /// Render back into JSON. Regexes become their `/source/flags` string.
    pub fn to_json(&self) -> Value {
        match self {
            Term::Scalar(value) => value.clone(),
            Term::Regex(pattern) => Value::String(pattern.to_string()),
            Term::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, term)| (key.clone(), term.to_json()))
                    .collect(),
            ),
            Term::List(items) => Value::Array(items.iter().map(Term::to_json).collect()),
        }
    }

    /// Build an operator map such as `{ "$gt": 1 }`
    pub fn ops<K, T, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Term>,
    {
        Term::Map(
            entries
                .into_iter()
                .map(|(key, term)| (key.into(), term.into()))
                .collect(),
        )
    }

    /// Build a single-operator map
    pub fn op(name: impl Into<String>, operand: impl Into<Term>) -> Self {
        Term::Map(vec![(name.into(), operand.into())])
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Term::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Value::as_f64)
    }

    pub fn as_map(&self) -> Option<&[(String, Term)]> {
        match self {
            Term::Map(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// JSON view of a term used as an equality operand.
    ///
    /// Regexes have no equality form and yield `None`.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Term::Regex(_) => None,
            Term::Scalar(value) => Some(value.clone()),
            other => Some(other.to_json()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Term::Scalar(value) => kind_name(value),
            Term::Regex(_) => "regex",
            Term::Map(_) => "object",
            Term::List(_) => "array",
        }
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::from_json(value)
    }
}

impl From<Pattern> for Term {
    fn from(pattern: Pattern) -> Self {
        Term::Regex(pattern)
    }
}

impl From<Query> for Term {
    fn from(query: Query) -> Self {
        Term::Map(query.fields)
    }
}

impl<T: Into<Term>> From<Vec<T>> for Term {
    fn from(items: Vec<T>) -> Self {
        Term::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_term {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Term {
                fn from(value: $ty) -> Self {
                    Term::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_term!(&str, String, bool, i32, i64, u32, u64, f64);

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Term::Scalar(value) => value.serialize(serializer),
            Term::Regex(pattern) => serializer.collect_str(pattern),
            Term::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, term) in fields {
                    map.serialize_entry(key, term)?;
                }
                map.end()
            }
            Term::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for term in items {
                    seq.serialize_element(term)?;
                }
                seq.end()
            }
        }
    }
}

/// A parsed query: ordered field name to term pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: Vec<(String, Term)>,
}

impl Query {
    /// Create an empty query (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Query::insert`]
    pub fn with(mut self, key: impl Into<String>, term: impl Into<Term>) -> Self {
        self.insert(key, term);
        self
    }

    /// Set a field. An existing key keeps its position and takes the new
    /// term, mirroring object key semantics.
    pub fn insert(&mut self, key: impl Into<String>, term: impl Into<Term>) {
        let key = key.into();
        let term = term.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = term,
            None => self.fields.push((key, term)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Term> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, term)| term)
    }

    pub fn fields(&self) -> &[(String, Term)] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<(String, Term)> {
        &mut self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render back into JSON
    pub fn to_json(&self) -> Value {
        Term::Map(self.fields.clone()).to_json()
    }
}

impl TryFrom<Value> for Query {
    type Error = QueryError;

    fn try_from(value: Value) -> QueryResult<Self> {
        match Term::from_json(value) {
            Term::Map(fields) => Ok(Self { fields }),
            other => Err(QueryError::InvalidQuery(other.kind())),
        }
    }
}

impl TryFrom<Term> for Query {
    type Error = QueryError;

    fn try_from(term: Term) -> QueryResult<Self> {
        match term {
            Term::Map(fields) => Ok(Self { fields }),
            other => Err(QueryError::InvalidQuery(other.kind())),
        }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, term) in &self.fields {
            map.serialize_entry(key, term)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Query::try_from(value).map_err(de::Error::custom)
    }
}
