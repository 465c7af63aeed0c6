//! querify - compile document queries into reusable predicates
//!
//! Queries are JSON-like maps of field conditions. The compiler turns a
//! query into a [`Predicate`] once; the predicate is then evaluated
//! against many documents, optionally in transition mode with a previous
//! version of the document.
//!
//! ```
//! use querify::{Compiler, Query};
//! use serde_json::json;
//!
//! let query = Query::try_from(json!({"age": {"$gte": 18}})).unwrap();
//! let adult = Compiler::new().compile(&query).unwrap();
//! assert!(adult.matches(&json!({"age": 30})));
//! ```

pub mod cli;
pub mod compiler;
pub mod executor;
pub mod observability;
pub mod query;

pub use compiler::{Compiler, CompilerConfig, Predicate};
pub use executor::{filter, FilterOptions};
pub use query::{normalize, stringify, Pattern, Query, QueryError, QueryResult, Term};
