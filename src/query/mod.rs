//! Query language for querify
//!
//! A query is a plain data structure, usually parsed from JSON:
//!
//! ```text
//! { "name": "Alice", "age": { "$gte": 18 }, "$or": [ { "a": 1 }, { "b": 1 } ] }
//! ```
//!
//! Each field value is classified once into a [`Term`]: a scalar (implicit
//! equality), a regex (implicit `$regex`), an operator map, or a list.

mod errors;
mod normalize;
mod pattern;
mod term;
mod value;

pub use errors::{QueryError, QueryResult};
pub use normalize::{normalize, stringify};
pub use pattern::Pattern;
pub use term::{Query, Term};
pub use value::{compare_values, field, kind_name, strict_equals, values_equal};
