//! Array filter helper for querify
//!
//! A thin convenience layer over the compiler:
//!
//! 1. Compile the query (absent matches everything)
//! 2. Keep matching documents
//! 3. Apply sort (if specified)
//! 4. Apply projection (if specified)
//! 5. Return a new vector

mod filters;
mod projection;
mod sorter;

pub use filters::{filter, FilterOptions};
pub use projection::Selection;
pub use sorter::{ResultSorter, SortDirection, SortSpec};
