//! Query compiler for querify
//!
//! Turns a [`Query`](crate::query::Query) into one reusable [`Predicate`].
//!
//! # Pieces
//!
//! - [`reduce`] / [`map_reduce`]: fold predicate lists with AND / OR
//! - [`Registry`]: inner and outer operator tables, with a derived
//!   `$not<op>` twin for every registered operator
//! - [`Compiler`]: the grammar walk and the equality "subset" fast path
//!
//! # Threading
//!
//! Compiled predicates are immutable and `Send + Sync`. Registration takes
//! `&mut Compiler`, so operators are defined before queries are compiled.

mod compiler;
mod config;
mod operators;
mod predicate;
mod registry;

pub use compiler::Compiler;
pub use config::{CompilerConfig, ConfigError};
pub use predicate::{map_reduce, reduce, BoolOp, Predicate};
pub use registry::{inner_ctor, outer_ctor, InnerCtor, OperatorName, OuterCtor, Registry};
