//! Observability events for querify
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Registry
    /// New operator and its negation registered
    OperatorDefined,
    /// Registration replaced an existing operator
    OperatorOverridden,

    // Compilation
    /// Query compiled into a predicate
    QueryCompiled,
    /// Unknown operator ignored in permissive mode
    OperatorSkipped,

    // Filtering
    /// Array filter finished
    FilterComplete,

    // Configuration
    /// Compiler configuration loaded from disk
    ConfigLoaded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::OperatorDefined => "OPERATOR_DEFINED",
            Event::OperatorOverridden => "OPERATOR_OVERRIDDEN",
            Event::QueryCompiled => "QUERY_COMPILED",
            Event::OperatorSkipped => "OPERATOR_SKIPPED",
            Event::FilterComplete => "FILTER_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
