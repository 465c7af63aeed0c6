//! # Query Errors
//!
//! Error types for query parsing and compilation.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Error)]
pub enum QueryError {
    // ==================
    // Grammar Errors
    // ==================
    /// Query root is not a mapping
    #[error("Invalid query: expected an object, got {0}")]
    InvalidQuery(&'static str),

    /// Operator name does not carry the `$` sigil or has no body
    #[error("Invalid operator name: {0:?}")]
    InvalidOperatorName(String),

    /// Operator rejected in strict mode
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    // ==================
    // Operand Errors
    // ==================
    /// Operand has the wrong shape for its operator
    #[error("Invalid operand for {operator}: expected {expected}")]
    InvalidOperand {
        operator: String,
        expected: &'static str,
    },

    /// Sort specification is malformed
    #[error("Invalid sort specification: {0}")]
    InvalidSort(String),

    /// Projection is malformed
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    // ==================
    // Regex Errors
    // ==================
    /// Pattern failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Unsupported regex flag
    #[error("Invalid regex flag: {0:?}")]
    InvalidRegexFlag(char),

    /// Normalized `/source/flags` string is malformed
    #[error("Malformed regex literal: {0:?}")]
    MalformedRegex(String),

    // ==================
    // Serialization Errors
    // ==================
    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    /// Create an invalid operand error
    pub fn invalid_operand(operator: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidOperand {
            operator: operator.into(),
            expected,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "QUERIFY_INVALID_QUERY",
            Self::InvalidOperatorName(_) => "QUERIFY_INVALID_OPERATOR_NAME",
            Self::UnknownOperator(_) => "QUERIFY_UNKNOWN_OPERATOR",
            Self::InvalidOperand { .. } => "QUERIFY_INVALID_OPERAND",
            Self::InvalidRegex(_) | Self::InvalidRegexFlag(_) | Self::MalformedRegex(_) => {
                "QUERIFY_INVALID_REGEX"
            }
            Self::InvalidSort(_) => "QUERIFY_INVALID_SORT",
            Self::InvalidSelection(_) => "QUERIFY_INVALID_SELECTION",
            Self::Serialization(_) => "QUERIFY_SERIALIZATION",
        }
    }
}
