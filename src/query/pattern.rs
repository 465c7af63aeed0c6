//! Regular expression values in queries
//!
//! A [`Pattern`] keeps the source text and flags alongside the compiled
//! regex so it can be rendered back into its `/source/flags` form.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};

/// A compiled regular expression with JavaScript-style flags
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern with no flags
    pub fn new(source: &str) -> QueryResult<Self> {
        Self::with_flags(source, "")
    }

    /// Compile a pattern with the given flags.
    ///
    /// Supported flags:
    /// - `i`: case insensitive
    /// - `m`: `^` and `$` match at line boundaries
    /// - `s`: `.` matches newlines
    /// - `g`, `y`, `u`: accepted, no effect
    pub fn with_flags(source: &str, flags: &str) -> QueryResult<Self> {
        let mut builder = RegexBuilder::new(source);

        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'y' | 'u' => {}
                other => return Err(QueryError::InvalidRegexFlag(other)),
            }
        }

        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex: builder.build()?,
        })
    }

    /// Parse the normalized `/source/flags` form.
    ///
    /// The last `/` marks the flags boundary, so the source may itself
    /// contain slashes.
    pub fn parse_normalized(literal: &str) -> QueryResult<Self> {
        let malformed = || QueryError::MalformedRegex(literal.to_string());

        let body = literal.strip_prefix('/').ok_or_else(malformed)?;
        let boundary = body.rfind('/').ok_or_else(malformed)?;

        Self::with_flags(&body[..boundary], &body[boundary + 1..])
    }

    /// Pattern source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flags as written
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Test a string against the pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Test a document value against the pattern.
    ///
    /// Strings match directly; numbers and booleans match via their text
    /// form. Null, arrays and objects never match.
    pub fn matches_value(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.is_match(s),
            Value::Number(n) => self.is_match(&n.to_string()),
            Value::Bool(b) => self.is_match(if *b { "true" } else { "false" }),
            _ => false,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive_flag() {
        let pattern = Pattern::with_flags("ok", "i").unwrap();
        assert!(pattern.is_match("OK"));
        assert!(pattern.is_match("ja ok"));
        assert!(!pattern.is_match("meh"));
    }

    #[test]
    fn test_display_round_trips() {
        let pattern = Pattern::with_flags("a/b", "im").unwrap();
        assert_eq!(pattern.to_string(), "/a/b/im");

        let parsed = Pattern::parse_normalized(&pattern.to_string()).unwrap();
        assert_eq!(parsed, pattern);
        assert_eq!(parsed.source(), "a/b");
        assert_eq!(parsed.flags(), "im");
    }

    #[test]
    fn test_parse_without_flags() {
        let parsed = Pattern::parse_normalized("/^x$/").unwrap();
        assert_eq!(parsed.source(), "^x$");
        assert_eq!(parsed.flags(), "");
    }

    #[test]
    fn test_malformed_literal() {
        assert!(matches!(
            Pattern::parse_normalized("/abc"),
            Err(QueryError::MalformedRegex(_))
        ));
        assert!(matches!(
            Pattern::parse_normalized("abc/"),
            Err(QueryError::MalformedRegex(_))
        ));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(matches!(
            Pattern::with_flags("x", "q"),
            Err(QueryError::InvalidRegexFlag('q'))
        ));
    }

    #[test]
    fn test_invalid_source_rejected() {
        assert!(matches!(
            Pattern::new("("),
            Err(QueryError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_matches_value_types() {
        let pattern = Pattern::new("^4").unwrap();
        assert!(pattern.matches_value(&json!("42")));
        assert!(pattern.matches_value(&json!(42)));
        assert!(!pattern.matches_value(&json!(null)));
        assert!(!pattern.matches_value(&json!(["42"])));

        let truthy = Pattern::new("true").unwrap();
        assert!(truthy.matches_value(&json!(true)));
    }
}
