//! Compiler configuration
//!
//! Loaded from JSON; every field has a default so `{}` is a valid config.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event, Event, Severity};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid JSON for [`CompilerConfig`]
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Compiler behavior switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Reject unknown operators instead of skipping them (default: false)
    #[serde(default)]
    pub strict: bool,

    /// Emit a trace event for each compiled query (default: false)
    #[serde(default)]
    pub log_compiles: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            log_compiles: false,
        }
    }
}

impl CompilerConfig {
    /// Permissive defaults with strict mode switched on
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Parse a JSON config string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;

        log_event(
            Event::ConfigLoaded,
            Severity::Info,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }
}
