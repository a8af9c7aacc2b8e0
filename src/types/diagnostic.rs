use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a [`Diagnostic`]. Compilation only ever reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => f.write_str("error"),
        }
    }
}

/// Structured error value shared with the model graph collaborators.
///
/// Graph lookups report failures as diagnostics and the compiler hands them
/// back to its caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Diagnostic {
    pub message: String,
    pub level: Level,
    #[serde(default)]
    pub details: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Error,
            details: details.into(),
        }
    }
}
