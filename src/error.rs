use thiserror::Error;

use crate::CompileError;

/// Unified error type covering configuration loading and compilation.
///
/// Returned by convenience methods like
/// [`BehaviorConfig::from_json()`](crate::BehaviorConfig::from_json) and
/// [`BehaviorConfig::from_file()`](crate::BehaviorConfig::from_file).
#[derive(Debug, Error)]
pub enum RulegenError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
