use std::fmt;

use serde::{Deserialize, Serialize};

/// Source text of an expression in the modeling tool's expression language.
///
/// The compiler never parses expressions. They are embedded verbatim in the
/// generated code and handed to the evaluator at run time, together with the
/// behavior's variable namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);

impl Expression {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Expression {
    fn from(source: &str) -> Self {
        Self(source.to_owned())
    }
}

impl From<String> for Expression {
    fn from(source: String) -> Self {
        Self(source)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
