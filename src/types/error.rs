use thiserror::Error;

use super::diagnostic::{Diagnostic, Level};

const RULE_KINDS: &str = "allowed rule types: always, condition";

const ACTION_KINDS: &str = "allowed actions: record event, throw error, assign variable, \
                            trigger command, perform query, execute rules";

/// Reasons a rule behavior fails to compile.
///
/// Every variant names the node that owns the rules so the authoring mistake
/// can be located in the model. Compilation stops at the first error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("condition rule on {node} has neither 'if' nor 'ifNot': {rule}")]
    MissingCondition { node: String, rule: String },

    #[error("condition rule on {node} has both 'if' and 'ifNot': {rule}")]
    ConflictingCondition { node: String, rule: String },

    #[error("unknown rule type '{kind}' on {node}")]
    UnknownRuleKind { node: String, kind: String },

    #[error("unrecognized 'then' action on {node}: {then}")]
    UnknownAction { node: String, then: String },

    #[error("malformed rule configuration on {node}: {reason}")]
    MalformedConfig { node: String, reason: String },

    #[error("duplicate variable '{name}' on {node}")]
    DuplicateVariable { node: String, name: String },

    #[error("event name '{event}' on {node} must not contain a qualifier")]
    QualifiedEventName { node: String, event: String },

    #[error("event '{event}' is not connected to {node}")]
    EventNotConnected { node: String, event: String },

    #[error("variable name '{name}' on {node} is reserved")]
    ReservedVariableName { node: String, name: String },

    #[error("'{name}' on {node} does not derive a usable class name (got '{class_name}')")]
    InvalidClassName {
        node: String,
        name: String,
        class_name: String,
    },

    #[error(transparent)]
    Collaborator(#[from] Diagnostic),
}

impl CompileError {
    #[must_use]
    pub fn level(&self) -> Level {
        Level::Error
    }

    /// Grammar or allowed alternatives for the failed construct.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            CompileError::MissingCondition { .. } | CompileError::ConflictingCondition { .. } => {
                "a condition rule takes exactly one of: if, ifNot".to_owned()
            }
            CompileError::UnknownRuleKind { .. } => RULE_KINDS.to_owned(),
            CompileError::UnknownAction { .. } => ACTION_KINDS.to_owned(),
            CompileError::MalformedConfig { .. } => {
                "rule: { type: always|condition, if|ifNot: <expression>, stop: <bool>, \
                 then: { recordEvent: { eventName, mapping } } | { executeRules: { rules } } }"
                    .to_owned()
            }
            CompileError::DuplicateVariable { .. } => {
                "each variable is declared once, before any rule runs".to_owned()
            }
            CompileError::QualifiedEventName { .. } => {
                "expected the bare event name; the service and aggregate prefix is inferred"
                    .to_owned()
            }
            CompileError::EventNotConnected { .. } => {
                "draw a relation from the aggregate to the event so the aggregate may record it"
                    .to_owned()
            }
            CompileError::ReservedVariableName { .. } => {
                "'__proto__' cannot be stored in the variable namespace".to_owned()
            }
            CompileError::InvalidClassName { .. } => {
                "service and event names must start with a letter once separators are removed"
                    .to_owned()
            }
            CompileError::Collaborator(d) => d.details.clone(),
        }
    }

    /// Flatten into a [`Diagnostic`]. Collaborator diagnostics come back as-is.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Collaborator(d) => d.clone(),
            other => Diagnostic::error(other.to_string(), other.details()),
        }
    }
}
