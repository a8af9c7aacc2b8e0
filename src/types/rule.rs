use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::expr::Expression;

/// One step of an aggregate behavior.
///
/// Rules are either decoded from the modeling tool's JSON configuration with
/// [`decode_rules()`](crate::config::decode_rules) or built in code with the
/// constructors below.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Runs its action unconditionally.
    Always { then: Then },
    /// Runs its action when the condition holds. With `stop` set, the
    /// generated behavior returns right after the action.
    Condition {
        condition: Condition,
        then: Then,
        stop: bool,
    },
}

/// Polarity of a condition rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    If(Expression),
    IfNot(Expression),
}

/// What a rule does when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Then {
    /// Emit an event of the owning service, built from `mapping`.
    /// `event_name` is the bare event name, without service or aggregate prefix.
    RecordEvent { event_name: String, mapping: Mapping },
    /// Run a nested rule list the same way as the top-level one.
    ExecuteRules { rules: Vec<Rule> },
}

/// How an event payload is built from expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    /// The whole payload is the result of one expression.
    Expression(Expression),
    /// One expression per payload field, emitted in insertion order.
    Fields(IndexMap<String, Expression>),
}

/// A variable of the behavior namespace, declared before any rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub initializer: Expression,
}

impl Rule {
    #[must_use]
    pub fn always(then: Then) -> Rule {
        Rule::Always { then }
    }

    #[must_use]
    pub fn when(condition: impl Into<Expression>, then: Then) -> Rule {
        Rule::Condition {
            condition: Condition::If(condition.into()),
            then,
            stop: false,
        }
    }

    #[must_use]
    pub fn unless(condition: impl Into<Expression>, then: Then) -> Rule {
        Rule::Condition {
            condition: Condition::IfNot(condition.into()),
            then,
            stop: false,
        }
    }

    /// Mark a condition rule as stopping. Has no effect on `Always` rules.
    #[must_use]
    pub fn stop(self) -> Rule {
        match self {
            Rule::Condition {
                condition, then, ..
            } => Rule::Condition {
                condition,
                then,
                stop: true,
            },
            always @ Rule::Always { .. } => always,
        }
    }

    #[must_use]
    pub fn then(&self) -> &Then {
        match self {
            Rule::Always { then } | Rule::Condition { then, .. } => then,
        }
    }
}

impl Then {
    #[must_use]
    pub fn record_event(event_name: &str, mapping: impl Into<Mapping>) -> Then {
        Then::RecordEvent {
            event_name: event_name.to_owned(),
            mapping: mapping.into(),
        }
    }

    #[must_use]
    pub fn execute_rules(rules: impl IntoIterator<Item = Rule>) -> Then {
        Then::ExecuteRules {
            rules: rules.into_iter().collect(),
        }
    }
}

impl Mapping {
    #[must_use]
    pub fn expression(source: impl Into<Expression>) -> Mapping {
        Mapping::Expression(source.into())
    }

    #[must_use]
    pub fn fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Mapping
    where
        K: Into<String>,
        V: Into<Expression>,
    {
        Mapping::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for Mapping {
    fn from(source: &str) -> Self {
        Mapping::Expression(source.into())
    }
}

impl From<Expression> for Mapping {
    fn from(expr: Expression) -> Self {
        Mapping::Expression(expr)
    }
}

impl Variable {
    pub fn new(name: &str, initializer: impl Into<Expression>) -> Self {
        Self {
            name: name.to_owned(),
            initializer: initializer.into(),
        }
    }
}
