use serde::Deserialize;
use serde_json::{Map, Value};

use crate::graph::Node;
use crate::{CompileError, Condition, Expression, Mapping, Rule, Then, Variable};

const RULE_TYPE: &str = "type";
const RULE_ALWAYS: &str = "always";
const RULE_CONDITION: &str = "condition";
const KEY_IF: &str = "if";
const KEY_IF_NOT: &str = "ifNot";
const KEY_THEN: &str = "then";
const KEY_STOP: &str = "stop";
const ACTION_RECORD_EVENT: &str = "recordEvent";
const ACTION_EXECUTE_RULES: &str = "executeRules";

pub(super) struct Decoder<'a> {
    node: &'a Node,
}

impl<'a> Decoder<'a> {
    pub(super) fn new(node: &'a Node) -> Self {
        Self { node }
    }

    fn malformed(&self, reason: impl Into<String>) -> CompileError {
        CompileError::MalformedConfig {
            node: self.node.to_string(),
            reason: reason.into(),
        }
    }

    pub(super) fn rules(&self, value: &Value) -> Result<Vec<Rule>, CompileError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.iter().map(|item| self.rule(item)).collect(),
            other => Err(self.malformed(format!("expected a list of rules, found {other}"))),
        }
    }

    fn rule(&self, value: &Value) -> Result<Rule, CompileError> {
        let Value::Object(obj) = value else {
            return Err(self.malformed(format!("expected a rule object, found {value}")));
        };

        match obj.get(RULE_TYPE).and_then(Value::as_str) {
            Some(RULE_ALWAYS) => Ok(Rule::Always {
                then: self.then(obj)?,
            }),
            Some(RULE_CONDITION) => {
                let condition = self.condition(obj, value)?;
                let then = self.then(obj)?;
                let stop = match obj.get(KEY_STOP) {
                    None | Some(Value::Null) => false,
                    Some(Value::Bool(stop)) => *stop,
                    Some(other) => {
                        let reason = format!("'stop' must be a boolean, found {other}");
                        return Err(self.malformed(reason));
                    }
                };
                Ok(Rule::Condition {
                    condition,
                    then,
                    stop,
                })
            }
            _ => Err(CompileError::UnknownRuleKind {
                node: self.node.to_string(),
                kind: match obj.get(RULE_TYPE) {
                    Some(Value::String(kind)) => kind.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                },
            }),
        }
    }

    fn condition(&self, obj: &Map<String, Value>, raw: &Value) -> Result<Condition, CompileError> {
        let test_if = self.expression(obj, KEY_IF)?;
        let test_if_not = self.expression(obj, KEY_IF_NOT)?;
        match (test_if, test_if_not) {
            (Some(expr), None) => Ok(Condition::If(expr)),
            (None, Some(expr)) => Ok(Condition::IfNot(expr)),
            (None, None) => Err(CompileError::MissingCondition {
                node: self.node.to_string(),
                rule: raw.to_string(),
            }),
            (Some(_), Some(_)) => Err(CompileError::ConflictingCondition {
                node: self.node.to_string(),
                rule: raw.to_string(),
            }),
        }
    }

    fn expression(
        &self,
        obj: &Map<String, Value>,
        key: &str,
    ) -> Result<Option<Expression>, CompileError> {
        match obj.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(source)) => Ok(Some(Expression::from(source.as_str()))),
            Some(other) => Err(self.malformed(format!(
                "'{key}' must be an expression string, found {other}"
            ))),
        }
    }

    fn then(&self, rule: &Map<String, Value>) -> Result<Then, CompileError> {
        let unknown = |then: &Value| CompileError::UnknownAction {
            node: self.node.to_string(),
            then: then.to_string(),
        };

        let Some(then) = rule.get(KEY_THEN) else {
            return Err(unknown(&Value::Null));
        };
        let Some(action) = then.as_object() else {
            return Err(unknown(then));
        };

        if let Some(record) = action.get(ACTION_RECORD_EVENT) {
            return self.record_event(record);
        }
        if let Some(execute) = action.get(ACTION_EXECUTE_RULES) {
            let rules = execute
                .as_object()
                .and_then(|e| e.get("rules"))
                .ok_or_else(|| self.malformed("'executeRules' must carry a 'rules' list"))?;
            return Ok(Then::ExecuteRules {
                rules: self.rules(rules)?,
            });
        }
        Err(unknown(then))
    }

    fn record_event(&self, value: &Value) -> Result<Then, CompileError> {
        let event_name = value
            .get("eventName")
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed("'recordEvent' must carry an 'eventName' string"))?;
        let mapping = match value.get("mapping") {
            Some(Value::String(source)) => Mapping::Expression(source.as_str().into()),
            Some(Value::Object(fields)) => {
                let mut out = indexmap::IndexMap::with_capacity(fields.len());
                for (name, source) in fields {
                    let source = source.as_str().ok_or_else(|| {
                        self.malformed(format!(
                            "mapping field '{name}' must be an expression string, found {source}"
                        ))
                    })?;
                    out.insert(name.clone(), Expression::from(source));
                }
                Mapping::Fields(out)
            }
            Some(other) => {
                return Err(self.malformed(format!(
                    "'mapping' must be an expression or an object of expressions, found {other}"
                )))
            }
            None => return Err(self.malformed("'recordEvent' must carry a 'mapping'")),
        };
        Ok(Then::RecordEvent {
            event_name: event_name.to_owned(),
            mapping,
        })
    }

    pub(super) fn variables(&self, value: &Value) -> Result<Vec<Variable>, CompileError> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        Vec::<Variable>::deserialize(value)
            .map_err(|e| self.malformed(format!("invalid variables: {e}")))
    }
}
