mod decode;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{ModelGraph, Node};
use crate::{Block, CompileError, Rule, Variable};

use decode::Decoder;

/// Decode a JSON rule list.
///
/// # Errors
///
/// Returns the first structural [`CompileError`] in list order: a condition
/// rule without exactly one of `if`/`ifNot`, an unknown rule type, an
/// unrecognized `then` action, or a value of the wrong JSON type.
pub fn decode_rules(node: &Node, rules: &Value) -> Result<Vec<Rule>, CompileError> {
    Decoder::new(node).rules(rules)
}

/// Decode a JSON list of `{ "name", "initializer" }` variables.
///
/// # Errors
///
/// Returns [`CompileError::MalformedConfig`] if the list does not have that shape.
pub fn decode_variables(node: &Node, variables: &Value) -> Result<Vec<Variable>, CompileError> {
    Decoder::new(node).variables(variables)
}

/// Decode and compile a JSON rule configuration.
///
/// Decoding runs over the whole configuration first, so structural errors
/// are reported before reference errors. An empty rule list compiles to an
/// empty block without looking at the variables.
///
/// # Errors
///
/// Returns the first [`CompileError`] found.
pub fn compile_json<G: ModelGraph + ?Sized>(
    node: &Node,
    graph: &G,
    rules: &Value,
    variables: &Value,
) -> Result<Block, CompileError> {
    let rules = decode_rules(node, rules)?;
    if rules.is_empty() {
        return Ok(Block::empty());
    }
    let variables = decode_variables(node, variables)?;
    crate::compile::compile(node, graph, &rules, &variables)
}

/// Rule configuration of one aggregate behavior, as exported by the
/// modeling tool.
///
/// # Example
///
/// ```
/// use rulegen::{BehaviorConfig, MemoryGraph, Node};
///
/// let graph = MemoryGraph::builder()
///     .node(Node::service("svc", "Orders"))
///     .node(Node::aggregate("agg", "Order"))
///     .node(Node::event("evt", "Order Placed"))
///     .contains("svc", "agg")
///     .relation("agg", "evt")
///     .build();
///
/// let config = BehaviorConfig::from_json(r#"{
///     "variables": [{ "name": "total", "initializer": "price * quantity" }],
///     "rules": [{
///         "type": "condition",
///         "if": "total > 0",
///         "then": { "recordEvent": { "eventName": "OrderPlaced", "mapping": { "total": "total" } } }
///     }]
/// }"#).unwrap();
///
/// let block = config.compile(&Node::aggregate("agg", "Order"), &graph).unwrap();
/// assert!(block.to_string().contains("yield new Orders.OrderPlaced({"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub rules: Value,
    #[serde(default)]
    pub variables: Value,
}

impl BehaviorConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RulegenError::Json`](crate::RulegenError::Json) if the text is
    /// not a JSON object with optional `rules` and `variables`.
    pub fn from_json(input: &str) -> Result<Self, crate::RulegenError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RulegenError`](crate::RulegenError) on I/O or JSON failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RulegenError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// Decode and compile, see [`compile_json()`].
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] found.
    pub fn compile<G: ModelGraph + ?Sized>(
        &self,
        node: &Node,
        graph: &G,
    ) -> Result<Block, CompileError> {
        compile_json(node, graph, &self.rules, &self.variables)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::graph::MemoryGraph;
    use crate::RulegenError;

    fn graph() -> MemoryGraph {
        MemoryGraph::builder()
            .node(Node::service("svc", "Orders"))
            .node(Node::aggregate("agg", "Order"))
            .node(Node::event("evt", "Order Placed"))
            .contains("svc", "agg")
            .relation("agg", "evt")
            .build()
    }

    fn order() -> Node {
        Node::aggregate("agg", "Order")
    }

    #[test]
    fn empty_rules_ignore_bad_variables() {
        let block = compile_json(&order(), &graph(), &json!([]), &json!("not a list")).unwrap();
        assert!(block.is_empty());
    }

    #[test]
    fn absent_rules_are_empty() {
        let config = BehaviorConfig::from_json("{}").unwrap();
        assert!(config.compile(&order(), &graph()).unwrap().is_empty());
    }

    #[test]
    fn structural_error_before_reference_error() {
        let rules = json!([
            { "type": "always",
              "then": { "recordEvent": { "eventName": "Unknown", "mapping": "x" } } },
            { "type": "condition", "then": { "executeRules": { "rules": [] } } }
        ]);
        let err = compile_json(&order(), &graph(), &rules, &Value::Null).unwrap_err();
        assert!(matches!(err, CompileError::MissingCondition { .. }));
    }

    #[test]
    fn missing_condition_returns_no_block() {
        let rules = json!([
            { "type": "always",
              "then": { "recordEvent": { "eventName": "OrderPlaced", "mapping": "x" } } },
            { "type": "condition",
              "then": { "recordEvent": { "eventName": "OrderPlaced", "mapping": "x" } } }
        ]);
        let result = compile_json(&order(), &graph(), &rules, &Value::Null);
        assert!(result.is_err());
    }

    #[test]
    fn from_json_rejects_invalid_text() {
        let err = BehaviorConfig::from_json("{ rules: ").unwrap_err();
        assert!(matches!(err, RulegenError::Json(_)));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = BehaviorConfig {
            rules: json!([{ "type": "always", "then": { "executeRules": { "rules": [] } } }]),
            variables: json!([{ "name": "a", "initializer": "1" }]),
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(BehaviorConfig::from_json(&text).unwrap(), config);
    }
}
