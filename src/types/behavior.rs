use super::error::CompileError;
use super::expr::Expression;
use super::rule::{Rule, Variable};
use super::stmt::Block;
use crate::graph::{ModelGraph, Node};

/// Builder for an aggregate behavior.
///
/// Collects namespace variables and rules, then compiles them against the
/// modeling graph.
///
/// # Example
///
/// ```
/// use rulegen::{BehaviorBuilder, MemoryGraph, Node, Rule, Then};
///
/// let graph = MemoryGraph::builder()
///     .node(Node::service("svc", "Orders"))
///     .node(Node::aggregate("agg", "Order"))
///     .node(Node::event("evt", "Order Placed"))
///     .contains("svc", "agg")
///     .relation("agg", "evt")
///     .build();
///
/// let block = BehaviorBuilder::new()
///     .variable("total", "price * quantity")
///     .rule(Rule::when("total > 0", Then::record_event("OrderPlaced", "command")))
///     .compile(&Node::aggregate("agg", "Order"), &graph)
///     .unwrap();
///
/// assert_eq!(block.produced_events(), ["OrderPlaced"]);
/// ```
#[derive(Debug, Default)]
pub struct BehaviorBuilder {
    variables: Vec<Variable>,
    rules: Vec<Rule>,
}

impl BehaviorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a namespace variable. Initializers run in declaration order.
    #[must_use]
    pub fn variable(mut self, name: &str, initializer: impl Into<Expression>) -> Self {
        self.variables.push(Variable::new(name, initializer));
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Compile into a statement block.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] met in rule order.
    pub fn compile<G: ModelGraph + ?Sized>(
        &self,
        node: &Node,
        graph: &G,
    ) -> Result<Block, CompileError> {
        crate::compile::compile(node, graph, &self.rules, &self.variables)
    }
}
