use std::collections::HashMap;

use indexmap::IndexMap;

use super::{ModelGraph, Node, NodeKind};
use crate::Diagnostic;

/// In-memory modeling graph.
///
/// Holds nodes, containment (a service contains an aggregate) and directed
/// relations (an aggregate records an event). Relation order is kept so
/// lookups are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: IndexMap<String, Node>,
    parents: HashMap<String, String>,
    relations: Vec<(String, String)>,
}

/// Builder for [`MemoryGraph`].
///
/// # Example
///
/// ```
/// use rulegen::{MemoryGraph, ModelGraph, Node, NodeKind};
///
/// let graph = MemoryGraph::builder()
///     .node(Node::service("svc", "Orders"))
///     .node(Node::aggregate("agg", "Order"))
///     .node(Node::event("evt", "Order Placed"))
///     .contains("svc", "agg")
///     .relation("agg", "evt")
///     .build();
///
/// let order = graph.node("agg").unwrap().clone();
/// assert_eq!(graph.owning_service(&order).unwrap(), "Orders");
/// assert_eq!(graph.outgoing_targets(&order, NodeKind::Event).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryGraphBuilder {
    graph: MemoryGraph,
}

impl MemoryGraph {
    #[must_use]
    pub fn builder() -> MemoryGraphBuilder {
        MemoryGraphBuilder::default()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Add a relation after construction.
    pub fn add_relation(&mut self, from: &str, to: &str) {
        self.relations.push((from.to_owned(), to.to_owned()));
    }

    fn parent(&self, id: &str) -> Option<&Node> {
        self.parents.get(id).and_then(|p| self.nodes.get(p))
    }

    fn known(&self, node: &Node) -> Result<&Node, Diagnostic> {
        self.nodes.get(&node.id).ok_or_else(|| {
            Diagnostic::error(
                format!("{node} ({}) is not part of the model", node.id),
                "the node may have been deleted from the model",
            )
        })
    }
}

impl MemoryGraphBuilder {
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.graph.nodes.insert(node.id.clone(), node);
        self
    }

    /// Place `child` inside `parent`.
    #[must_use]
    pub fn contains(mut self, parent: &str, child: &str) -> Self {
        self.graph
            .parents
            .insert(child.to_owned(), parent.to_owned());
        self
    }

    /// Directed relation `from -> to`.
    #[must_use]
    pub fn relation(mut self, from: &str, to: &str) -> Self {
        self.graph.add_relation(from, to);
        self
    }

    #[must_use]
    pub fn build(self) -> MemoryGraph {
        self.graph
    }
}

impl ModelGraph for MemoryGraph {
    fn owning_service(&self, node: &Node) -> Result<String, Diagnostic> {
        let mut current = self.known(node)?;
        // Walk up containment until a service is found.
        for _ in 0..self.nodes.len() {
            if current.kind == NodeKind::Service {
                return Ok(current.name.clone());
            }
            match self.parent(&current.id) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Err(Diagnostic::error(
            format!("{node} is not contained in a service"),
            "place the aggregate inside a service in the model",
        ))
    }

    fn outgoing_targets(&self, node: &Node, kind: NodeKind) -> Result<Vec<Node>, Diagnostic> {
        let source = self.known(node)?;
        let mut targets = Vec::new();
        for (from, to) in &self.relations {
            if *from != source.id {
                continue;
            }
            let target = self.nodes.get(to).ok_or_else(|| {
                Diagnostic::error(
                    format!("relation from {source} points to unknown node '{to}'"),
                    "remove the dangling relation from the model",
                )
            })?;
            if target.kind == kind {
                targets.push(target.clone());
            }
        }
        Ok(targets)
    }
}
