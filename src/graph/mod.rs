mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Diagnostic;

pub use memory::{MemoryGraph, MemoryGraphBuilder};

/// Element types of the modeling graph that rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Service,
    Aggregate,
    Command,
    Event,
    Query,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Service => "service",
            NodeKind::Aggregate => "aggregate",
            NodeKind::Command => "command",
            NodeKind::Event => "event",
            NodeKind::Query => "query",
        };
        f.write_str(name)
    }
}

/// A modeling-graph element, identified by `id` and labelled by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn service(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Service)
    }

    pub fn aggregate(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Aggregate)
    }

    pub fn event(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Event)
    }

    pub fn command(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Command)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Lookups the compiler needs from the modeling graph.
///
/// Failures are reported as [`Diagnostic`]s; the compiler propagates them
/// without rewording.
pub trait ModelGraph {
    /// Name of the service that contains `node`.
    fn owning_service(&self, node: &Node) -> Result<String, Diagnostic>;

    /// Targets of `kind` reachable from `node` by one outgoing relation.
    fn outgoing_targets(&self, node: &Node, kind: NodeKind) -> Result<Vec<Node>, Diagnostic>;
}

impl<G: ModelGraph + ?Sized> ModelGraph for &G {
    fn owning_service(&self, node: &Node) -> Result<String, Diagnostic> {
        (**self).owning_service(node)
    }

    fn outgoing_targets(&self, node: &Node, kind: NodeKind) -> Result<Vec<Node>, Diagnostic> {
        (**self).outgoing_targets(node, kind)
    }
}
