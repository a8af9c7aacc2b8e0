//! Compiles declarative aggregate rules into generated behavior code.
//!
//! A behavior is an ordered list of [`Rule`]s plus namespace [`Variable`]s.
//! Compiling it against a [`ModelGraph`] checks every recorded event against
//! the aggregate's declared relations and yields a typed statement [`Block`],
//! which renders as the body of an asynchronous generator.

mod compile;
pub mod config;
pub mod emit;
mod error;
pub mod graph;
pub mod naming;
mod types;

pub use config::{compile_json, BehaviorConfig};
pub use emit::EmitOptions;
pub use error::RulegenError;
pub use graph::{MemoryGraph, ModelGraph, Node, NodeKind};
pub use types::{
    BehaviorBuilder, Block, CompileError, Condition, Diagnostic, Eval, Expression, Level, Mapping,
    Payload, Rule, Stmt, Then, Variable,
};

/// Compile `rules` owned by `node` into a statement block.
///
/// An empty rule list yields an empty block, whatever the variables. Otherwise
/// the block declares the variable namespace, then holds one statement per
/// rule in list order.
///
/// # Errors
///
/// Returns the first [`CompileError`] met in rule order; no partial block is
/// ever returned.
pub fn compile<G: ModelGraph + ?Sized>(
    node: &Node,
    graph: &G,
    rules: &[Rule],
    variables: &[Variable],
) -> Result<Block, CompileError> {
    compile::compile(node, graph, rules, variables)
}
