mod behavior;
mod diagnostic;
mod error;
mod expr;
mod rule;
mod stmt;

pub use behavior::BehaviorBuilder;
pub use diagnostic::{Diagnostic, Level};
pub use error::CompileError;
pub use expr::Expression;
pub use rule::{Condition, Mapping, Rule, Then, Variable};
pub use stmt::{Block, Eval, Payload, Stmt};
