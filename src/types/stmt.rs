use std::fmt;

use super::expr::Expression;

/// Generated statement block: the body of an aggregate behavior.
///
/// The block is a small typed statement tree. It is turned into text by a
/// single emission pass, see [`render()`](crate::emit::render) or the
/// `Display` impl, which uses the default [`EmitOptions`](crate::EmitOptions).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    stmts: Vec<Stmt>,
}

/// A statement of the generated behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Fresh variable namespace, initialized binding by binding so later
    /// initializers see earlier variables.
    DeclareNamespace { bindings: Vec<(String, Eval)> },
    /// Conditional; `negated` inverts the test.
    If {
        test: Eval,
        negated: bool,
        body: Block,
    },
    /// Nested rule list.
    Scope(Block),
    /// Suspension point handing a constructed event to the caller.
    Produce {
        service: String,
        event: String,
        payload: Payload,
    },
    /// Leaves the whole behavior.
    Return,
    /// Blank line between rules. No semantics.
    Separator,
}

/// Asynchronous evaluation of an expression against the current namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eval(pub Expression);

/// Event payload built from evaluations.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Whole(Eval),
    Record(Vec<(String, Eval)>),
}

impl Block {
    #[must_use]
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Event class names this block may produce, in emission order,
    /// descending into conditionals and scopes.
    #[must_use]
    pub fn produced_events(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_events(self, &mut out);
        out
    }

    /// Render with a custom [`EmitOptions`](crate::EmitOptions).
    #[must_use]
    pub fn render_with(&self, options: &crate::EmitOptions) -> String {
        crate::emit::render(self, options)
    }
}

fn collect_events<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
    for stmt in &block.stmts {
        match stmt {
            Stmt::Produce { event, .. } => out.push(event.as_str()),
            Stmt::If { body, .. } | Stmt::Scope(body) => collect_events(body, out),
            Stmt::DeclareNamespace { .. } | Stmt::Return | Stmt::Separator => {}
        }
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self::new(stmts)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::emit::render(self, &crate::EmitOptions::default()))
    }
}

impl Eval {
    pub fn new(expr: impl Into<Expression>) -> Self {
        Self(expr.into())
    }

    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.0
    }
}
