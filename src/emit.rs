//! Text emission of generated statement blocks.
//!
//! The target is the body of an asynchronous generator: expressions are
//! awaited through the evaluator and events are handed out with `yield`.

use crate::{Block, Eval, Payload, Stmt};

/// Layout and naming of the emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Name of the variable namespace.
    pub namespace: String,
    /// Name of the asynchronous expression evaluator.
    pub evaluator: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            namespace: "ctx".to_owned(),
            evaluator: "evaluate".to_owned(),
        }
    }
}

impl EmitOptions {
    #[must_use]
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    #[must_use]
    pub fn namespace(mut self, name: &str) -> Self {
        self.namespace = name.to_owned();
        self
    }

    #[must_use]
    pub fn evaluator(mut self, name: &str) -> Self {
        self.evaluator = name.to_owned();
        self
    }
}

/// Render `block` as source text. An empty block renders as an empty string;
/// otherwise every line, including the last, ends with a newline.
#[must_use]
pub fn render(block: &Block, options: &EmitOptions) -> String {
    let mut emitter = Emitter {
        options,
        out: String::new(),
        depth: 0,
    };
    emitter.block(block);
    emitter.out
}

struct Emitter<'a> {
    options: &'a EmitOptions,
    out: String,
    depth: usize,
}

impl Emitter<'_> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth * self.options.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, block: &Block) {
        self.depth += 1;
        self.block(block);
        self.depth -= 1;
    }

    fn block(&mut self, block: &Block) {
        for stmt in block.stmts() {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::DeclareNamespace { bindings } => {
                let ns = &self.options.namespace;
                self.line(&format!("const {ns} = {{}};"));
                for (name, init) in bindings {
                    let target = format!("{ns}{}", member(name));
                    let value = self.eval(init);
                    self.line(&format!("{target} = {value};"));
                }
            }
            Stmt::If {
                test,
                negated,
                body,
            } => {
                let test = self.eval(test);
                if *negated {
                    self.line(&format!("if (!({test})) {{"));
                } else {
                    self.line(&format!("if ({test}) {{"));
                }
                self.nested(body);
                self.line("}");
            }
            Stmt::Scope(body) => {
                self.line("{");
                self.nested(body);
                self.line("}");
            }
            Stmt::Produce {
                service,
                event,
                payload,
            } => self.produce(service, event, payload),
            Stmt::Return => self.line("return;"),
            Stmt::Separator => self.out.push('\n'),
        }
    }

    fn produce(&mut self, service: &str, event: &str, payload: &Payload) {
        match payload {
            Payload::Whole(eval) => {
                let value = self.eval(eval);
                self.line(&format!("yield new {service}.{event}({value});"));
            }
            Payload::Record(fields) if fields.is_empty() => {
                self.line(&format!("yield new {service}.{event}({{}});"));
            }
            Payload::Record(fields) => {
                self.line(&format!("yield new {service}.{event}({{"));
                self.depth += 1;
                for (name, eval) in fields {
                    let value = self.eval(eval);
                    self.line(&format!("{}: {value},", key(name)));
                }
                self.depth -= 1;
                self.line("});");
            }
        }
    }

    fn eval(&self, eval: &Eval) -> String {
        format!(
            "await {}({}, {})",
            self.options.evaluator,
            string_literal(eval.expression().as_str()),
            self.options.namespace
        )
    }
}

fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn member(name: &str) -> String {
    if is_identifier(name) {
        format!(".{name}")
    } else {
        format!("[{}]", string_literal(name))
    }
}

/// Object literal key. `__proto__`, bare or quoted, sets the prototype in a
/// literal, so it is only stored as an own field in computed form.
fn key(name: &str) -> String {
    if name == "__proto__" {
        format!("[{}]", string_literal(name))
    } else if is_identifier(name) {
        name.to_owned()
    } else {
        string_literal(name)
    }
}
