use std::collections::HashSet;

use crate::graph::{ModelGraph, Node, NodeKind};
use crate::naming::{identifier_forms, same_class};
use crate::{Block, CompileError, Condition, Eval, Mapping, Payload, Rule, Stmt, Then, Variable};

/// Separates a name from its service or aggregate qualifier.
const QUALIFIER_SEPARATOR: char = '.';

/// Assigning this key sets the prototype of the namespace object.
const RESERVED_VARIABLE: &str = "__proto__";

pub(crate) fn compile<G: ModelGraph + ?Sized>(
    node: &Node,
    graph: &G,
    rules: &[Rule],
    variables: &[Variable],
) -> Result<Block, CompileError> {
    if rules.is_empty() {
        tracing::debug!(%node, "no rules; emitting empty behavior");
        return Ok(Block::empty());
    }

    tracing::debug!(%node, rules = rules.len(), variables = variables.len(), "compiling rules");

    let result = translate(node, graph, rules, variables);

    match &result {
        Ok(block) => tracing::debug!(%node, statements = block.len(), "compiled rules"),
        Err(err) => tracing::debug!(%node, error = %err, "rule compilation failed"),
    }
    result
}

fn translate<G: ModelGraph + ?Sized>(
    node: &Node,
    graph: &G,
    rules: &[Rule],
    variables: &[Variable],
) -> Result<Block, CompileError> {
    check_variables(node, variables)?;

    let compiler = Compiler { node, graph };
    let mut stmts = vec![declare_namespace(variables), Stmt::Separator];
    stmts.extend(compiler.convert_rules(rules)?);
    Ok(Block::new(stmts))
}

fn check_variables(node: &Node, variables: &[Variable]) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for variable in variables {
        if variable.name == RESERVED_VARIABLE {
            return Err(CompileError::ReservedVariableName {
                node: node.to_string(),
                name: variable.name.clone(),
            });
        }
        if !seen.insert(variable.name.as_str()) {
            return Err(CompileError::DuplicateVariable {
                node: node.to_string(),
                name: variable.name.clone(),
            });
        }
    }
    Ok(())
}

fn declare_namespace(variables: &[Variable]) -> Stmt {
    Stmt::DeclareNamespace {
        bindings: variables
            .iter()
            .map(|v| (v.name.clone(), Eval(v.initializer.clone())))
            .collect(),
    }
}

/// One translation pass over the rules of `node`.
struct Compiler<'a, G: ?Sized> {
    node: &'a Node,
    graph: &'a G,
}

impl<G: ModelGraph + ?Sized> Compiler<'_, G> {
    /// Rules in list order, separated by blank lines.
    fn convert_rules(&self, rules: &[Rule]) -> Result<Vec<Stmt>, CompileError> {
        let mut stmts = Vec::with_capacity(rules.len() * 2);
        for (i, rule) in rules.iter().enumerate() {
            if i > 0 {
                stmts.push(Stmt::Separator);
            }
            stmts.push(self.convert_rule(rule)?);
        }
        Ok(stmts)
    }

    fn convert_rule(&self, rule: &Rule) -> Result<Stmt, CompileError> {
        match rule {
            Rule::Always { then } => {
                tracing::trace!(node = %self.node, "always rule");
                self.convert_then(then)
            }
            Rule::Condition {
                condition,
                then,
                stop,
            } => {
                let (test, negated) = match condition {
                    Condition::If(expr) => (Eval(expr.clone()), false),
                    Condition::IfNot(expr) => (Eval(expr.clone()), true),
                };
                tracing::trace!(
                    node = %self.node,
                    condition = %test.0,
                    negated,
                    stop,
                    "condition rule"
                );

                let mut body = vec![self.convert_then(then)?];
                // `return` leaves the whole behavior, not only this rule list.
                if *stop {
                    body.push(Stmt::Return);
                }
                Ok(Stmt::If {
                    test,
                    negated,
                    body: Block::new(body),
                })
            }
        }
    }

    fn convert_then(&self, then: &Then) -> Result<Stmt, CompileError> {
        match then {
            Then::RecordEvent {
                event_name,
                mapping,
            } => self.convert_then_record_event(event_name, mapping),
            Then::ExecuteRules { rules } => Ok(Stmt::Scope(Block::new(self.convert_rules(rules)?))),
        }
    }

    fn convert_then_record_event(
        &self,
        event_name: &str,
        mapping: &Mapping,
    ) -> Result<Stmt, CompileError> {
        let service = self.graph.owning_service(self.node)?;

        if event_name.contains(QUALIFIER_SEPARATOR) {
            return Err(CompileError::QualifiedEventName {
                node: self.node.to_string(),
                event: event_name.to_owned(),
            });
        }

        let declared = self.graph.outgoing_targets(self.node, NodeKind::Event)?;
        let event = declared
            .iter()
            .find(|target| same_class(&target.name, event_name))
            .ok_or_else(|| CompileError::EventNotConnected {
                node: self.node.to_string(),
                event: event_name.to_owned(),
            })?;

        let payload = convert_mapping(mapping);

        Ok(Stmt::Produce {
            service: self.class_name(&service)?,
            event: self.class_name(&event.name)?,
            payload,
        })
    }

    /// Class name of a model element, usable as a member reference.
    fn class_name(&self, name: &str) -> Result<String, CompileError> {
        let class_name = identifier_forms(name).class_name;
        if class_name.chars().next().is_some_and(char::is_alphabetic) {
            Ok(class_name)
        } else {
            Err(CompileError::InvalidClassName {
                node: self.node.to_string(),
                name: name.to_owned(),
                class_name,
            })
        }
    }
}

fn convert_mapping(mapping: &Mapping) -> Payload {
    match mapping {
        Mapping::Expression(expr) => Payload::Whole(Eval(expr.clone())),
        Mapping::Fields(fields) => Payload::Record(
            fields
                .iter()
                .map(|(name, expr)| (name.clone(), Eval(expr.clone())))
                .collect(),
        ),
    }
}
