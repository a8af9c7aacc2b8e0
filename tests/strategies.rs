use proptest::prelude::*;
use rulegen::{MemoryGraph, Node, Rule, Then, Variable};

// --- Fixed model ---
// service   "Fulfilment"
// aggregate "Order"
// events    "Order Placed", "Order Shipped", "Order Cancelled" (related to Order)
//           "Order Archived" (not related)

/// Connected events, each with several spellings of the same class.
pub const CONNECTED: &[(&str, &[&str])] = &[
    ("OrderPlaced", &["Order Placed", "OrderPlaced", "orderPlaced", "ORDER_PLACED"]),
    ("OrderShipped", &["Order Shipped", "order-shipped", "orderShipped"]),
    ("OrderCancelled", &["Order Cancelled", "OrderCancelled", "order cancelled"]),
];

pub const UNCONNECTED: &str = "OrderArchived";

const CONDITIONS: &[&str] = &["total > 100", "express", "items.length == 0", "customer.vip"];

pub fn graph() -> MemoryGraph {
    MemoryGraph::builder()
        .node(Node::service("svc", "Fulfilment"))
        .node(Node::aggregate("order", "Order"))
        .node(Node::event("placed", "Order Placed"))
        .node(Node::event("shipped", "Order Shipped"))
        .node(Node::event("cancelled", "Order Cancelled"))
        .node(Node::event("archived", "Order Archived"))
        .contains("svc", "order")
        .relation("order", "placed")
        .relation("order", "shipped")
        .relation("order", "cancelled")
        .build()
}

pub fn order() -> Node {
    Node::aggregate("order", "Order")
}

/// A generated behavior.
#[derive(Debug, Clone)]
pub struct GenBehavior {
    pub rules: Vec<Rule>,
    pub variables: Vec<Variable>,
}

impl GenBehavior {
    /// Class names of every recorded event, depth first.
    pub fn recorded(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        collect(&self.rules, &mut out);
        out
    }
}

fn collect(rules: &[Rule], out: &mut Vec<&'static str>) {
    for rule in rules {
        match rule.then() {
            Then::RecordEvent { event_name, .. } => {
                let class = CONNECTED
                    .iter()
                    .find(|(_, spellings)| spellings.contains(&event_name.as_str()))
                    .map_or(UNCONNECTED, |(class, _)| *class);
                out.push(class);
            }
            Then::ExecuteRules { rules } => collect(rules, out),
        }
    }
}

/// A record-event action on one of the connected events, in any spelling.
fn arb_record_event() -> impl Strategy<Value = Then> {
    (prop::sample::select(CONNECTED), any::<prop::sample::Index>(), any::<bool>()).prop_map(
        |((_, spellings), index, whole)| {
            let name = spellings[index.index(spellings.len())];
            if whole {
                Then::record_event(name, "{ id: id }")
            } else {
                Then::record_event(name, rulegen::Mapping::fields([("id", "id"), ("at", "now()")]))
            }
        },
    )
}

fn wrap(then: Then) -> impl Strategy<Value = Rule> {
    (
        0_u8..3,
        prop::sample::select(CONDITIONS),
        any::<bool>(),
    )
        .prop_map(move |(kind, condition, stop)| match kind {
            0 => Rule::always(then.clone()),
            1 => {
                let rule = Rule::when(condition, then.clone());
                if stop { rule.stop() } else { rule }
            }
            _ => {
                let rule = Rule::unless(condition, then.clone());
                if stop { rule.stop() } else { rule }
            }
        })
}

/// A rule tree whose record-event leaves all target connected events.
pub fn arb_rule() -> impl Strategy<Value = Rule> {
    let leaf = arb_record_event().prop_flat_map(wrap);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4)
            .prop_flat_map(|rules| wrap(Then::execute_rules(rules)))
    })
}

/// Variables with distinct names.
pub fn arb_variables() -> impl Strategy<Value = Vec<Variable>> {
    prop::collection::btree_set("[a-z][a-zA-Z0-9]{0,6}", 0..5).prop_map(|names| {
        names
            .into_iter()
            .map(|name| Variable::new(&name, format!("lookup('{name}')")))
            .collect()
    })
}

pub fn arb_behavior() -> impl Strategy<Value = GenBehavior> {
    (prop::collection::vec(arb_rule(), 1..6), arb_variables())
        .prop_map(|(rules, variables)| GenBehavior { rules, variables })
}
