mod strategies;

use proptest::prelude::*;
use rulegen::{compile, CompileError, Rule, Then};
use strategies::{arb_behavior, arb_rule, arb_variables, graph, order, CONNECTED};

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// The same behavior compiled twice renders the same text.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(gen in arb_behavior()) {
        let graph = graph();
        let first = compile(&order(), &graph, &gen.rules, &gen.variables).unwrap();
        let again = compile(&order(), &graph, &gen.rules, &gen.variables).unwrap();
        prop_assert_eq!(first.to_string(), again.to_string());
        prop_assert_eq!(first, again);
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Shape
//
// No rules means an empty block. Otherwise one namespace declaration, then
// one statement per rule with a separator before each.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn empty_rules_are_empty_whatever_the_variables(variables in arb_variables()) {
        let block = compile(&order(), &graph(), &[], &variables).unwrap();
        prop_assert!(block.is_empty());
    }

    #[test]
    fn one_statement_per_rule(gen in arb_behavior()) {
        let block = compile(&order(), &graph(), &gen.rules, &gen.variables).unwrap();
        prop_assert_eq!(block.len(), 1 + 2 * gen.rules.len());
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Produced events
//
// Every recorded event shows up once, in rule order, as the class name of a
// connected event.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn produced_events_follow_rule_order(gen in arb_behavior()) {
        let block = compile(&order(), &graph(), &gen.rules, &gen.variables).unwrap();
        prop_assert_eq!(block.produced_events(), gen.recorded());
    }

    #[test]
    fn produced_events_are_connected(gen in arb_behavior()) {
        let block = compile(&order(), &graph(), &gen.rules, &gen.variables).unwrap();
        for event in block.produced_events() {
            prop_assert!(CONNECTED.iter().any(|(class, _)| *class == event));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Rejections
//
// A single bad leaf anywhere in the tree fails the whole compile.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn unconnected_event_anywhere_fails(
        mut gen in arb_behavior(),
        at in any::<prop::sample::Index>(),
    ) {
        let index = at.index(gen.rules.len() + 1);
        gen.rules.insert(index, Rule::always(Then::record_event("Order Archived", "x")));
        let err = compile(&order(), &graph(), &gen.rules, &gen.variables).unwrap_err();
        prop_assert!(
            matches!(err, CompileError::EventNotConnected { .. }),
            "unexpected error: {:?}", err
        );
    }

    #[test]
    fn qualified_event_name_fails(rule in arb_rule(), prefix in "[A-Z][a-z]{1,6}") {
        let qualified = format!("{prefix}.OrderPlaced");
        let rules = vec![
            rule,
            Rule::when("x", Then::execute_rules([
                Rule::always(Then::record_event(&qualified, "x")),
            ])),
        ];
        let err = compile(&order(), &graph(), &rules, &[]).unwrap_err();
        prop_assert!(
            matches!(err, CompileError::QualifiedEventName { .. }),
            "unexpected error: {:?}", err
        );
    }
}

#[test]
fn connecting_the_event_fixes_the_compile() {
    let rules = [Rule::always(Then::record_event("orderArchived", "x"))];
    let mut graph = graph();
    assert!(compile(&order(), &graph, &rules, &[]).is_err());

    graph.add_relation("order", "archived");
    let block = compile(&order(), &graph, &rules, &[]).unwrap();
    assert_eq!(block.produced_events(), ["OrderArchived"]);
}
