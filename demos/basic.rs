use rulegen::{BehaviorConfig, EmitOptions, MemoryGraph, Node};

fn main() -> Result<(), rulegen::RulegenError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let graph = MemoryGraph::builder()
        .node(Node::service("svc", "Order Service"))
        .node(Node::aggregate("order", "Order"))
        .node(Node::event("placed", "Order Placed"))
        .node(Node::event("flagged", "Order Flagged"))
        .contains("svc", "order")
        .relation("order", "placed")
        .relation("order", "flagged")
        .build();

    let config = BehaviorConfig::from_json(
        r#"{
            "variables": [
                { "name": "total", "initializer": "sum(command.lines, 'price')" }
            ],
            "rules": [
                { "type": "condition", "if": "total > 10000", "stop": true,
                  "then": { "recordEvent": { "eventName": "Order Flagged",
                                             "mapping": { "reason": "'manual review'" } } } },
                { "type": "always",
                  "then": { "recordEvent": { "eventName": "OrderPlaced",
                                             "mapping": { "orderId": "command.id", "total": "total" } } } }
            ]
        }"#,
    )?;

    let block = config.compile(&Node::aggregate("order", "Order"), &graph)?;

    println!("=== Events ===");
    for event in block.produced_events() {
        println!("  {event}");
    }

    println!("\n=== Behavior ===");
    print!("{block}");

    println!("\n=== Behavior (two-space indent, `state` namespace) ===");
    print!(
        "{}",
        block.render_with(&EmitOptions::default().indent(2).namespace("state"))
    );

    Ok(())
}
