//! Common test utilities for building workflow graphs and documents.
use flowuml::prelude::*;
use serde_json::json;

/// Creates a node with a label, default data and the given position.
#[allow(dead_code)]
pub fn node(id: &str, kind: &str, x: f64, y: f64) -> Node {
    Node::new(
        id,
        NodeKind::from_tag(kind),
        Position::new(x, y),
        NodeData::labeled(format!("Label of {}", id)),
    )
}

/// A linear chain of `count` default nodes joined by `count - 1` edges.
#[allow(dead_code)]
pub fn chain(count: usize) -> (Vec<Node>, Vec<Edge>) {
    let nodes: Vec<Node> = (0..count)
        .map(|i| node(&format!("step-{}", i), "instruction", i as f64 * 200.0, 0.0))
        .collect();
    let edges = nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Edge::new(format!("e{}", i), &pair[0].id, &pair[1].id))
        .collect();
    (nodes, edges)
}

/// A persona node with nested and array-valued properties.
#[allow(dead_code)]
pub fn rich_persona() -> Node {
    let mut data = NodeData::labeled("Code \"Reviewer\"\nsenior");
    data.properties = default_properties_for_node_type("persona");
    data.properties.insert("tone".to_string(), json!("formal"));
    data.properties.insert("languages".to_string(), json!(["rust", "go"]));
    data.properties
        .insert("limits".to_string(), json!({ "maxTokens": 2048, "strict": true }));
    data.extra.insert("color".to_string(), json!("#ff8800"));

    let mut node = Node::new("persona_42", NodeKind::Persona, Position::new(12.5, -40.0), data);
    node.width = Some(180.0);
    node.height = Some(64.0);
    node
}

/// A hand-written activity diagram with no metadata.
#[allow(dead_code)]
pub const HAND_WRITTEN_DIAGRAM: &str = r#"@startuml
title Release
start
:Gather requirements;
:Build artifacts;
if (tests pass?) then (yes)
:Launch release;
stop
@enduml"#;

/// A legacy component diagram using shape declarations and explicit arrows.
#[allow(dead_code)]
pub const LEGACY_DIAGRAM: &str = r#"@startuml
actor "User" as user
component "API Gateway" as api
database "Results" as db
cloud "Remote Model"
user --> api : "request"
api ..> db
api -> remotemodel
api --> ghost
@enduml"#;
