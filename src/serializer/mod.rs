//! Graph to text: renders a workflow as an extended PlantUML document.
//!
//! Each node is written as a `'@node-meta <json>` comment followed by a shape
//! declaration. The JSON comment carries everything needed to rebuild the node;
//! the note blocks around it are for human readers only.

use crate::flow::{Edge, Node, PropertyMap, WorkflowMeta};
use crate::parser::statement::is_shape_keyword;
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use tracing::debug;

mod hints;

pub const NODE_META_PREFIX: &str = "'@node-meta ";
pub const WORKFLOW_META_PREFIX: &str = "'@workflow-meta ";
pub const DEFAULT_SHAPE: &str = "rectangle";
pub const DEFAULT_THEME: &str = "plain";

/// Renders flows to PlantUML. Build one with [`PlantUmlWriter::builder`].
#[derive(Debug, Clone)]
pub struct PlantUmlWriter {
    workflow_name: String,
    theme: String,
    notes: bool,
    workflow_meta: bool,
}

pub struct PlantUmlWriterBuilder {
    workflow_name: String,
    theme: String,
    notes: bool,
    workflow_meta: bool,
}

impl PlantUmlWriterBuilder {
    pub fn new(workflow_name: &str) -> Self {
        Self {
            workflow_name: single_line(workflow_name),
            theme: DEFAULT_THEME.to_string(),
            notes: true,
            workflow_meta: true,
        }
    }
    pub fn theme(mut self, theme: &str) -> Self {
        self.theme = theme.to_string();
        self
    }
    /// Whether to emit the `note` blocks describing nodes and edges.
    pub fn with_notes(mut self, notes: bool) -> Self {
        self.notes = notes;
        self
    }
    pub fn with_workflow_meta(mut self, workflow_meta: bool) -> Self {
        self.workflow_meta = workflow_meta;
        self
    }
    pub fn build(self) -> PlantUmlWriter {
        PlantUmlWriter {
            workflow_name: self.workflow_name,
            theme: self.theme,
            notes: self.notes,
            workflow_meta: self.workflow_meta,
        }
    }
}

impl PlantUmlWriter {
    pub fn builder(workflow_name: &str) -> PlantUmlWriterBuilder {
        PlantUmlWriterBuilder::new(workflow_name)
    }

    /// Renders the whole document. Never fails; missing fields are defaulted or omitted.
    pub fn write(&self, nodes: &[Node], edges: &[Edge]) -> String {
        let mut lines: Vec<String> = Vec::new();
        self.write_header(&mut lines, nodes.len(), edges.len());

        let aliases = assign_aliases(nodes);
        let mut written: AHashSet<&str> = AHashSet::with_capacity(nodes.len());
        for node in nodes {
            if !written.insert(node.id.as_str()) {
                continue;
            }
            if let Some(alias) = aliases.get(node.id.as_str()) {
                self.write_node(&mut lines, node, alias);
            }
        }

        if !nodes.is_empty() && !edges.is_empty() {
            lines.push("!-- Workflow Connections --!".to_string());
        }

        for edge in edges {
            match (
                aliases.get(edge.source.as_str()),
                aliases.get(edge.target.as_str()),
            ) {
                (Some(source), Some(target)) => self.write_edge(&mut lines, edge, source, target),
                _ => debug!(
                    "Skipping edge '{}': endpoint '{}' or '{}' is not in the node list",
                    edge.id, edge.source, edge.target
                ),
            }
        }

        lines.push(String::new());
        lines.push("!-- End AI-LEY Workflow --!".to_string());
        lines.push("@enduml".to_string());

        debug!(
            "Rendered workflow '{}' ({} nodes, {} edges) into {} lines",
            self.workflow_name,
            nodes.len(),
            edges.len(),
            lines.len()
        );
        lines.join("\n")
    }

    fn write_header(&self, lines: &mut Vec<String>, node_count: usize, edge_count: usize) {
        lines.push(format!("@startuml {}", self.workflow_name));
        lines.push(format!("!theme {}", self.theme));
        lines.push(String::new());
        lines.push(format!("title {}", self.workflow_name));
        lines.push(String::new());
        lines.push("!-- AI-LEY Workflow Execution Metadata --!".to_string());
        lines.push("!-- This PlantUML file contains all execution details --!".to_string());
        lines.push(
            "!-- Visual Editor Compatibility: Enhanced with node positions, types, and properties --!"
                .to_string(),
        );
        if self.workflow_meta {
            let meta = WorkflowMeta::new(&self.workflow_name, node_count, edge_count);
            if let Ok(json) = serde_json::to_string(&meta) {
                lines.push(format!("{}{}", WORKFLOW_META_PREFIX, json));
            }
        }
        lines.push(String::new());
    }

    fn write_node(&self, lines: &mut Vec<String>, node: &Node, alias: &str) {
        // the exact shape travels in the metadata; the declaration needs a keyword the parser knows
        let shape = node
            .data
            .shape
            .as_deref()
            .filter(|shape| is_shape_keyword(shape))
            .unwrap_or(DEFAULT_SHAPE);

        lines.push(format!(
            "{}{}",
            NODE_META_PREFIX,
            Value::Object(node_metadata(node))
        ));
        lines.push(format!(
            "{} \"{}\" as {}",
            shape,
            display_label(node.label()),
            alias
        ));

        let data = node.data.to_map();
        let has_details = data.keys().any(|k| k != "label" && k != "shape");
        if !self.notes || !has_details {
            return;
        }

        lines.push(format!("note right of {}", alias));
        lines.push(format!("  **Node Type:** {}", single_line(node.kind.as_str())));
        lines.push(format!("  **ID:** {}", single_line(&node.id)));
        lines.push(format!(
            "  **Position:** {},{}",
            format_number(node.position.x),
            format_number(node.position.y)
        ));
        for (key, value) in &data {
            if matches!(key.as_str(), "label" | "shape" | "alias") || is_blank(value) {
                continue;
            }
            lines.push(format!(
                "  **{}:** {}",
                single_line(key),
                format_note_value(value)
            ));
        }
        for hint in hints::execution_hints(node) {
            lines.push(format!("  {}", single_line(&hint)));
        }
        lines.push("end note".to_string());
        lines.push(String::new());
    }

    fn write_edge(&self, lines: &mut Vec<String>, edge: &Edge, source: &str, target: &str) {
        let arrow = edge.data.arrow();

        match &edge.label {
            Some(label) => lines.push(format!(
                "{} {} {} : \"{}\"",
                source,
                arrow,
                target,
                display_label(label)
            )),
            None => lines.push(format!("{} {} {}", source, arrow, target)),
        }

        if !self.notes {
            return;
        }
        let details: Vec<(String, Value)> = match serde_json::to_value(&edge.data) {
            Ok(Value::Object(map)) => map.into_iter().filter(|(k, _)| k != "arrow").collect(),
            _ => Vec::new(),
        };
        if details.is_empty() {
            return;
        }
        lines.push("note on link".to_string());
        lines.push(format!("  **Edge ID:** {}", single_line(&edge.id)));
        for (key, value) in details.iter().filter(|(_, v)| !is_blank(v)) {
            let text = match value {
                Value::String(s) => single_line(s),
                other => other.to_string(),
            };
            lines.push(format!("  **{}:** {}", single_line(key), text));
        }
        lines.push("end note".to_string());
    }
}

/// Renders a flow with the default writer settings.
pub fn flow_to_plantuml(nodes: &[Node], edges: &[Edge], workflow_name: &str) -> String {
    PlantUmlWriter::builder(workflow_name).build().write(nodes, edges)
}

/// The connection alias of a node: its id with every non-alphanumeric character removed.
pub fn node_alias(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Gives every node a distinct, non-empty alias.
///
/// Ids that reduce to the same alias get `_2`, `_3`, ... suffixes in document
/// order. An id with no ASCII alphanumerics falls back to `node<index>`. When an
/// id repeats, the first node keeps it and the later ones are not written.
fn assign_aliases(nodes: &[Node]) -> AHashMap<&str, String> {
    let mut aliases = AHashMap::with_capacity(nodes.len());
    let mut taken = AHashSet::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if aliases.contains_key(node.id.as_str()) {
            debug!("Skipping node with repeated id '{}'", node.id);
            continue;
        }
        let mut base = node_alias(&node.id);
        if base.is_empty() {
            base = format!("node{}", index + 1);
        }
        let mut alias = base.clone();
        let mut suffix = 2;
        while taken.contains(&alias) {
            alias = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        taken.insert(alias.clone());
        aliases.insert(node.id.as_str(), alias);
    }
    aliases
}

/// Builds the `'@node-meta` object, dropping null and empty-object values.
fn node_metadata(node: &Node) -> PropertyMap {
    let mut meta = PropertyMap::new();
    meta.insert("id".to_string(), Value::String(node.id.clone()));
    meta.insert("type".to_string(), Value::String(node.kind.to_string()));
    if let Ok(position) = serde_json::to_value(node.position) {
        meta.insert("position".to_string(), position);
    }
    meta.insert("data".to_string(), Value::Object(node.data.to_map()));
    meta.insert("width".to_string(), node.width.into());
    meta.insert("height".to_string(), node.height.into());
    meta.insert("selected".to_string(), node.selected.into());
    meta.insert("dragging".to_string(), node.dragging.into());

    meta.retain(|_, value| match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    });
    meta
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn format_note_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\n', "\\n").replace('\r', "\\r"),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Quotes cannot be escaped inside a PlantUML string, so they are swapped for
/// apostrophes. The exact label is kept in the metadata comment.
fn display_label(label: &str) -> String {
    label
        .replace('"', "'")
        .replace(['\r', '\n'], " ")
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{NodeData, NodeKind, Position};
    use serde_json::json;

    fn prompt_node() -> Node {
        Node::new(
            "prompt_node",
            NodeKind::CustomPrompt,
            Position::new(100.0, 250.0),
            NodeData::labeled("Custom Prompt")
                .with_shape("rectangle")
                .with_property("promptText", json!("Line 1\nLine 2")),
        )
    }

    #[test]
    fn test_alias_strips_non_alphanumerics() {
        assert_eq!(node_alias("custom_node-id.123"), "customnodeid123");
    }

    #[test]
    fn test_aliases_are_unique_and_never_empty() {
        let nodes: Vec<Node> = ["a-1", "a1", "a.1", "节点", "c"]
            .into_iter()
            .map(|id| Node::new(id, NodeKind::Default, Position::default(), NodeData::default()))
            .collect();
        let aliases = assign_aliases(&nodes);
        assert_eq!(aliases["a-1"], "a1");
        assert_eq!(aliases["a1"], "a1_2");
        assert_eq!(aliases["a.1"], "a1_3");
        assert_eq!(aliases["节点"], "node4");
        assert_eq!(aliases["c"], "c");
    }

    #[test]
    fn test_alias_fallback_does_not_clash_with_real_ids() {
        let nodes: Vec<Node> = ["node1", "--"]
            .into_iter()
            .map(|id| Node::new(id, NodeKind::Default, Position::default(), NodeData::default()))
            .collect();
        let aliases = assign_aliases(&nodes);
        assert_eq!(aliases["node1"], "node1");
        assert_eq!(aliases["--"], "node2");

        let nodes: Vec<Node> = ["", "node1"]
            .into_iter()
            .map(|id| Node::new(id, NodeKind::Default, Position::default(), NodeData::default()))
            .collect();
        let aliases = assign_aliases(&nodes);
        assert_eq!(aliases[""], "node1");
        assert_eq!(aliases["node1"], "node1_2");
    }

    #[test]
    fn test_repeated_id_is_written_once() {
        let first = Node::new("dup", NodeKind::Input, Position::default(), NodeData::labeled("First"));
        let second = Node::new("dup", NodeKind::Output, Position::default(), NodeData::labeled("Second"));
        let doc = flow_to_plantuml(&[first, second], &[], "Dups");
        assert!(doc.contains("rectangle \"First\" as dup"));
        assert!(!doc.contains("Second"));
    }

    #[test]
    fn test_unknown_shape_falls_back_to_rectangle() {
        let node = Node::new(
            "hex",
            NodeKind::Default,
            Position::default(),
            NodeData::labeled("Hex").with_shape("hexagon"),
        );
        let doc = flow_to_plantuml(&[node], &[], "Shapes");
        assert!(doc.contains("rectangle \"Hex\" as hex"));
        assert!(doc.contains(r#""shape":"hexagon""#));

        let node = Node::new(
            "multi",
            NodeKind::Default,
            Position::default(),
            NodeData::labeled("Multi").with_shape("cloud\nstop"),
        );
        let doc = flow_to_plantuml(&[node], &[], "Shapes");
        assert!(doc.contains("rectangle \"Multi\" as multi"));
        assert!(!doc.lines().any(|line| line == "stop"));
    }

    #[test]
    fn test_note_lines_stay_on_one_line() {
        let mut node = Node::new(
            "x\nend note\nstop",
            NodeKind::Other("odd\nkind".to_string()),
            Position::default(),
            NodeData::labeled("X").with_property("k", json!(1)),
        );
        node.data
            .extra
            .insert("bad\nkey".to_string(), json!("value"));
        let doc = flow_to_plantuml(&[node], &[], "Notes");
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines.iter().filter(|line| **line == "end note").count(), 1);
        assert!(!lines.contains(&"stop"));
        assert!(!lines.contains(&"kind"));
        assert!(doc.contains("  **ID:** x end note stop"));
        assert!(doc.contains("  **Node Type:** odd kind"));
        assert!(doc.contains("  **bad key:** value"));
    }

    #[test]
    fn test_metadata_drops_empty_values() {
        let node = Node::new("n", NodeKind::Input, Position::default(), NodeData::default());
        let meta = node_metadata(&node);
        assert!(!meta.contains_key("data"));
        assert!(!meta.contains_key("width"));
        assert_eq!(meta["type"], json!("input"));
    }

    #[test]
    fn test_shape_line_and_note_block() {
        let doc = flow_to_plantuml(&[prompt_node()], &[], "Demo");
        assert!(doc.starts_with("@startuml Demo\n!theme plain"));
        assert!(doc.contains("rectangle \"Custom Prompt\" as promptnode"));
        assert!(doc.contains("note right of promptnode"));
        assert!(doc.contains("  **Position:** 100,250"));
        assert!(doc.contains("  **Execution:** Execute custom prompt"));
        assert!(doc.ends_with("@enduml"));
        assert!(!doc.contains("Workflow Connections"));
    }

    #[test]
    fn test_properties_object_is_json_in_note() {
        let doc = flow_to_plantuml(&[prompt_node()], &[], "Demo");
        assert!(doc.contains(r#"  **properties:** {"promptText":"Line 1\nLine 2"}"#));
    }

    #[test]
    fn test_label_only_node_has_no_note() {
        let node = Node::new(
            "plain",
            NodeKind::Default,
            Position::default(),
            NodeData::labeled("Plain").with_shape("rectangle"),
        );
        let doc = flow_to_plantuml(&[node], &[], "Demo");
        assert!(!doc.contains("note right of"));
    }

    #[test]
    fn test_writer_without_notes() {
        let writer = PlantUmlWriter::builder("Quiet")
            .with_notes(false)
            .with_workflow_meta(false)
            .theme("cerulean")
            .build();
        let doc = writer.write(&[prompt_node()], &[]);
        assert!(doc.contains("!theme cerulean"));
        assert!(!doc.contains("note right of"));
        assert!(!doc.contains(WORKFLOW_META_PREFIX));
    }

    #[test]
    fn test_edge_with_label_and_dangling_edge() {
        let a = Node::new("a", NodeKind::Input, Position::default(), NodeData::labeled("A"));
        let b = Node::new("b", NodeKind::Output, Position::default(), NodeData::labeled("B"));
        let mut edge = Edge::new("e1", "a", "b").with_label("say \"hi\"");
        edge.data.arrow = Some("..>".to_string());
        let dangling = Edge::new("e2", "a", "missing");
        let doc = flow_to_plantuml(&[a, b], &[edge, dangling], "Edges");
        assert!(doc.contains("!-- Workflow Connections --!"));
        assert!(doc.contains("a ..> b : \"say 'hi'\""));
        assert!(!doc.contains("missing"));
    }

    #[test]
    fn test_edge_note_lists_extra_data() {
        let a = Node::new("a", NodeKind::Input, Position::default(), NodeData::labeled("A"));
        let b = Node::new("b", NodeKind::Output, Position::default(), NodeData::labeled("B"));
        let mut edge = Edge::new("e1", "a", "b");
        edge.data.implicit = Some(true);
        let doc = flow_to_plantuml(&[a, b], &[edge], "Edges");
        assert!(doc.contains("a --> b\nnote on link\n  **Edge ID:** e1\n  **implicit:** true\nend note"));
    }

    #[test]
    fn test_edge_id_is_single_line() {
        let a = Node::new("a", NodeKind::Input, Position::default(), NodeData::labeled("A"));
        let b = Node::new("b", NodeKind::Output, Position::default(), NodeData::labeled("B"));
        let mut edge = Edge::new("e\nend note", "a", "b");
        edge.data.implicit = Some(true);
        let doc = flow_to_plantuml(&[a, b], &[edge], "Edges");
        assert!(doc.contains("  **Edge ID:** e end note\n"));
        assert_eq!(doc.lines().filter(|line| *line == "end note").count(), 1);
    }
}
