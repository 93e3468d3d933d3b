//! Text to graph: a single forward scan over an extended PlantUML document.
//!
//! Each trimmed line is either a metadata comment, another comment or
//! directive, part of a note block, or a statement from the grammar in
//! [`statement`]. A `'@node-meta` comment is held until the next statement that
//! creates a node and is consumed by it. The scan never fails; problems are
//! recorded as diagnostics on the [`ParsedFlow`].

use crate::error::{Diagnostic, DiagnosticKind};
use crate::flow::{
    Edge, EdgeData, FlowDocument, Node, NodeData, NodeKind, Position, PropertyMap, WorkflowMeta,
    edge_type_for_arrow,
};
use crate::properties::NodeProperties;
use crate::serializer::{NODE_META_PREFIX, WORKFLOW_META_PREFIX};
use ahash::AHashMap;
use serde_json::Value;
use tracing::{debug, warn};

pub mod classify;
mod connector;
mod metadata;
pub mod statement;

use classify::{classify_activity, derive_alias, shape_kind};
use metadata::{NodeMeta, parse_node_meta, parse_workflow_meta};
use statement::Statement;

/// The result of a parse pass. Always holds at least one node.
#[derive(Debug, Clone, Default)]
pub struct ParsedFlow {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    /// Contents of the `'@workflow-meta` comment, when present and valid.
    pub workflow: Option<WorkflowMeta>,
}

impl ParsedFlow {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_cycle(&self) -> bool {
        crate::flow::graph::has_cycle(&self.nodes, &self.edges)
    }

    pub fn into_document(self) -> FlowDocument {
        let name = self.workflow.map(|w| w.name).filter(|n| !n.is_empty());
        FlowDocument::new(name, self.nodes, self.edges)
    }
}

/// Parses PlantUML documents into flows. Build one with [`FlowParser::builder`].
#[derive(Debug, Clone)]
pub struct FlowParser {
    implicit_connections: bool,
    skip_notes: bool,
}

pub struct FlowParserBuilder {
    implicit_connections: bool,
    skip_notes: bool,
}

impl Default for FlowParserBuilder {
    fn default() -> Self {
        Self {
            implicit_connections: true,
            skip_notes: true,
        }
    }
}

impl FlowParserBuilder {
    /// Whether to chain activity/start/stop nodes with implicit edges after the scan.
    pub fn implicit_connections(mut self, enabled: bool) -> Self {
        self.implicit_connections = enabled;
        self
    }
    /// Whether `note ... end note` blocks are skipped rather than scanned as statements.
    pub fn skip_notes(mut self, enabled: bool) -> Self {
        self.skip_notes = enabled;
        self
    }
    pub fn build(self) -> FlowParser {
        FlowParser {
            implicit_connections: self.implicit_connections,
            skip_notes: self.skip_notes,
        }
    }
}

impl Default for FlowParser {
    fn default() -> Self {
        FlowParserBuilder::default().build()
    }
}

impl FlowParser {
    pub fn builder() -> FlowParserBuilder {
        FlowParserBuilder::default()
    }

    pub fn parse(&self, content: &str) -> ParsedFlow {
        debug!("Parsing PlantUML content ({} bytes)", content.len());

        if content.trim().is_empty() {
            let mut flow = ParsedFlow::default();
            flow.nodes.push(fallback_start_node());
            flow.warnings.push(Diagnostic::new(DiagnosticKind::EmptyDocument));
            warn!("{}", DiagnosticKind::EmptyDocument);
            return flow;
        }

        let mut scan = Scan::default();
        let mut open_note: Option<(usize, String)> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            let line_number = index + 1;

            if line.is_empty() {
                continue;
            }

            if open_note.is_some() {
                if is_note_end(line) {
                    open_note = None;
                }
                continue;
            }

            if let Some(payload) = line.strip_prefix(NODE_META_PREFIX) {
                match parse_node_meta(payload) {
                    Ok(meta) => scan.pending_meta = Some(meta),
                    Err(kind) => {
                        warn!("Line {}: {}", line_number, kind);
                        scan.errors.push(Diagnostic::at_line(kind, line_number, line));
                        scan.pending_meta = None;
                    }
                }
                continue;
            }

            if let Some(payload) = line.strip_prefix(WORKFLOW_META_PREFIX) {
                match parse_workflow_meta(payload) {
                    Ok(meta) => scan.workflow = Some(meta),
                    Err(kind) => {
                        warn!("Line {}: {}", line_number, kind);
                        scan.warnings.push(Diagnostic::at_line(kind, line_number, line));
                    }
                }
                continue;
            }

            if line.starts_with('\'') || line.starts_with('!') || line.starts_with('@') {
                continue;
            }

            if self.skip_notes {
                if is_note_start(line) {
                    if statement::opens_note_block(line) {
                        open_note = Some((line_number, line.to_string()));
                    }
                    continue;
                }
                if is_note_end(line) {
                    continue;
                }
            }

            if let Some(statement) = statement::recognize(line) {
                scan.apply(statement);
            }
        }

        if let Some((line_number, line)) = open_note {
            let kind = DiagnosticKind::UnterminatedNote;
            warn!("Line {}: {}", line_number, kind);
            scan.warnings.push(Diagnostic::at_line(kind, line_number, &line));
        }

        if self.implicit_connections {
            connector::connect_sequential(&scan.nodes, &mut scan.edges);
        }

        if scan.nodes.is_empty() {
            let kind = DiagnosticKind::NoNodesRecognized;
            warn!("{}", kind);
            scan.nodes.push(fallback_start_node());
            scan.warnings.push(Diagnostic::new(kind));
        }

        debug!(
            "Parsing complete: {} nodes, {} edges, {} errors, {} warnings",
            scan.nodes.len(),
            scan.edges.len(),
            scan.errors.len(),
            scan.warnings.len()
        );

        ParsedFlow {
            nodes: scan.nodes,
            edges: scan.edges,
            warnings: scan.warnings,
            errors: scan.errors,
            workflow: scan.workflow,
        }
    }
}

/// Parses a document with the default parser settings.
pub fn parse_plantuml_to_flow(content: &str) -> ParsedFlow {
    FlowParser::default().parse(content)
}

/// The node a caller gets when the document has nothing to show.
fn fallback_start_node() -> Node {
    let mut data = NodeData::labeled("Start").with_shape("rectangle");
    data.properties = NodeProperties::defaults_for(&NodeKind::Input).to_map();
    Node::new("start_node", NodeKind::Input, Position::new(100.0, 100.0), data)
}

fn is_note_start(line: &str) -> bool {
    line == "note" || line.starts_with("note ")
}

fn is_note_end(line: &str) -> bool {
    line == "end note" || line == "endnote"
}

/// What a node-producing statement contributes before metadata is applied.
struct NodeDraft {
    kind: NodeKind,
    alias: String,
    data: PropertyMap,
    properties: PropertyMap,
}

impl NodeDraft {
    fn new(kind: NodeKind, label: &str, alias: String, shape: &str) -> Self {
        let mut data = PropertyMap::new();
        data.insert("label".to_string(), Value::String(label.to_string()));
        data.insert("alias".to_string(), Value::String(alias.clone()));
        data.insert("shape".to_string(), Value::String(shape.to_string()));
        Self {
            kind,
            alias,
            data,
            properties: PropertyMap::new(),
        }
    }

    fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }
}

/// Mutable state of one parse pass.
#[derive(Default)]
struct Scan {
    node_counter: usize,
    edge_counter: usize,
    /// alias -> node id, scoped to this pass
    node_map: AHashMap<String, String>,
    pending_meta: Option<NodeMeta>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
    workflow: Option<WorkflowMeta>,
}

impl Scan {
    fn apply(&mut self, statement: Statement<'_>) {
        match statement {
            Statement::Activity { name } => {
                let draft = NodeDraft::new(classify_activity(name), name, derive_alias(name), "activity")
                    .with_data("activityType", Value::String(name.to_string()));
                self.push_node(draft);
            }
            Statement::Start => {
                self.push_node(NodeDraft::new(NodeKind::Input, "Start", "start".to_string(), "start"));
            }
            Statement::Stop => {
                self.push_node(NodeDraft::new(NodeKind::Output, "Stop", "stop".to_string(), "stop"));
            }
            Statement::Conditional {
                condition,
                yes_label,
            } => {
                let alias = format!("if_{}", self.node_counter + 1);
                let draft = NodeDraft::new(NodeKind::Conditional, condition, alias, "diamond")
                    .with_data("condition", Value::String(condition.to_string()))
                    .with_data("trueLabel", Value::String(yes_label.to_string()))
                    .with_data("falseLabel", Value::String("no".to_string()))
                    .with_property("condition", Value::String(condition.to_string()))
                    .with_property("trueLabel", Value::String(yes_label.to_string()))
                    .with_property("falseLabel", Value::String("no".to_string()));
                self.push_node(draft);
            }
            Statement::Label { name } => {
                self.push_node(NodeDraft::new(NodeKind::Default, name, name.to_string(), "label"));
            }
            Statement::Shape {
                keyword,
                label,
                alias,
            } => {
                let alias = alias.map(str::to_string).unwrap_or_else(|| derive_alias(label));
                self.push_node(NodeDraft::new(shape_kind(keyword), label, alias, keyword));
            }
            Statement::ActivityGoto { target } => {
                // Recognized so it is not mistaken for anything else; jumps are not wired yet.
                debug!("Ignoring activity goto to '{}'", target);
            }
            Statement::Connection {
                source,
                arrow,
                target,
                label,
            } => self.push_edge(source, arrow, target, label),
            Statement::Identifier { name } => {
                if !self.node_map.contains_key(name) {
                    self.push_node(NodeDraft::new(NodeKind::Default, name, name.to_string(), "rectangle"));
                }
            }
        }
    }

    /// Creates a node, consuming any pending metadata.
    ///
    /// Property precedence, lowest first: defaults for the resolved kind, the
    /// statement's own properties, metadata `data.properties`, metadata `properties`.
    fn push_node(&mut self, draft: NodeDraft) {
        self.node_counter += 1;
        let index = self.node_counter - 1;
        let meta = self.pending_meta.take().unwrap_or_default();

        let kind = meta
            .kind
            .as_deref()
            .map(NodeKind::from_tag)
            .unwrap_or(draft.kind);

        let mut properties = NodeProperties::defaults_for(&kind).to_map();
        properties.extend(draft.properties);

        let mut data = draft.data;
        if let Some(mut meta_data) = meta.data {
            if let Some(Value::Object(meta_properties)) = meta_data.remove("properties") {
                properties.extend(meta_properties);
            }
            data.extend(meta_data);
        }
        if let Some(meta_properties) = meta.properties {
            properties.extend(meta_properties);
        }
        data.extend(meta.extra);
        data.insert("properties".to_string(), Value::Object(properties));

        let id = meta
            .id
            .unwrap_or_else(|| format!("node_{}", self.node_counter));
        self.node_map.insert(draft.alias, id.clone());

        let mut node = Node::new(
            id,
            kind,
            meta.position.unwrap_or_else(|| Position::grid(index)),
            NodeData::from_map(data),
        );
        node.width = meta.width;
        node.height = meta.height;
        node.selected = meta.selected;
        node.dragging = meta.dragging;

        debug!("Created node '{}' ({}) labeled '{}'", node.id, node.kind, node.label());
        self.nodes.push(node);
    }

    /// Adds an explicit edge. Connections naming an alias not yet declared are dropped.
    fn push_edge(&mut self, source: &str, arrow: &str, target: &str, label: Option<&str>) {
        let (Some(source_id), Some(target_id)) = (self.node_map.get(source), self.node_map.get(target))
        else {
            debug!("Dropping connection '{} {} {}': unknown alias", source, arrow, target);
            return;
        };

        self.edge_counter += 1;
        self.edges.push(Edge {
            id: format!("edge_{}", self.edge_counter),
            source: source_id.clone(),
            target: target_id.clone(),
            kind: Some(edge_type_for_arrow(arrow).to_string()),
            label: label.map(str::to_string),
            data: EdgeData {
                arrow: Some(arrow.to_string()),
                original_label: label.map(str::to_string),
                ..EdgeData::default()
            },
        });
    }
}
