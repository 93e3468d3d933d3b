//! Round-trip checking: compares a flow with the flow that came back from a conversion.
//!
//! Nodes are matched by id. Edges are matched by id when the endpoints agree,
//! otherwise by their `(source, target)` pair, since parsed edges get fresh ids.

use crate::error::{Discrepancy, Severity};
use crate::flow::{Edge, Node, PropertyMap};
use crate::properties::NodeProperties;
use crate::serializer::DEFAULT_SHAPE;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;

/// Positions closer than this many pixels count as unchanged.
pub const POSITION_TOLERANCE: f64 = 5.0;

/// Editor state that never affects a conversion.
const TRANSIENT_KEYS: &[&str] = &["selected", "dragging"];

/// How many errors [`ValidationReport`]'s `Display` lists before summarizing the rest.
const LISTED_ERRORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationSummary {
    pub nodes_matched: usize,
    pub nodes_total: usize,
    pub edges_matched: usize,
    pub edges_total: usize,
    /// Average distance between original and converted positions, rounded to two decimals.
    pub position_drift: f64,
    pub properties_mismatch: usize,
}

/// The outcome of [`validate_conversion`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    /// No errors, and every original node and edge was matched cleanly.
    pub valid: bool,
    pub issues: Vec<Discrepancy>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Discrepancy> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.summary;
        if self.valid {
            writeln!(f, "Conversion validated successfully")?;
        } else {
            writeln!(f, "Conversion validation failed")?;
        }
        writeln!(
            f,
            "- Nodes: {}/{} matched",
            summary.nodes_matched, summary.nodes_total
        )?;
        write!(
            f,
            "- Edges: {}/{} matched",
            summary.edges_matched, summary.edges_total
        )?;
        if self.valid {
            return write!(f, "\n- Avg position drift: {}px", summary.position_drift);
        }

        let errors = self.count(Severity::Error);
        write!(
            f,
            "\n- {} error(s), {} warning(s)",
            errors,
            self.count(Severity::Warning)
        )?;
        if errors > 0 {
            write!(f, "\n\nErrors:")?;
            for error in self.errors().take(LISTED_ERRORS) {
                write!(f, "\n- {}", error)?;
            }
            if errors > LISTED_ERRORS {
                write!(f, "\n- ... and {} more", errors - LISTED_ERRORS)?;
            }
        }
        Ok(())
    }
}

/// Compares an original graph with its converted counterpart.
///
/// Keys the parser fills in on its own (the alias, the default shape, the id as
/// label, default property values) are not counted as data changes when the
/// original left them out.
pub fn validate_conversion(
    original_nodes: &[Node],
    original_edges: &[Edge],
    converted_nodes: &[Node],
    converted_edges: &[Edge],
) -> ValidationReport {
    let mut issues = Vec::new();

    if original_nodes.len() != converted_nodes.len() {
        issues.push(Discrepancy::NodeCount {
            original: original_nodes.len(),
            converted: converted_nodes.len(),
        });
    }
    if original_edges.len() != converted_edges.len() {
        issues.push(Discrepancy::EdgeCount {
            original: original_edges.len(),
            converted: converted_edges.len(),
        });
    }

    let mut summary = ValidationSummary {
        nodes_total: original_nodes.len(),
        edges_total: original_edges.len(),
        ..ValidationSummary::default()
    };

    let converted_by_id: AHashMap<&str, &Node> = converted_nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    let mut total_drift = 0.0;
    for original in original_nodes {
        let Some(converted) = converted_by_id.get(original.id.as_str()) else {
            issues.push(Discrepancy::NodeLost(original.id.clone()));
            continue;
        };

        let mut matched = true;
        if original.kind != converted.kind {
            issues.push(Discrepancy::NodeTypeChanged {
                id: original.id.clone(),
                original: original.kind.to_string(),
                converted: converted.kind.to_string(),
            });
            matched = false;
        }

        let drift = (converted.position.x - original.position.x)
            .hypot(converted.position.y - original.position.y);
        total_drift += drift;
        if drift > POSITION_TOLERANCE {
            issues.push(Discrepancy::PositionDrift {
                id: original.id.clone(),
                drift,
            });
            matched = false;
        }

        if !same_node_data(original, converted) {
            issues.push(Discrepancy::NodeDataMismatch(original.id.clone()));
            summary.properties_mismatch += 1;
            matched = false;
        }

        if original.width != converted.width || original.height != converted.height {
            issues.push(Discrepancy::DimensionsChanged(original.id.clone()));
        }

        if matched {
            summary.nodes_matched += 1;
        }
    }

    for original in original_edges {
        let Some(converted) = find_counterpart(original, converted_edges) else {
            issues.push(Discrepancy::EdgeLost {
                id: original.id.clone(),
                from: original.source.clone(),
                to: original.target.clone(),
            });
            continue;
        };

        let mut matched = true;
        if !original.connects(&converted.source, &converted.target) {
            issues.push(Discrepancy::EdgeConnectionChanged {
                id: original.id.clone(),
                original: format!("{} -> {}", original.source, original.target),
                converted: format!("{} -> {}", converted.source, converted.target),
            });
            matched = false;
        }
        if original.label != converted.label {
            issues.push(Discrepancy::EdgeLabelChanged {
                id: original.id.clone(),
                original: original.label.clone(),
                converted: converted.label.clone(),
            });
        }
        if !same_edge_data(original, converted) {
            issues.push(Discrepancy::EdgeDataMismatch(original.id.clone()));
        }

        if matched {
            summary.edges_matched += 1;
        }
    }

    for converted in converted_nodes {
        if !original_nodes.iter().any(|node| node.id == converted.id) {
            issues.push(Discrepancy::ExtraNode(converted.id.clone()));
        }
    }
    for converted in converted_edges {
        let known = original_edges
            .iter()
            .any(|edge| edge.id == converted.id || edge.connects(&converted.source, &converted.target));
        if !known {
            issues.push(Discrepancy::ExtraEdge {
                id: converted.id.clone(),
                from: converted.source.clone(),
                to: converted.target.clone(),
            });
        }
    }

    if !original_nodes.is_empty() {
        let average = total_drift / original_nodes.len() as f64;
        summary.position_drift = (average * 100.0).round() / 100.0;
    }

    let valid = !issues.iter().any(|issue| issue.severity() == Severity::Error)
        && summary.nodes_matched == summary.nodes_total
        && summary.edges_matched == summary.edges_total;

    ValidationReport {
        valid,
        issues,
        summary,
    }
}

/// An id match with the same endpoints, then any edge with the same endpoints,
/// then an id match whose endpoints moved.
fn find_counterpart<'a>(original: &Edge, converted: &'a [Edge]) -> Option<&'a Edge> {
    let by_id = converted.iter().find(|edge| edge.id == original.id);
    by_id
        .filter(|edge| edge.connects(&original.source, &original.target))
        .or_else(|| {
            converted
                .iter()
                .find(|edge| edge.connects(&original.source, &original.target))
        })
        .or(by_id)
}

fn same_node_data(original: &Node, converted: &Node) -> bool {
    let mut expected = original.data.to_map();
    let mut actual = converted.data.to_map();
    for key in TRANSIENT_KEYS {
        expected.remove(*key);
        actual.remove(*key);
    }

    if !expected.contains_key("alias") {
        actual.remove("alias");
    }
    if !expected.contains_key("shape") && actual.get("shape") == Some(&Value::from(DEFAULT_SHAPE)) {
        actual.remove("shape");
    }
    if !expected.contains_key("label") && actual.get("label") == Some(&Value::from(original.id.as_str())) {
        actual.remove("label");
    }

    let empty = PropertyMap::new();
    let original_properties = match expected.get("properties") {
        Some(Value::Object(map)) => map,
        _ => &empty,
    };
    if let Some(Value::Object(properties)) = actual.get_mut("properties") {
        let defaults = NodeProperties::defaults_for(&original.kind).to_map();
        properties.retain(|key, value| {
            original_properties.contains_key(key) || defaults.get(key) != Some(&*value)
        });
        if properties.is_empty() {
            actual.remove("properties");
        }
    }

    expected == actual
}

fn same_edge_data(original: &Edge, converted: &Edge) -> bool {
    let (expected, actual) = (&original.data, &converted.data);
    expected.arrow() == actual.arrow()
        && expected.is_implicit() == actual.is_implicit()
        && expected.extra == actual.extra
        && (expected.original_label.is_none() || expected.original_label == actual.original_label)
}
