use super::node::PropertyMap;
use serde::{Deserialize, Serialize};

/// The default connection arrow.
pub const DEFAULT_ARROW: &str = "-->";

/// The `data` bag of an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// The arrow token the connection was written with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<String>,
    /// Set on edges inserted by the implicit connector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_label: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl EdgeData {
    pub fn arrow(&self) -> &str {
        self.arrow.as_deref().unwrap_or(DEFAULT_ARROW)
    }

    pub fn is_implicit(&self) -> bool {
        self.implicit.unwrap_or(false)
    }
}

/// A directed connection between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: None,
            label: None,
            data: EdgeData::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

/// Maps an arrow token to the edge rendering type.
pub fn edge_type_for_arrow(arrow: &str) -> &'static str {
    match arrow {
        "..>" | "...>" => "straight",
        _ => "default",
    }
}
