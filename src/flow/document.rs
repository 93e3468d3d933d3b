use super::{Edge, Node};
use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A workflow as stored by the editor: a name plus React-Flow nodes and edges.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FlowDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl FlowDocument {
    pub fn new(name: Option<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { name, nodes, edges }
    }

    /// Load a flow document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FlowError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FlowError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?).map_err(|source| FlowError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn has_cycle(&self) -> bool {
        super::graph::has_cycle(&self.nodes, &self.edges)
    }
}

/// Version of the extended PlantUML format written by this crate.
pub const FORMAT_VERSION: &str = "2.1.0";

/// Workflow-level summary stored in the `'@workflow-meta` comment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowMeta {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub version: String,
}

impl WorkflowMeta {
    pub fn new(name: &str, node_count: usize, edge_count: usize) -> Self {
        Self {
            name: name.to_string(),
            node_count,
            edge_count,
            version: FORMAT_VERSION.to_string(),
        }
    }
}
