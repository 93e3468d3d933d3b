use crate::error::DiagnosticKind;
use crate::flow::{Position, PropertyMap, WorkflowMeta};
use serde::Deserialize;
use serde_json::Value;

/// The payload of a `'@node-meta` comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct NodeMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub data: Option<PropertyMap>,
    #[serde(default)]
    pub properties: Option<PropertyMap>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub selected: Option<bool>,
    #[serde(default)]
    pub dragging: Option<bool>,
    /// Unrecognized top-level keys; merged onto the node's data.
    #[serde(flatten)]
    pub extra: PropertyMap,
}

pub(super) fn parse_node_meta(payload: &str) -> Result<NodeMeta, DiagnosticKind> {
    let value: Value = serde_json::from_str(payload.trim())
        .map_err(|e| DiagnosticKind::MalformedMetadata(e.to_string()))?;
    if !value.is_object() {
        return Err(DiagnosticKind::MetadataNotAnObject(json_type_name(&value).to_string()));
    }
    serde_json::from_value(value).map_err(|e| DiagnosticKind::InvalidMetadataFields(e.to_string()))
}

pub(super) fn parse_workflow_meta(payload: &str) -> Result<WorkflowMeta, DiagnosticKind> {
    serde_json::from_str(payload.trim())
        .map_err(|e| DiagnosticKind::MalformedWorkflowMetadata(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
