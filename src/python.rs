use crate::flow::FlowDocument;
use crate::parser::parse_plantuml_to_flow;
use crate::properties::default_properties_for_node_type;
use crate::serializer::flow_to_plantuml;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde_json::{Value, json};

/// Renders a workflow graph as extended PlantUML.
///
/// Args:
///     flow_json (str): The editor's JSON document, an object with `nodes`
///         and `edges` arrays.
///     workflow_name (str): Title written into the diagram header.
///
/// Returns:
///     str: The PlantUML document.
///
/// Raises:
///     ValueError: If `flow_json` is not a valid flow document.
#[pyfunction]
#[pyo3(name = "flow_to_plantuml")]
fn flow_to_plantuml_py(flow_json: &str, workflow_name: &str) -> PyResult<String> {
    let flow = FlowDocument::from_json(flow_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(flow_to_plantuml(&flow.nodes, &flow.edges, workflow_name))
}

/// Parses PlantUML text back into a workflow graph.
///
/// Args:
///     content (str): Any PlantUML text.
///
/// Returns:
///     str: JSON object with `nodes`, `edges`, `warnings` and `errors`.
///         Diagnostics are strings of the form "Line N: message".
#[pyfunction]
fn parse_plantuml(content: &str) -> PyResult<String> {
    let parsed = parse_plantuml_to_flow(content);
    let result = json!({
        "nodes": parsed.nodes,
        "edges": parsed.edges,
        "warnings": parsed.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "errors": parsed.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });
    serde_json::to_string(&result).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Returns the default property set of a node type as a JSON object string.
#[pyfunction]
fn default_properties(node_type: &str) -> PyResult<String> {
    serde_json::to_string(&Value::Object(default_properties_for_node_type(node_type)))
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Converts between workflow graphs and extended PlantUML.
#[pymodule]
fn flowuml(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(flow_to_plantuml_py, m)?)?;
    m.add_function(wrap_pyfunction!(parse_plantuml, m)?)?;
    m.add_function(wrap_pyfunction!(default_properties, m)?)?;
    Ok(())
}
