//! Prelude module for convenient imports
//!
//! Re-exports the graph model, both conversion directions and the error types.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowuml::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow = FlowDocument::from_file("path/to/flow.json")?;
//! let text = PlantUmlWriter::builder("My Workflow")
//!     .with_notes(false)
//!     .build()
//!     .write(&flow.nodes, &flow.edges);
//! std::fs::write("path/to/flow.puml", &text)?;
//!
//! let parsed = FlowParser::builder().implicit_connections(false).build().parse(&text);
//! for error in &parsed.errors {
//!     eprintln!("{}", error);
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::flow::{
    Edge, EdgeData, FlowDocument, Node, NodeData, NodeKind, Position, PropertyMap, WorkflowMeta,
};

// Conversion
pub use crate::parser::{FlowParser, ParsedFlow, parse_plantuml_to_flow};
pub use crate::serializer::{PlantUmlWriter, flow_to_plantuml};

// Node defaults
pub use crate::properties::{NodeProperties, default_properties_for_node_type};

// Round-trip checking
pub use crate::validate::{ValidationReport, ValidationSummary, validate_conversion};

// Error types
pub use crate::error::{Category, Diagnostic, DiagnosticKind, Discrepancy, FlowError, Severity};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
