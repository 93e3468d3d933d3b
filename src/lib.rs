//! # flowuml - Workflow Graph ⇄ PlantUML Converter
//!
//! **flowuml** converts workflow graphs built in a visual node editor into an
//! extended PlantUML activity diagram and back. The PlantUML text stays a valid,
//! human-readable diagram while carrying everything needed to rebuild the graph:
//! each node is preceded by a `'@node-meta {...}` comment holding its id, type,
//! position and data, and parameters are shown in a note block beside it.
//!
//! ## Core Workflow
//!
//! 1.  **Load a flow**: Read the editor's JSON into a [`FlowDocument`](flow::FlowDocument), or build [`Node`](flow::Node)s and [`Edge`](flow::Edge)s directly.
//! 2.  **Export**: Render the graph with [`flow_to_plantuml`] or a configured [`PlantUmlWriter`](serializer::PlantUmlWriter).
//! 3.  **Import**: Parse any PlantUML text with [`parse_plantuml_to_flow`]. Documents written by this crate come back with ids, types, positions and properties intact; hand-written diagrams are read on a best-effort basis, with node types guessed from keywords.
//! 4.  **Inspect diagnostics**: Parsing never fails. Malformed metadata is reported in `errors`, recoverable oddities in `warnings`.
//! 5.  **Verify a round trip**: [`validate_conversion`] compares the original graph with the parsed one and reports every node or edge that did not survive.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowuml::prelude::*;
//!
//! let nodes = vec![
//!     Node::new("in", NodeKind::Input, Position::new(0.0, 0.0), NodeData::labeled("Question")),
//!     Node::new("out", NodeKind::Output, Position::new(200.0, 0.0), NodeData::labeled("Answer")),
//! ];
//! let edges = vec![Edge::new("e1", "in", "out").with_label("ask")];
//!
//! let text = flow_to_plantuml(&nodes, &edges, "Q&A");
//! assert!(text.starts_with("@startuml Q&A"));
//!
//! let parsed = parse_plantuml_to_flow(&text);
//! assert!(!parsed.has_errors());
//! assert_eq!(parsed.nodes.len(), 2);
//! assert_eq!(parsed.nodes[1].position, Position::new(200.0, 0.0));
//! assert_eq!(parsed.edges[0].label.as_deref(), Some("ask"));
//! ```

pub mod error;
pub mod flow;
pub mod parser;
pub mod prelude;
pub mod properties;
pub mod serializer;
pub mod validate;

#[cfg(feature = "python-bindings")]
mod python;

pub use parser::parse_plantuml_to_flow;
pub use properties::default_properties_for_node_type;
pub use serializer::flow_to_plantuml;
pub use validate::validate_conversion;
