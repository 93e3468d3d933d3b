use thiserror::Error;

/// The reasons a parse pass can report a diagnostic.
///
/// None of these abort the pass; they are collected on the
/// [`ParsedFlow`](crate::parser::ParsedFlow) so the caller can surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("Invalid node metadata JSON: {0}")]
    MalformedMetadata(String),

    #[error("Node metadata must be a JSON object, found {0}")]
    MetadataNotAnObject(String),

    #[error("Invalid node metadata fields: {0}")]
    InvalidMetadataFields(String),

    #[error("Invalid workflow metadata JSON: {0}")]
    MalformedWorkflowMetadata(String),

    #[error("Empty PlantUML content - using default template")]
    EmptyDocument,

    #[error("No nodes recognized in PlantUML content - using default template")]
    NoNodesRecognized,

    #[error("Note block opened here is never closed with 'end note'")]
    UnterminatedNote,
}

/// A non-fatal parse diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number, when the problem can be pinned to a line.
    pub line: Option<usize>,
    pub message: String,
    /// The offending source line, trimmed.
    pub context: Option<String>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            line: None,
            message: kind.to_string(),
            context: None,
            kind,
        }
    }

    pub fn at_line(kind: DiagnosticKind, line: usize, context: &str) -> Self {
        Self {
            line: Some(line),
            message: kind.to_string(),
            context: Some(context.to_string()),
            kind,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors from loading or saving flow documents.
///
/// The converter itself never fails; this covers the file and JSON boundary
/// around it.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse flow JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How much a [`Discrepancy`] matters to a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// Whether a [`Discrepancy`] concerns a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Node,
    Edge,
}

/// A difference found when comparing a flow with its converted counterpart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Discrepancy {
    #[error("Node count mismatch: {original} -> {converted}")]
    NodeCount { original: usize, converted: usize },

    #[error("Edge count mismatch: {original} -> {converted}")]
    EdgeCount { original: usize, converted: usize },

    #[error("Node lost during conversion: {0}")]
    NodeLost(String),

    #[error("Node type changed for {id}: {original} -> {converted}")]
    NodeTypeChanged {
        id: String,
        original: String,
        converted: String,
    },

    #[error("Position drift detected for {id}: {drift:.0}px")]
    PositionDrift { id: String, drift: f64 },

    #[error("Node data mismatch for {0}")]
    NodeDataMismatch(String),

    #[error("Node dimensions changed for {0}")]
    DimensionsChanged(String),

    #[error("Extra node in converted output: {0}")]
    ExtraNode(String),

    #[error("Edge lost during conversion: {id} ({from} -> {to})")]
    EdgeLost { id: String, from: String, to: String },

    #[error("Edge connection changed: {id} ({original} became {converted})")]
    EdgeConnectionChanged {
        id: String,
        original: String,
        converted: String,
    },

    #[error("Edge label changed: {id} ({original:?} -> {converted:?})")]
    EdgeLabelChanged {
        id: String,
        original: Option<String>,
        converted: Option<String>,
    },

    #[error("Edge data mismatch for {0}")]
    EdgeDataMismatch(String),

    #[error("Extra edge in converted output: {id} ({from} -> {to})")]
    ExtraEdge { id: String, from: String, to: String },
}

impl Discrepancy {
    pub fn severity(&self) -> Severity {
        match self {
            Discrepancy::NodeCount { .. }
            | Discrepancy::EdgeCount { .. }
            | Discrepancy::NodeLost(_)
            | Discrepancy::NodeTypeChanged { .. }
            | Discrepancy::NodeDataMismatch(_)
            | Discrepancy::EdgeLost { .. }
            | Discrepancy::EdgeConnectionChanged { .. } => Severity::Error,
            Discrepancy::PositionDrift { .. }
            | Discrepancy::ExtraNode(_)
            | Discrepancy::EdgeLabelChanged { .. }
            | Discrepancy::EdgeDataMismatch(_)
            | Discrepancy::ExtraEdge { .. } => Severity::Warning,
            Discrepancy::DimensionsChanged(_) => Severity::Info,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Discrepancy::NodeCount { .. }
            | Discrepancy::NodeLost(_)
            | Discrepancy::NodeTypeChanged { .. }
            | Discrepancy::PositionDrift { .. }
            | Discrepancy::NodeDataMismatch(_)
            | Discrepancy::DimensionsChanged(_)
            | Discrepancy::ExtraNode(_) => Category::Node,
            _ => Category::Edge,
        }
    }
}
