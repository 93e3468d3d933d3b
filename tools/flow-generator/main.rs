use clap::Parser;
use flowuml::flow::{Edge, FlowDocument, Node, NodeData, NodeKind, Position};
use flowuml::properties::NodeProperties;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A CLI tool to generate random workflow graphs for converter testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated flow JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Number of nodes in the chain
    #[arg(long, default_value_t = 10)]
    nodes: usize,

    /// Add an edge from the last node back to the first
    #[arg(long)]
    cycle: bool,
}

/// Kinds the generator draws from; `input` and `output` are reserved for the chain ends.
const MIDDLE_KINDS: &[&str] = &[
    "custom-prompt",
    "command-prompt-file",
    "persona",
    "instruction",
    "conditional",
    "loop",
    "output-formatter",
    "group",
    "filter",
    "join",
    "injector",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }

    let mut rng = rand::rng();
    let nodes: Vec<Node> = (0..cli.nodes)
        .map(|i| generate_node(&mut rng, i, cli.nodes))
        .collect();

    let mut edges: Vec<Edge> = nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Edge::new(format!("e{}", i + 1), &pair[0].id, &pair[1].id))
        .collect();
    if cli.cycle && nodes.len() > 1 {
        let (first, last) = (&nodes[0].id, &nodes[nodes.len() - 1].id);
        edges.push(Edge::new("e_back", last, first).with_label("retry"));
    }
    info!("Generated {} nodes and {} edges", nodes.len(), edges.len());

    let flow = FlowDocument::new(Some("Generated Workflow".to_string()), nodes, edges);
    flow.save(&cli.output)?;

    println!(
        "Successfully generated and saved flow to '{}'",
        cli.output
    );
    Ok(())
}

fn generate_node(rng: &mut ThreadRng, index: usize, total: usize) -> Node {
    let kind = if index == 0 {
        NodeKind::Input
    } else if index + 1 == total {
        NodeKind::Output
    } else {
        NodeKind::from_tag(MIDDLE_KINDS[rng.random_range(0..MIDDLE_KINDS.len())])
    };

    let mut data = NodeData::labeled(format!("Step {} ({})", index + 1, kind));
    data.properties = NodeProperties::defaults_for(&kind).to_map();
    if rng.random_bool(0.3) {
        data.properties.insert(
            "notes".to_string(),
            Value::String(format!("line one\nline \"two\" of step {}", index + 1)),
        );
    }

    let position = Position::new(
        rng.random_range(0.0..2000.0_f64).round(),
        rng.random_range(0.0..1200.0_f64).round(),
    );
    Node::new(format!("node-{}", index + 1), kind, position, data)
}
