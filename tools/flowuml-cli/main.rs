use clap::{Parser, Subcommand};
use flowuml::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Converts workflow graphs to extended PlantUML and back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a flow JSON file as PlantUML
    Export {
        /// Path to the flow JSON file
        flow_path: String,
        /// Workflow name written into the diagram header
        #[arg(short, long)]
        name: Option<String>,
        /// Output path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Leave out the parameter note blocks
        #[arg(long)]
        no_notes: bool,
    },
    /// Parse a PlantUML file into flow JSON
    Import {
        /// Path to the PlantUML file
        diagram_path: String,
        /// Output path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse a PlantUML file and report what was recognized
    Check {
        /// Path to the PlantUML file
        #[arg(required_unless_present = "roundtrip")]
        diagram_path: Option<String>,
        /// Instead, export this flow JSON, parse it back and compare the two
        #[arg(long, value_name = "FLOW_JSON", conflicts_with = "diagram_path")]
        roundtrip: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export {
            flow_path,
            name,
            output,
            no_notes,
        } => run_export(&flow_path, name, output, no_notes),
        Command::Import {
            diagram_path,
            output,
        } => run_import(&diagram_path, output),
        Command::Check {
            diagram_path,
            roundtrip,
        } => match (diagram_path, roundtrip) {
            (_, Some(flow_path)) => run_roundtrip_check(&flow_path),
            (Some(diagram_path), None) => run_check(&diagram_path),
            (None, None) => exit_with_error("Nothing to check"),
        },
    }
}

fn run_export(flow_path: &str, name: Option<String>, output: Option<String>, no_notes: bool) {
    let flow = FlowDocument::from_file(flow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)));

    let workflow_name = name
        .or_else(|| flow.name.clone())
        .unwrap_or_else(|| "Workflow".to_string());
    let text = PlantUmlWriter::builder(&workflow_name)
        .with_notes(!no_notes)
        .build()
        .write(&flow.nodes, &flow.edges);

    write_output(output.as_deref(), &text);
}

fn run_import(diagram_path: &str, output: Option<String>) {
    let parsed = parse_file(diagram_path);
    print_diagnostics(&parsed);

    let json = parsed
        .into_document()
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize flow: {}", e)));
    write_output(output.as_deref(), &json);
}

fn run_check(diagram_path: &str) {
    let start = Instant::now();
    let parsed = parse_file(diagram_path);
    let duration = start.elapsed();

    println!("\n--- Diagram Summary ---");
    println!("Nodes:       {}", parsed.nodes.len());
    println!("Edges:       {}", parsed.edges.len());
    let implicit = parsed.edges.iter().filter(|e| e.data.is_implicit()).count();
    println!("  implicit:  {}", implicit);
    println!("Has cycle:   {}", parsed.has_cycle());
    if let Some(meta) = &parsed.workflow {
        println!(
            "Workflow:    {} (format {}, {} nodes / {} edges recorded)",
            meta.name, meta.version, meta.node_count, meta.edge_count
        );
    }
    println!("Warnings:    {}", parsed.warnings.len());
    println!("Errors:      {}", parsed.errors.len());
    println!("Parse time:  {:?}", duration);

    print_diagnostics(&parsed);

    if parsed.has_errors() {
        std::process::exit(1);
    }
}

fn run_roundtrip_check(flow_path: &str) {
    let flow = FlowDocument::from_file(flow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)));

    let start = Instant::now();
    let text = flow_to_plantuml(
        &flow.nodes,
        &flow.edges,
        flow.name.as_deref().unwrap_or("Workflow"),
    );
    let parsed = parse_plantuml_to_flow(&text);
    let report = validate_conversion(&flow.nodes, &flow.edges, &parsed.nodes, &parsed.edges);
    let duration = start.elapsed();

    println!("{}", report);
    println!("Round trip time: {:?}", duration);
    print_diagnostics(&parsed);
    for issue in report.issues.iter().filter(|i| i.severity() != Severity::Error) {
        eprintln!("{}: {}", issue.severity(), issue);
    }

    if !report.valid {
        std::process::exit(1);
    }
}

fn parse_file(diagram_path: &str) -> ParsedFlow {
    let content = fs::read_to_string(diagram_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read diagram file '{}': {}",
            diagram_path, e
        ))
    });
    parse_plantuml_to_flow(&content)
}

fn print_diagnostics(parsed: &ParsedFlow) {
    for warning in &parsed.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &parsed.errors {
        eprintln!("error: {}", error);
    }
}

fn write_output(output: Option<&str>, content: &str) {
    match output {
        Some(path) => {
            fs::write(path, content)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
            println!("Wrote '{}'", path);
        }
        None => println!("{}", content),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
