use crate::flow::NodeKind;

/// Keyword rules for activity names, checked in order. First match wins.
const ACTIVITY_RULES: &[(&[&str], &str)] = &[
    (&["requirements", "ask"], "input"),
    (&["learn", "research"], "custom-prompt"),
    (&["evolve", "update"], "instruction"),
    (&["build", "create", "generate"], "command-prompt-file"),
    (&["plan", "design", "architecture"], "instruction"),
    (&["innovate", "analyze"], "custom-prompt"),
    (&["run", "execute", "implement"], "command-prompt-file"),
    (&["test", "document"], "output-formatter"),
    (&["business", "marketing", "revenue"], "custom-prompt"),
    (&["launch", "market", "canvas", "pitch"], "output-formatter"),
    (&["trigger", "timer", "inject", "schedule", "cron"], "injector"),
];

/// Guesses a node kind from an activity name by case-insensitive substring match.
pub fn classify_activity(name: &str) -> NodeKind {
    let name = name.to_lowercase();
    ACTIVITY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, tag)| NodeKind::from_tag(tag))
        .unwrap_or(NodeKind::Instruction)
}

/// Maps a shape keyword to the node kind it stands for.
pub fn shape_kind(shape: &str) -> NodeKind {
    match shape.to_lowercase().as_str() {
        "actor" | "start" => NodeKind::Input,
        "database" | "stop" => NodeKind::Output,
        "folder" | "frame" | "package" | "node" => NodeKind::Group,
        "activity" => NodeKind::Instruction,
        "diamond" => NodeKind::Conditional,
        _ => NodeKind::Default,
    }
}

/// Alias derived from display text: lowercased, anything but `[a-z0-9]` removed.
pub fn derive_alias(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
