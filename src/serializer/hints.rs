use crate::flow::Node;
use crate::properties::NodeProperties;

const PAYLOAD_PREVIEW_CHARS: usize = 50;

/// Human-readable execution summary lines for a node's note block.
///
/// These are documentation only; the parser never reads them back.
pub(super) fn execution_hints(node: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    match NodeProperties::view(&node.kind, &node.data.properties) {
        NodeProperties::CommandPromptFile(props) => {
            let file_name = if props.file_name.is_empty() {
                "prompt.md"
            } else {
                props.file_name.as_str()
            };
            lines.push(format!("**Execution:** Load file \"{}\"", file_name));
            if !props.variables.is_empty() {
                lines.push(format!("**Variables:** {}", json_list(&props.variables)));
            }
        }
        NodeProperties::CustomPrompt(props) => {
            lines.push("**Execution:** Execute custom prompt".to_string());
            if !props.variables.is_empty() {
                lines.push(format!("**Variables:** {}", json_list(&props.variables)));
            }
        }
        NodeProperties::Conditional(props) => {
            lines.push(format!(
                "**Execution:** Evaluate condition \"{}\"",
                props.condition
            ));
            lines.push(format!("**True Path:** {}", props.true_label));
            lines.push(format!("**False Path:** {}", props.false_label));
        }
        NodeProperties::Loop(props) => {
            lines.push(format!("**Execution:** {} loop", props.loop_type));
            lines.push(format!("**Max Iterations:** {}", props.max_iterations));
            if !props.condition.is_empty() {
                lines.push(format!("**Condition:** {}", props.condition));
            }
        }
        NodeProperties::OutputFormatter(props) => {
            lines.push(format!(
                "**Execution:** Format output as {}",
                props.output_type
            ));
            lines.push(format!("**Format:** {}", props.format));
        }
        NodeProperties::Persona(props) => {
            lines.push(format!(
                "**Execution:** Apply persona \"{}\"",
                props.persona_type
            ));
            lines.push(format!("**Tone:** {}", props.tone));
            if !props.expertise.is_empty() {
                lines.push(format!("**Expertise:** {}", props.expertise));
            }
        }
        NodeProperties::Instruction(props) => {
            lines.push("**Execution:** Follow instruction".to_string());
            lines.push(format!("**Priority:** {}", props.priority));
        }
        NodeProperties::Injector(props) => {
            lines.push(format!("**Execution:** {} trigger", props.trigger_type));
            match props.trigger_type.as_str() {
                "interval" => lines.push(format!("**Interval:** {} seconds", props.interval)),
                "cron" => lines.push(format!("**Cron Expression:** {}", props.cron_expression)),
                _ => {}
            }
            let auto_start = if props.auto_start { "Yes" } else { "No" };
            lines.push(format!("**Auto Start:** {}", auto_start));
            lines.push(format!("**Payload Type:** {}", props.payload_type));
            if !props.payload.is_empty() && props.payload != "{}" {
                lines.push(format!("**Payload:** {}", preview(&props.payload)));
            }
        }
        _ => {}
    }
    lines
}

fn json_list(values: &[serde_json::Value]) -> String {
    serde_json::to_string(values).unwrap_or_default()
}

fn preview(text: &str) -> String {
    if text.chars().count() > PAYLOAD_PREVIEW_CHARS {
        let head: String = text.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
