//! Default property sets for each node kind.
//!
//! Every kind owns a typed properties struct. The open map form stored in
//! `data.properties` is produced by serializing the struct, so the defaults
//! below are the single source of truth for both directions of the converter.

use crate::flow::{NodeKind, PropertyMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Defines a properties struct together with its default values.
macro_rules! define_properties {
    ( $(
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty = $default:expr ),* $(,)?
        }
    )* ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase", default)]
            pub struct $name {
                $( $(#[$fmeta])* pub $field: $ty, )*
            }

            impl Default for $name {
                fn default() -> Self {
                    Self { $( $field: $default, )* }
                }
            }
        )*
    };
}

define_properties! {
    CommandPromptFileProperties {
        file_name: String = "prompt.md".to_string(),
        content: String = String::new(),
        variables: Vec<Value> = Vec::new(),
    }
    CustomPromptProperties {
        prompt_text: String = String::new(),
        variables: Vec<Value> = Vec::new(),
    }
    PersonaProperties {
        persona_type: String = "Expert Assistant".to_string(),
        tone: String = "professional".to_string(),
        expertise: String = String::new(),
        background: String = String::new(),
        #[serde(rename = "communication_style")]
        communication_style: String = "direct".to_string(),
    }
    InstructionProperties {
        instruction_text: String = String::new(),
        priority: String = "medium".to_string(),
    }
    ConditionalProperties {
        condition: String = String::new(),
        true_label: String = "True".to_string(),
        false_label: String = "False".to_string(),
    }
    LoopProperties {
        loop_type: String = "for".to_string(),
        max_iterations: u32 = 10,
        condition: String = String::new(),
    }
    OutputFormatterProperties {
        output_type: String = "text".to_string(),
        format: String = "structured".to_string(),
    }
    InputProperties {
        label: String = "Input Node".to_string(),
        data_type: String = "string".to_string(),
        default_value: String = String::new(),
    }
    OutputProperties {
        label: String = "Output Node".to_string(),
        format: String = "json".to_string(),
    }
    /// Scheduled or manual trigger that injects a payload into the workflow.
    InjectorProperties {
        label: String = "Injector".to_string(),
        trigger_type: String = "manual".to_string(),
        payload: String = "{}".to_string(),
        payload_type: String = "json".to_string(),
        interval: u32 = 60,
        cron_expression: String = "0 * * * * *".to_string(),
        auto_start: bool = false,
        repeat_count: u32 = 0,
    }
    /// Properties of `group` nodes, which the editor renders as transforms.
    TransformProperties {
        label: String = "Transform Node".to_string(),
        transform_type: String = "map".to_string(),
        custom_script: String = String::new(),
    }
    FilterProperties {
        label: String = "Filter Node".to_string(),
        condition: String = "// Return true to pass, false to filter out\nreturn true;".to_string(),
    }
    JoinProperties {
        label: String = "Join Node".to_string(),
        join_type: String = "inner".to_string(),
        join_keys: Vec<Value> = Vec::new(),
    }
    /// Fallback for `default` and unrecognized kinds.
    GenericProperties {
        label: String = "Default Node".to_string(),
        description: String = String::new(),
    }
}

/// The typed property set of a node, one variant per node kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeProperties {
    CommandPromptFile(CommandPromptFileProperties),
    CustomPrompt(CustomPromptProperties),
    Persona(PersonaProperties),
    Instruction(InstructionProperties),
    Conditional(ConditionalProperties),
    Loop(LoopProperties),
    OutputFormatter(OutputFormatterProperties),
    Input(InputProperties),
    Output(OutputProperties),
    Injector(InjectorProperties),
    Group(TransformProperties),
    Filter(FilterProperties),
    Join(JoinProperties),
    Generic(GenericProperties),
}

impl NodeProperties {
    /// The canonical defaults for a node kind. Unknown kinds get the generic set.
    pub fn defaults_for(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::CommandPromptFile => Self::CommandPromptFile(Default::default()),
            NodeKind::CustomPrompt => Self::CustomPrompt(Default::default()),
            NodeKind::Persona => Self::Persona(Default::default()),
            NodeKind::Instruction => Self::Instruction(Default::default()),
            NodeKind::Conditional => Self::Conditional(Default::default()),
            NodeKind::Loop => Self::Loop(Default::default()),
            NodeKind::OutputFormatter => Self::OutputFormatter(Default::default()),
            NodeKind::Input => Self::Input(Default::default()),
            NodeKind::Output => Self::Output(Default::default()),
            NodeKind::Injector => Self::Injector(Default::default()),
            NodeKind::Group => Self::Group(Default::default()),
            NodeKind::Filter => Self::Filter(Default::default()),
            NodeKind::Join => Self::Join(Default::default()),
            NodeKind::Default | NodeKind::Other(_) => Self::Generic(Default::default()),
        }
    }

    /// Reads an open property map as the typed set for `kind`.
    ///
    /// Missing keys take their defaults. A map whose known keys hold values of the
    /// wrong JSON type yields the defaults for the whole set.
    pub fn view(kind: &NodeKind, properties: &PropertyMap) -> Self {
        match kind {
            NodeKind::CommandPromptFile => Self::CommandPromptFile(typed(properties)),
            NodeKind::CustomPrompt => Self::CustomPrompt(typed(properties)),
            NodeKind::Persona => Self::Persona(typed(properties)),
            NodeKind::Instruction => Self::Instruction(typed(properties)),
            NodeKind::Conditional => Self::Conditional(typed(properties)),
            NodeKind::Loop => Self::Loop(typed(properties)),
            NodeKind::OutputFormatter => Self::OutputFormatter(typed(properties)),
            NodeKind::Input => Self::Input(typed(properties)),
            NodeKind::Output => Self::Output(typed(properties)),
            NodeKind::Injector => Self::Injector(typed(properties)),
            NodeKind::Group => Self::Group(typed(properties)),
            NodeKind::Filter => Self::Filter(typed(properties)),
            NodeKind::Join => Self::Join(typed(properties)),
            NodeKind::Default | NodeKind::Other(_) => Self::Generic(typed(properties)),
        }
    }

    pub fn to_map(&self) -> PropertyMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => PropertyMap::new(),
        }
    }
}

/// Reads `properties` as `T`. A key whose value has the wrong shape falls back
/// to its default without discarding the well-typed keys around it.
fn typed<T: DeserializeOwned + Serialize + Default>(properties: &PropertyMap) -> T {
    if let Ok(value) = serde_json::from_value(Value::Object(properties.clone())) {
        return value;
    }

    let mut accepted = match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map,
        _ => PropertyMap::new(),
    };
    for (key, value) in properties {
        let previous = accepted.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(Value::Object(accepted.clone())).is_err() {
            debug!("Ignoring ill-typed property '{}'", key);
            match previous {
                Some(previous) => accepted.insert(key.clone(), previous),
                None => accepted.remove(key),
            };
        }
    }
    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}

/// Returns the default property map for a node type tag.
///
/// Total over all strings: unrecognized tags get `{ label: "Default Node", description: "" }`.
pub fn default_properties_for_node_type(node_type: &str) -> PropertyMap {
    NodeProperties::defaults_for(&NodeKind::from_tag(node_type)).to_map()
}
