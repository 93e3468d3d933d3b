use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Master macro defining every known node kind, its wire tag and the lookup in both directions.
macro_rules! define_node_kinds {
    ( $( ($variant:ident, $tag:literal) ),* $(,)? ) => {
        /// The type tag of a workflow node.
        ///
        /// Unknown tags are kept verbatim in [`NodeKind::Other`] so they survive a round trip.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $( $variant, )*
            Other(String),
        }

        impl NodeKind {
            /// Tags of every known kind, in declaration order.
            pub const KNOWN_TAGS: &'static [&'static str] = &[ $( $tag, )* ];

            pub fn known() -> impl Iterator<Item = NodeKind> {
                Self::KNOWN_TAGS.iter().map(|tag| NodeKind::from_tag(tag))
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( NodeKind::$variant => $tag, )*
                    NodeKind::Other(tag) => tag,
                }
            }

            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $( $tag => NodeKind::$variant, )*
                    other => NodeKind::Other(other.to_string()),
                }
            }
        }
    };
}

define_node_kinds! {
    (Input, "input"),
    (Output, "output"),
    (CustomPrompt, "custom-prompt"),
    (CommandPromptFile, "command-prompt-file"),
    (Persona, "persona"),
    (Instruction, "instruction"),
    (Conditional, "conditional"),
    (Loop, "loop"),
    (OutputFormatter, "output-formatter"),
    (Group, "group"),
    (Filter, "filter"),
    (Join, "join"),
    (Injector, "injector"),
    (Default, "default"),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Default
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::from_tag(tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(NodeKind::from_tag(&tag))
    }
}
