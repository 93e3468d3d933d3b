use super::kind::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An open key/value bag, as found in `data.properties` and in the metadata JSON.
pub type PropertyMap = Map<String, Value>;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Left-to-right wrapping grid used when a node has no stored position.
    pub fn grid(index: usize) -> Self {
        Self {
            x: (index * 200) as f64,
            y: ((index / 4) * 150) as f64,
        }
    }
}

/// The `data` bag of a node.
///
/// `label`, `shape`, `alias` and `properties` are the keys the converter reads;
/// anything else is carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: PropertyMap,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Flattens the bag into a single JSON object, in field order.
    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        if let Some(label) = &self.label {
            map.insert("label".to_string(), Value::String(label.clone()));
        }
        if let Some(shape) = &self.shape {
            map.insert("shape".to_string(), Value::String(shape.clone()));
        }
        if let Some(alias) = &self.alias {
            map.insert("alias".to_string(), Value::String(alias.clone()));
        }
        if !self.properties.is_empty() {
            map.insert(
                "properties".to_string(),
                Value::Object(self.properties.clone()),
            );
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Rebuilds the bag from a JSON object.
    ///
    /// Known keys holding a value of the wrong JSON type are kept in `extra`
    /// instead of being dropped.
    pub fn from_map(mut map: PropertyMap) -> Self {
        fn take_string(key: &str, map: &mut PropertyMap) -> Option<String> {
            match map.remove(key) {
                Some(Value::String(s)) => Some(s),
                Some(other) => {
                    map.insert(key.to_string(), other);
                    None
                }
                None => None,
            }
        }
        let label = take_string("label", &mut map);
        let shape = take_string("shape", &mut map);
        let alias = take_string("alias", &mut map);
        let properties = match map.remove("properties") {
            Some(Value::Object(props)) => props,
            Some(other) => {
                map.insert("properties".to_string(), other);
                PropertyMap::new()
            }
            None => PropertyMap::new(),
        };
        Self {
            label,
            shape,
            alias,
            properties,
            extra: map,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.shape.is_none()
            && self.alias.is_none()
            && self.properties.is_empty()
            && self.extra.is_empty()
    }
}

/// A workflow graph vertex, in the React-Flow JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging: Option<bool>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            data,
            width: None,
            height: None,
            selected: None,
            dragging: None,
        }
    }

    /// The display text, falling back to the id when the label is missing or empty.
    pub fn label(&self) -> &str {
        self.data
            .label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(&self.id)
    }
}
