use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::wire::{empty_tagged, tagged};

/// Lifecycle status shared by objects, properties, links, interfaces and actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Status {
    #[default]
    Active,
    Experimental,
    Example,
    Deprecated {
        message: String,
        deadline: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replaced_by: Option<String>,
    },
}

impl Status {
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Active => empty_tagged("active"),
            Self::Experimental => empty_tagged("experimental"),
            Self::Example => empty_tagged("example"),
            Self::Deprecated {
                message,
                deadline,
                replaced_by,
            } => {
                let mut body = Map::new();
                body.insert("deadline".to_string(), Value::String(deadline.clone()));
                body.insert("message".to_string(), Value::String(message.clone()));
                if let Some(replaced_by) = replaced_by {
                    body.insert("replacedBy".to_string(), Value::String(replaced_by.clone()));
                }
                tagged("deprecated", Value::Object(body))
            }
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Prominent,
    #[default]
    Normal,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeClass {
    pub kind: String,
    pub name: String,
}

impl TypeClass {
    #[must_use]
    pub fn render_hint(name: &str) -> Self {
        Self {
            kind: "render_hint".to_string(),
            name: name.to_string(),
        }
    }
}

#[must_use]
pub fn default_type_classes() -> Vec<TypeClass> {
    vec![
        TypeClass::render_hint("SELECTABLE"),
        TypeClass::render_hint("SORTABLE"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlueprintIcon {
    pub locator: String,
    pub color: String,
}

impl BlueprintIcon {
    #[must_use]
    pub fn new(locator: &str, color: &str) -> Self {
        Self {
            locator: locator.to_string(),
            color: color.to_string(),
        }
    }

    #[must_use]
    pub fn to_wire(&self) -> Value {
        tagged(
            "blueprint",
            json!({ "color": self.color, "locator": self.locator }),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Nullability {
    pub no_empty_collections: bool,
    pub no_nulls: bool,
}

/// Points a property at one registered version of a value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueTypeReference {
    pub api_name: String,
    pub version: String,
}
