use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::Status;
use crate::wire::{empty_tagged, tagged};

/// Base type of a value type. Primitive types are spelled as a bare tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValueBaseType", into = "RawValueBaseType")]
pub enum ValueBaseType {
    Boolean,
    Binary,
    Byte,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    Long,
    Short,
    String,
    Timestamp,
    Array {
        element_type: Box<ValueBaseType>,
    },
    Map {
        key_type: Box<ValueBaseType>,
        value_type: Box<ValueBaseType>,
    },
    Optional {
        wrapped_type: Box<ValueBaseType>,
    },
    StructV2 {
        fields: Vec<ValueStructField>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueStructField {
    pub identifier: String,
    pub base_type: ValueBaseType,
}

const PRIMITIVE_BASE_TYPES: [(&str, ValueBaseType); 12] = [
    ("boolean", ValueBaseType::Boolean),
    ("binary", ValueBaseType::Binary),
    ("byte", ValueBaseType::Byte),
    ("date", ValueBaseType::Date),
    ("decimal", ValueBaseType::Decimal),
    ("double", ValueBaseType::Double),
    ("float", ValueBaseType::Float),
    ("integer", ValueBaseType::Integer),
    ("long", ValueBaseType::Long),
    ("short", ValueBaseType::Short),
    ("string", ValueBaseType::String),
    ("timestamp", ValueBaseType::Timestamp),
];

impl ValueBaseType {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Optional { .. } => "optional",
            Self::StructV2 { .. } => "structV2",
            primitive => PRIMITIVE_BASE_TYPES
                .iter()
                .find(|(_, candidate)| candidate == primitive)
                .map_or("unknown", |(tag, _)| *tag),
        }
    }

    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Array { element_type } => {
                tagged("array", json!({ "elementType": element_type.to_wire() }))
            }
            Self::Map {
                key_type,
                value_type,
            } => tagged(
                "map",
                json!({ "keyType": key_type.to_wire(), "valueType": value_type.to_wire() }),
            ),
            Self::Optional { wrapped_type } => {
                tagged("optional", json!({ "wrappedType": wrapped_type.to_wire() }))
            }
            Self::StructV2 { fields } => {
                let fields = fields
                    .iter()
                    .map(|field| {
                        json!({
                            "baseType": field.base_type.to_wire(),
                            "identifier": field.identifier,
                        })
                    })
                    .collect::<Vec<_>>();
                tagged("structV2", json!({ "fields": fields }))
            }
            primitive => empty_tagged(primitive.tag()),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValueBaseType {
    Tag(String),
    Detailed(DetailedValueBaseType),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum DetailedValueBaseType {
    Array {
        element_type: Box<ValueBaseType>,
    },
    Map {
        key_type: Box<ValueBaseType>,
        value_type: Box<ValueBaseType>,
    },
    Optional {
        wrapped_type: Box<ValueBaseType>,
    },
    StructV2 {
        fields: Vec<ValueStructField>,
    },
}

impl TryFrom<RawValueBaseType> for ValueBaseType {
    type Error = String;

    fn try_from(raw: RawValueBaseType) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawValueBaseType::Tag(tag) => PRIMITIVE_BASE_TYPES
                .iter()
                .find(|(candidate, _)| *candidate == tag)
                .map(|(_, kind)| kind.clone())
                .ok_or_else(|| format!("unknown value type base type '{tag}'")),
            RawValueBaseType::Detailed(DetailedValueBaseType::Array { element_type }) => {
                Ok(Self::Array { element_type })
            }
            RawValueBaseType::Detailed(DetailedValueBaseType::Map {
                key_type,
                value_type,
            }) => Ok(Self::Map {
                key_type,
                value_type,
            }),
            RawValueBaseType::Detailed(DetailedValueBaseType::Optional { wrapped_type }) => {
                Ok(Self::Optional { wrapped_type })
            }
            RawValueBaseType::Detailed(DetailedValueBaseType::StructV2 { fields }) => {
                Ok(Self::StructV2 { fields })
            }
        }
    }
}

impl From<ValueBaseType> for RawValueBaseType {
    fn from(kind: ValueBaseType) -> Self {
        match kind {
            ValueBaseType::Array { element_type } => {
                Self::Detailed(DetailedValueBaseType::Array { element_type })
            }
            ValueBaseType::Map {
                key_type,
                value_type,
            } => Self::Detailed(DetailedValueBaseType::Map {
                key_type,
                value_type,
            }),
            ValueBaseType::Optional { wrapped_type } => {
                Self::Detailed(DetailedValueBaseType::Optional { wrapped_type })
            }
            ValueBaseType::StructV2 { fields } => {
                Self::Detailed(DetailedValueBaseType::StructV2 { fields })
            }
            primitive => Self::Tag(primitive.tag().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FailureMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_messages: Option<Value>,
}

/// One constraint on a value type.
///
/// `constraint` is the body for the base type, e.g. `{"allowedValues": ["TRUE_VALUE"]}` on a
/// boolean; lowering wraps it under the base type's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueTypeConstraint {
    pub constraint: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<FailureMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueTypeDefinition {
    pub api_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub version: String,
    pub base_type: ValueBaseType,
    #[serde(default)]
    pub constraints: Vec<ValueTypeConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub example_values: Vec<Value>,
    /// Prefix the API name with the ontology namespace when registering.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub namespace_prefix: bool,
}

impl ValueTypeDefinition {
    /// The base type's constraint bodies as tagged data constraints.
    #[must_use]
    pub fn data_constraints(&self) -> Vec<(Value, Option<&FailureMessage>)> {
        let tag = self.base_type.tag();
        self.constraints
            .iter()
            .map(|constraint| {
                (
                    tagged(tag, constraint.constraint.clone()),
                    constraint.failure_message.as_ref(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_types_parse_bare_and_nested() {
        let bare: ValueBaseType = serde_json::from_str(r#""boolean""#).expect("bare");
        assert_eq!(bare, ValueBaseType::Boolean);

        let nested: ValueBaseType = serde_json::from_str(
            r#"{"type":"array","elementType":{"type":"optional","wrappedType":"string"}}"#,
        )
        .expect("nested");
        assert_eq!(
            nested.to_wire(),
            json!({
                "type": "array",
                "array": {"elementType": {
                    "type": "optional",
                    "optional": {"wrappedType": {"type": "string", "string": {}}}
                }}
            })
        );
        assert!(serde_json::from_str::<ValueBaseType>(r#""uuid""#).is_err());
    }

    #[test]
    fn data_constraints_are_wrapped_under_the_base_tag() {
        let value_type: ValueTypeDefinition = serde_json::from_str(
            r#"{
                "apiName": "apiName",
                "displayName": "displayName",
                "version": "0.1.0",
                "baseType": "boolean",
                "constraints": [{"constraint": {"allowedValues": ["TRUE_VALUE"]}}]
            }"#,
        )
        .expect("value type");
        let constraints = value_type.data_constraints();
        assert_eq!(constraints.len(), 1);
        assert_eq!(
            constraints[0].0,
            json!({"type": "boolean", "boolean": {"allowedValues": ["TRUE_VALUE"]}})
        );
        assert!(constraints[0].1.is_none());
    }
}
