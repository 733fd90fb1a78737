use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{BlueprintIcon, Status, TypeClass};

/// Base type of an action parameter.
///
/// Simple types are written as a bare tag (`"stringList"`); reference and struct types as a
/// tagged object (`{"type": "objectReference", "objectTypeId": "employee"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParameterType", into = "RawParameterType")]
pub enum ActionParameterType {
    Boolean,
    BooleanList,
    Integer,
    IntegerList,
    Long,
    LongList,
    Double,
    DoubleList,
    Decimal,
    DecimalList,
    String,
    StringList,
    Timestamp,
    TimestampList,
    Date,
    DateList,
    Geohash,
    GeohashList,
    Geoshape,
    GeoshapeList,
    Attachment,
    AttachmentList,
    Marking,
    MarkingList,
    MediaReference,
    MediaReferenceList,
    TimeSeriesReference,
    GeotimeSeriesReference,
    GeotimeSeriesReferenceList,
    ObjectTypeReference { interface_types: Vec<String> },
    ObjectSetRid,
    ObjectReference { object_type_id: String },
    ObjectReferenceList { object_type_id: String },
    InterfaceReference { interface_type_api_name: String },
    InterfaceReferenceList { interface_type_api_name: String },
    Struct { fields: Value },
    StructList { fields: Value },
}

impl ActionParameterType {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::BooleanList => "booleanList",
            Self::Integer => "integer",
            Self::IntegerList => "integerList",
            Self::Long => "long",
            Self::LongList => "longList",
            Self::Double => "double",
            Self::DoubleList => "doubleList",
            Self::Decimal => "decimal",
            Self::DecimalList => "decimalList",
            Self::String => "string",
            Self::StringList => "stringList",
            Self::Timestamp => "timestamp",
            Self::TimestampList => "timestampList",
            Self::Date => "date",
            Self::DateList => "dateList",
            Self::Geohash => "geohash",
            Self::GeohashList => "geohashList",
            Self::Geoshape => "geoshape",
            Self::GeoshapeList => "geoshapeList",
            Self::Attachment => "attachment",
            Self::AttachmentList => "attachmentList",
            Self::Marking => "marking",
            Self::MarkingList => "markingList",
            Self::MediaReference => "mediaReference",
            Self::MediaReferenceList => "mediaReferenceList",
            Self::TimeSeriesReference => "timeSeriesReference",
            Self::GeotimeSeriesReference => "geotimeSeriesReference",
            Self::GeotimeSeriesReferenceList => "geotimeSeriesReferenceList",
            Self::ObjectSetRid => "objectSetRid",
            Self::ObjectTypeReference { .. } => "objectTypeReference",
            Self::ObjectReference { .. } => "objectReference",
            Self::ObjectReferenceList { .. } => "objectReferenceList",
            Self::InterfaceReference { .. } => "interfaceReference",
            Self::InterfaceReferenceList { .. } => "interfaceReferenceList",
            Self::Struct { .. } => "struct",
            Self::StructList { .. } => "structList",
        }
    }

    /// Types that may be written as a bare tag.
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "boolean" => Self::Boolean,
            "booleanList" => Self::BooleanList,
            "integer" => Self::Integer,
            "integerList" => Self::IntegerList,
            "long" => Self::Long,
            "longList" => Self::LongList,
            "double" => Self::Double,
            "doubleList" => Self::DoubleList,
            "decimal" => Self::Decimal,
            "decimalList" => Self::DecimalList,
            "string" => Self::String,
            "stringList" => Self::StringList,
            "timestamp" => Self::Timestamp,
            "timestampList" => Self::TimestampList,
            "date" => Self::Date,
            "dateList" => Self::DateList,
            "geohash" => Self::Geohash,
            "geohashList" => Self::GeohashList,
            "geoshape" => Self::Geoshape,
            "geoshapeList" => Self::GeoshapeList,
            "attachment" => Self::Attachment,
            "attachmentList" => Self::AttachmentList,
            "marking" => Self::Marking,
            "markingList" => Self::MarkingList,
            "mediaReference" => Self::MediaReference,
            "mediaReferenceList" => Self::MediaReferenceList,
            "timeSeriesReference" => Self::TimeSeriesReference,
            "geotimeSeriesReference" => Self::GeotimeSeriesReference,
            "geotimeSeriesReferenceList" => Self::GeotimeSeriesReferenceList,
            "objectSetRid" => Self::ObjectSetRid,
            "objectTypeReference" => Self::ObjectTypeReference {
                interface_types: Vec::new(),
            },
            _ => return None,
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawParameterType {
    Tag(String),
    Detailed(DetailedParameterType),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum DetailedParameterType {
    ObjectTypeReference {
        #[serde(default)]
        interface_types: Vec<String>,
    },
    ObjectReference { object_type_id: String },
    ObjectReferenceList { object_type_id: String },
    InterfaceReference { interface_type_api_name: String },
    InterfaceReferenceList { interface_type_api_name: String },
    Struct { fields: Value },
    StructList { fields: Value },
}

impl TryFrom<RawParameterType> for ActionParameterType {
    type Error = String;

    fn try_from(raw: RawParameterType) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawParameterType::Tag(tag) => Self::from_tag(&tag)
                .ok_or_else(|| format!("unknown action parameter type '{tag}'")),
            RawParameterType::Detailed(detailed) => Ok(match detailed {
                DetailedParameterType::ObjectTypeReference { interface_types } => {
                    Self::ObjectTypeReference { interface_types }
                }
                DetailedParameterType::ObjectReference { object_type_id } => {
                    Self::ObjectReference { object_type_id }
                }
                DetailedParameterType::ObjectReferenceList { object_type_id } => {
                    Self::ObjectReferenceList { object_type_id }
                }
                DetailedParameterType::InterfaceReference {
                    interface_type_api_name,
                } => Self::InterfaceReference {
                    interface_type_api_name,
                },
                DetailedParameterType::InterfaceReferenceList {
                    interface_type_api_name,
                } => Self::InterfaceReferenceList {
                    interface_type_api_name,
                },
                DetailedParameterType::Struct { fields } => Self::Struct { fields },
                DetailedParameterType::StructList { fields } => Self::StructList { fields },
            }),
        }
    }
}

impl From<ActionParameterType> for RawParameterType {
    fn from(kind: ActionParameterType) -> Self {
        match kind {
            ActionParameterType::ObjectTypeReference { interface_types } => {
                Self::Detailed(DetailedParameterType::ObjectTypeReference { interface_types })
            }
            ActionParameterType::ObjectReference { object_type_id } => {
                Self::Detailed(DetailedParameterType::ObjectReference { object_type_id })
            }
            ActionParameterType::ObjectReferenceList { object_type_id } => {
                Self::Detailed(DetailedParameterType::ObjectReferenceList { object_type_id })
            }
            ActionParameterType::InterfaceReference {
                interface_type_api_name,
            } => Self::Detailed(DetailedParameterType::InterfaceReference {
                interface_type_api_name,
            }),
            ActionParameterType::InterfaceReferenceList {
                interface_type_api_name,
            } => Self::Detailed(DetailedParameterType::InterfaceReferenceList {
                interface_type_api_name,
            }),
            ActionParameterType::Struct { fields } => {
                Self::Detailed(DetailedParameterType::Struct { fields })
            }
            ActionParameterType::StructList { fields } => {
                Self::Detailed(DetailedParameterType::StructList { fields })
            }
            simple => Self::Tag(simple.tag().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelledValue {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GroupFilter {
    Static { name: String },
    Parameter { parameter: String },
}

/// The set of values a parameter accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AllowedValues {
    OneOf {
        one_of: Vec<LabelledValue>,
        #[serde(default)]
        other_value_allowed: bool,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Value>,
    },
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        regex: Option<String>,
    },
    Datetime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<Value>,
    },
    ObjectTypeReference {
        #[serde(default)]
        interface_types: Vec<String>,
    },
    User {
        #[serde(default)]
        from_groups: Vec<GroupFilter>,
    },
    MultipassGroup,
    Redacted,
    GeotimeSeriesReference,
    Attachment,
    Boolean,
    ObjectSetRid,
    CbacMarking,
    MandatoryMarking,
    ObjectQuery,
    ObjectList,
    MediaReference,
    TimeSeriesReference,
    Geohash,
    Geoshape,
    InterfaceObjectQuery,
}

impl AllowedValues {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::OneOf { .. } => "oneOf",
            Self::Range { .. } => "range",
            Self::Text { .. } => "text",
            Self::Datetime { .. } => "datetime",
            Self::ObjectTypeReference { .. } => "objectTypeReference",
            Self::User { .. } => "user",
            Self::MultipassGroup => "multipassGroup",
            Self::Redacted => "redacted",
            Self::GeotimeSeriesReference => "geotimeSeriesReference",
            Self::Attachment => "attachment",
            Self::Boolean => "boolean",
            Self::ObjectSetRid => "objectSetRid",
            Self::CbacMarking => "cbacMarking",
            Self::MandatoryMarking => "mandatoryMarking",
            Self::ObjectQuery => "objectQuery",
            Self::ObjectList => "objectList",
            Self::MediaReference => "mediaReference",
            Self::TimeSeriesReference => "timeSeriesReference",
            Self::Geohash => "geohash",
            Self::Geoshape => "geoshape",
            Self::InterfaceObjectQuery => "interfaceObjectQuery",
        }
    }

    /// Unconstrained text, used when a parameter declares no allowed values.
    #[must_use]
    pub const fn any_text() -> Self {
        Self::Text {
            min_length: None,
            max_length: None,
            regex: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListLength {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterRequirement {
    Flag(bool),
    #[serde(rename_all = "camelCase")]
    ListLength { list_length: ListLength },
}

impl Default for ParameterRequirement {
    fn default() -> Self {
        Self::Flag(true)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterVisibility {
    #[default]
    Editable,
    Disabled,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionParameterValidation {
    pub allowed_values: AllowedValues,
    #[serde(default)]
    pub required: ParameterRequirement,
    #[serde(default)]
    pub default_visibility: ParameterVisibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionParameter {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub parameter_type: ActionParameterType,
    pub validation: ActionParameterValidation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_classes: Vec<TypeClass>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed_by_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
}

/// A value written by a logic rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LogicRuleValue {
    ParameterId {
        parameter_id: String,
    },
    StaticValue {
        value: Value,
    },
    CurrentUser,
    CurrentTime,
    UniqueIdentifier {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_id: Option<String>,
    },
}

impl LogicRuleValue {
    #[must_use]
    pub fn parameter(parameter_id: &str) -> Self {
        Self::ParameterId {
            parameter_id: parameter_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LogicRule {
    AddObjectRule {
        object_type_id: String,
        #[serde(default)]
        property_values: BTreeMap<String, LogicRuleValue>,
        #[serde(default)]
        struct_field_values: BTreeMap<String, Value>,
    },
    ModifyObjectRule {
        object_to_modify: String,
        #[serde(default)]
        property_values: BTreeMap<String, LogicRuleValue>,
        #[serde(default)]
        struct_field_values: BTreeMap<String, Value>,
    },
    DeleteObjectRule {
        object_to_delete: String,
    },
    AddInterfaceRule {
        interface_api_name: String,
        object_type_parameter: String,
        #[serde(default)]
        shared_property_values: BTreeMap<String, LogicRuleValue>,
    },
    ModifyInterfaceRule {
        interface_object_to_modify_parameter: String,
        #[serde(default)]
        shared_property_values: BTreeMap<String, LogicRuleValue>,
    },
}

/// Condition gating submission of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ConditionDefinition {
    True,
    Group { name: String },
    Parameter { parameter_id: String, matches: Value },
    And { conditions: Vec<ConditionDefinition> },
    Or { conditions: Vec<ConditionDefinition> },
    /// A comparison already in wire form, emitted unchanged.
    Comparison { comparison: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionValidationRule {
    pub condition: ConditionDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionLayout {
    #[default]
    Form,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionType {
    pub api_name: String,
    pub display_name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<BlueprintIcon>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_ordering: Option<Vec<String>>,
    pub rules: Vec<LogicRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, ActionSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ActionValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_classes: Vec<TypeClass>,
    #[serde(default)]
    pub default_format: ActionLayout,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enable_layout_switch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl ActionType {
    #[must_use]
    pub fn parameter(&self, id: &str) -> Option<&ActionParameter> {
        self.parameters.iter().find(|parameter| parameter.id == id)
    }

    /// Declared ordering, or declaration order when none is given.
    #[must_use]
    pub fn effective_parameter_ordering(&self) -> Vec<String> {
        self.parameter_ordering.clone().unwrap_or_else(|| {
            self.parameters
                .iter()
                .map(|parameter| parameter.id.clone())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_types_parse_from_tags_and_objects() {
        let simple: ActionParameterType = serde_json::from_str(r#""stringList""#).expect("tag");
        assert_eq!(simple, ActionParameterType::StringList);
        assert_eq!(simple.tag(), "stringList");

        let reference: ActionParameterType =
            serde_json::from_str(r#"{"type":"objectReference","objectTypeId":"employee"}"#)
                .expect("object");
        assert_eq!(reference.tag(), "objectReference");
        assert_eq!(
            serde_json::to_value(&reference).expect("serialize"),
            serde_json::json!({"type": "objectReference", "objectTypeId": "employee"})
        );

        assert!(serde_json::from_str::<ActionParameterType>(r#""blob""#).is_err());
    }

    #[test]
    fn bare_tags_round_trip_through_their_variant() {
        for tag in ["booleanList", "geotimeSeriesReferenceList", "objectSetRid", "objectTypeReference"] {
            let kind = ActionParameterType::from_tag(tag).expect("known tag");
            assert_eq!(kind.tag(), tag);
        }
        let bare: ActionParameterType =
            serde_json::from_str(r#""objectTypeReference""#).expect("bare reference");
        assert_eq!(
            bare,
            ActionParameterType::ObjectTypeReference {
                interface_types: Vec::new()
            }
        );
        assert_eq!(ActionParameterType::from_tag("unknown"), None);
    }

    #[test]
    fn requirement_accepts_flag_or_list_length() {
        let flag: ParameterRequirement = serde_json::from_str("false").expect("flag");
        assert_eq!(flag, ParameterRequirement::Flag(false));
        let list: ParameterRequirement =
            serde_json::from_str(r#"{"listLength":{"min":1}}"#).expect("list length");
        assert_eq!(
            list,
            ParameterRequirement::ListLength {
                list_length: ListLength {
                    min: Some(1),
                    max: None
                }
            }
        );
    }

    #[test]
    fn effective_ordering_defaults_to_declaration_order() {
        let action: ActionType = serde_json::from_str(
            r#"{
                "apiName": "doThing",
                "displayName": "Do thing",
                "rules": [],
                "parameters": [
                    {"id": "b", "displayName": "B", "type": "boolean", "validation": {"allowedValues": {"type": "boolean"}}},
                    {"id": "a", "displayName": "A", "type": "string", "validation": {"allowedValues": {"type": "text"}}}
                ]
            }"#,
        )
        .expect("parse action");
        assert_eq!(action.effective_parameter_ordering(), vec!["b", "a"]);
        assert!(action.status.is_active());
    }
}
