use serde::{Deserialize, Serialize};

use super::common::{Nullability, TypeClass, ValueTypeReference, Visibility};
use super::property::PropertyKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SharedPropertyType {
    pub api_name: String,
    #[serde(default)]
    pub non_namespaced_api_name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_classes: Option<Vec<TypeClass>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueTypeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullability: Option<Nullability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gotham_mapping: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_formatter: Option<serde_json::Value>,
}

impl SharedPropertyType {
    #[must_use]
    pub fn new(api_name: &str, property_type: PropertyKind) -> Self {
        Self {
            api_name: api_name.to_string(),
            non_namespaced_api_name: api_name.to_string(),
            property_type,
            array: false,
            display_name: None,
            description: None,
            visibility: None,
            type_classes: None,
            value_type: None,
            nullability: None,
            gotham_mapping: None,
            base_formatter: None,
        }
    }
}
