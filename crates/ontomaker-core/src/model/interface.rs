use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{BlueprintIcon, Status};
use super::property::PropertyKind;
use crate::wire::tagged;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceProperty {
    /// API name of the backing shared property type.
    pub shared_property_type: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterfaceLinkCardinality {
    Single,
    Many,
}

/// Target of an interface link: another interface or a concrete object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "apiName", rename_all = "camelCase")]
pub enum LinkedEntityTypeId {
    InterfaceType(String),
    ObjectType(String),
}

impl LinkedEntityTypeId {
    #[must_use]
    pub fn api_name(&self) -> &str {
        match self {
            Self::InterfaceType(api_name) | Self::ObjectType(api_name) => api_name,
        }
    }

    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::InterfaceType(api_name) => tagged("interfaceType", json!(api_name)),
            Self::ObjectType(api_name) => tagged("objectType", json!(api_name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceLink {
    pub api_name: String,
    pub display_name: String,
    pub description: String,
    pub cardinality: InterfaceLinkCardinality,
    pub linked_entity: LinkedEntityTypeId,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceType {
    pub api_name: String,
    pub display_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<BlueprintIcon>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub extends_interfaces: Vec<String>,
    /// Keyed by shared property type API name.
    #[serde(default)]
    pub properties: BTreeMap<String, InterfaceProperty>,
    #[serde(default)]
    pub links: Vec<InterfaceLink>,
    #[serde(default = "default_searchable")]
    pub searchable: bool,
}

/// How an interface declaration names one of its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterfacePropertyDefinition {
    Shared(InterfaceProperty),
    /// A bare type; a shared property type is created for it.
    Inline(PropertyKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceTypeDefinition {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<BlueprintIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, InterfacePropertyDefinition>,
    #[serde(default = "default_searchable")]
    pub searchable: bool,
}

impl InterfaceTypeDefinition {
    #[must_use]
    pub fn named(api_name: &str) -> Self {
        Self {
            api_name: api_name.to_string(),
            display_name: None,
            description: None,
            icon: None,
            status: None,
            extends: Vec::new(),
            properties: BTreeMap::new(),
            searchable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceLinkConstraint {
    pub api_name: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_one: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_many: Option<String>,
    /// Set when the target is a concrete object type rather than an interface.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub to_object_type: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

const fn default_required() -> bool {
    true
}

const fn default_searchable() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_properties_accept_shared_or_inline_types() {
        let definition: InterfaceTypeDefinition = serde_json::from_str(
            r#"{
                "apiName": "interface",
                "properties": {
                    "foo": "string",
                    "bar": {"sharedPropertyType": "com.palantir.bar", "required": false}
                }
            }"#,
        )
        .expect("interface definition");
        assert!(definition.searchable);
        assert!(matches!(
            definition.properties["foo"],
            InterfacePropertyDefinition::Inline(PropertyKind::String(_))
        ));
        let InterfacePropertyDefinition::Shared(bar) = &definition.properties["bar"] else {
            panic!("expected shared property reference");
        };
        assert!(!bar.required);
    }

    #[test]
    fn linked_entity_lowers_to_tagged_union() {
        let target = LinkedEntityTypeId::InterfaceType("com.palantir.Bar".to_string());
        assert_eq!(
            target.to_wire(),
            json!({"type": "interfaceType", "interfaceType": "com.palantir.Bar"})
        );
        assert_eq!(target.api_name(), "com.palantir.Bar");
    }
}
