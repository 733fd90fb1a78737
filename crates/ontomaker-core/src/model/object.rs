use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{BlueprintIcon, Status, Visibility};
use super::property::{MarkingType, ObjectPropertyType, PropertyKind};

/// Row- and column-level access condition attached to a dataset's security groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SecurityCondition {
    And { conditions: Vec<SecurityCondition> },
    Or { conditions: Vec<SecurityCondition> },
    /// The user must hold the markings stored in `property`.
    MarkingProperty { property: String },
    /// The user must belong to one of the groups stored in `property`.
    GroupProperty { property: String },
    Group { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectSecurityPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granular_policy: Option<SecurityCondition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_mandatory_markings: BTreeMap<String, MarkingType>,
}

/// Properties guarded by their own policy instead of the object-level one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertySecurityGroup {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granular_policy: Option<SecurityCondition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_mandatory_markings: BTreeMap<String, MarkingType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ObjectDatasourceDefinition {
    Dataset {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object_security_policy: Option<ObjectSecurityPolicy>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property_security_groups: Option<Vec<PropertySecurityGroup>>,
    },
    Stream {
        /// ISO 8601 duration; absent means the stream keeps everything.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retention_period: Option<String>,
    },
    RestrictedView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfacePropertyMapping {
    pub interface_property: String,
    pub maps_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceImplementation {
    /// API name of the implemented interface.
    pub implements: String,
    #[serde(default)]
    pub property_mapping: Vec<InterfacePropertyMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectType {
    pub api_name: String,
    pub display_name: String,
    pub plural_display_name: String,
    pub primary_key_property_api_name: String,
    pub title_property_api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<BlueprintIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edits_enabled: bool,
    #[serde(default)]
    pub properties: Vec<ObjectPropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<ObjectDatasourceDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements_interfaces: Vec<InterfaceImplementation>,
}

impl ObjectType {
    #[must_use]
    pub fn property(&self, api_name: &str) -> Option<&ObjectPropertyType> {
        self.properties
            .iter()
            .find(|property| property.api_name == api_name)
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&ObjectPropertyType> {
        self.property(&self.primary_key_property_api_name)
    }

    #[must_use]
    pub fn has_marking_property(&self) -> bool {
        self.properties
            .iter()
            .any(|property| matches!(property.property_type, PropertyKind::Marking { .. }))
    }
}
