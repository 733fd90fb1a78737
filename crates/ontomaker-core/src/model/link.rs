use serde::{Deserialize, Serialize};

use super::common::{Status, Visibility};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkSideMetadata {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl LinkSideMetadata {
    #[must_use]
    pub fn named(api_name: &str) -> Self {
        Self {
            api_name: api_name.to_string(),
            display_name: None,
            plural_display_name: None,
            group_display_name: None,
            visibility: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkSide {
    /// API name of the object on this side.
    pub object: String,
    pub metadata: LinkSideMetadata,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneToManyCardinality {
    #[default]
    OneToMany,
    OneToOne,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OneToManyLink {
    pub api_name: String,
    pub one: LinkSide,
    pub to_many: LinkSide,
    pub many_foreign_key_property: String,
    #[serde(default)]
    pub cardinality: OneToManyCardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edits_enabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub redacted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManyToManyLink {
    pub api_name: String,
    pub many: LinkSide,
    pub to_many: LinkSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edits_enabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub redacted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IntermediarySide {
    pub object: String,
    pub metadata: LinkSideMetadata,
    /// API name of the one-to-many link joining this side to the intermediary object.
    pub link_to_intermediary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IntermediaryLink {
    pub api_name: String,
    pub many: IntermediarySide,
    pub to_many: IntermediarySide,
    pub intermediary_object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub redacted: bool,
}

/// A link declaration; the shape is chosen by which side keys are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkTypeDefinition {
    Intermediary(IntermediaryLink),
    ManyToMany(ManyToManyLink),
    OneToMany(OneToManyLink),
}

impl LinkTypeDefinition {
    #[must_use]
    pub fn api_name(&self) -> &str {
        match self {
            Self::Intermediary(link) => &link.api_name,
            Self::ManyToMany(link) => &link.api_name,
            Self::OneToMany(link) => &link.api_name,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        match self {
            Self::Intermediary(link) => link.status.as_ref(),
            Self::ManyToMany(link) => link.status.as_ref(),
            Self::OneToMany(link) => link.status.as_ref(),
        }
    }

    #[must_use]
    pub fn redacted(&self) -> bool {
        match self {
            Self::Intermediary(link) => link.redacted,
            Self::ManyToMany(link) => link.redacted,
            Self::OneToMany(link) => link.redacted,
        }
    }

    #[must_use]
    pub fn edits_enabled(&self) -> bool {
        match self {
            Self::Intermediary(_) => false,
            Self::ManyToMany(link) => link.edits_enabled,
            Self::OneToMany(link) => link.edits_enabled,
        }
    }
}

/// A registered link: its kebab-case id plus the declaration with namespaced object names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkType {
    pub id: String,
    pub definition: LinkTypeDefinition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_shape_is_selected_by_side_keys() {
        let one_to_many: LinkTypeDefinition = serde_json::from_str(
            r#"{
                "apiName": "fizzToFoo",
                "one": {"object": "foo", "metadata": {"apiName": "fooLink"}},
                "toMany": {"object": "fizz", "metadata": {"apiName": "fizzLink"}},
                "manyForeignKeyProperty": "bar"
            }"#,
        )
        .expect("one-to-many");
        assert!(matches!(one_to_many, LinkTypeDefinition::OneToMany(_)));

        let many_to_many: LinkTypeDefinition = serde_json::from_str(
            r#"{
                "apiName": "fooToBuzz",
                "many": {"object": "foo", "metadata": {"apiName": "fooLink"}},
                "toMany": {"object": "buzz", "metadata": {"apiName": "buzzLink"}}
            }"#,
        )
        .expect("many-to-many");
        assert!(matches!(many_to_many, LinkTypeDefinition::ManyToMany(_)));

        let intermediary: LinkTypeDefinition = serde_json::from_str(
            r#"{
                "apiName": "fooToFizzViaBar",
                "many": {"object": "foo", "metadata": {"apiName": "fooLink"}, "linkToIntermediary": "fooToBar"},
                "toMany": {"object": "fizz", "metadata": {"apiName": "fizzLink"}, "linkToIntermediary": "fizzToBar"},
                "intermediaryObjectType": "bar"
            }"#,
        )
        .expect("intermediary");
        assert!(matches!(intermediary, LinkTypeDefinition::Intermediary(_)));
    }
}
