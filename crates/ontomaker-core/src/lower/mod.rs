//! Lowering from registry records to the ontology metadata wire format.
//!
//! Every wire map is a `serde_json::Map`, which keeps keys sorted, so two lowerings of the same
//! registry serialize to identical bytes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::registry::EntityLookup;

mod action;
mod compute_module;
mod imported;
mod interface;
mod link;
mod object;
mod openapi;
pub(crate) mod property;
mod value_type;

pub use compute_module::lower_compute_modules;
pub use openapi::convert_open_api_to_function_spec;
pub use value_type::lower_value_types;

/// Full ontology metadata: block data for local entities plus summaries of imported ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyIr {
    pub block_data: OntologyBlockData,
    pub imported_types: ImportedTypes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyBlockData {
    pub action_types: BTreeMap<String, Value>,
    pub block_permission_information: BlockPermissionInformation,
    pub interface_types: BTreeMap<String, Value>,
    pub link_types: BTreeMap<String, Value>,
    pub object_types: BTreeMap<String, Value>,
    pub shared_property_types: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPermissionInformation {
    pub action_types: BTreeMap<String, Value>,
    pub link_types: BTreeMap<String, Value>,
    pub object_types: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedTypes {
    pub action_types: Vec<Value>,
    pub interface_types: Vec<Value>,
    pub link_types: Vec<Value>,
    pub object_types: Vec<Value>,
    pub shared_property_types: Vec<Value>,
}

/// Lowers every local entity in `lookup` into block data.
///
/// References (link endpoints, interface properties) resolve through `lookup`, so they may
/// point at imported entities; those are summarized under `importedTypes` only.
pub fn lower_ontology(lookup: EntityLookup<'_>, namespace: &str) -> Result<OntologyIr> {
    let local = lookup.local();
    let mut block_data = OntologyBlockData::default();

    for (api_name, object) in &local.object_types {
        tracing::debug!(api_name = %api_name, "lowering object type");
        block_data.object_types.insert(
            api_name.clone(),
            object::lower_object_type(object, local, namespace)?,
        );
    }
    for (id, link) in &local.link_types {
        tracing::debug!(id = %id, "lowering link type");
        block_data
            .link_types
            .insert(id.clone(), link::lower_link_type(link, lookup)?);
    }
    for (api_name, interface) in &local.interface_types {
        tracing::debug!(api_name = %api_name, "lowering interface type");
        block_data.interface_types.insert(
            api_name.clone(),
            interface::lower_interface_type(interface, lookup, namespace)?,
        );
    }
    for (api_name, spt) in &local.shared_property_types {
        tracing::debug!(api_name = %api_name, "lowering shared property type");
        block_data.shared_property_types.insert(
            api_name.clone(),
            interface::lower_shared_property_entry(spt, lookup, namespace)?,
        );
    }
    for (api_name, action) in &local.action_types {
        tracing::debug!(api_name = %api_name, "lowering action type");
        block_data
            .action_types
            .insert(api_name.clone(), action::lower_action_type(action)?);
        if !action.validation.is_empty() {
            block_data
                .block_permission_information
                .action_types
                .insert(api_name.clone(), action::restriction_status());
        }
    }

    Ok(OntologyIr {
        block_data,
        imported_types: imported::lower_imported_types(lookup.imported()),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builder::OntologyBuilder;
    use crate::model::{ActionValidationRule, ObjectType};
    use crate::registry::OntologyEntity;

    fn object(raw: Value) -> ObjectType {
        serde_json::from_value(raw).expect("object")
    }

    fn foo() -> ObjectType {
        object(json!({
            "apiName": "foo",
            "displayName": "Foo",
            "pluralDisplayName": "Foos",
            "primaryKeyPropertyApiName": "bar",
            "titlePropertyApiName": "bar",
            "properties": [{"apiName": "bar", "type": "string"}]
        }))
    }

    #[test]
    fn empty_registry_lowers_to_empty_maps() {
        let builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let ir = lower_ontology(builder.lookup(), builder.namespace()).expect("lowered");
        assert_eq!(
            serde_json::to_value(&ir).expect("serialize"),
            json!({
                "blockData": {
                    "actionTypes": {},
                    "blockPermissionInformation": {
                        "actionTypes": {},
                        "linkTypes": {},
                        "objectTypes": {},
                    },
                    "interfaceTypes": {},
                    "linkTypes": {},
                    "objectTypes": {},
                    "sharedPropertyTypes": {},
                },
                "importedTypes": {
                    "actionTypes": [],
                    "interfaceTypes": [],
                    "linkTypes": [],
                    "objectTypes": [],
                    "sharedPropertyTypes": [],
                },
            })
        );
    }

    #[test]
    fn validated_actions_get_restriction_status() {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        builder.define_object(foo()).expect("object");
        builder
            .define_create_object_action("foo", None)
            .expect("unrestricted action");
        let rule: ActionValidationRule =
            serde_json::from_value(json!({"condition": {"type": "group", "name": "admins"}}))
                .expect("rule");
        builder
            .define_delete_object_action("foo", Some(rule))
            .expect("restricted action");

        let ir = lower_ontology(builder.lookup(), builder.namespace()).expect("lowered");
        assert_eq!(ir.block_data.action_types.len(), 2);
        let permissions = &ir.block_data.block_permission_information.action_types;
        assert_eq!(permissions.len(), 1);
        let (api_name, status) = permissions.iter().next().expect("one restricted action");
        assert!(api_name.starts_with("com.palantir.delete"));
        assert_eq!(status["restrictionStatus"]["hasRolesApplied"], true);
    }

    #[test]
    fn imported_entities_are_summarized_not_emitted() {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let mut imported = foo();
        imported.api_name = "com.other.foo".to_string();
        builder
            .import_ontology_entity(OntologyEntity::ObjectType(imported))
            .expect("import");

        let ir = lower_ontology(builder.lookup(), builder.namespace()).expect("lowered");
        assert!(ir.block_data.object_types.is_empty());
        assert_eq!(
            ir.imported_types.object_types,
            vec![json!({"apiName": "com.other.foo", "displayName": "Foo", "propertyTypes": ["bar"]})]
        );
    }
}
