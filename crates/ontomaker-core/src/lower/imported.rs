use serde_json::{Map, Value, json};

use super::ImportedTypes;
use crate::registry::OntologyDefinition;

/// Summaries of entities referenced from other packages. Only names and types travel.
pub(super) fn lower_imported_types(imported: &OntologyDefinition) -> ImportedTypes {
    ImportedTypes {
        action_types: imported
            .action_types
            .values()
            .map(|action| {
                json!({
                    "apiName": action.api_name,
                    "displayName": action.display_name,
                    "parameters": action
                        .parameters
                        .iter()
                        .map(|parameter| parameter.id.as_str())
                        .collect::<Vec<_>>(),
                })
            })
            .collect(),
        interface_types: imported
            .interface_types
            .values()
            .map(|interface| {
                json!({
                    "apiName": interface.api_name,
                    "displayName": interface.display_name,
                    "properties": interface.properties.keys().collect::<Vec<_>>(),
                })
            })
            .collect(),
        link_types: imported
            .link_types
            .values()
            .map(|link| {
                json!({
                    "apiName": link.definition.api_name(),
                    "linkTypeId": link.id,
                })
            })
            .collect(),
        object_types: imported
            .object_types
            .values()
            .map(|object| {
                json!({
                    "apiName": object.api_name,
                    "displayName": object.display_name,
                    "propertyTypes": object
                        .properties
                        .iter()
                        .map(|property| property.api_name.as_str())
                        .collect::<Vec<_>>(),
                })
            })
            .collect(),
        shared_property_types: imported
            .shared_property_types
            .values()
            .map(|spt| {
                let mut wire = Map::new();
                wire.insert("apiName".to_string(), json!(spt.api_name));
                if let Some(description) = &spt.description {
                    wire.insert("description".to_string(), json!(description));
                }
                wire.insert(
                    "displayName".to_string(),
                    json!(spt.display_name.as_deref().unwrap_or(&spt.api_name)),
                );
                wire.insert(
                    "type".to_string(),
                    super::property::lower_type(&spt.property_type, spt.array),
                );
                Value::Object(wire)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyKind, SharedPropertyType};
    use crate::registry::OntologyEntity;

    #[test]
    fn imported_spt_keeps_foreign_name_and_type() {
        let mut imported = OntologyDefinition::default();
        let mut spt = SharedPropertyType::new("com.other.package.spt", PropertyKind::string());
        spt.description = Some("from elsewhere".to_string());
        imported.register(OntologyEntity::SharedPropertyType(spt));

        let types = lower_imported_types(&imported);
        assert_eq!(
            types.shared_property_types,
            vec![json!({
                "apiName": "com.other.package.spt",
                "description": "from elsewhere",
                "displayName": "com.other.package.spt",
                "type": {"type": "string", "string": {
                    "isLongText": false,
                    "supportsEfficientLeadingWildcard": false,
                    "supportsExactMatching": true,
                }},
            })]
        );
        assert!(types.object_types.is_empty());
    }
}
