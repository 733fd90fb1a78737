use serde_json::{Map, Value, json};

use super::property::lower_shared_property_type;
use crate::error::{MakerError, Result};
use crate::model::{InterfaceType, SharedPropertyType};
use crate::registry::EntityLookup;

pub(super) fn lower_shared_property_entry(
    spt: &SharedPropertyType,
    lookup: EntityLookup<'_>,
    namespace: &str,
) -> Result<Value> {
    Ok(json!({
        "sharedPropertyType": lower_shared_property_type(spt, lookup.local(), namespace)?,
    }))
}

/// Interface block data. The `all*` closure fields are computed server-side and stay empty.
pub(super) fn lower_interface_type(
    interface: &InterfaceType,
    lookup: EntityLookup<'_>,
    namespace: &str,
) -> Result<Value> {
    let mut properties = Map::new();
    for (api_name, property) in &interface.properties {
        let spt = lookup
            .shared_property_type(&property.shared_property_type)
            .ok_or_else(|| {
                MakerError::NotFound(format!(
                    "Shared property type {} of interface {} is not defined",
                    property.shared_property_type, interface.api_name
                ))
            })?;
        properties.insert(
            api_name.clone(),
            json!({
                "required": property.required,
                "sharedPropertyType": lower_shared_property_type(spt, lookup.local(), namespace)?,
            }),
        );
    }

    let links = interface
        .links
        .iter()
        .map(|link| {
            json!({
                "cardinality": link.cardinality,
                "linkedEntityTypeId": link.linked_entity.to_wire(),
                "metadata": {
                    "apiName": link.api_name,
                    "description": link.description,
                    "displayName": link.display_name,
                },
                "required": link.required,
            })
        })
        .collect::<Vec<_>>();

    let mut display = Map::new();
    display.insert("description".to_string(), json!(interface.description));
    display.insert("displayName".to_string(), json!(interface.display_name));
    if let Some(icon) = &interface.icon {
        display.insert("icon".to_string(), icon.to_wire());
    }

    Ok(json!({
        "interfaceType": {
            "allExtendsInterfaces": [],
            "allLinks": [],
            "allProperties": [],
            "allPropertiesV2": {},
            "allPropertiesV3": {},
            "apiName": interface.api_name,
            "displayMetadata": display,
            "extendsInterfaces": interface.extends_interfaces,
            "links": links,
            "properties": [],
            "propertiesV2": properties,
            "propertiesV3": {},
            "searchable": interface.searchable,
            "status": interface.status.to_wire(),
        },
    }))
}
