use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

use super::property::lower_object_property;
use crate::error::{MakerError, Result};
use crate::model::{
    BlueprintIcon, MarkingType, ObjectDatasourceDefinition, ObjectPropertyType,
    ObjectSecurityPolicy, ObjectType, PropertyKind, PropertySecurityGroup, SecurityCondition,
    Status,
};
use crate::registry::OntologyDefinition;
use crate::wire::{empty_tagged, tagged};

const DEFAULT_ICON_LOCATOR: &str = "cube";
const DEFAULT_ICON_COLOR: &str = "#2D72D2";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_OBJECT_SECURITY_POLICY: &str = "defaultObjectSecurityPolicy";

/// Wraps a datasource definition with its rid and edit configuration.
pub(super) fn datasource_entry(name: &str, definition: Value) -> Value {
    json!({
        "datasource": definition,
        "editsConfiguration": { "onlyAllowPrivilegedEdits": false },
        "redacted": false,
        "rid": format!("ri.ontology.main.datasource.{name}"),
    })
}

pub(super) fn lower_object_type(
    object: &ObjectType,
    definition: &OntologyDefinition,
    namespace: &str,
) -> Result<Value> {
    let mut datasources = object
        .properties
        .iter()
        .filter_map(|property| implicit_datasource(&object.api_name, property))
        .collect::<Vec<_>>();
    datasources.push(datasource_entry(
        &object.api_name,
        base_datasource(object)?,
    ));

    let mut property_types = Map::new();
    for property in &object.properties {
        property_types.insert(
            property.api_name.clone(),
            lower_object_property(property, definition, namespace)?,
        );
    }

    let mut display = Map::new();
    if let Some(description) = &object.description {
        display.insert("description".to_string(), json!(description));
    }
    display.insert("displayName".to_string(), json!(object.display_name));
    if let Some(group) = &object.group_display_name {
        display.insert("groupDisplayName".to_string(), json!(group));
    }
    let default_icon = BlueprintIcon::new(DEFAULT_ICON_LOCATOR, DEFAULT_ICON_COLOR);
    display.insert(
        "icon".to_string(),
        object.icon.as_ref().unwrap_or(&default_icon).to_wire(),
    );
    display.insert(
        "pluralDisplayName".to_string(),
        json!(object.plural_display_name),
    );
    display.insert(
        "visibility".to_string(),
        json!(object.visibility.unwrap_or_default()),
    );

    let implementations = object
        .implements_interfaces
        .iter()
        .map(|implementation| {
            let properties = implementation
                .property_mapping
                .iter()
                .map(|mapping| {
                    (
                        mapping.interface_property.clone(),
                        json!({ "propertyTypeRid": mapping.maps_to }),
                    )
                })
                .collect::<Map<_, _>>();
            json!({
                "interfaceTypeApiName": implementation.implements,
                "properties": properties,
            })
        })
        .collect::<Vec<_>>();

    Ok(json!({
        "datasources": datasources,
        "entityMetadata": { "arePatchesEnabled": object.edits_enabled },
        "objectType": {
            "allImplementsInterfaces": {},
            "apiName": object.api_name,
            "displayMetadata": display,
            "implementsInterfaces2": implementations,
            "primaryKeys": [object.primary_key_property_api_name],
            "propertyTypes": property_types,
            "redacted": false,
            "status": object.status.clone().unwrap_or(Status::Active).to_wire(),
            "titlePropertyTypeRid": object.title_property_api_name,
        },
    }))
}

/// Media and geotime-series properties each get a datasource of their own.
fn implicit_datasource(object_api_name: &str, property: &ObjectPropertyType) -> Option<Value> {
    let locator = format!("{object_api_name}.{}", property.api_name);
    let definition = match property.property_type {
        PropertyKind::MediaReference => tagged(
            "mediaSetView",
            json!({
                "assumedMarkings": [],
                "mediaSetViewLocator": locator,
                "properties": [property.api_name],
            }),
        ),
        PropertyKind::GeotimeSeries => tagged(
            "geotimeSeries",
            json!({
                "geotimeSeriesIntegrationRid": locator,
                "properties": [property.api_name],
            }),
        ),
        _ => return None,
    };
    Some(datasource_entry(&property.api_name, definition))
}

fn base_datasource(object: &ObjectType) -> Result<Value> {
    let properties = &object.properties;
    Ok(match &object.datasource {
        Some(ObjectDatasourceDefinition::Stream { retention_period }) => {
            let retention_policy = match retention_period {
                Some(window) => tagged("time", json!({ "window": window })),
                None => empty_tagged("none"),
            };
            let property_mapping = properties
                .iter()
                .map(|property| (property.api_name.clone(), json!(property.api_name)))
                .collect::<Map<_, _>>();
            tagged(
                "streamV2",
                json!({
                    "propertyMapping": property_mapping,
                    "retentionPolicy": retention_policy,
                    "streamLocator": object.api_name,
                }),
            )
        }
        Some(ObjectDatasourceDefinition::RestrictedView) => tagged(
            "restrictedViewV2",
            json!({
                "propertyMapping": column_mapping(properties),
                "restrictedViewRid": object.api_name,
            }),
        ),
        Some(ObjectDatasourceDefinition::Dataset {
            object_security_policy,
            property_security_groups,
        }) if object.has_marking_property()
            || object_security_policy.is_some()
            || property_security_groups.is_some() =>
        {
            secured_dataset(
                object,
                object_security_policy.as_ref(),
                property_security_groups.as_deref(),
            )?
        }
        None if object.has_marking_property() => secured_dataset(object, None, None)?,
        Some(ObjectDatasourceDefinition::Dataset { .. }) | None => tagged(
            "datasetV2",
            json!({
                "datasetRid": object.api_name,
                "propertyMapping": column_mapping(properties),
            }),
        ),
    })
}

/// Dataset backing with security groups. Objects with marking properties always take this form.
fn secured_dataset(
    object: &ObjectType,
    object_policy: Option<&ObjectSecurityPolicy>,
    property_groups: Option<&[PropertySecurityGroup]>,
) -> Result<Value> {
    let groups = security_groups(object, object_policy, property_groups)?;
    Ok(tagged(
        "datasetV3",
        json!({
            "branchId": DEFAULT_BRANCH,
            "datasetRid": object.api_name,
            "propertyMapping": column_mapping(&object.properties),
            "propertySecurityGroups": { "groups": groups },
        }),
    ))
}

/// The object-level group holds every property not claimed by a property security group.
fn security_groups(
    object: &ObjectType,
    object_policy: Option<&ObjectSecurityPolicy>,
    property_groups: Option<&[PropertySecurityGroup]>,
) -> Result<Vec<Value>> {
    let property_groups = property_groups.unwrap_or_default();
    let mut claimed = BTreeSet::new();
    for group in property_groups {
        for property in &group.properties {
            if object.property(property).is_none() {
                return Err(MakerError::Validation(format!(
                    "Property \"{property}\" in property security group {} does not exist in the properties list",
                    group.name
                )));
            }
            if !claimed.insert(property.as_str()) {
                return Err(MakerError::Validation(format!(
                    "Property \"{property}\" is used in multiple property security groups"
                )));
            }
            if *property == object.primary_key_property_api_name {
                return Err(MakerError::Validation(format!(
                    "Property \"{property}\" in property security group {} cannot be the primary key",
                    group.name
                )));
            }
        }
    }

    let unclaimed = object
        .properties
        .iter()
        .map(|property| property.api_name.as_str())
        .filter(|api_name| !claimed.contains(api_name))
        .collect::<Vec<_>>();
    let object_group = json!({
        "properties": unclaimed,
        "rid": object_policy
            .and_then(|policy| policy.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_OBJECT_SECURITY_POLICY),
        "security": granular_security(
            object_policy.and_then(|policy| policy.granular_policy.as_ref()),
            object_policy.map(|policy| &policy.additional_mandatory_markings),
        ),
        "type": empty_tagged("primaryKey"),
    });

    let mut groups = vec![object_group];
    groups.extend(property_groups.iter().map(|group| {
        json!({
            "properties": group.properties,
            "rid": group.name,
            "security": granular_security(
                group.granular_policy.as_ref(),
                Some(&group.additional_mandatory_markings),
            ),
            "type": tagged("property", json!({ "name": group.name })),
        })
    }));
    Ok(groups)
}

fn granular_security(
    condition: Option<&SecurityCondition>,
    markings: Option<&BTreeMap<String, MarkingType>>,
) -> Value {
    let condition = match condition {
        Some(condition) => lower_security_condition(condition),
        None => tagged("and", json!({ "conditions": [] })),
    };
    tagged(
        "granular",
        json!({
            "viewPolicy": {
                "additionalMandatory": {
                    "assumedMarkings": [],
                    "markings": markings.cloned().unwrap_or_default(),
                },
                "granularPolicyCondition": condition,
            },
        }),
    )
}

fn lower_security_condition(condition: &SecurityCondition) -> Value {
    let user_groups = || tagged("userProperty", empty_tagged("groupIds"));
    match condition {
        SecurityCondition::And { conditions } => tagged(
            "and",
            json!({ "conditions": conditions.iter().map(lower_security_condition).collect::<Vec<_>>() }),
        ),
        SecurityCondition::Or { conditions } => tagged(
            "or",
            json!({ "conditions": conditions.iter().map(lower_security_condition).collect::<Vec<_>>() }),
        ),
        SecurityCondition::MarkingProperty { property } => {
            tagged("markings", json!({ "property": property }))
        }
        SecurityCondition::GroupProperty { property } => tagged(
            "comparison",
            json!({
                "left": user_groups(),
                "operator": "INTERSECTS",
                "right": tagged("property", json!(property)),
            }),
        ),
        SecurityCondition::Group { name } => tagged(
            "comparison",
            json!({
                "left": user_groups(),
                "operator": "INTERSECTS",
                "right": tagged("constant", tagged("strings", json!([name]))),
            }),
        ),
    }
}

fn column_mapping(properties: &[ObjectPropertyType]) -> Map<String, Value> {
    properties
        .iter()
        .map(|property| {
            let mapping = if property.edit_only {
                empty_tagged("editOnly")
            } else if let PropertyKind::Struct(fields) = &property.property_type {
                let fields = fields
                    .iter()
                    .map(|field| {
                        (
                            field.api_name.clone(),
                            json!({ "apiName": field.api_name, "mappings": {} }),
                        )
                    })
                    .collect::<Map<_, _>>();
                tagged(
                    "struct",
                    json!({ "column": property.api_name, "mapping": fields }),
                )
            } else {
                tagged("column", json!(property.api_name))
            };
            (property.api_name.clone(), mapping)
        })
        .collect()
}
