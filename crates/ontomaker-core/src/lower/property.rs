use serde_json::{Map, Value, json};

use crate::error::{MakerError, Result};
use crate::model::{
    Nullability, ObjectPropertyType, PropertyKind, SharedPropertyType, Status, TypeClass,
    ValueBaseType, ValueTypeDefinition, ValueTypeReference, Visibility, default_type_classes,
};
use crate::registry::OntologyDefinition;
use crate::wire::{empty_tagged, tagged};

/// Property type wire shape, wrapped in an array type when `array` is set.
#[must_use]
pub(crate) fn lower_type(kind: &PropertyKind, array: bool) -> Value {
    let inner = lower_scalar_type(kind);
    if array {
        tagged("array", json!({ "reducers": [], "subtype": inner }))
    } else {
        inner
    }
}

fn lower_scalar_type(kind: &PropertyKind) -> Value {
    match kind {
        PropertyKind::String(options) => tagged(
            "string",
            json!({
                "isLongText": options.is_long_text,
                "supportsEfficientLeadingWildcard": options.supports_efficient_leading_wildcard,
                "supportsExactMatching": options.supports_exact_matching,
            }),
        ),
        PropertyKind::Geopoint => empty_tagged("geohash"),
        PropertyKind::GeotimeSeries => empty_tagged("geotimeSeriesReference"),
        PropertyKind::Marking { marking_type } => {
            tagged("marking", json!({ "markingType": marking_type }))
        }
        PropertyKind::Struct(fields) => {
            let fields = fields
                .iter()
                .map(|field| {
                    let mut wire = Map::new();
                    wire.insert("aliases".to_string(), json!(field.aliases));
                    wire.insert("apiName".to_string(), json!(field.api_name));
                    let mut display = Map::new();
                    if let Some(description) = &field.description {
                        display.insert("description".to_string(), json!(description));
                    }
                    display.insert(
                        "displayName".to_string(),
                        json!(field.display_name.as_deref().unwrap_or(&field.api_name)),
                    );
                    wire.insert("displayMetadata".to_string(), Value::Object(display));
                    wire.insert("fieldType".to_string(), lower_scalar_type(&field.field_type));
                    wire.insert("typeClasses".to_string(), json!(field.type_classes));
                    Value::Object(wire)
                })
                .collect::<Vec<_>>();
            tagged("struct", json!({ "structFields": fields }))
        }
        other => empty_tagged(other.tag()),
    }
}

/// Explicit type classes, or the default render hints for types that support them.
#[must_use]
pub(crate) fn type_classes(explicit: Option<&Vec<TypeClass>>, kind: &PropertyKind) -> Vec<TypeClass> {
    match explicit {
        Some(classes) => classes.clone(),
        None if kind.supports_render_hints() => default_type_classes(),
        None => Vec::new(),
    }
}

/// Nullability and value-type constraints; `None` when the property carries neither.
pub(crate) fn lower_data_constraints(
    api_name: &str,
    kind: &PropertyKind,
    nullability: Option<Nullability>,
    value_type: Option<&ValueTypeDefinition>,
) -> Result<Option<Value>> {
    let nullability = match (kind, nullability) {
        (PropertyKind::Marking { .. }, Some(nullability)) if !nullability.no_nulls => {
            return Err(MakerError::Validation(format!(
                "Marking property type {api_name} has noNulls set to false, marking properties must not be nullable"
            )));
        }
        (PropertyKind::Marking { .. }, None) => Some(Nullability {
            no_empty_collections: true,
            no_nulls: true,
        }),
        (_, nullability) => nullability,
    };

    let constraints = match value_type {
        Some(value_type) => lower_property_constraints(value_type)?,
        None => Vec::new(),
    };
    if nullability.is_none() && constraints.is_empty() {
        return Ok(None);
    }

    let mut wire = Map::new();
    if let Some(nullability) = nullability {
        wire.insert("nullabilityV2".to_string(), serde_json::to_value(nullability)?);
    }
    wire.insert("propertyTypeConstraints".to_string(), Value::Array(constraints));
    Ok(Some(Value::Object(wire)))
}

fn lower_property_constraints(value_type: &ValueTypeDefinition) -> Result<Vec<Value>> {
    if matches!(
        value_type.base_type,
        ValueBaseType::Binary | ValueBaseType::Map { .. } | ValueBaseType::StructV2 { .. }
    ) {
        return Err(MakerError::Unsupported(format!(
            "value type {} has a {} base type, which cannot constrain a property",
            value_type.api_name,
            value_type.base_type.tag()
        )));
    }
    value_type
        .data_constraints()
        .into_iter()
        .map(|(constraints, failure_message)| {
            let mut wire = Map::new();
            wire.insert("constraints".to_string(), constraints);
            if let Some(failure_message) = failure_message {
                wire.insert(
                    "failureMessage".to_string(),
                    serde_json::to_value(failure_message)?,
                );
            }
            Ok(Value::Object(wire))
        })
        .collect()
}

/// Resolves a property's value-type reference against the locally defined versions.
pub(crate) fn resolve_value_type<'a>(
    definition: &'a OntologyDefinition,
    reference: Option<&ValueTypeReference>,
) -> Result<Option<&'a ValueTypeDefinition>> {
    let Some(reference) = reference else {
        return Ok(None);
    };
    definition
        .value_type_version(&reference.api_name, &reference.version)
        .map(Some)
        .ok_or_else(|| {
            MakerError::NotFound(format!(
                "Value type {} version {} is not defined",
                reference.api_name, reference.version
            ))
        })
}

#[must_use]
pub(crate) fn lower_value_type_reference(value_type: &ValueTypeDefinition, namespace: &str) -> Value {
    let mut display = Map::new();
    if let Some(description) = &value_type.description {
        display.insert("description".to_string(), json!(description));
    }
    display.insert("displayName".to_string(), json!(value_type.display_name));
    json!({
        "apiName": value_type.api_name,
        "displayMetadata": display,
        "packageNamespace": namespace.trim_end_matches('.'),
        "version": value_type.version,
    })
}

fn display_metadata(
    description: Option<&String>,
    display_name: &str,
    visibility: Option<Visibility>,
) -> Value {
    let mut display = Map::new();
    if let Some(description) = description {
        display.insert("description".to_string(), json!(description));
    }
    display.insert("displayName".to_string(), json!(display_name));
    display.insert(
        "visibility".to_string(),
        json!(visibility.unwrap_or_default()),
    );
    Value::Object(display)
}

/// One entry of an object's `propertyTypes` map.
pub(crate) fn lower_object_property(
    property: &ObjectPropertyType,
    definition: &OntologyDefinition,
    namespace: &str,
) -> Result<Value> {
    let value_type = resolve_value_type(definition, property.value_type.as_ref())?;
    let mut wire = Map::new();
    wire.insert("apiName".to_string(), json!(property.api_name));
    if let Some(formatter) = &property.base_formatter {
        wire.insert("baseFormatter".to_string(), formatter.clone());
    }
    if let Some(constraints) = lower_data_constraints(
        &property.api_name,
        &property.property_type,
        property.nullability,
        value_type,
    )? {
        wire.insert("dataConstraints".to_string(), constraints);
    }
    wire.insert(
        "displayMetadata".to_string(),
        display_metadata(
            property.description.as_ref(),
            property.display_name.as_deref().unwrap_or(&property.api_name),
            property.visibility,
        ),
    );
    wire.insert("indexedForSearch".to_string(), Value::Bool(true));
    if let Some(shared) = &property.shared_property_type {
        wire.insert("sharedPropertyTypeApiName".to_string(), json!(shared));
    }
    wire.insert(
        "status".to_string(),
        property.status.clone().unwrap_or(Status::Active).to_wire(),
    );
    wire.insert(
        "type".to_string(),
        lower_type(&property.property_type, property.array),
    );
    wire.insert(
        "typeClasses".to_string(),
        json!(type_classes(property.type_classes.as_ref(), &property.property_type)),
    );
    if let Some(value_type) = value_type {
        wire.insert(
            "valueType".to_string(),
            lower_value_type_reference(value_type, namespace),
        );
    }
    Ok(Value::Object(wire))
}

/// The full shared property type record, as embedded both in block data and in interfaces.
pub(crate) fn lower_shared_property_type(
    spt: &SharedPropertyType,
    definition: &OntologyDefinition,
    namespace: &str,
) -> Result<Value> {
    let value_type = resolve_value_type(definition, spt.value_type.as_ref())?;
    let mut wire = Map::new();
    wire.insert("aliases".to_string(), json!([]));
    wire.insert("apiName".to_string(), json!(spt.api_name));
    if let Some(formatter) = &spt.base_formatter {
        wire.insert("baseFormatter".to_string(), formatter.clone());
    }
    if let Some(constraints) =
        lower_data_constraints(&spt.api_name, &spt.property_type, spt.nullability, value_type)?
    {
        wire.insert("dataConstraints".to_string(), constraints);
    }
    wire.insert(
        "displayMetadata".to_string(),
        display_metadata(
            spt.description.as_ref(),
            spt.display_name.as_deref().unwrap_or(&spt.api_name),
            spt.visibility,
        ),
    );
    if let Some(mapping) = &spt.gotham_mapping {
        wire.insert("gothamMapping".to_string(), mapping.clone());
    }
    wire.insert("indexedForSearch".to_string(), Value::Bool(true));
    wire.insert("type".to_string(), lower_type(&spt.property_type, spt.array));
    wire.insert(
        "typeClasses".to_string(),
        json!(type_classes(spt.type_classes.as_ref(), &spt.property_type)),
    );
    if let Some(value_type) = value_type {
        wire.insert(
            "valueType".to_string(),
            lower_value_type_reference(value_type, namespace),
        );
    }
    Ok(Value::Object(wire))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarkingType, StringOptions, StructField, ValueTypeConstraint};

    #[test]
    fn scalar_types_follow_wire_names() {
        assert_eq!(
            lower_type(&PropertyKind::string(), false),
            json!({"type": "string", "string": {
                "isLongText": false,
                "supportsEfficientLeadingWildcard": false,
                "supportsExactMatching": true,
            }})
        );
        assert_eq!(
            lower_type(&PropertyKind::Geopoint, false),
            json!({"type": "geohash", "geohash": {}})
        );
        assert_eq!(
            lower_type(&PropertyKind::GeotimeSeries, false),
            json!({"type": "geotimeSeriesReference", "geotimeSeriesReference": {}})
        );
        assert_eq!(
            lower_type(&PropertyKind::Decimal, true),
            json!({"type": "array", "array": {
                "reducers": [],
                "subtype": {"type": "decimal", "decimal": {}},
            }})
        );
        let long_text = PropertyKind::String(StringOptions {
            is_long_text: true,
            ..StringOptions::default()
        });
        assert_eq!(lower_type(&long_text, false)["string"]["isLongText"], json!(true));
    }

    #[test]
    fn struct_fields_default_display_name_to_api_name() {
        let mut lat = StructField::new("lat", PropertyKind::Double);
        lat.display_name = Some("Latitude".to_string());
        let kind = PropertyKind::Struct(vec![lat, StructField::new("lng", PropertyKind::Double)]);
        let wire = lower_type(&kind, false);
        let fields = wire["struct"]["structFields"]
            .as_array()
            .expect("struct fields");
        assert_eq!(fields[0]["displayMetadata"]["displayName"], "Latitude");
        assert_eq!(fields[1]["displayMetadata"]["displayName"], "lng");
        assert_eq!(fields[1]["fieldType"], json!({"type": "double", "double": {}}));
        assert!(type_classes(None, &kind).is_empty());
    }

    #[test]
    fn markings_are_never_nullable() {
        let marking = PropertyKind::Marking {
            marking_type: MarkingType::Cbac,
        };
        let constraints = lower_data_constraints("m", &marking, None, None)
            .expect("constraints")
            .expect("marking always carries nullability");
        assert_eq!(
            constraints,
            json!({
                "nullabilityV2": {"noEmptyCollections": true, "noNulls": true},
                "propertyTypeConstraints": [],
            })
        );

        let err = lower_data_constraints(
            "m",
            &marking,
            Some(Nullability {
                no_empty_collections: true,
                no_nulls: false,
            }),
            None,
        )
        .expect_err("nullable marking must fail");
        assert!(err.to_string().contains("marking properties must not be nullable"));
        assert!(
            lower_data_constraints("s", &PropertyKind::string(), None, None)
                .expect("no constraints")
                .is_none()
        );
    }

    #[test]
    fn value_type_constraints_become_property_constraints() {
        let value_type = ValueTypeDefinition {
            api_name: "stringWithConstraints".to_string(),
            display_name: "String With Constraints".to_string(),
            description: Some("A string type with additional constraints".to_string()),
            status: Status::Active,
            version: "1.0.0".to_string(),
            base_type: ValueBaseType::String,
            constraints: vec![ValueTypeConstraint {
                constraint: json!({"type": "length", "length": {"minSize": 5, "maxSize": 20}}),
                failure_message: Some(crate::model::FailureMessage {
                    message: "String must be between 5 and 20 characters".to_string(),
                    localized_messages: None,
                }),
            }],
            example_values: Vec::new(),
            namespace_prefix: false,
        };
        let constraints =
            lower_data_constraints("s", &PropertyKind::string(), None, Some(&value_type))
                .expect("constraints")
                .expect("value type constraints");
        let first = &constraints["propertyTypeConstraints"][0];
        assert_eq!(first["constraints"]["type"], "string");
        assert_eq!(first["constraints"]["string"]["length"]["minSize"], 5);
        assert_eq!(
            first["failureMessage"]["message"],
            "String must be between 5 and 20 characters"
        );

        assert_eq!(
            lower_value_type_reference(&value_type, "com.palantir."),
            json!({
                "apiName": "stringWithConstraints",
                "version": "1.0.0",
                "packageNamespace": "com.palantir",
                "displayMetadata": {
                    "displayName": "String With Constraints",
                    "description": "A string type with additional constraints",
                },
            })
        );
    }
}
