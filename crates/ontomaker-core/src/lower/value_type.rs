use serde_json::{Map, Value, json};

use crate::model::ValueTypeDefinition;
use crate::registry::OntologyDefinition;

/// Groups every registered version under one entry per API name.
///
/// Metadata comes from the first registered version; later versions only contribute their
/// base type, constraints and examples.
#[must_use]
pub fn lower_value_types(definition: &OntologyDefinition, namespace: &str) -> Value {
    let package_namespace = namespace.trim_end_matches('.');
    let value_types = definition
        .value_types
        .values()
        .filter_map(|versions| {
            let first = versions.first()?;
            Some(json!({
                "metadata": {
                    "apiName": first.api_name,
                    "displayMetadata": {
                        "description": first.description.as_deref().unwrap_or(""),
                        "displayName": first.display_name,
                    },
                    "packageNamespace": package_namespace,
                    "status": first.status.to_wire(),
                },
                "versions": versions.iter().map(lower_version).collect::<Vec<_>>(),
            }))
        })
        .collect::<Vec<_>>();
    json!({ "valueTypes": value_types })
}

fn lower_version(value_type: &ValueTypeDefinition) -> Value {
    let constraints = value_type
        .data_constraints()
        .into_iter()
        .map(|(constraint, failure_message)| {
            let mut inner = Map::new();
            inner.insert("constraint".to_string(), constraint);
            if let Some(failure_message) = failure_message {
                inner.insert("failureMessage".to_string(), json!(failure_message));
            }
            json!({ "constraint": inner })
        })
        .collect::<Vec<_>>();
    json!({
        "baseType": value_type.base_type.to_wire(),
        "constraints": constraints,
        "exampleValues": value_type.example_values,
        "version": value_type.version,
    })
}
