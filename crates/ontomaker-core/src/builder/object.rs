use std::collections::BTreeSet;

use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::iso8601::{is_iso8601_datetime, is_iso8601_duration};
use crate::model::{
    InterfaceImplementation, ObjectDatasourceDefinition, ObjectType, SharedPropertyType, Status,
};
use crate::naming::validate_api_name;
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Validates and registers an object type.
    ///
    /// Error messages name the object as declared, before namespacing.
    pub fn define_object(&mut self, object: ObjectType) -> Result<ObjectType> {
        validate_api_name(&object.api_name)?;
        let api_name = self.sanitize(&object.api_name);
        if self.definition.object_types.contains_key(&api_name) {
            return Err(MakerError::Conflict(format!(
                "Object type with apiName {} is already defined",
                object.api_name
            )));
        }

        let mut seen = BTreeSet::new();
        for property in &object.properties {
            validate_api_name(&property.api_name)?;
            if !seen.insert(property.api_name.as_str()) {
                return Err(MakerError::Validation(format!(
                    "Property {} is defined more than once on object {}",
                    property.api_name, object.api_name
                )));
            }
        }

        validate_keys(&object)?;
        validate_datasource(&object)?;
        validate_status(&object)?;
        for implementation in &object.implements_interfaces {
            self.validate_implementation(&object, implementation)?;
        }

        let mut object = object;
        object.api_name = api_name;
        for property in &mut object.properties {
            if let Some(shared) = property.shared_property_type.take() {
                property.shared_property_type = Some(self.sanitize(&shared));
            }
        }
        for implementation in &mut object.implements_interfaces {
            implementation.implements = self.resolve_interface_name(&implementation.implements);
            for mapping in &mut implementation.property_mapping {
                mapping.interface_property = self.sanitize(&mapping.interface_property);
            }
        }

        self.register(OntologyEntity::ObjectType(object.clone()));
        Ok(object)
    }

    fn resolve_interface_name(&self, api_name: &str) -> String {
        self.require_interface(api_name)
            .map_or_else(|_| self.sanitize(api_name), |interface| interface.api_name.clone())
    }

    fn validate_implementation(
        &self,
        object: &ObjectType,
        implementation: &InterfaceImplementation,
    ) -> Result<()> {
        let interface = self.require_interface(&implementation.implements)?;
        let all_properties = self.lookup().all_interface_properties(interface);
        let mapped = implementation
            .property_mapping
            .iter()
            .map(|mapping| (self.sanitize(&mapping.interface_property), mapping.maps_to.as_str()))
            .collect::<std::collections::BTreeMap<_, _>>();

        let mut reasons = Vec::new();
        for (spt_api_name, interface_property) in &all_properties {
            let Some(maps_to) = mapped.get(spt_api_name) else {
                reasons.push(format!(
                    "Interface property {spt_api_name} not implemented by {} object definition",
                    object.api_name
                ));
                continue;
            };
            let spt = self
                .lookup()
                .shared_property_type(&interface_property.shared_property_type);
            if let Some(reason) = check_mapped_property(object, spt_api_name, spt, maps_to) {
                reasons.push(reason);
            }
        }
        for mapping in &implementation.property_mapping {
            if !all_properties.contains_key(&self.sanitize(&mapping.interface_property)) {
                reasons.push(format!(
                    "Interface property {} referenced in {} object does not exist",
                    mapping.interface_property, object.api_name
                ));
            }
        }

        if reasons.is_empty() {
            return Ok(());
        }
        let formatted = reasons
            .iter()
            .map(|reason| format!("Ontology Definition Error: {reason}\n"))
            .collect::<Vec<_>>()
            .join("\n");
        Err(MakerError::OntologyViolation(format!("\n{formatted}")))
    }
}

fn check_mapped_property(
    object: &ObjectType,
    spt_api_name: &str,
    spt: Option<&SharedPropertyType>,
    maps_to: &str,
) -> Option<String> {
    let Some(property) = object.property(maps_to) else {
        return Some(format!(
            "Object property mapped to interface does not exist. Object Property Mapped: {maps_to}"
        ));
    };
    // Only the property type is compared; array-ness may differ.
    let matches = spt.is_some_and(|spt| spt.property_type == property.property_type);
    (!matches).then(|| {
        format!(
            "Object property type does not match the interface property it is mapped to. Interface Property: {spt_api_name}, objectProperty: {maps_to}"
        )
    })
}

fn validate_keys(object: &ObjectType) -> Result<()> {
    let Some(title) = object.property(&object.title_property_api_name) else {
        return Err(MakerError::OntologyViolation(format!(
            "Title property {} is not defined on object {}",
            object.title_property_api_name, object.api_name
        )));
    };
    let Some(primary_key) = object.primary_key() else {
        return Err(MakerError::OntologyViolation(format!(
            "Primary key property {} does not exist on object {}",
            object.primary_key_property_api_name, object.api_name
        )));
    };
    if primary_key.edit_only {
        return Err(MakerError::OntologyViolation(format!(
            "Primary key property {} on object {} cannot be edit-only",
            object.primary_key_property_api_name, object.api_name
        )));
    }
    if title.property_type.is_exotic() {
        return Err(MakerError::OntologyViolation(format!(
            "Title property {} must be a primitive type",
            object.title_property_api_name
        )));
    }
    if primary_key.property_type.is_exotic() {
        return Err(MakerError::OntologyViolation(format!(
            "Primary key properties {} can only be primitive types",
            object.primary_key_property_api_name
        )));
    }
    Ok(())
}

fn validate_datasource(object: &ObjectType) -> Result<()> {
    if let Some(ObjectDatasourceDefinition::Stream {
        retention_period: Some(retention),
    }) = &object.datasource
        && !is_iso8601_duration(retention)
    {
        return Err(MakerError::Validation(format!(
            "Retention period \"{retention}\" on object \"{}\" is not a valid ISO 8601 duration string",
            object.api_name
        )));
    }
    Ok(())
}

fn validate_status(object: &ObjectType) -> Result<()> {
    let Some(status) = &object.status else {
        return Ok(());
    };
    let label = match status {
        Status::Active => return Ok(()),
        Status::Experimental => "experimental",
        Status::Example => "example",
        Status::Deprecated { deadline, .. } => {
            if !is_iso8601_datetime(deadline) {
                return Err(MakerError::Validation(format!(
                    "Deprecated status deadline \"{deadline}\" on object \"{}\" is not a valid ISO 8601 datetime string",
                    object.api_name
                )));
            }
            "deprecated"
        }
    };
    let active = object
        .properties
        .iter()
        .filter(|property| property.status.as_ref().is_some_and(Status::is_active))
        .map(|property| property.api_name.as_str())
        .collect::<Vec<_>>();
    if active.is_empty() {
        return Ok(());
    }
    Err(MakerError::OntologyViolation(format!(
        "Object \"{}\" has \"{label}\" status, but the following properties have a different status: {}",
        object.api_name,
        active.join(", ")
    )))
}
