use std::collections::BTreeMap;

use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::{
    InterfaceLink, InterfaceLinkCardinality, InterfaceLinkConstraint, InterfaceProperty,
    InterfacePropertyDefinition, InterfaceType, InterfaceTypeDefinition, LinkedEntityTypeId,
    SharedPropertyType,
};
use crate::naming::{strip_namespace, validate_api_name};
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    pub fn define_shared_property_type(
        &mut self,
        spt: SharedPropertyType,
    ) -> Result<SharedPropertyType> {
        validate_api_name(&spt.api_name)?;
        let api_name = self.sanitize(&spt.api_name);
        if self.definition.shared_property_types.contains_key(&api_name) {
            return Err(MakerError::Conflict(format!(
                "Shared property type {api_name} already exists"
            )));
        }
        let mut spt = spt;
        if spt.display_name.is_none() {
            spt.display_name = Some(spt.api_name.clone());
        }
        spt.non_namespaced_api_name = strip_namespace(&self.namespace, &api_name).to_string();
        spt.api_name = api_name;
        self.register(OntologyEntity::SharedPropertyType(spt.clone()));
        Ok(spt)
    }

    /// Registers an interface. Inline property types get a shared property type of the same name.
    pub fn define_interface(&mut self, definition: InterfaceTypeDefinition) -> Result<InterfaceType> {
        validate_api_name(&definition.api_name)?;
        let api_name = self.sanitize(&definition.api_name);
        if self.definition.interface_types.contains_key(&api_name) {
            return Err(MakerError::Conflict(format!(
                "Interface {api_name} already exists"
            )));
        }

        let extends_interfaces = definition
            .extends
            .iter()
            .map(|parent| {
                self.require_interface(parent)
                    .map(|interface| interface.api_name.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut properties = BTreeMap::new();
        for (name, property) in definition.properties {
            let (spt_api_name, required) = match property {
                InterfacePropertyDefinition::Shared(reference) => {
                    let Some(spt) = self.find_shared_property_type(&reference.shared_property_type)
                    else {
                        return Err(MakerError::NotFound(format!(
                            "Shared property type {} referenced by interface {} is not defined",
                            reference.shared_property_type, definition.api_name
                        )));
                    };
                    (spt.api_name.clone(), reference.required)
                }
                InterfacePropertyDefinition::Inline(kind) => {
                    let spt = self.define_shared_property_type(SharedPropertyType::new(&name, kind))?;
                    (spt.api_name, true)
                }
            };
            properties.insert(
                spt_api_name.clone(),
                InterfaceProperty {
                    shared_property_type: spt_api_name,
                    required,
                },
            );
        }

        let display_name = definition
            .display_name
            .unwrap_or_else(|| definition.api_name.clone());
        let description = definition
            .description
            .unwrap_or_else(|| display_name.clone());
        let interface = InterfaceType {
            api_name,
            display_name,
            description,
            icon: definition.icon,
            status: definition.status.unwrap_or_default(),
            extends_interfaces,
            properties,
            links: Vec::new(),
            searchable: definition.searchable,
        };
        self.register(OntologyEntity::InterfaceType(interface.clone()));
        Ok(interface)
    }

    /// Adds a link from one local interface to another interface or to an object type.
    pub fn define_interface_link_constraint(
        &mut self,
        constraint: InterfaceLinkConstraint,
    ) -> Result<InterfaceType> {
        validate_api_name(&constraint.api_name)?;
        let (target, cardinality) = match (&constraint.to_one, &constraint.to_many) {
            (Some(target), None) => (target, InterfaceLinkCardinality::Single),
            (None, Some(target)) => (target, InterfaceLinkCardinality::Many),
            _ => {
                return Err(MakerError::Validation(format!(
                    "Interface link {} must declare exactly one of toOne or toMany",
                    constraint.api_name
                )));
            }
        };
        let linked_entity = if constraint.to_object_type {
            LinkedEntityTypeId::ObjectType(self.require_object(target)?.api_name.clone())
        } else {
            LinkedEntityTypeId::InterfaceType(self.require_interface(target)?.api_name.clone())
        };

        let from = self.sanitize(&constraint.from);
        let link_api_name = self.sanitize(&constraint.api_name);
        let display_name = constraint
            .display_name
            .unwrap_or_else(|| constraint.api_name.clone());
        let description = constraint
            .description
            .unwrap_or_else(|| display_name.clone());

        let Some(interface) = self.definition.interface_types.get_mut(&from) else {
            return Err(MakerError::NotFound(format!(
                "Interface {} is not defined in this ontology",
                constraint.from
            )));
        };
        if interface.links.iter().any(|link| link.api_name == link_api_name) {
            return Err(MakerError::Conflict(format!(
                "Interface {from} already has a link named {link_api_name}"
            )));
        }
        interface.links.push(InterfaceLink {
            api_name: link_api_name,
            display_name,
            description,
            cardinality,
            linked_entity,
            required: constraint.required,
        });
        tracing::debug!(interface = %from, links = interface.links.len(), "added interface link");
        Ok(interface.clone())
    }
}
