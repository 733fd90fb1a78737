use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Makes an entity from another package resolvable without emitting it as block data.
    ///
    /// Imported names are used as given; they are never namespaced.
    pub fn import_ontology_entity(&mut self, entity: OntologyEntity) -> Result<()> {
        let kind = entity.kind();
        if !kind.is_importable() {
            return Err(MakerError::Unsupported(format!(
                "entities of kind {kind} cannot be imported"
            )));
        }
        if local_key_exists(self, &entity) {
            return Err(MakerError::Conflict(format!(
                "{} is defined locally and cannot also be imported",
                entity.key()
            )));
        }
        tracing::debug!(kind = %kind, api_name = entity.key(), "imported entity");
        self.imported.register(entity);
        Ok(())
    }
}

fn local_key_exists(builder: &OntologyBuilder, entity: &OntologyEntity) -> bool {
    let local = builder.definition();
    let key = entity.key();
    match entity {
        OntologyEntity::ObjectType(_) => local.object_types.contains_key(key),
        OntologyEntity::LinkType(_) => local.link_types.contains_key(key),
        OntologyEntity::InterfaceType(_) => local.interface_types.contains_key(key),
        OntologyEntity::SharedPropertyType(_) => local.shared_property_types.contains_key(key),
        OntologyEntity::ActionType(_) => local.action_types.contains_key(key),
        OntologyEntity::ValueType(_)
        | OntologyEntity::Automation(_)
        | OntologyEntity::ComputeModule(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        InterfaceProperty, InterfacePropertyDefinition, InterfaceTypeDefinition, PropertyKind,
        SharedPropertyType, ValueBaseType, ValueTypeDefinition,
    };
    use crate::registry::OntologyEntityKind;

    #[test]
    fn imported_spt_is_resolvable_but_not_local() {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let mut spt = SharedPropertyType::new("com.other.package.spt", PropertyKind::string());
        spt.non_namespaced_api_name = "spt".to_string();
        builder
            .import_ontology_entity(OntologyEntity::SharedPropertyType(spt))
            .expect("import");

        let mut interface = InterfaceTypeDefinition::named("myInterface");
        interface.properties.insert(
            "spt".to_string(),
            InterfacePropertyDefinition::Shared(InterfaceProperty {
                shared_property_type: "com.other.package.spt".to_string(),
                required: true,
            }),
        );
        let interface = builder.define_interface(interface).expect("interface");
        assert!(interface.properties.contains_key("com.other.package.spt"));
        assert_eq!(
            builder
                .definition()
                .count(OntologyEntityKind::SharedPropertyType),
            0
        );
        assert_eq!(
            builder.imported().count(OntologyEntityKind::SharedPropertyType),
            1
        );
    }

    #[test]
    fn value_types_cannot_be_imported() {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let err = builder
            .import_ontology_entity(OntologyEntity::ValueType(ValueTypeDefinition {
                api_name: "flag".to_string(),
                display_name: "Flag".to_string(),
                description: None,
                status: Default::default(),
                version: "1.0.0".to_string(),
                base_type: ValueBaseType::Boolean,
                constraints: Vec::new(),
                example_values: Vec::new(),
                namespace_prefix: false,
            }))
            .expect_err("value type import must fail");
        assert!(matches!(err, MakerError::Unsupported(_)));
    }
}
