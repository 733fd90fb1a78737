use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::{IntermediarySide, LinkType, LinkTypeDefinition};
use crate::naming::{kebab_case, validate_api_name};
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Validates and registers a link. The registry key is the kebab-case of the link API name.
    pub fn define_link(&mut self, definition: LinkTypeDefinition) -> Result<LinkType> {
        validate_api_name(definition.api_name())?;
        let id = kebab_case(definition.api_name());
        if self.definition.link_types.contains_key(&id) {
            return Err(MakerError::Conflict(format!(
                "Link type with id {id} is already defined"
            )));
        }

        let definition = match definition {
            LinkTypeDefinition::OneToMany(mut link) => {
                let one = self.require_object(&link.one.object)?;
                let many = self.require_object(&link.to_many.object)?;
                let Some(foreign_key) = many.property(&link.many_foreign_key_property) else {
                    return Err(MakerError::OntologyViolation(format!(
                        "Foreign key {} on link {} does not exist on object {}",
                        link.many_foreign_key_property, link.api_name, many.api_name
                    )));
                };
                let types_match = one.primary_key().is_some_and(|primary_key| {
                    primary_key.property_type == foreign_key.property_type
                        && primary_key.array == foreign_key.array
                });
                if !types_match {
                    return Err(MakerError::OntologyViolation(format!(
                        "Link {} has type mismatch between the one side's primary key and the foreign key on the many side",
                        link.api_name
                    )));
                }
                link.one.object = one.api_name.clone();
                link.to_many.object = many.api_name.clone();
                LinkTypeDefinition::OneToMany(link)
            }
            LinkTypeDefinition::ManyToMany(mut link) => {
                link.many.object = self.require_object(&link.many.object)?.api_name.clone();
                link.to_many.object = self.require_object(&link.to_many.object)?.api_name.clone();
                LinkTypeDefinition::ManyToMany(link)
            }
            LinkTypeDefinition::Intermediary(mut link) => {
                let intermediary = self
                    .require_object(&link.intermediary_object_type)?
                    .api_name
                    .clone();
                link.many.object = self.require_object(&link.many.object)?.api_name.clone();
                link.to_many.object = self.require_object(&link.to_many.object)?.api_name.clone();
                self.check_intermediary_side("LinkTypeA", "objectA", &link.many, &intermediary)?;
                self.check_intermediary_side("LinkTypeB", "objectB", &link.to_many, &intermediary)?;
                link.intermediary_object_type = intermediary;
                LinkTypeDefinition::Intermediary(link)
            }
        };

        let link = LinkType { id, definition };
        self.register(OntologyEntity::LinkType(link.clone()));
        Ok(link)
    }

    /// The side's link must be one-to-many from `side.object` to the intermediary object.
    fn check_intermediary_side(
        &self,
        label: &str,
        object_label: &str,
        side: &IntermediarySide,
        intermediary: &str,
    ) -> Result<()> {
        let link_id = kebab_case(&side.link_to_intermediary);
        let Some(link) = self.lookup().link_type(&link_id) else {
            return Err(MakerError::NotFound(format!(
                "Link {} must be defined before the intermediary link that uses it",
                side.link_to_intermediary
            )));
        };
        let valid = matches!(
            &link.definition,
            LinkTypeDefinition::OneToMany(inner)
                if inner.one.object == side.object && inner.to_many.object == intermediary
        );
        if valid {
            return Ok(());
        }
        Err(MakerError::OntologyViolation(format!(
            "{label} {} must be a many to one link from intermediary object {intermediary} to {object_label} {}",
            side.link_to_intermediary, side.object
        )))
    }
}
