//! Declarative ontology documents.
//!
//! A document is the serialized form of a builder session: every section maps to one
//! `define_*` call per entry. Sections are applied in dependency order regardless of their
//! order in the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::{
    ActionType, ActionValidationRule, AutomationDefinition, ComputeModuleDefinition,
    InterfaceLinkConstraint, InterfaceType, InterfaceTypeDefinition, LinkType,
    LinkTypeDefinition, ObjectType, SharedPropertyType, ValueTypeDefinition,
};
use crate::naming::kebab_case;
use crate::registry::OntologyEntity;

mod format;

pub use format::DocumentFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OntologyDocument {
    /// Used when neither the command line nor the environment names a namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub imports: ImportedEntities,
    #[serde(default)]
    pub shared_property_types: Vec<SharedPropertyType>,
    #[serde(default)]
    pub value_types: Vec<ValueTypeDefinition>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceTypeDefinition>,
    #[serde(default)]
    pub interface_links: Vec<InterfaceLinkConstraint>,
    #[serde(default)]
    pub objects: Vec<ObjectType>,
    #[serde(default)]
    pub links: Vec<LinkTypeDefinition>,
    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,
    #[serde(default)]
    pub automations: Vec<AutomationDefinition>,
    #[serde(default)]
    pub compute_modules: Vec<ComputeModuleDefinition>,
}

/// Entities owned by other packages. Names are used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportedEntities {
    #[serde(default)]
    pub object_types: Vec<ObjectType>,
    #[serde(default)]
    pub link_types: Vec<LinkTypeDefinition>,
    #[serde(default)]
    pub interface_types: Vec<InterfaceType>,
    #[serde(default)]
    pub shared_property_types: Vec<SharedPropertyType>,
    #[serde(default)]
    pub action_types: Vec<ActionType>,
}

/// Either a fully spelled-out action or one derived from an object or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionDeclaration {
    Template(ActionTemplateDeclaration),
    Full(Box<ActionType>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionTemplate {
    CreateObject,
    ModifyObject,
    DeleteObject,
    CreateInterfaceObject,
    ModifyInterfaceObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionTemplateDeclaration {
    pub template: ActionTemplate,
    /// Object type, or interface for the interface templates.
    pub target: String,
    /// Pins the implementing object type for interface templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ActionValidationRule>,
}

impl OntologyDocument {
    pub fn from_str(raw: &str, format: DocumentFormat) -> Result<Self> {
        format.parse(raw)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let raw = fs::read_to_string(path)?;
        let document = Self::from_str(&raw, format)?;
        tracing::debug!(path = %path.display(), format = format.as_str(), "loaded ontology document");
        Ok(document)
    }

    /// Registers every entry with `builder`.
    ///
    /// Imports go first so local entities can reference them; within the local sections,
    /// referenced kinds precede the kinds referencing them.
    pub fn apply(&self, builder: &mut OntologyBuilder) -> Result<()> {
        self.apply_imports(builder)?;
        for spt in &self.shared_property_types {
            builder.define_shared_property_type(spt.clone())?;
        }
        for value_type in &self.value_types {
            builder.define_value_type(value_type.clone())?;
        }
        for interface in &self.interfaces {
            builder.define_interface(interface.clone())?;
        }
        for object in &self.objects {
            builder.define_object(object.clone())?;
        }
        // Link constraints may target object types.
        for constraint in &self.interface_links {
            builder.define_interface_link_constraint(constraint.clone())?;
        }
        for link in &self.links {
            builder.define_link(link.clone())?;
        }
        for action in &self.actions {
            apply_action(builder, action)?;
        }
        for automation in &self.automations {
            builder.define_automation(automation.clone())?;
        }
        for module in &self.compute_modules {
            builder.define_compute_module(module.clone())?;
        }
        Ok(())
    }

    fn apply_imports(&self, builder: &mut OntologyBuilder) -> Result<()> {
        let imports = &self.imports;
        let entities = imports
            .shared_property_types
            .iter()
            .cloned()
            .map(OntologyEntity::SharedPropertyType)
            .chain(imports.interface_types.iter().cloned().map(OntologyEntity::InterfaceType))
            .chain(imports.object_types.iter().cloned().map(OntologyEntity::ObjectType))
            .chain(imports.link_types.iter().cloned().map(|definition| {
                OntologyEntity::LinkType(LinkType {
                    id: kebab_case(definition.api_name()),
                    definition,
                })
            }))
            .chain(imports.action_types.iter().cloned().map(OntologyEntity::ActionType));
        for entity in entities {
            builder.import_ontology_entity(entity)?;
        }
        Ok(())
    }
}

fn apply_action(builder: &mut OntologyBuilder, action: &ActionDeclaration) -> Result<()> {
    let declaration = match action {
        ActionDeclaration::Full(action) => {
            builder.define_action(action.as_ref().clone())?;
            return Ok(());
        }
        ActionDeclaration::Template(declaration) => declaration,
    };
    let target = declaration.target.as_str();
    let validation = declaration.validation.clone();
    let object_type = declaration.object_type.as_deref();
    let is_interface_template = matches!(
        declaration.template,
        ActionTemplate::CreateInterfaceObject | ActionTemplate::ModifyInterfaceObject
    );
    if is_interface_template && validation.is_some() {
        return Err(MakerError::InvalidDocument(format!(
            "interface action templates do not take a validation rule (target {target})"
        )));
    }
    if !is_interface_template && object_type.is_some() {
        return Err(MakerError::InvalidDocument(format!(
            "objectType only applies to interface action templates (target {target})"
        )));
    }
    match declaration.template {
        ActionTemplate::CreateObject => builder.define_create_object_action(target, validation)?,
        ActionTemplate::ModifyObject => builder.define_modify_object_action(target, validation)?,
        ActionTemplate::DeleteObject => builder.define_delete_object_action(target, validation)?,
        ActionTemplate::CreateInterfaceObject => {
            builder.define_create_interface_object_action(target, object_type)?
        }
        ActionTemplate::ModifyInterfaceObject => {
            builder.define_modify_interface_object_action(target, object_type)?
        }
    };
    Ok(())
}
