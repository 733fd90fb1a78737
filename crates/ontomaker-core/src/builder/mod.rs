//! Compilation context and entity builders.
//!
//! One [`OntologyBuilder`] lives for exactly one compilation. Every `define_*` method validates
//! its input, namespaces it, and stores it in the builder's registry; nothing is shared between
//! builders.

use std::path::Path;

use serde_json::Value;

use crate::automation::generate_automation_ir;
use crate::error::{MakerError, Result};
use crate::export::write_static_objects;
use crate::lower::{OntologyIr, lower_compute_modules, lower_ontology, lower_value_types};
use crate::model::{InterfaceType, ObjectType, SharedPropertyType};
use crate::naming::{add_namespace_if_none, normalize_namespace};
use crate::registry::{ALL_KINDS, EntityLookup, OntologyDefinition, OntologyEntity};

mod action;
mod automation;
mod compute_module;
mod import;
mod interface;
mod link;
mod object;
mod value_type;

#[derive(Debug, Clone, Default)]
pub struct OntologyBuilder {
    namespace: String,
    definition: OntologyDefinition,
    imported: OntologyDefinition,
}

/// Everything one compilation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct OntologyCompilation {
    pub ontology: OntologyIr,
    pub value_types: Value,
    /// Absent when no automation was defined.
    pub automation: Option<Value>,
    pub compute_modules: Value,
}

/// Runs `body` against a fresh builder, lowers the result, and optionally writes static exports.
///
/// Lowering completes before anything touches `output_dir`, so a failed compilation never
/// leaves partial files behind.
pub fn define_ontology<F>(
    namespace: &str,
    output_dir: Option<&Path>,
    body: F,
) -> Result<OntologyCompilation>
where
    F: FnOnce(&mut OntologyBuilder) -> Result<()>,
{
    let mut builder = OntologyBuilder::new(namespace)?;
    tracing::info!(namespace = %builder.namespace, "ontology compilation started");
    if let Err(err) = body(&mut builder) {
        tracing::error!(code = err.code(), error = %err, "ontology definition failed");
        return Err(err);
    }

    let compilation = builder.compile()?;
    for kind in ALL_KINDS {
        let count = builder.definition.count(kind);
        if count > 0 {
            tracing::info!(kind = %kind, count, "lowered entities");
        }
    }

    if let Some(output_dir) = output_dir {
        let written = write_static_objects(&builder.definition, &builder.namespace, output_dir)?;
        tracing::info!(files = written.len(), output_dir = %output_dir.display(), "static exports written");
    }
    tracing::info!(
        entities = builder.definition.total(),
        imported = builder.imported.total(),
        "ontology compilation finished"
    );
    Ok(compilation)
}

impl OntologyBuilder {
    pub fn new(namespace: &str) -> Result<Self> {
        Ok(Self {
            namespace: normalize_namespace(namespace)?,
            definition: OntologyDefinition::default(),
            imported: OntologyDefinition::default(),
        })
    }

    /// The active namespace, in prefix form (`com.palantir.`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub const fn definition(&self) -> &OntologyDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn imported(&self) -> &OntologyDefinition {
        &self.imported
    }

    #[must_use]
    pub const fn lookup(&self) -> EntityLookup<'_> {
        EntityLookup::new(&self.definition, &self.imported)
    }

    /// Namespaces `api_name` unless it already carries a namespace.
    #[must_use]
    pub fn sanitize(&self, api_name: &str) -> String {
        add_namespace_if_none(&self.namespace, api_name)
    }

    /// Lowers the registry without consuming the builder.
    pub fn compile(&self) -> Result<OntologyCompilation> {
        Ok(OntologyCompilation {
            ontology: self.dump_ontology_full_metadata()?,
            value_types: self.dump_value_type_wire_type(),
            automation: self.dump_automation_ir()?,
            compute_modules: self.dump_compute_module_block_data()?,
        })
    }

    pub fn dump_ontology_full_metadata(&self) -> Result<OntologyIr> {
        lower_ontology(self.lookup(), &self.namespace)
    }

    #[must_use]
    pub fn dump_value_type_wire_type(&self) -> Value {
        lower_value_types(&self.definition, &self.namespace)
    }

    pub fn dump_automation_ir(&self) -> Result<Option<Value>> {
        generate_automation_ir(self.lookup(), &self.namespace)
    }

    pub fn dump_compute_module_block_data(&self) -> Result<Value> {
        lower_compute_modules(&self.definition)
    }

    pub(crate) fn register(&mut self, entity: OntologyEntity) {
        tracing::debug!(kind = %entity.kind(), api_name = entity.key(), "registered entity");
        self.definition.register(entity);
    }

    /// Resolves an object by local or namespaced name.
    pub(crate) fn require_object(&self, api_name: &str) -> Result<&ObjectType> {
        let lookup = self.lookup();
        lookup
            .object_type(&self.sanitize(api_name))
            .or_else(|| lookup.object_type(api_name))
            .ok_or_else(|| MakerError::NotFound(format!("Object {api_name} is not defined")))
    }

    pub(crate) fn require_interface(&self, api_name: &str) -> Result<&InterfaceType> {
        let lookup = self.lookup();
        lookup
            .interface_type(&self.sanitize(api_name))
            .or_else(|| lookup.interface_type(api_name))
            .ok_or_else(|| MakerError::NotFound(format!("Interface {api_name} is not defined")))
    }

    pub(crate) fn find_shared_property_type(&self, api_name: &str) -> Option<&SharedPropertyType> {
        let lookup = self.lookup();
        lookup
            .shared_property_type(&self.sanitize(api_name))
            .or_else(|| lookup.shared_property_type(api_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectPropertyType, PropertyKind};
    use crate::registry::OntologyEntityKind;

    pub(crate) fn simple_object(api_name: &str, key: &str) -> ObjectType {
        ObjectType {
            api_name: api_name.to_string(),
            display_name: crate::naming::capitalize(api_name),
            plural_display_name: crate::naming::plural_display_name(api_name),
            primary_key_property_api_name: key.to_string(),
            title_property_api_name: key.to_string(),
            description: None,
            group_display_name: None,
            icon: None,
            visibility: None,
            status: None,
            edits_enabled: false,
            properties: vec![ObjectPropertyType::new(key, PropertyKind::string())],
            datasource: None,
            implements_interfaces: Vec::new(),
        }
    }

    #[test]
    fn sanitize_prefixes_only_bare_names() {
        let builder = OntologyBuilder::new("com.palantir").expect("builder");
        assert_eq!(builder.namespace(), "com.palantir.");
        assert_eq!(builder.sanitize("foo"), "com.palantir.foo");
        assert_eq!(builder.sanitize("com.other.foo"), "com.other.foo");
    }

    #[test]
    fn body_error_is_returned_unchanged() {
        let err = define_ontology("com.palantir.", None, |_| {
            Err(MakerError::Validation("boom".to_string()))
        })
        .expect_err("body failure must fail");
        assert!(matches!(err, MakerError::Validation(message) if message == "boom"));
    }

    #[test]
    fn each_compilation_starts_from_an_empty_registry() {
        let first = define_ontology("com.palantir.", None, |builder| {
            builder.define_object(simple_object("foo", "bar"))?;
            Ok(())
        })
        .expect("first compilation");
        assert_eq!(first.ontology.block_data.object_types.len(), 1);

        let second = define_ontology("com.palantir.", None, |builder| {
            assert_eq!(builder.definition().count(OntologyEntityKind::ObjectType), 0);
            builder.define_object(simple_object("foo", "bar"))?;
            Ok(())
        })
        .expect("second compilation must not see the first registry");
        assert!(second.automation.is_none());
    }
}
