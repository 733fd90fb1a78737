use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::ComputeModuleDefinition;
use crate::naming::validate_api_name;
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Registers a compute module. The OpenAPI document is converted when lowering.
    pub fn define_compute_module(
        &mut self,
        module: ComputeModuleDefinition,
    ) -> Result<ComputeModuleDefinition> {
        validate_api_name(&module.api_name)?;
        if module.container_version().is_none() {
            return Err(MakerError::Validation(
                "container name must have version at the end".to_string(),
            ));
        }
        if self.definition.compute_modules.contains_key(&module.api_name) {
            return Err(MakerError::Conflict(format!(
                "Compute module {} is already defined",
                module.api_name
            )));
        }
        self.register(OntologyEntity::ComputeModule(module.clone()));
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn module(container: &str) -> ComputeModuleDefinition {
        serde_json::from_value(json!({
            "apiName": "scorer",
            "container": container,
            "openApi": {"openapi": "3.0.0", "info": {"title": "t", "version": "1"}}
        }))
        .expect("module")
    }

    #[test]
    fn container_must_carry_a_tag() {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let err = builder
            .define_compute_module(module("scorer"))
            .expect_err("untagged container must fail");
        assert_eq!(
            err.to_string(),
            "invariant failed: container name must have version at the end"
        );

        let registered = builder
            .define_compute_module(module("scorer:0.1.0"))
            .expect("tagged container");
        assert_eq!(registered.auth_mode, "PIPELINE");
        assert!(
            builder
                .define_compute_module(module("scorer:0.2.0"))
                .is_err()
        );
    }
}
