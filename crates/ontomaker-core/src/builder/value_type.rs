use semver::Version;

use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::ValueTypeDefinition;
use crate::naming::validate_api_name;
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Registers one version of a value type. Versions keep registration order.
    pub fn define_value_type(&mut self, value_type: ValueTypeDefinition) -> Result<ValueTypeDefinition> {
        validate_api_name(&value_type.api_name)?;
        if Version::parse(&value_type.version).is_err() {
            return Err(MakerError::Validation(
                "Version is not a valid semver".to_string(),
            ));
        }

        let mut value_type = value_type;
        if value_type.namespace_prefix {
            value_type.api_name = self.sanitize(&value_type.api_name);
        }
        if self
            .definition
            .value_type_version(&value_type.api_name, &value_type.version)
            .is_some()
        {
            return Err(MakerError::Validation(format!(
                "Value type with apiName {} and version {} is already defined",
                value_type.api_name, value_type.version
            )));
        }

        self.register(OntologyEntity::ValueType(value_type.clone()));
        Ok(value_type)
    }
}
