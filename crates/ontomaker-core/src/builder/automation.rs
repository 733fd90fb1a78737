use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::AutomationDefinition;
use crate::naming::validate_api_name;
use crate::registry::OntologyEntity;

impl OntologyBuilder {
    /// Registers an automation. Object, action and parameter references resolve when lowering.
    pub fn define_automation(&mut self, automation: AutomationDefinition) -> Result<AutomationDefinition> {
        validate_api_name(&automation.api_name)?;
        if self.definition.automations.contains_key(&automation.api_name) {
            return Err(MakerError::Conflict(format!(
                "Automation {} is already defined",
                automation.api_name
            )));
        }
        if automation.effects.is_empty() {
            return Err(MakerError::Validation(format!(
                "Automation {} must declare at least one effect",
                automation.api_name
            )));
        }
        self.register(OntologyEntity::Automation(automation.clone()));
        Ok(automation)
    }
}
