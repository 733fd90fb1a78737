use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an effect input gets its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EffectInputValue {
    StaticValue { value: Value },
    /// A property of the object that fired the trigger.
    ObjectProperty { property: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AutomationEffect {
    Action {
        action_type: String,
        #[serde(default)]
        parameters: BTreeMap<String, EffectInputValue>,
        #[serde(default)]
        scoped: bool,
    },
    Function {
        function_rid: String,
        function_version: String,
        #[serde(default)]
        inputs: BTreeMap<String, EffectInputValue>,
        #[serde(default)]
        scoped: bool,
    },
}

impl AutomationEffect {
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        match self {
            Self::Action { scoped, .. } | Self::Function { scoped, .. } => *scoped,
        }
    }
}

/// Fires when objects of one type are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutomationCondition {
    pub object_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutomationDefinition {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub condition: AutomationCondition,
    /// Keyed by effect id.
    pub effects: BTreeMap<String, AutomationEffect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_parse_with_scoped_defaulting_to_false() {
        let automation: AutomationDefinition = serde_json::from_str(
            r#"{
                "apiName": "notifyOnFoo",
                "condition": {"objectType": "foo"},
                "effects": {
                    "notify": {
                        "type": "action",
                        "actionType": "createTicket",
                        "parameters": {
                            "title": {"type": "objectProperty", "property": "bar"},
                            "priority": {"type": "staticValue", "value": 3}
                        }
                    },
                    "score": {"type": "function", "functionRid": "ri.function.main.function.1", "functionVersion": "1.0.0", "scoped": true}
                }
            }"#,
        )
        .expect("automation");
        assert!(!automation.effects["notify"].is_scoped());
        assert!(automation.effects["score"].is_scoped());
    }
}
