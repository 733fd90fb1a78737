//! Automation lowering.
//!
//! Produces two halves: shape data, flat tables mapping readable ids back to API names, and
//! block data, the trigger and effect structure the automation engine executes. Block data
//! refers to ontology entities only through readable ids.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::{MakerError, Result};
use crate::model::{ActionType, AutomationDefinition, AutomationEffect, EffectInputValue, ObjectType};
use crate::naming::{add_namespace_if_none, readable_id};
use crate::registry::EntityLookup;
use crate::wire::{empty_tagged, tagged};

const ACTION_TYPE_PREFIX: &str = "action-type";
const ACTION_PARAMETER_PREFIX: &str = "action-parameter";
const OBJECT_TYPE_PREFIX: &str = "object-type";
const OBJECT_PROPERTY_PREFIX: &str = "object-property";

/// Readable-id tables resolving block data references to API names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationShapeData {
    pub action_types: BTreeMap<String, Value>,
    pub action_parameters: BTreeMap<String, Value>,
    pub object_types: BTreeMap<String, Value>,
    pub object_properties: BTreeMap<String, Value>,
}

/// Lowers the compilation's automation, if any.
///
/// Only one automation per compilation is supported; a second one is rejected rather than
/// silently dropped.
pub fn generate_automation_ir(lookup: EntityLookup<'_>, namespace: &str) -> Result<Option<Value>> {
    let mut automations = lookup.local().automations.values();
    let Some(automation) = automations.next() else {
        return Ok(None);
    };
    if let Some(extra) = automations.next() {
        return Err(MakerError::Unsupported(format!(
            "only one automation per ontology is supported, found {} and {}",
            automation.api_name, extra.api_name
        )));
    }
    tracing::debug!(api_name = %automation.api_name, "lowering automation");

    let mut lowering = AutomationLowering {
        lookup,
        namespace,
        shape: AutomationShapeData::default(),
    };
    let block_data = lowering.block_data(automation)?;
    Ok(Some(json!({
        "automationBlockData": block_data,
        "automationShapeData": serde_json::to_value(&lowering.shape)?,
    })))
}

/// Wire id of an effect. Deterministic in the effect key so redeploys keep effect identity.
#[must_use]
pub fn effect_uuid(effect_id: &str) -> String {
    Uuid::new_v5(&Uuid::nil(), effect_id.as_bytes()).to_string()
}

struct AutomationLowering<'a> {
    lookup: EntityLookup<'a>,
    namespace: &'a str,
    shape: AutomationShapeData,
}

impl<'a> AutomationLowering<'a> {
    fn block_data(&mut self, automation: &AutomationDefinition) -> Result<Value> {
        let object = self.object_type(&automation.condition.object_type)?;
        let object_type_id = self.record_object_type(object);

        let mut trigger_effects = Map::new();
        let mut scoped_effects = Map::new();
        for (effect_id, effect) in &automation.effects {
            let wire = self.effect(effect_id, effect, object)?;
            let target = if effect.is_scoped() {
                &mut scoped_effects
            } else {
                &mut trigger_effects
            };
            target.insert(effect_uuid(effect_id), wire);
        }

        let scoped_token_effects = if scoped_effects.is_empty() {
            Value::Null
        } else {
            json!({ "sideEffects": { "triggerEffects": scoped_effects } })
        };
        Ok(json!({
            "automation": {
                "apiName": automation.api_name,
                "description": automation.description.as_deref().unwrap_or(""),
                "displayName": automation
                    .display_name
                    .as_deref()
                    .unwrap_or(&automation.api_name),
            },
            "condition": tagged("objectsAdded", json!({ "objectTypeId": object_type_id })),
            "scopedTokenEffects": scoped_token_effects,
            "subscribers": [{
                "recoveryEffects": {},
                "subscriberType": empty_tagged("user"),
                "triggerEffects": trigger_effects,
            }],
        }))
    }

    fn effect(&mut self, effect_id: &str, effect: &AutomationEffect, object: &ObjectType) -> Result<Value> {
        match effect {
            AutomationEffect::Action {
                action_type,
                parameters,
                ..
            } => {
                let action = self.action_type(action_type)?;
                let action_type_id = self.record_action_type(action);
                let mut inputs = Map::new();
                for (parameter, value) in parameters {
                    if action.parameter(parameter).is_none() {
                        return Err(MakerError::NotFound(format!(
                            "Parameter {parameter} of action {} used by effect {effect_id} is not defined",
                            action.api_name
                        )));
                    }
                    let parameter_id = self.record_action_parameter(action, parameter);
                    inputs.insert(parameter_id, self.input(effect_id, value, object)?);
                }
                Ok(tagged(
                    "action",
                    json!({ "actionInputs": inputs, "actionTypeRid": action_type_id }),
                ))
            }
            AutomationEffect::Function { scoped: true, .. } => Err(MakerError::Unsupported(
                "Scoped function effects are not supported".to_string(),
            )),
            AutomationEffect::Function {
                function_rid,
                function_version,
                inputs,
                ..
            } => {
                let mut function_inputs = Map::new();
                for (name, value) in inputs {
                    function_inputs.insert(name.clone(), self.input(effect_id, value, object)?);
                }
                Ok(tagged(
                    "function",
                    json!({
                        "functionInputs": function_inputs,
                        "functionRid": function_rid,
                        "functionVersion": function_version,
                    }),
                ))
            }
        }
    }

    fn input(&mut self, effect_id: &str, value: &EffectInputValue, object: &ObjectType) -> Result<Value> {
        match value {
            EffectInputValue::StaticValue { value } => Ok(tagged("staticValue", value.clone())),
            EffectInputValue::ObjectProperty { property } => {
                if object.property(property).is_none() {
                    return Err(MakerError::NotFound(format!(
                        "Property {property} of object {} used by effect {effect_id} is not defined",
                        object.api_name
                    )));
                }
                let object_type_id = self.record_object_type(object);
                let property_type_id = self.record_object_property(object, property);
                Ok(tagged(
                    "currentProperty",
                    json!({ "objectTypeId": object_type_id, "propertyTypeId": property_type_id }),
                ))
            }
        }
    }

    fn object_type(&self, api_name: &str) -> Result<&'a ObjectType> {
        self.lookup
            .object_type(&add_namespace_if_none(self.namespace, api_name))
            .or_else(|| self.lookup.object_type(api_name))
            .ok_or_else(|| MakerError::NotFound(format!("Object {api_name} is not defined")))
    }

    fn action_type(&self, api_name: &str) -> Result<&'a ActionType> {
        self.lookup
            .action_type(&add_namespace_if_none(self.namespace, api_name))
            .or_else(|| self.lookup.action_type(api_name))
            .ok_or_else(|| MakerError::NotFound(format!("Action {api_name} is not defined")))
    }

    fn record_object_type(&mut self, object: &ObjectType) -> String {
        let id = readable_id(&[OBJECT_TYPE_PREFIX, &object.api_name]);
        self.shape
            .object_types
            .entry(id.clone())
            .or_insert_with(|| json!({ "apiName": object.api_name }));
        id
    }

    fn record_object_property(&mut self, object: &ObjectType, property: &str) -> String {
        let id = readable_id(&[OBJECT_PROPERTY_PREFIX, &object.api_name, property]);
        let object_type_id = readable_id(&[OBJECT_TYPE_PREFIX, &object.api_name]);
        self.shape
            .object_properties
            .entry(id.clone())
            .or_insert_with(|| json!({ "apiName": property, "objectType": object_type_id }));
        id
    }

    fn record_action_type(&mut self, action: &ActionType) -> String {
        let id = readable_id(&[ACTION_TYPE_PREFIX, &action.api_name]);
        self.shape
            .action_types
            .entry(id.clone())
            .or_insert_with(|| json!({ "apiName": action.api_name }));
        id
    }

    fn record_action_parameter(&mut self, action: &ActionType, parameter: &str) -> String {
        let id = readable_id(&[ACTION_PARAMETER_PREFIX, &action.api_name, parameter]);
        let action_type_id = readable_id(&[ACTION_TYPE_PREFIX, &action.api_name]);
        self.shape
            .action_parameters
            .entry(id.clone())
            .or_insert_with(|| json!({ "actionType": action_type_id, "parameterId": parameter }));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::OntologyBuilder;

    fn builder_with_foo() -> OntologyBuilder {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        builder
            .define_object(
                serde_json::from_value(json!({
                    "apiName": "foo",
                    "displayName": "Foo",
                    "pluralDisplayName": "Foos",
                    "primaryKeyPropertyApiName": "bar",
                    "titlePropertyApiName": "bar",
                    "properties": [{"apiName": "bar", "type": "string"}]
                }))
                .expect("object"),
            )
            .expect("define object");
        builder
            .define_create_object_action("foo", None)
            .expect("create action");
        builder
    }

    fn automation(effects: Value) -> AutomationDefinition {
        serde_json::from_value(json!({
            "apiName": "onFoo",
            "condition": {"objectType": "foo"},
            "effects": effects
        }))
        .expect("automation")
    }

    #[test]
    fn no_automation_lowers_to_none() {
        let builder = builder_with_foo();
        assert_eq!(
            generate_automation_ir(builder.lookup(), builder.namespace()).expect("lowered"),
            None
        );
    }

    #[test]
    fn action_effect_references_readable_ids() {
        let mut builder = builder_with_foo();
        builder
            .define_automation(automation(json!({
                "notify": {
                    "type": "action",
                    "actionType": "create-object-foo",
                    "parameters": {
                        "bar": {"type": "objectProperty", "property": "bar"}
                    }
                }
            })))
            .expect("automation");

        let ir = generate_automation_ir(builder.lookup(), builder.namespace())
            .expect("lowered")
            .expect("automation present");
        let block = &ir["automationBlockData"];
        assert_eq!(
            block["condition"],
            json!({"type": "objectsAdded", "objectsAdded": {"objectTypeId": "object-type-com.palantir.foo"}})
        );
        assert_eq!(block["scopedTokenEffects"], Value::Null);

        let effect = &block["subscribers"][0]["triggerEffects"][effect_uuid("notify")];
        assert_eq!(effect["action"]["actionTypeRid"], "action-type-com.palantir.create-object-foo");
        assert_eq!(
            effect["action"]["actionInputs"]["action-parameter-com.palantir.create-object-foo-bar"],
            json!({"type": "currentProperty", "currentProperty": {
                "objectTypeId": "object-type-com.palantir.foo",
                "propertyTypeId": "object-property-com.palantir.foo-bar",
            }})
        );

        let shape = &ir["automationShapeData"];
        assert_eq!(
            shape["objectProperties"]["object-property-com.palantir.foo-bar"],
            json!({"apiName": "bar", "objectType": "object-type-com.palantir.foo"})
        );
        assert_eq!(
            shape["actionTypes"]["action-type-com.palantir.create-object-foo"],
            json!({"apiName": "com.palantir.create-object-foo"})
        );
    }

    #[test]
    fn effect_ids_are_stable_and_scoped_actions_are_segregated() {
        assert_eq!(effect_uuid("notify"), effect_uuid("notify"));
        assert_ne!(effect_uuid("notify"), effect_uuid("notify2"));

        let mut builder = builder_with_foo();
        builder
            .define_automation(automation(json!({
                "scopedNotify": {"type": "action", "actionType": "create-object-foo", "scoped": true},
                "score": {
                    "type": "function",
                    "functionRid": "ri.function.main.function.1",
                    "functionVersion": "1.0.0",
                    "inputs": {"threshold": {"type": "staticValue", "value": 3}}
                }
            })))
            .expect("automation");
        let ir = generate_automation_ir(builder.lookup(), builder.namespace())
            .expect("lowered")
            .expect("automation present");
        let block = &ir["automationBlockData"];
        assert!(
            block["scopedTokenEffects"]["sideEffects"]["triggerEffects"]
                .get(effect_uuid("scopedNotify"))
                .is_some()
        );
        assert_eq!(
            block["subscribers"][0]["triggerEffects"][effect_uuid("score")]["function"]["functionInputs"],
            json!({"threshold": {"type": "staticValue", "staticValue": 3}})
        );
    }

    #[test]
    fn scoped_function_effects_are_unsupported() {
        let mut builder = builder_with_foo();
        builder
            .define_automation(automation(json!({
                "score": {
                    "type": "function",
                    "functionRid": "ri.function.main.function.1",
                    "functionVersion": "1.0.0",
                    "scoped": true
                }
            })))
            .expect("automation");
        let err = generate_automation_ir(builder.lookup(), builder.namespace())
            .expect_err("scoped function must fail");
        assert_eq!(err.to_string(), "unsupported: Scoped function effects are not supported");
    }

    #[test]
    fn unknown_references_and_second_automation_fail() {
        let mut builder = builder_with_foo();
        builder
            .define_automation(automation(json!({
                "notify": {
                    "type": "action",
                    "actionType": "create-object-foo",
                    "parameters": {"missing": {"type": "staticValue", "value": 1}}
                }
            })))
            .expect("automation");
        let err = generate_automation_ir(builder.lookup(), builder.namespace())
            .expect_err("unknown parameter must fail");
        assert!(matches!(err, MakerError::NotFound(_)));

        let mut second = automation(json!({
            "notify": {"type": "action", "actionType": "create-object-foo"}
        }));
        second.api_name = "onFooAgain".to_string();
        builder.define_automation(second).expect("second automation");
        let err = generate_automation_ir(builder.lookup(), builder.namespace())
            .expect_err("two automations must fail");
        assert!(matches!(err, MakerError::Unsupported(_)));
    }
}
