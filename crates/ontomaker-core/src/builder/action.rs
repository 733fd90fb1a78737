use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value, json};
use uuid::Uuid;

use super::OntologyBuilder;
use crate::error::{MakerError, Result};
use crate::model::{
    ActionLayout, ActionParameter, ActionParameterType, ActionParameterValidation, ActionType,
    ActionValidationRule, AllowedValues, ConditionDefinition, InterfaceType, LabelledValue,
    LogicRule, LogicRuleValue, MarkingType, ObjectType, ParameterRequirement, ParameterVisibility,
    PropertyKind, Status,
};
use crate::naming::{kebab_case, strip_namespace, validate_api_name};
use crate::registry::OntologyEntity;

const OBJECT_TO_MODIFY_PARAMETER: &str = "objectToModifyParameter";
const OBJECT_TO_DELETE_PARAMETER: &str = "objectToDeleteParameter";
const OBJECT_TYPE_PARAMETER: &str = "objectTypeParameter";
const INTERFACE_OBJECT_TO_MODIFY_PARAMETER: &str = "interfaceObjectToModifyParameter";

impl OntologyBuilder {
    /// Validates parameters, sections, ordering and rules, then registers the action.
    pub fn define_action(&mut self, action: ActionType) -> Result<ActionType> {
        validate_api_name(&action.api_name)?;
        let api_name = self.sanitize(&action.api_name);
        if self.definition.action_types.contains_key(&api_name) {
            return Err(MakerError::Conflict(format!(
                "Action type with apiName {} is already defined",
                action.api_name
            )));
        }

        let mut declared = BTreeSet::new();
        for parameter in &action.parameters {
            validate_api_name(&parameter.id)?;
            if !declared.insert(parameter.id.clone()) {
                return Err(MakerError::Validation(format!(
                    "Parameter {} is defined more than once on action {}",
                    parameter.id, action.api_name
                )));
            }
        }
        for (section_id, section) in &action.sections {
            if let Some(missing) = section.parameters.iter().find(|id| !declared.contains(id.as_str())) {
                return Err(MakerError::Validation(format!(
                    "Parameter {missing} in section {section_id} is not defined on action {}",
                    action.api_name
                )));
            }
        }
        if let Some(ordering) = &action.parameter_ordering
            && let Some(missing) = ordering.iter().find(|id| !declared.contains(id.as_str()))
        {
            return Err(MakerError::Validation(format!(
                "Parameter {missing} in parameter ordering is not defined on action {}",
                action.api_name
            )));
        }
        for rule in &action.validation {
            check_condition_parameters(&rule.condition, &declared)?;
        }

        let mut action = action;
        for parameter in &mut action.parameters {
            parameter.parameter_type = self.namespace_parameter_type(&parameter.parameter_type);
        }
        let rules = std::mem::take(&mut action.rules);
        action.rules = rules
            .into_iter()
            .map(|rule| self.resolve_rule(&api_name, rule, &declared))
            .collect::<Result<Vec<_>>>()?;
        action.api_name = api_name;

        self.register(OntologyEntity::ActionType(action.clone()));
        Ok(action)
    }

    /// `create-object-<object>`: one required parameter per property and an add-object rule.
    pub fn define_create_object_action(
        &mut self,
        object_api_name: &str,
        validation: Option<ActionValidationRule>,
    ) -> Result<ActionType> {
        let object = self.require_object(object_api_name)?.clone();
        let local_name = kebab_case(strip_namespace(&self.namespace, &object.api_name));
        let parameters = property_parameters(&object, true);
        let property_values = property_values(&object);
        let mut action = convenience_action(
            &format!("create-object-{local_name}"),
            &format!("Create {}", object.display_name),
            parameters,
            vec![LogicRule::AddObjectRule {
                object_type_id: object.api_name.clone(),
                property_values,
                struct_field_values: BTreeMap::new(),
            }],
        );
        action.validation.extend(validation);
        self.define_action(action)
    }

    /// `modify-object-<object>`: an object reference first, then every property as optional.
    pub fn define_modify_object_action(
        &mut self,
        object_api_name: &str,
        validation: Option<ActionValidationRule>,
    ) -> Result<ActionType> {
        let object = self.require_object(object_api_name)?.clone();
        let local_name = kebab_case(strip_namespace(&self.namespace, &object.api_name));
        let mut parameters = vec![object_reference_parameter(
            OBJECT_TO_MODIFY_PARAMETER,
            "Modify object",
            &object.api_name,
        )];
        parameters.extend(property_parameters(&object, false));
        let property_values = property_values(&object);
        let mut action = convenience_action(
            &format!("modify-object-{local_name}"),
            &format!("Modify {}", object.display_name),
            parameters,
            vec![LogicRule::ModifyObjectRule {
                object_to_modify: OBJECT_TO_MODIFY_PARAMETER.to_string(),
                property_values,
                struct_field_values: BTreeMap::new(),
            }],
        );
        action.validation.extend(validation);
        self.define_action(action)
    }

    pub fn define_delete_object_action(
        &mut self,
        object_api_name: &str,
        validation: Option<ActionValidationRule>,
    ) -> Result<ActionType> {
        let object = self.require_object(object_api_name)?.clone();
        let local_name = kebab_case(strip_namespace(&self.namespace, &object.api_name));
        let mut action = convenience_action(
            &format!("delete-object-{local_name}"),
            &format!("Delete {}", object.display_name),
            vec![object_reference_parameter(
                OBJECT_TO_DELETE_PARAMETER,
                "Delete object",
                &object.api_name,
            )],
            vec![LogicRule::DeleteObjectRule {
                object_to_delete: OBJECT_TO_DELETE_PARAMETER.to_string(),
            }],
        );
        action.validation.extend(validation);
        self.define_action(action)
    }

    /// `create-<interface>[-<object>]`: picks an implementing object type and fills shared
    /// properties.
    pub fn define_create_interface_object_action(
        &mut self,
        interface_api_name: &str,
        object_api_name: Option<&str>,
    ) -> Result<ActionType> {
        let interface = self.require_interface(interface_api_name)?.clone();
        let object = object_api_name
            .map(|api_name| self.require_object(api_name).cloned())
            .transpose()?;
        let allowed_values = match &object {
            Some(object) => object_type_choice(object),
            None => AllowedValues::ObjectTypeReference {
                interface_types: vec![interface.api_name.clone()],
            },
        };
        let mut parameters = vec![ActionParameter {
            id: OBJECT_TYPE_PARAMETER.to_string(),
            display_name: "Object type to create".to_string(),
            parameter_type: ActionParameterType::ObjectTypeReference {
                interface_types: vec![interface.api_name.clone()],
            },
            validation: required_validation(allowed_values, true),
            description: None,
            type_classes: Vec::new(),
        }];
        parameters.extend(self.shared_property_parameters(&interface, true));
        let shared_property_values = shared_property_values(&parameters[1..]);

        let action = convenience_action(
            &self.interface_action_name("create", &interface, object.as_ref()),
            &format!("Create {}", interface.display_name),
            parameters,
            vec![LogicRule::AddInterfaceRule {
                interface_api_name: interface.api_name.clone(),
                object_type_parameter: OBJECT_TYPE_PARAMETER.to_string(),
                shared_property_values,
            }],
        );
        self.define_action(action)
    }

    pub fn define_modify_interface_object_action(
        &mut self,
        interface_api_name: &str,
        object_api_name: Option<&str>,
    ) -> Result<ActionType> {
        let interface = self.require_interface(interface_api_name)?.clone();
        let object = object_api_name
            .map(|api_name| self.require_object(api_name).cloned())
            .transpose()?;
        let allowed_values = match &object {
            Some(object) => object_type_choice(object),
            None => AllowedValues::InterfaceObjectQuery,
        };
        let mut parameters = vec![ActionParameter {
            id: INTERFACE_OBJECT_TO_MODIFY_PARAMETER.to_string(),
            display_name: "Object type to modify".to_string(),
            parameter_type: ActionParameterType::InterfaceReference {
                interface_type_api_name: interface.api_name.clone(),
            },
            validation: required_validation(allowed_values, true),
            description: None,
            type_classes: Vec::new(),
        }];
        parameters.extend(self.shared_property_parameters(&interface, false));
        let shared_property_values = shared_property_values(&parameters[1..]);

        let action = convenience_action(
            &self.interface_action_name("modify", &interface, object.as_ref()),
            &format!("Modify {}", interface.display_name),
            parameters,
            vec![LogicRule::ModifyInterfaceRule {
                interface_object_to_modify_parameter: INTERFACE_OBJECT_TO_MODIFY_PARAMETER
                    .to_string(),
                shared_property_values,
            }],
        );
        self.define_action(action)
    }

    fn interface_action_name(
        &self,
        verb: &str,
        interface: &InterfaceType,
        object: Option<&ObjectType>,
    ) -> String {
        let interface_name = kebab_case(strip_namespace(&self.namespace, &interface.api_name));
        match object {
            Some(object) => format!(
                "{verb}-{interface_name}-{}",
                kebab_case(strip_namespace(&self.namespace, &object.api_name))
            ),
            None => format!("{verb}-{interface_name}"),
        }
    }

    /// One parameter per inherited shared property, id = namespaced SPT API name.
    fn shared_property_parameters(
        &self,
        interface: &InterfaceType,
        required: bool,
    ) -> Vec<ActionParameter> {
        let lookup = self.lookup();
        lookup
            .all_interface_properties(interface)
            .into_iter()
            .filter_map(|(spt_api_name, _)| {
                let spt = lookup.shared_property_type(&spt_api_name)?;
                let parameter_type = parameter_type_for_property(&spt.property_type, spt.array);
                let allowed_values = property_allowed_values(&spt.property_type, &parameter_type);
                Some(ActionParameter {
                    display_name: spt
                        .display_name
                        .clone()
                        .unwrap_or_else(|| strip_namespace(&self.namespace, &spt_api_name).to_string()),
                    id: spt_api_name,
                    parameter_type,
                    validation: required_validation(allowed_values, required),
                    description: spt.description.clone(),
                    type_classes: Vec::new(),
                })
            })
            .collect()
    }

    fn namespace_parameter_type(&self, parameter_type: &ActionParameterType) -> ActionParameterType {
        let object_name = |api_name: &str| {
            self.require_object(api_name)
                .map_or_else(|_| self.sanitize(api_name), |object| object.api_name.clone())
        };
        let interface_name = |api_name: &str| {
            self.require_interface(api_name)
                .map_or_else(|_| self.sanitize(api_name), |interface| interface.api_name.clone())
        };
        match parameter_type {
            ActionParameterType::ObjectReference { object_type_id } => {
                ActionParameterType::ObjectReference {
                    object_type_id: object_name(object_type_id),
                }
            }
            ActionParameterType::ObjectReferenceList { object_type_id } => {
                ActionParameterType::ObjectReferenceList {
                    object_type_id: object_name(object_type_id),
                }
            }
            ActionParameterType::InterfaceReference {
                interface_type_api_name,
            } => ActionParameterType::InterfaceReference {
                interface_type_api_name: interface_name(interface_type_api_name),
            },
            ActionParameterType::InterfaceReferenceList {
                interface_type_api_name,
            } => ActionParameterType::InterfaceReferenceList {
                interface_type_api_name: interface_name(interface_type_api_name),
            },
            ActionParameterType::ObjectTypeReference { interface_types } => {
                ActionParameterType::ObjectTypeReference {
                    interface_types: interface_types
                        .iter()
                        .map(|api_name| interface_name(api_name))
                        .collect(),
                }
            }
            other => other.clone(),
        }
    }

    fn resolve_rule(
        &self,
        action_api_name: &str,
        rule: LogicRule,
        declared: &BTreeSet<String>,
    ) -> Result<LogicRule> {
        let require_parameter = |parameter: &str, message: &str| {
            if declared.contains(parameter) {
                Ok(())
            } else {
                Err(MakerError::Validation(message.to_string()))
            }
        };
        match rule {
            LogicRule::AddObjectRule {
                object_type_id,
                property_values,
                struct_field_values,
            } => {
                let object = self.require_object(&object_type_id)?;
                let property_values =
                    resolve_property_values(action_api_name, object, property_values, declared)?;
                Ok(LogicRule::AddObjectRule {
                    object_type_id: object.api_name.clone(),
                    property_values,
                    struct_field_values,
                })
            }
            LogicRule::ModifyObjectRule {
                object_to_modify,
                property_values,
                struct_field_values,
            } => {
                require_parameter(
                    &object_to_modify,
                    "Object to modify parameter must be defined in parameters",
                )?;
                let property_values = property_values
                    .into_iter()
                    .map(|(property, value)| {
                        resolve_value(action_api_name, &property, value, declared)
                            .map(|value| (property, value))
                    })
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(LogicRule::ModifyObjectRule {
                    object_to_modify,
                    property_values,
                    struct_field_values,
                })
            }
            LogicRule::DeleteObjectRule { object_to_delete } => {
                require_parameter(
                    &object_to_delete,
                    "Object to delete parameter must be defined in parameters",
                )?;
                Ok(LogicRule::DeleteObjectRule { object_to_delete })
            }
            LogicRule::AddInterfaceRule {
                interface_api_name,
                object_type_parameter,
                shared_property_values,
            } => {
                let interface = self.require_interface(&interface_api_name)?;
                require_parameter(
                    &object_type_parameter,
                    "Object type parameter must be defined in parameters",
                )?;
                Ok(LogicRule::AddInterfaceRule {
                    interface_api_name: interface.api_name.clone(),
                    object_type_parameter,
                    shared_property_values: self.resolve_shared_values(
                        action_api_name,
                        shared_property_values,
                        declared,
                    )?,
                })
            }
            LogicRule::ModifyInterfaceRule {
                interface_object_to_modify_parameter,
                shared_property_values,
            } => {
                require_parameter(
                    &interface_object_to_modify_parameter,
                    "Interface object to modify parameter must be defined in parameters",
                )?;
                Ok(LogicRule::ModifyInterfaceRule {
                    interface_object_to_modify_parameter,
                    shared_property_values: self.resolve_shared_values(
                        action_api_name,
                        shared_property_values,
                        declared,
                    )?,
                })
            }
        }
    }

    fn resolve_shared_values(
        &self,
        action_api_name: &str,
        values: BTreeMap<String, LogicRuleValue>,
        declared: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, LogicRuleValue>> {
        values
            .into_iter()
            .map(|(spt, value)| {
                let spt = self.sanitize(&spt);
                resolve_value(action_api_name, &spt, value, declared).map(|value| (spt, value))
            })
            .collect()
    }
}

fn resolve_property_values(
    action_api_name: &str,
    object: &ObjectType,
    values: BTreeMap<String, LogicRuleValue>,
    declared: &BTreeSet<String>,
) -> Result<BTreeMap<String, LogicRuleValue>> {
    let mut resolved = BTreeMap::new();
    for (property, value) in values {
        if object.property(&property).is_none() {
            return Err(MakerError::OntologyViolation(format!(
                "Property {property} does not exist on object {}",
                object.api_name
            )));
        }
        let value = resolve_value(action_api_name, &property, value, declared)?;
        resolved.insert(property, value);
    }
    Ok(resolved)
}

/// Checks parameter references and pins unique-identifier link ids.
fn resolve_value(
    action_api_name: &str,
    target: &str,
    value: LogicRuleValue,
    declared: &BTreeSet<String>,
) -> Result<LogicRuleValue> {
    match value {
        LogicRuleValue::ParameterId { parameter_id } if !declared.contains(parameter_id.as_str()) => {
            Err(MakerError::Validation(format!(
                "Parameter {parameter_id} used for {target} is not defined on action {action_api_name}"
            )))
        }
        LogicRuleValue::UniqueIdentifier { link_id: None } => {
            let seed = format!("{action_api_name}.{target}");
            Ok(LogicRuleValue::UniqueIdentifier {
                link_id: Some(Uuid::new_v5(&Uuid::nil(), seed.as_bytes()).to_string()),
            })
        }
        other => Ok(other),
    }
}

fn check_condition_parameters(
    condition: &ConditionDefinition,
    declared: &BTreeSet<String>,
) -> Result<()> {
    match condition {
        ConditionDefinition::Parameter { parameter_id, .. }
            if !declared.contains(parameter_id.as_str()) =>
        {
            Err(MakerError::Validation(format!(
                "Validation condition references undefined parameter {parameter_id}"
            )))
        }
        ConditionDefinition::And { conditions } | ConditionDefinition::Or { conditions } => {
            conditions
                .iter()
                .try_for_each(|condition| check_condition_parameters(condition, declared))
        }
        _ => Ok(()),
    }
}

fn convenience_action(
    api_name: &str,
    display_name: &str,
    parameters: Vec<ActionParameter>,
    rules: Vec<LogicRule>,
) -> ActionType {
    ActionType {
        api_name: api_name.to_string(),
        display_name: display_name.to_string(),
        status: Status::Active,
        description: None,
        icon: None,
        parameters,
        parameter_ordering: None,
        rules,
        sections: BTreeMap::new(),
        validation: Vec::new(),
        type_classes: Vec::new(),
        default_format: ActionLayout::Form,
        enable_layout_switch: false,
        success_message: None,
    }
}

fn required_validation(allowed_values: AllowedValues, required: bool) -> ActionParameterValidation {
    ActionParameterValidation {
        allowed_values,
        required: ParameterRequirement::Flag(required),
        default_visibility: ParameterVisibility::Editable,
    }
}

fn object_reference_parameter(id: &str, display_name: &str, object_api_name: &str) -> ActionParameter {
    ActionParameter {
        id: id.to_string(),
        display_name: display_name.to_string(),
        parameter_type: ActionParameterType::ObjectReference {
            object_type_id: object_api_name.to_string(),
        },
        validation: required_validation(AllowedValues::ObjectQuery, true),
        description: None,
        type_classes: Vec::new(),
    }
}

fn object_type_choice(object: &ObjectType) -> AllowedValues {
    AllowedValues::OneOf {
        one_of: vec![LabelledValue {
            label: object.display_name.clone(),
            value: json!({
                "type": "objectType",
                "objectType": {"objectTypeId": object.api_name},
            }),
        }],
        other_value_allowed: false,
    }
}

fn property_parameters(object: &ObjectType, required: bool) -> Vec<ActionParameter> {
    object
        .properties
        .iter()
        .map(|property| {
            let parameter_type = parameter_type_for_property(&property.property_type, property.array);
            let allowed_values = property_allowed_values(&property.property_type, &parameter_type);
            ActionParameter {
                id: property.api_name.clone(),
                display_name: property
                    .display_name
                    .clone()
                    .unwrap_or_else(|| property.api_name.clone()),
                parameter_type,
                validation: required_validation(allowed_values, required),
                description: None,
                type_classes: Vec::new(),
            }
        })
        .collect()
}

fn property_values(object: &ObjectType) -> BTreeMap<String, LogicRuleValue> {
    object
        .properties
        .iter()
        .map(|property| {
            (
                property.api_name.clone(),
                LogicRuleValue::parameter(&property.api_name),
            )
        })
        .collect()
}

fn shared_property_values(parameters: &[ActionParameter]) -> BTreeMap<String, LogicRuleValue> {
    parameters
        .iter()
        .map(|parameter| (parameter.id.clone(), LogicRuleValue::parameter(&parameter.id)))
        .collect()
}

/// Action parameter type able to carry a value of the given property type.
fn parameter_type_for_property(kind: &PropertyKind, array: bool) -> ActionParameterType {
    use ActionParameterType as P;
    let (single, list) = match kind {
        PropertyKind::Boolean => (P::Boolean, P::BooleanList),
        PropertyKind::Byte | PropertyKind::Short | PropertyKind::Integer => {
            (P::Integer, P::IntegerList)
        }
        PropertyKind::Long => (P::Long, P::LongList),
        PropertyKind::Float | PropertyKind::Double => (P::Double, P::DoubleList),
        PropertyKind::Decimal => (P::Decimal, P::DecimalList),
        PropertyKind::String(_) => (P::String, P::StringList),
        PropertyKind::Timestamp => (P::Timestamp, P::TimestampList),
        PropertyKind::Date => (P::Date, P::DateList),
        PropertyKind::Geopoint => (P::Geohash, P::GeohashList),
        PropertyKind::Geoshape => (P::Geoshape, P::GeoshapeList),
        PropertyKind::MediaReference => (P::MediaReference, P::MediaReferenceList),
        PropertyKind::GeotimeSeries => (P::GeotimeSeriesReference, P::GeotimeSeriesReferenceList),
        PropertyKind::Marking { .. } => (P::Marking, P::MarkingList),
        PropertyKind::Struct(fields) => {
            let fields = fields
                .iter()
                .map(|field| (field.api_name.clone(), json!(field.field_type.tag())))
                .collect::<serde_json::Map<_, _>>();
            (
                P::Struct {
                    fields: Value::Object(fields.clone()),
                },
                P::StructList {
                    fields: Value::Object(fields),
                },
            )
        }
    };
    if array { list } else { single }
}

/// Markings keep their flavour; everything else follows the parameter type.
fn property_allowed_values(kind: &PropertyKind, parameter_type: &ActionParameterType) -> AllowedValues {
    match kind {
        PropertyKind::Marking {
            marking_type: MarkingType::Cbac,
        } => AllowedValues::CbacMarking,
        _ => default_allowed_values(parameter_type),
    }
}

/// Allowed values a parameter of this type accepts when nothing narrower is declared.
fn default_allowed_values(parameter_type: &ActionParameterType) -> AllowedValues {
    use ActionParameterType as P;
    match parameter_type {
        P::Boolean | P::BooleanList => AllowedValues::Boolean,
        P::Integer
        | P::IntegerList
        | P::Long
        | P::LongList
        | P::Double
        | P::DoubleList
        | P::Decimal
        | P::DecimalList => AllowedValues::Range {
            min: None,
            max: None,
        },
        P::String | P::StringList => AllowedValues::any_text(),
        P::Timestamp | P::TimestampList | P::Date | P::DateList => AllowedValues::Datetime {
            minimum: None,
            maximum: None,
        },
        P::Geohash | P::GeohashList => AllowedValues::Geohash,
        P::Geoshape | P::GeoshapeList => AllowedValues::Geoshape,
        P::Attachment | P::AttachmentList => AllowedValues::Attachment,
        P::Marking | P::MarkingList => AllowedValues::MandatoryMarking,
        P::MediaReference | P::MediaReferenceList => AllowedValues::MediaReference,
        P::TimeSeriesReference => AllowedValues::TimeSeriesReference,
        P::GeotimeSeriesReference | P::GeotimeSeriesReferenceList => {
            AllowedValues::GeotimeSeriesReference
        }
        P::ObjectTypeReference { interface_types } => AllowedValues::ObjectTypeReference {
            interface_types: interface_types.clone(),
        },
        P::ObjectSetRid => AllowedValues::ObjectSetRid,
        P::ObjectReference { .. } | P::ObjectReferenceList { .. } => AllowedValues::ObjectQuery,
        P::InterfaceReference { .. } | P::InterfaceReferenceList { .. } => {
            AllowedValues::InterfaceObjectQuery
        }
        P::Struct { .. } | P::StructList { .. } => AllowedValues::any_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::simple_object;
    use super::*;
    use crate::model::{
        ActionSection, InterfacePropertyDefinition, InterfaceTypeDefinition, ObjectPropertyType,
    };

    fn builder_with_foo() -> OntologyBuilder {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        let mut foo = simple_object("foo", "bar");
        foo.display_name = "exampleObjectType".to_string();
        foo.properties[0].display_name = Some("Bar".to_string());
        builder.define_object(foo).expect("foo");
        builder
    }

    fn text_parameter(id: &str) -> ActionParameter {
        ActionParameter {
            id: id.to_string(),
            display_name: id.to_string(),
            parameter_type: ActionParameterType::String,
            validation: required_validation(AllowedValues::any_text(), true),
            description: None,
            type_classes: Vec::new(),
        }
    }

    #[test]
    fn convenience_object_actions_derive_parameters_and_rules() {
        let mut builder = builder_with_foo();
        let create = builder
            .define_create_object_action("foo", None)
            .expect("create action");
        assert_eq!(create.api_name, "com.palantir.create-object-foo");
        assert_eq!(create.display_name, "Create exampleObjectType");
        assert_eq!(create.parameters[0].display_name, "Bar");
        assert!(matches!(
            &create.rules[0],
            LogicRule::AddObjectRule { object_type_id, .. } if object_type_id == "com.palantir.foo"
        ));

        let modify = builder
            .define_modify_object_action("foo", None)
            .expect("modify action");
        assert_eq!(
            modify.effective_parameter_ordering(),
            vec!["objectToModifyParameter", "bar"]
        );
        assert_eq!(
            modify.parameters[1].validation.required,
            ParameterRequirement::Flag(false)
        );

        let delete = builder
            .define_delete_object_action("foo", None)
            .expect("delete action");
        assert_eq!(delete.api_name, "com.palantir.delete-object-foo");
        assert_eq!(delete.parameters[0].display_name, "Delete object");
    }

    #[test]
    fn interface_actions_are_named_after_interface_and_object() {
        let mut builder = builder_with_foo();
        let mut interface = InterfaceTypeDefinition::named("exampleInterface");
        interface.properties.insert(
            "property1".to_string(),
            InterfacePropertyDefinition::Inline(PropertyKind::string()),
        );
        builder.define_interface(interface).expect("interface");

        let create = builder
            .define_create_interface_object_action("exampleInterface", Some("foo"))
            .expect("create interface action");
        assert_eq!(create.api_name, "com.palantir.create-example-interface-foo");
        assert_eq!(create.parameters[1].id, "com.palantir.property1");
        assert_eq!(create.parameters[1].display_name, "property1");
        let AllowedValues::OneOf { one_of, .. } = &create.parameters[0].validation.allowed_values
        else {
            panic!("expected oneOf allowed values");
        };
        assert_eq!(one_of[0].label, "exampleObjectType");

        let modify = builder
            .define_modify_interface_object_action("exampleInterface", None)
            .expect("modify interface action");
        assert_eq!(modify.api_name, "com.palantir.modify-example-interface");
        assert_eq!(
            modify.parameters[0].validation.allowed_values,
            AllowedValues::InterfaceObjectQuery
        );
    }

    #[test]
    fn sections_and_ordering_must_name_declared_parameters() {
        let mut builder = builder_with_foo();
        let mut action = convenience_action("doThing", "Do thing", vec![text_parameter("a")], Vec::new());
        action.sections.insert(
            "main".to_string(),
            ActionSection {
                display_name: None,
                description: None,
                parameters: vec!["ghost".to_string()],
                collapsed_by_default: false,
                column_count: None,
            },
        );
        let err = builder
            .define_action(action.clone())
            .expect_err("unknown section parameter must fail");
        assert!(err.to_string().contains("Parameter ghost in section main"));

        action.sections.clear();
        action.parameter_ordering = Some(vec!["a".to_string(), "b".to_string()]);
        let err = builder
            .define_action(action)
            .expect_err("unknown ordering entry must fail");
        assert!(err.to_string().contains("Parameter b in parameter ordering"));
    }

    #[test]
    fn modify_rule_requires_declared_object_parameter() {
        let mut builder = builder_with_foo();
        let action = convenience_action(
            "modifyFoo",
            "Modify foo",
            vec![text_parameter("bar")],
            vec![LogicRule::ModifyObjectRule {
                object_to_modify: "target".to_string(),
                property_values: BTreeMap::new(),
                struct_field_values: BTreeMap::new(),
            }],
        );
        let err = builder
            .define_action(action)
            .expect_err("undeclared object parameter must fail");
        assert_eq!(
            err.to_string(),
            "invariant failed: Object to modify parameter must be defined in parameters"
        );
    }

    #[test]
    fn unique_identifier_link_ids_are_deterministic() {
        let define = || {
            let mut builder = builder_with_foo();
            let action = convenience_action(
                "createFoo",
                "Create foo",
                Vec::new(),
                vec![LogicRule::AddObjectRule {
                    object_type_id: "foo".to_string(),
                    property_values: BTreeMap::from([(
                        "bar".to_string(),
                        LogicRuleValue::UniqueIdentifier { link_id: None },
                    )]),
                    struct_field_values: BTreeMap::new(),
                }],
            );
            builder.define_action(action).expect("action")
        };
        let first = define();
        let second = define();
        assert_eq!(first.rules, second.rules);
        let LogicRule::AddObjectRule { property_values, .. } = &first.rules[0] else {
            panic!("expected add object rule");
        };
        assert!(matches!(
            &property_values["bar"],
            LogicRuleValue::UniqueIdentifier { link_id: Some(_) }
        ));
    }

    #[test]
    fn rule_properties_must_exist_on_object() {
        let mut builder = builder_with_foo();
        let action = convenience_action(
            "createFoo",
            "Create foo",
            vec![text_parameter("a")],
            vec![LogicRule::AddObjectRule {
                object_type_id: "foo".to_string(),
                property_values: BTreeMap::from([("ghost".to_string(), LogicRuleValue::parameter("a"))]),
                struct_field_values: BTreeMap::new(),
            }],
        );
        let err = builder
            .define_action(action)
            .expect_err("unknown property must fail");
        assert!(
            err.to_string()
                .contains("Property ghost does not exist on object com.palantir.foo")
        );
    }

    #[test]
    fn property_kinds_map_to_parameter_types() {
        assert_eq!(
            parameter_type_for_property(&PropertyKind::Integer, true),
            ActionParameterType::IntegerList
        );
        assert_eq!(
            parameter_type_for_property(&PropertyKind::Geopoint, false),
            ActionParameterType::Geohash
        );
        let marking = ObjectPropertyType::new(
            "mark",
            PropertyKind::Marking {
                marking_type: MarkingType::Cbac,
            },
        );
        let parameter_type = parameter_type_for_property(&marking.property_type, false);
        assert_eq!(parameter_type, ActionParameterType::Marking);
        assert_eq!(
            property_allowed_values(&marking.property_type, &parameter_type),
            AllowedValues::CbacMarking
        );
        assert_eq!(
            property_allowed_values(&PropertyKind::Double, &ActionParameterType::Double),
            AllowedValues::Range {
                min: None,
                max: None
            }
        );
    }
}
