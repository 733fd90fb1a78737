//! Action type lowering: parameters, validation, render hints and form layout.

use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use crate::error::{MakerError, Result};
use crate::model::{
    ActionLayout, ActionParameter, ActionParameterType, ActionType, ActionValidationRule,
    AllowedValues, BlueprintIcon, ConditionDefinition, GroupFilter, LogicRule, LogicRuleValue,
    ParameterRequirement, ParameterVisibility,
};
use crate::wire::{empty_tagged, tagged};

const DEFAULT_ICON_LOCATOR: &str = "edit";
const DEFAULT_ICON_COLOR: &str = "#000000";
const MISSING_GROUP_MESSAGE: &str =
    "Insufficient permissions. Missing organization membership required to submit action";

pub(super) fn lower_action_type(action: &ActionType) -> Result<Value> {
    let mut parameters = Map::new();
    let mut parameter_validations = Map::new();
    for parameter in &action.parameters {
        parameters.insert(parameter.id.clone(), lower_parameter(parameter)?);
        parameter_validations.insert(
            parameter.id.clone(),
            json!({
                "defaultValidation": {
                    "display": {
                        "renderHint": render_hint(parameter)?,
                        "visibility": visibility(parameter.validation.default_visibility),
                    },
                    "validation": {
                        "allowedValues": allowed_values(&parameter.validation.allowed_values),
                        "required": requirement(parameter.validation.required),
                    },
                },
            }),
        );
    }

    let parameter_ordering = action.effective_parameter_ordering();
    let rules = action
        .rules
        .iter()
        .map(lower_rule)
        .collect::<Vec<_>>();

    let success_message = action
        .success_message
        .iter()
        .map(|content| tagged("message", json!({ "content": content })))
        .collect::<Vec<_>>();
    let default_icon = BlueprintIcon::new(DEFAULT_ICON_LOCATOR, DEFAULT_ICON_COLOR);
    let default_layout = match action.default_format {
        ActionLayout::Form => "FORM",
        ActionLayout::Table => "TABLE",
    };

    Ok(json!({
        "actionType": {
            "actionTypeLogic": {
                "logic": { "rules": rules },
                "validation": {
                    "actionTypeLevelValidation": { "rules": validation_rules(&action.validation) },
                    "parameterValidations": parameter_validations,
                },
            },
            "metadata": {
                "apiName": action.api_name,
                "displayMetadata": {
                    "configuration": {
                        "defaultLayout": default_layout,
                        "displayAndFormat": {
                            "table": {
                                "columnWidthByParameterRid": {},
                                "enableFileImport": true,
                                "fitHorizontally": false,
                                "frozenColumnCount": 0,
                                "rowHeightInLines": 1,
                            },
                        },
                        "enableLayoutUserSwitch": action.enable_layout_switch,
                    },
                    "description": action.description.as_deref().unwrap_or(""),
                    "displayName": action.display_name,
                    "icon": action.icon.as_ref().unwrap_or(&default_icon).to_wire(),
                    "successMessage": success_message,
                    "typeClasses": action.type_classes,
                },
                "formContentOrdering": form_content_ordering(action, &parameter_ordering),
                "parameterOrdering": parameter_ordering,
                "parameters": parameters,
                "sections": sections(action),
                "status": action.status.to_wire(),
            },
        },
    }))
}

/// Permission entry for actions gated by action-level validation.
#[must_use]
pub(super) fn restriction_status() -> Value {
    json!({
        "restrictionStatus": {
            "hasRolesApplied": true,
            "ontologyPackageRid": null,
            "publicProject": false,
        },
    })
}

fn lower_parameter(parameter: &ActionParameter) -> Result<Value> {
    Ok(json!({
        "displayMetadata": {
            "description": parameter.description.as_deref().unwrap_or(""),
            "displayName": parameter.display_name,
            "typeClasses": parameter.type_classes,
        },
        "id": parameter.id,
        "type": parameter_type(&parameter.parameter_type)?,
    }))
}

fn parameter_type(parameter_type: &ActionParameterType) -> Result<Value> {
    let tag = parameter_type.tag();
    Ok(match parameter_type {
        ActionParameterType::ObjectReference { object_type_id }
        | ActionParameterType::ObjectReferenceList { object_type_id } => {
            tagged(tag, json!({ "objectTypeId": object_type_id }))
        }
        ActionParameterType::InterfaceReference {
            interface_type_api_name,
        }
        | ActionParameterType::InterfaceReferenceList {
            interface_type_api_name,
        } => tagged(tag, json!({ "interfaceTypeRid": interface_type_api_name })),
        ActionParameterType::ObjectTypeReference { interface_types } => {
            tagged(tag, json!({ "interfaceTypeRids": interface_types }))
        }
        ActionParameterType::Struct { .. } | ActionParameterType::StructList { .. } => {
            return Err(MakerError::Unsupported(format!(
                "{tag} action parameters cannot be lowered"
            )));
        }
        ActionParameterType::Boolean
        | ActionParameterType::BooleanList
        | ActionParameterType::Integer
        | ActionParameterType::IntegerList
        | ActionParameterType::Long
        | ActionParameterType::LongList
        | ActionParameterType::Double
        | ActionParameterType::DoubleList
        | ActionParameterType::Decimal
        | ActionParameterType::DecimalList
        | ActionParameterType::String
        | ActionParameterType::StringList
        | ActionParameterType::Timestamp
        | ActionParameterType::TimestampList
        | ActionParameterType::Date
        | ActionParameterType::DateList
        | ActionParameterType::Geohash
        | ActionParameterType::GeohashList
        | ActionParameterType::Geoshape
        | ActionParameterType::GeoshapeList
        | ActionParameterType::Attachment
        | ActionParameterType::AttachmentList
        | ActionParameterType::Marking
        | ActionParameterType::MarkingList
        | ActionParameterType::MediaReference
        | ActionParameterType::MediaReferenceList
        | ActionParameterType::TimeSeriesReference
        | ActionParameterType::GeotimeSeriesReference
        | ActionParameterType::GeotimeSeriesReferenceList
        | ActionParameterType::ObjectSetRid => empty_tagged(tag),
    })
}

fn render_hint(parameter: &ActionParameter) -> Result<Value> {
    use ActionParameterType as T;

    let allowed = &parameter.validation.allowed_values;
    let hint = match &parameter.parameter_type {
        T::Boolean | T::BooleanList => "checkbox",
        T::Integer
        | T::IntegerList
        | T::Long
        | T::LongList
        | T::Double
        | T::DoubleList
        | T::Decimal
        | T::DecimalList => "numericInput",
        T::String | T::StringList | T::Geohash | T::GeohashList | T::Geoshape | T::GeoshapeList
        | T::ObjectSetRid => {
            if matches!(allowed, AllowedValues::User { .. }) {
                "userDropdown"
            } else {
                "textInput"
            }
        }
        T::Timestamp | T::TimestampList | T::Date | T::DateList => "dateTimePicker",
        T::ObjectReference { .. }
        | T::ObjectReferenceList { .. }
        | T::InterfaceReference { .. }
        | T::InterfaceReferenceList { .. }
        | T::ObjectTypeReference { .. }
        | T::GeotimeSeriesReference
        | T::GeotimeSeriesReferenceList
        | T::TimeSeriesReference => "dropdown",
        T::Attachment | T::AttachmentList => "filePicker",
        T::Marking | T::MarkingList => match allowed {
            AllowedValues::MandatoryMarking => "mandatoryMarkingPicker",
            AllowedValues::CbacMarking => "cbacMarkingPicker",
            AllowedValues::OneOf { .. }
            | AllowedValues::Range { .. }
            | AllowedValues::Text { .. }
            | AllowedValues::Datetime { .. }
            | AllowedValues::ObjectTypeReference { .. }
            | AllowedValues::User { .. }
            | AllowedValues::MultipassGroup
            | AllowedValues::Redacted
            | AllowedValues::GeotimeSeriesReference
            | AllowedValues::Attachment
            | AllowedValues::Boolean
            | AllowedValues::ObjectSetRid
            | AllowedValues::ObjectQuery
            | AllowedValues::ObjectList
            | AllowedValues::MediaReference
            | AllowedValues::TimeSeriesReference
            | AllowedValues::Geohash
            | AllowedValues::Geoshape
            | AllowedValues::InterfaceObjectQuery => {
                return Err(MakerError::Unsupported(
                    "Marking parameters must have allowed values of type mandatoryMarking or cbacMarking"
                        .to_string(),
                ));
            }
        },
        T::MediaReference | T::MediaReferenceList => "mediaUploader",
        T::Struct { .. } | T::StructList { .. } => {
            return Err(MakerError::Unsupported(format!(
                "parameter {} has a struct type, which has no render hint",
                parameter.id
            )));
        }
    };
    Ok(empty_tagged(hint))
}

fn visibility(visibility: ParameterVisibility) -> Value {
    empty_tagged(match visibility {
        ParameterVisibility::Editable => "editable",
        ParameterVisibility::Disabled => "disabled",
        ParameterVisibility::Hidden => "hidden",
    })
}

fn requirement(required: ParameterRequirement) -> Value {
    match required {
        ParameterRequirement::Flag(true) => empty_tagged("required"),
        ParameterRequirement::Flag(false) => empty_tagged("notRequired"),
        ParameterRequirement::ListLength { list_length } => {
            let mut body = Map::new();
            if let Some(min) = list_length.min {
                body.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = list_length.max {
                body.insert("maxLength".to_string(), json!(max));
            }
            tagged("listLengthValidation", Value::Object(body))
        }
    }
}

fn insert_some(body: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
}

/// Allowed values nest the constraint body twice under its tag.
fn allowed_values(allowed: &AllowedValues) -> Value {
    let mut body = Map::new();
    match allowed {
        AllowedValues::OneOf {
            one_of,
            other_value_allowed,
        } => {
            body.insert("labelledValues".to_string(), json!(one_of));
            body.insert(
                "otherValueAllowed".to_string(),
                json!({ "allowed": other_value_allowed }),
            );
        }
        AllowedValues::Range { min, max } => {
            insert_some(&mut body, "min", min.clone());
            insert_some(&mut body, "max", max.clone());
        }
        AllowedValues::Text {
            min_length,
            max_length,
            regex,
        } => {
            insert_some(&mut body, "minimumLength", min_length.map(|value| json!(value)));
            insert_some(&mut body, "maximumLength", max_length.map(|value| json!(value)));
            insert_some(&mut body, "regex", regex.as_ref().map(|value| json!(value)));
        }
        AllowedValues::Datetime { minimum, maximum } => {
            insert_some(&mut body, "minimum", minimum.clone());
            insert_some(&mut body, "maximum", maximum.clone());
        }
        AllowedValues::ObjectTypeReference { interface_types } => {
            body.insert("interfaceTypeRids".to_string(), json!(interface_types));
        }
        AllowedValues::User { from_groups } => {
            let filters = from_groups
                .iter()
                .map(|filter| {
                    let group_id = match filter {
                        GroupFilter::Static { name } => {
                            tagged("staticValue", tagged("string", json!(name)))
                        }
                        GroupFilter::Parameter { parameter } => {
                            tagged("parameterId", json!(parameter))
                        }
                    };
                    tagged("groupFilter", json!({ "groupId": group_id }))
                })
                .collect::<Vec<_>>();
            body.insert("filters".to_string(), Value::Array(filters));
        }
        AllowedValues::MultipassGroup
        | AllowedValues::Redacted
        | AllowedValues::GeotimeSeriesReference
        | AllowedValues::Attachment
        | AllowedValues::Boolean
        | AllowedValues::ObjectSetRid
        | AllowedValues::CbacMarking
        | AllowedValues::MandatoryMarking
        | AllowedValues::ObjectQuery
        | AllowedValues::ObjectList
        | AllowedValues::MediaReference
        | AllowedValues::TimeSeriesReference
        | AllowedValues::Geohash
        | AllowedValues::Geoshape
        | AllowedValues::InterfaceObjectQuery => {}
    }
    let tag = allowed.tag();
    tagged(tag, tagged(tag, Value::Object(body)))
}

fn lower_value(value: &LogicRuleValue) -> Value {
    match value {
        LogicRuleValue::ParameterId { parameter_id } => tagged("parameterId", json!(parameter_id)),
        LogicRuleValue::StaticValue { value } => tagged("staticValue", value.clone()),
        LogicRuleValue::CurrentUser => empty_tagged("currentUser"),
        LogicRuleValue::CurrentTime => empty_tagged("currentTime"),
        LogicRuleValue::UniqueIdentifier { link_id } => {
            let mut body = Map::new();
            insert_some(&mut body, "linkId", link_id.as_ref().map(|id| json!(id)));
            tagged("uniqueIdentifier", Value::Object(body))
        }
    }
}

fn lower_values<'a>(
    values: impl IntoIterator<Item = (&'a String, &'a LogicRuleValue)>,
) -> Map<String, Value> {
    values
        .into_iter()
        .map(|(key, value)| (key.clone(), lower_value(value)))
        .collect()
}

fn lower_rule(rule: &LogicRule) -> Value {
    match rule {
        LogicRule::AddObjectRule {
            object_type_id,
            property_values,
            struct_field_values,
        } => tagged(
            "addObjectRule",
            json!({
                "objectTypeId": object_type_id,
                "propertyValues": lower_values(property_values),
                "structFieldValues": struct_field_values,
            }),
        ),
        LogicRule::ModifyObjectRule {
            object_to_modify,
            property_values,
            struct_field_values,
        } => tagged(
            "modifyObjectRule",
            json!({
                "objectToModify": object_to_modify,
                "propertyValues": lower_values(property_values),
                "structFieldValues": struct_field_values,
            }),
        ),
        LogicRule::DeleteObjectRule { object_to_delete } => tagged(
            "deleteObjectRule",
            json!({ "objectToDelete": object_to_delete }),
        ),
        LogicRule::AddInterfaceRule {
            interface_api_name,
            object_type_parameter,
            shared_property_values,
        } => tagged(
            "addInterfaceRule",
            json!({
                "interfaceApiName": interface_api_name,
                "objectTypeParameter": object_type_parameter,
                "sharedPropertyValues": lower_values(shared_property_values),
            }),
        ),
        LogicRule::ModifyInterfaceRule {
            interface_object_to_modify_parameter,
            shared_property_values,
        } => tagged(
            "modifyInterfaceRule",
            json!({
                "interfaceObjectToModifyParameter": interface_object_to_modify_parameter,
                "sharedPropertyValues": lower_values(shared_property_values),
            }),
        ),
    }
}

fn lower_condition(condition: &ConditionDefinition) -> Value {
    match condition {
        ConditionDefinition::True => empty_tagged("true"),
        ConditionDefinition::Group { name } => tagged(
            "comparison",
            json!({
                "left": tagged("userProperty", json!({
                    "propertyValue": empty_tagged("groupIds"),
                    "userId": empty_tagged("currentUser"),
                })),
                "operator": "INTERSECTS",
                "right": tagged(
                    "staticValue",
                    tagged("stringList", json!({ "strings": [name] })),
                ),
            }),
        ),
        ConditionDefinition::Parameter {
            parameter_id,
            matches,
        } => tagged(
            "comparison",
            json!({
                "left": tagged("parameterId", json!(parameter_id)),
                "operator": "EQUALS",
                "right": matches,
            }),
        ),
        ConditionDefinition::And { conditions } => tagged(
            "and",
            json!({ "conditions": conditions.iter().map(lower_condition).collect::<Vec<_>>() }),
        ),
        ConditionDefinition::Or { conditions } => tagged(
            "or",
            json!({ "conditions": conditions.iter().map(lower_condition).collect::<Vec<_>>() }),
        ),
        ConditionDefinition::Comparison { comparison } => tagged("comparison", comparison.clone()),
    }
}

/// Action-level rules keyed by position. An action without rules always validates.
fn validation_rules(rules: &[ActionValidationRule]) -> Map<String, Value> {
    if rules.is_empty() {
        let mut map = Map::new();
        map.insert(
            "0".to_string(),
            json!({
                "condition": empty_tagged("true"),
                "displayMetadata": { "failureMessage": "", "typeClasses": [] },
            }),
        );
        return map;
    }
    rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| {
            let failure_message = match (&rule.failure_message, &rule.condition) {
                (Some(message), _) => message.as_str(),
                (None, ConditionDefinition::Group { .. }) => MISSING_GROUP_MESSAGE,
                (None, _) => "",
            };
            (
                idx.to_string(),
                json!({
                    "condition": lower_condition(&rule.condition),
                    "displayMetadata": { "failureMessage": failure_message, "typeClasses": [] },
                }),
            )
        })
        .collect()
}

fn sections(action: &ActionType) -> Map<String, Value> {
    action
        .sections
        .iter()
        .map(|(id, section)| {
            let content = section
                .parameters
                .iter()
                .map(|parameter| tagged("parameterId", json!(parameter)))
                .collect::<Vec<_>>();
            (
                id.clone(),
                json!({
                    "content": content,
                    "displayMetadata": {
                        "collapsedByDefault": section.collapsed_by_default,
                        "columnCount": section.column_count.unwrap_or(1),
                        "description": section.description.as_deref().unwrap_or(""),
                        "displayName": section.display_name.as_deref().unwrap_or(id),
                        "showTitleBar": true,
                    },
                    "id": id,
                }),
            )
        })
        .collect()
}

/// Sections appear where their first parameter falls in the parameter ordering.
fn form_content_ordering(action: &ActionType, parameter_ordering: &[String]) -> Vec<Value> {
    if action.sections.is_empty() {
        return Vec::new();
    }
    let mut seen_sections = BTreeSet::new();
    let mut ordering = Vec::new();
    for parameter in parameter_ordering {
        let section = action
            .sections
            .iter()
            .find(|(_, section)| section.parameters.contains(parameter))
            .map(|(id, _)| id);
        match section {
            Some(section) => {
                if seen_sections.insert(section.as_str()) {
                    ordering.push(tagged("sectionId", json!(section)));
                }
            }
            None => ordering.push(tagged("parameterId", json!(parameter))),
        }
    }
    ordering
}
