mod action;
mod automation;
mod common;
mod compute_module;
mod interface;
mod link;
mod object;
mod property;
mod shared_property;
mod value_type;

pub use action::{
    ActionLayout, ActionParameter, ActionParameterType, ActionParameterValidation, ActionSection,
    ActionType, ActionValidationRule, AllowedValues, ConditionDefinition, GroupFilter,
    LabelledValue, ListLength, LogicRule, LogicRuleValue, ParameterRequirement,
    ParameterVisibility,
};
pub use automation::{AutomationCondition, AutomationDefinition, AutomationEffect, EffectInputValue};
pub use common::{
    BlueprintIcon, Nullability, Status, TypeClass, ValueTypeReference, Visibility,
    default_type_classes,
};
pub use compute_module::{ComputeModuleDefinition, ContainerResourceConfig, ContainerResourceKind};
pub use interface::{
    InterfaceLink, InterfaceLinkCardinality, InterfaceLinkConstraint, InterfaceProperty,
    InterfacePropertyDefinition, InterfaceType, InterfaceTypeDefinition, LinkedEntityTypeId,
};
pub use link::{
    IntermediaryLink, IntermediarySide, LinkSide, LinkSideMetadata, LinkType,
    LinkTypeDefinition, ManyToManyLink, OneToManyCardinality, OneToManyLink,
};
pub use object::{
    InterfaceImplementation, InterfacePropertyMapping, ObjectDatasourceDefinition,
    ObjectSecurityPolicy, ObjectType, PropertySecurityGroup, SecurityCondition,
};
pub use property::{MarkingType, ObjectPropertyType, PropertyKind, StringOptions, StructField};
pub use shared_property::SharedPropertyType;
pub use value_type::{
    FailureMessage, ValueBaseType, ValueStructField, ValueTypeConstraint, ValueTypeDefinition,
};
