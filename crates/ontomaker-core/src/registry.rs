use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::{
    ActionType, AutomationDefinition, ComputeModuleDefinition, InterfaceProperty, InterfaceType,
    LinkType, ObjectType, SharedPropertyType, ValueTypeDefinition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OntologyEntityKind {
    ObjectType,
    LinkType,
    InterfaceType,
    SharedPropertyType,
    ActionType,
    ValueType,
    Automation,
    ComputeModuleType,
}

impl OntologyEntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ObjectType => "OBJECT_TYPE",
            Self::LinkType => "LINK_TYPE",
            Self::InterfaceType => "INTERFACE_TYPE",
            Self::SharedPropertyType => "SHARED_PROPERTY_TYPE",
            Self::ActionType => "ACTION_TYPE",
            Self::ValueType => "VALUE_TYPE",
            Self::Automation => "AUTOMATION",
            Self::ComputeModuleType => "COMPUTE_MODULE_TYPE",
        }
    }

    /// Whether entities of this kind may come from another package.
    #[must_use]
    pub const fn is_importable(self) -> bool {
        matches!(
            self,
            Self::ObjectType
                | Self::LinkType
                | Self::InterfaceType
                | Self::SharedPropertyType
                | Self::ActionType
        )
    }
}

impl fmt::Display for OntologyEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered record, discriminated by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum OntologyEntity {
    ObjectType(ObjectType),
    LinkType(LinkType),
    InterfaceType(InterfaceType),
    SharedPropertyType(SharedPropertyType),
    ActionType(ActionType),
    ValueType(ValueTypeDefinition),
    Automation(AutomationDefinition),
    ComputeModule(ComputeModuleDefinition),
}

impl OntologyEntity {
    #[must_use]
    pub const fn kind(&self) -> OntologyEntityKind {
        match self {
            Self::ObjectType(_) => OntologyEntityKind::ObjectType,
            Self::LinkType(_) => OntologyEntityKind::LinkType,
            Self::InterfaceType(_) => OntologyEntityKind::InterfaceType,
            Self::SharedPropertyType(_) => OntologyEntityKind::SharedPropertyType,
            Self::ActionType(_) => OntologyEntityKind::ActionType,
            Self::ValueType(_) => OntologyEntityKind::ValueType,
            Self::Automation(_) => OntologyEntityKind::Automation,
            Self::ComputeModule(_) => OntologyEntityKind::ComputeModuleType,
        }
    }

    /// Registry key: the API name, or the id for links.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::ObjectType(entity) => &entity.api_name,
            Self::LinkType(entity) => &entity.id,
            Self::InterfaceType(entity) => &entity.api_name,
            Self::SharedPropertyType(entity) => &entity.api_name,
            Self::ActionType(entity) => &entity.api_name,
            Self::ValueType(entity) => &entity.api_name,
            Self::Automation(entity) => &entity.api_name,
            Self::ComputeModule(entity) => &entity.api_name,
        }
    }
}

/// Every entity declared during one compilation, keyed by kind then registry key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OntologyDefinition {
    pub object_types: BTreeMap<String, ObjectType>,
    pub link_types: BTreeMap<String, LinkType>,
    pub interface_types: BTreeMap<String, InterfaceType>,
    pub shared_property_types: BTreeMap<String, SharedPropertyType>,
    pub action_types: BTreeMap<String, ActionType>,
    /// Versions in registration order.
    pub value_types: BTreeMap<String, Vec<ValueTypeDefinition>>,
    pub automations: BTreeMap<String, AutomationDefinition>,
    pub compute_modules: BTreeMap<String, ComputeModuleDefinition>,
}

impl OntologyDefinition {
    /// Stores `entity`, replacing any record with the same key. Value types append instead.
    pub fn register(&mut self, entity: OntologyEntity) {
        match entity {
            OntologyEntity::ObjectType(entity) => {
                self.object_types.insert(entity.api_name.clone(), entity);
            }
            OntologyEntity::LinkType(entity) => {
                self.link_types.insert(entity.id.clone(), entity);
            }
            OntologyEntity::InterfaceType(entity) => {
                self.interface_types.insert(entity.api_name.clone(), entity);
            }
            OntologyEntity::SharedPropertyType(entity) => {
                self.shared_property_types
                    .insert(entity.api_name.clone(), entity);
            }
            OntologyEntity::ActionType(entity) => {
                self.action_types.insert(entity.api_name.clone(), entity);
            }
            OntologyEntity::ValueType(entity) => {
                self.value_types
                    .entry(entity.api_name.clone())
                    .or_default()
                    .push(entity);
            }
            OntologyEntity::Automation(entity) => {
                self.automations.insert(entity.api_name.clone(), entity);
            }
            OntologyEntity::ComputeModule(entity) => {
                self.compute_modules.insert(entity.api_name.clone(), entity);
            }
        }
    }

    #[must_use]
    pub fn count(&self, kind: OntologyEntityKind) -> usize {
        match kind {
            OntologyEntityKind::ObjectType => self.object_types.len(),
            OntologyEntityKind::LinkType => self.link_types.len(),
            OntologyEntityKind::InterfaceType => self.interface_types.len(),
            OntologyEntityKind::SharedPropertyType => self.shared_property_types.len(),
            OntologyEntityKind::ActionType => self.action_types.len(),
            OntologyEntityKind::ValueType => self.value_types.values().map(Vec::len).sum(),
            OntologyEntityKind::Automation => self.automations.len(),
            OntologyEntityKind::ComputeModuleType => self.compute_modules.len(),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        ALL_KINDS.iter().map(|kind| self.count(*kind)).sum()
    }

    #[must_use]
    pub fn value_type_version(&self, api_name: &str, version: &str) -> Option<&ValueTypeDefinition> {
        self.value_types
            .get(api_name)?
            .iter()
            .find(|candidate| candidate.version == version)
    }
}

/// Read-only view resolving names against local entities first, then imported ones.
#[derive(Debug, Clone, Copy)]
pub struct EntityLookup<'a> {
    local: &'a OntologyDefinition,
    imported: &'a OntologyDefinition,
}

impl<'a> EntityLookup<'a> {
    #[must_use]
    pub const fn new(local: &'a OntologyDefinition, imported: &'a OntologyDefinition) -> Self {
        Self { local, imported }
    }

    #[must_use]
    pub const fn local(&self) -> &'a OntologyDefinition {
        self.local
    }

    #[must_use]
    pub const fn imported(&self) -> &'a OntologyDefinition {
        self.imported
    }

    #[must_use]
    pub fn object_type(&self, api_name: &str) -> Option<&'a ObjectType> {
        self.local
            .object_types
            .get(api_name)
            .or_else(|| self.imported.object_types.get(api_name))
    }

    #[must_use]
    pub fn link_type(&self, id: &str) -> Option<&'a LinkType> {
        self.local
            .link_types
            .get(id)
            .or_else(|| self.imported.link_types.get(id))
    }

    #[must_use]
    pub fn interface_type(&self, api_name: &str) -> Option<&'a InterfaceType> {
        self.local
            .interface_types
            .get(api_name)
            .or_else(|| self.imported.interface_types.get(api_name))
    }

    #[must_use]
    pub fn shared_property_type(&self, api_name: &str) -> Option<&'a SharedPropertyType> {
        self.local
            .shared_property_types
            .get(api_name)
            .or_else(|| self.imported.shared_property_types.get(api_name))
    }

    #[must_use]
    pub fn action_type(&self, api_name: &str) -> Option<&'a ActionType> {
        self.local
            .action_types
            .get(api_name)
            .or_else(|| self.imported.action_types.get(api_name))
    }

    /// Shared property types of `interface` and every interface it extends, keyed by API name.
    ///
    /// Extended interfaces override the declaring interface, later parents override earlier ones.
    #[must_use]
    pub fn all_interface_properties(
        &self,
        interface: &'a InterfaceType,
    ) -> BTreeMap<String, &'a InterfaceProperty> {
        self.collect_interface_properties(interface, &mut Vec::new())
    }

    fn collect_interface_properties(
        &self,
        interface: &'a InterfaceType,
        ancestry: &mut Vec<&'a str>,
    ) -> BTreeMap<String, &'a InterfaceProperty> {
        if ancestry.contains(&interface.api_name.as_str()) {
            return BTreeMap::new();
        }
        ancestry.push(&interface.api_name);
        let mut properties = interface
            .properties
            .iter()
            .map(|(api_name, property)| (api_name.clone(), property))
            .collect::<BTreeMap<_, _>>();
        for parent in &interface.extends_interfaces {
            if let Some(parent) = self.interface_type(parent) {
                properties.extend(self.collect_interface_properties(parent, ancestry));
            }
        }
        ancestry.pop();
        properties
    }
}

pub const ALL_KINDS: [OntologyEntityKind; 8] = [
    OntologyEntityKind::ObjectType,
    OntologyEntityKind::LinkType,
    OntologyEntityKind::InterfaceType,
    OntologyEntityKind::SharedPropertyType,
    OntologyEntityKind::ActionType,
    OntologyEntityKind::ValueType,
    OntologyEntityKind::Automation,
    OntologyEntityKind::ComputeModuleType,
];
