use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerResourceKind {
    Cpu,
    Memory,
    Gpu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerResourceConfig {
    #[serde(rename = "type")]
    pub kind: ContainerResourceKind,
    pub request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComputeModuleDefinition {
    pub api_name: String,
    /// Image reference; must end in `:<tag>`.
    pub container: String,
    #[serde(default = "default_scaling_config")]
    pub scaling_config: Value,
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,
    #[serde(default)]
    pub resource_config: Vec<ContainerResourceConfig>,
    /// OpenAPI 3 document describing the module's HTTP server, inline or as JSON text.
    pub open_api: Value,
}

fn default_scaling_config() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_auth_mode() -> String {
    "PIPELINE".to_string()
}

impl ComputeModuleDefinition {
    /// The tag after the last `:` of the container reference.
    #[must_use]
    pub fn container_version(&self) -> Option<&str> {
        let (name, tag) = self.container.rsplit_once(':')?;
        (!name.is_empty() && !tag.is_empty() && !tag.contains('/')).then_some(tag)
    }
}
