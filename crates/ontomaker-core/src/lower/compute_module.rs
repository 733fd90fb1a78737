use serde_json::{Map, Value, json};

use super::openapi::convert_open_api_to_function_spec;
use crate::error::{MakerError, Result};
use crate::model::{ComputeModuleDefinition, ContainerResourceConfig, ContainerResourceKind};
use crate::registry::OntologyDefinition;
use crate::wire::{empty_tagged, tagged};

const ARTIFACTS_REPO_RID: &str = "ri.redacted.redacted.redacted.redacted";
const RUNTIME: &str = "COMPUTE_MODULE_RUNTIME_V1";

/// Deployed-app block data for every registered compute module, keyed by API name.
pub fn lower_compute_modules(definition: &OntologyDefinition) -> Result<Value> {
    let mut block_data = Map::new();
    for module in definition.compute_modules.values() {
        tracing::debug!(api_name = %module.api_name, "lowering compute module");
        block_data.insert(module.api_name.clone(), lower_compute_module(module)?);
    }
    Ok(Value::Object(block_data))
}

fn lower_compute_module(module: &ComputeModuleDefinition) -> Result<Value> {
    let tag = module.container_version().ok_or_else(|| {
        MakerError::Validation(format!(
            "container name must have version at the end: {}",
            module.container
        ))
    })?;

    let open_api = match &module.open_api {
        Value::String(contents) => contents.clone(),
        document => serde_json::to_string(document)?,
    };
    let server_endpoints_spec = convert_open_api_to_function_spec(&open_api)?;
    let number_of_functions = server_endpoints_spec
        .get("queriesToEndpoints")
        .and_then(Value::as_object)
        .map_or(0, Map::len);

    let resources = module
        .resource_config
        .iter()
        .map(lower_resource)
        .collect::<Vec<_>>();
    let container = json!({
        "additionalConfig": {
            "arguments": [],
            "commands": [],
            "env": [],
            "ports": [],
            "resources": resources,
            "volumeMounts": [],
        },
        "image": {
            "imagePullMetadata": tagged(
                "foundryArtifacts",
                json!({ "artifactsRepoRid": ARTIFACTS_REPO_RID }),
            ),
            "name": module.container,
            "tagOrDigest": tagged("tag", json!(tag)),
        },
        "name": module.container,
    });

    Ok(json!({
        "computationParameters": tagged("computationParamsV1", json!({
            "authMode": module.auth_mode,
            "computeModuleInputs": [],
            "computeModuleInputsV2": [],
            "computeModuleOutputs": [],
            "computeModuleOutputsV2": [],
            "externalSources": [],
            "foundryContainerizedApplication": {
                "containers": [container],
                "volumes": [],
            },
            "foundryDataAccess": false,
            "runtime": RUNTIME,
            "securityScopes": [],
            "serverEndpointsSpec": server_endpoints_spec,
            "telemetrySessionTags": [],
        })),
        "numberOfFunctionsRegistered": number_of_functions,
        "runtimeParameters": tagged("runtimeParamsV1", json!({
            "foundryServiceAccess": [],
            "networkPolicies": [],
            "scalingConfig": module.scaling_config,
        })),
    }))
}

fn lower_resource(resource: &ContainerResourceConfig) -> Value {
    let kind = match resource.kind {
        ContainerResourceKind::Cpu => "cpu",
        ContainerResourceKind::Memory => "memory",
        ContainerResourceKind::Gpu => "gpu",
    };
    let mut wire = Map::new();
    if let Some(limit) = &resource.limit {
        wire.insert("limit".to_string(), json!(limit));
    }
    wire.insert("request".to_string(), json!(resource.request));
    wire.insert("resourceType".to_string(), empty_tagged(kind));
    Value::Object(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OntologyEntity;

    fn module(raw: Value) -> ComputeModuleDefinition {
        serde_json::from_value(raw).expect("compute module")
    }

    fn open_api() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "scorer", "version": "1.0.0"},
            "servers": [{"url": "http://localhost:5000"}],
            "paths": {
                "/health": {"get": {"operationId": "health"}},
                "/score": {"post": {
                    "operationId": "score",
                    "requestBody": {"content": {"application/json": {"schema": {"type": "string"}}}},
                    "responses": {"200": {"content": {"application/json": {"schema": {"type": "number"}}}}}
                }}
            }
        })
    }

    #[test]
    fn module_lowers_to_deployed_app_block_data() {
        let mut definition = OntologyDefinition::default();
        definition.register(OntologyEntity::ComputeModule(module(json!({
            "apiName": "scorer",
            "container": "scorer-image:0.4.1",
            "scalingConfig": {"minReplicas": 1},
            "resourceConfig": [
                {"type": "cpu", "request": "1", "limit": "2"},
                {"type": "memory", "request": "512Mi"}
            ],
            "openApi": open_api()
        }))));

        let block_data = lower_compute_modules(&definition).expect("lowered");
        let scorer = &block_data["scorer"];
        assert_eq!(scorer["numberOfFunctionsRegistered"], 2);
        assert_eq!(
            scorer["runtimeParameters"],
            json!({"type": "runtimeParamsV1", "runtimeParamsV1": {
                "foundryServiceAccess": [],
                "networkPolicies": [],
                "scalingConfig": {"minReplicas": 1},
            }})
        );

        let params = &scorer["computationParameters"]["computationParamsV1"];
        assert_eq!(params["authMode"], "PIPELINE");
        assert_eq!(params["runtime"], RUNTIME);
        let container = &params["foundryContainerizedApplication"]["containers"][0];
        assert_eq!(container["name"], "scorer-image:0.4.1");
        assert_eq!(container["image"]["name"], "scorer-image:0.4.1");
        assert_eq!(
            container["image"]["tagOrDigest"],
            json!({"type": "tag", "tag": "0.4.1"})
        );
        assert_eq!(
            container["additionalConfig"]["resources"],
            json!([
                {"limit": "2", "request": "1", "resourceType": {"type": "cpu", "cpu": {}}},
                {"request": "512Mi", "resourceType": {"type": "memory", "memory": {}}},
            ])
        );
        assert!(
            params["serverEndpointsSpec"]["queriesToEndpoints"]
                .get("health")
                .is_some()
        );
    }

    #[test]
    fn invalid_open_api_fails_lowering() {
        let mut broken = open_api();
        broken["servers"] = json!([{"url": "http://localhost:5000/v1"}]);
        let mut definition = OntologyDefinition::default();
        definition.register(OntologyEntity::ComputeModule(module(json!({
            "apiName": "scorer",
            "container": "scorer-image:0.4.1",
            "openApi": broken
        }))));

        let err = lower_compute_modules(&definition).expect_err("context path must fail");
        assert!(matches!(
            err,
            MakerError::Validation(message) if message.contains("Server URL cannot specify context path")
        ));
    }

    #[test]
    fn string_open_api_is_kept_verbatim() {
        let contents = serde_json::to_string_pretty(&open_api()).expect("serialize");
        let mut definition = OntologyDefinition::default();
        definition.register(OntologyEntity::ComputeModule(module(json!({
            "apiName": "scorer",
            "container": "registry.local:5000/scorer:1.0.0",
            "openApi": contents
        }))));

        let block_data = lower_compute_modules(&definition).expect("lowered");
        let params = &block_data["scorer"]["computationParameters"]["computationParamsV1"];
        assert_eq!(params["serverEndpointsSpec"]["specFileContents"], json!([contents]));
        let container = &params["foundryContainerizedApplication"]["containers"][0];
        assert_eq!(container["name"], "registry.local:5000/scorer:1.0.0");
        assert_eq!(container["image"]["tagOrDigest"]["tag"], "1.0.0");
    }

    #[test]
    fn no_modules_lowers_to_empty_object() {
        assert_eq!(
            lower_compute_modules(&OntologyDefinition::default()).expect("lowered"),
            json!({})
        );
    }
}
