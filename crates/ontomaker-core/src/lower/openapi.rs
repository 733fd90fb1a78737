//! OpenAPI 3 server description to compute-module endpoint spec.
//!
//! Conversion never stops at the first problem: every validation error is collected and the
//! whole document is rejected at the end with all of them joined.

use serde_json::{Map, Value, json};
use url::Url;

use crate::error::{MakerError, Result};
use crate::wire::tagged;

const DEFAULT_PORT: i64 = -1;
const SERVER_HOSTNAME: &str = "localhost";
const BODY_INPUT_NAME: &str = "body";

/// Converts the JSON text of an OpenAPI document into `{queriesToEndpoints, specFileContents}`.
///
/// `specFileContents` carries `contents` verbatim.
pub fn convert_open_api_to_function_spec(contents: &str) -> Result<Value> {
    let open_api: Value = serde_json::from_str(contents).map_err(|err| {
        MakerError::Validation(format!("Could not parse OpenAPI spec: {err}"))
    })?;
    let mut conversion = Conversion::default();
    let port = conversion.port(open_api.get("servers"));

    let mut queries_to_endpoints = Map::new();
    if let Some(paths) = open_api.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                conversion.error("No path item defined");
                continue;
            };
            for (method, operation) in item {
                if method == "parameters" || method == "$ref" || operation.is_null() {
                    continue;
                }
                let (key, endpoint) =
                    conversion.endpoint(&method.to_ascii_uppercase(), path, port, operation);
                queries_to_endpoints.insert(key, endpoint);
            }
        }
    }

    if !conversion.errors.is_empty() {
        return Err(MakerError::Validation(format!(
            "There were validation errors: {}",
            conversion.errors.join(", ")
        )));
    }
    Ok(json!({
        "queriesToEndpoints": queries_to_endpoints,
        "specFileContents": [contents],
    }))
}

#[derive(Debug, Default)]
struct Conversion {
    errors: Vec<String>,
}

impl Conversion {
    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn port(&mut self, servers: Option<&Value>) -> i64 {
        let servers = servers.and_then(Value::as_array);
        let Some([server]) = servers.map(Vec::as_slice) else {
            self.error("Must specify exactly one server");
            return DEFAULT_PORT;
        };
        let Some(url) = server.get("url").and_then(Value::as_str).filter(|url| !url.is_empty())
        else {
            self.error("Server does not specify a URL");
            return DEFAULT_PORT;
        };
        let Ok(url) = Url::parse(url) else {
            self.error("Server URL is malformed");
            return DEFAULT_PORT;
        };
        // `port()` is empty for the scheme's default port as well.
        let Some(port) = url.port() else {
            self.error("Server URL must specify a port number");
            return DEFAULT_PORT;
        };
        if url.host_str() != Some(SERVER_HOSTNAME) {
            self.errors
                .push(format!("Server URL host must be {SERVER_HOSTNAME}"));
        } else if url.path() != "/" {
            self.error("Server URL cannot specify context path");
        }
        i64::from(port)
    }

    fn endpoint(&mut self, method: &str, path: &str, port: i64, operation: &Value) -> (String, Value) {
        let parameters = operation
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let (mut inputs, headers, query_parameters) = self.parameters(parameters);
        let body = operation
            .get("requestBody")
            .and_then(|request| request.get("content"))
            .and_then(|content| self.schema_from_content(content))
            .map(|schema| {
                inputs.push(json!({
                    "dataType": self.data_type(schema),
                    "name": BODY_INPUT_NAME,
                    "required": true,
                }));
                tagged(
                    "jsonStringBody",
                    json!({ "jsonString": [tagged("inputParameterName", json!(BODY_INPUT_NAME))] }),
                )
            });

        let key = match operation.get("operationId").and_then(Value::as_str) {
            Some(operation_id) if !operation_id.is_empty() => operation_id.to_string(),
            _ => {
                self.error("Missing operationId");
                format!("{method} {path}")
            }
        };

        let mut endpoint = Map::new();
        endpoint.insert(
            "endpoint".to_string(),
            tagged(
                "httpEndpoint",
                json!({
                    "body": body,
                    "headers": headers,
                    "httpMethod": self.http_method(method),
                    "path": path_parts(path),
                    "port": port,
                    "queryParameters": query_parameters,
                }),
            ),
        );
        endpoint.insert("inputs".to_string(), Value::Array(inputs));
        if let Some(output) = self.output(operation.get("responses")) {
            endpoint.insert("output".to_string(), output);
        }
        (key, Value::Object(endpoint))
    }

    fn http_method(&mut self, method: &str) -> Value {
        let method = match method {
            "POST" | "GET" | "PUT" | "DELETE" => method,
            "PATCH" | "HEAD" | "OPTIONS" | "TRACE" => {
                self.error("Invalid HTTP method");
                "GET"
            }
            _ => {
                self.error("Unsupported HTTP method");
                "GET"
            }
        };
        tagged("static", json!(method))
    }

    fn parameters(&mut self, parameters: &[Value]) -> (Vec<Value>, Map<String, Value>, Map<String, Value>) {
        let mut inputs = Vec::new();
        let mut headers = Map::new();
        let mut query_parameters = Map::new();
        for parameter in parameters {
            let location = parameter.get("in").and_then(Value::as_str);
            let name = parameter.get("name").and_then(Value::as_str);
            let schema = parameter.get("schema").filter(|schema| !schema.is_null());
            let (Some(location), Some(name), Some(schema)) = (location, name, schema) else {
                self.error("Param missing in/name/schema field");
                continue;
            };
            let required = parameter.get("required").and_then(Value::as_bool) != Some(false);
            inputs.push(json!({
                "dataType": self.data_type(schema),
                "name": name,
                "required": required,
            }));
            let part = json!([tagged("inputParameterName", json!(name))]);
            match location {
                "header" => {
                    headers.insert(name.to_string(), part);
                }
                "query" => {
                    query_parameters.insert(name.to_string(), part);
                }
                // Path parameters are already spliced into the path template.
                "path" => {}
                _ => self.error("Unsupported parameter location"),
            }
        }
        (inputs, headers, query_parameters)
    }

    fn schema_from_content<'a>(&mut self, content: &'a Value) -> Option<&'a Value> {
        let media_type = content.as_object().and_then(|content| {
            content
                .iter()
                .find(|(mime, _)| mime.eq_ignore_ascii_case("application/json"))
                .map(|(_, media_type)| media_type)
        });
        let Some(media_type) = media_type else {
            self.error("No content matching 'application/json'");
            return None;
        };
        let schema = media_type.get("schema").filter(|schema| !schema.is_null());
        if schema.is_none() {
            self.error("Media type missing 'schema' field");
        }
        schema
    }

    fn output(&mut self, responses: Option<&Value>) -> Option<Value> {
        let responses = responses.and_then(Value::as_object)?;
        if responses.len() > 1 {
            self.error("Operation can have at most one response definition");
        }
        let content = responses.values().next()?.get("content")?;
        let schema = self.schema_from_content(content)?;
        Some(tagged(
            "single",
            json!({ "dataType": self.data_type(schema), "description": null }),
        ))
    }

    fn data_type(&mut self, schema: &Value) -> Value {
        let declared = schema.get("type").and_then(Value::as_str).or_else(|| {
            match schema.get("types").and_then(Value::as_array).map(Vec::as_slice) {
                Some([single]) => single.as_str(),
                _ => None,
            }
        });
        let kind = declared.unwrap_or_else(|| {
            self.error("Schema does not specify a single type");
            "integer"
        });
        match kind {
            "boolean" => json!({ "type": "boolean" }),
            "number" => json!({ "type": "double" }),
            "string" => json!({ "type": "string", "string": {} }),
            "integer" => json!({ "type": "integer" }),
            "array" => match schema.get("items").filter(|items| !items.is_null()) {
                Some(items) => tagged("list", self.data_type(items)),
                None => {
                    self.error("Array schema missing items definition");
                    json!({ "type": "string" })
                }
            },
            "object" => {
                let mut fields = Map::new();
                if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                    for (name, property) in properties {
                        fields.insert(name.clone(), self.data_type(property));
                    }
                }
                tagged(
                    "anonymousCustomType",
                    json!({ "fieldMetadata": null, "fields": fields }),
                )
            }
            _ => {
                self.error("Unsupported schema type");
                json!({ "type": "string" })
            }
        }
    }
}

/// `/a/{b}` becomes `["/", "a", "/", <input b>]` as string parts.
fn path_parts(path: &str) -> Vec<Value> {
    let mut parts = Vec::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        parts.push(tagged("stringValue", json!("/")));
        match segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) => parts.push(tagged("inputParameterName", json!(name))),
            None => parts.push(tagged("stringValue", json!(segment))),
        }
    }
    parts
}
