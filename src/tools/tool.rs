//! Tool trait and types.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ApiError, DispatchError, StoreError};
use crate::media::ContentBlock;

/// Error type for tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<ApiError> for ToolError {
    fn from(e: ApiError) -> Self {
        Self::ExternalService(e.to_string())
    }
}

impl From<StoreError> for ToolError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidBinding(reason) => Self::InvalidParameters(reason),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<ToolError> for DispatchError {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::InvalidParameters(msg) => Self::InvalidParams(msg),
            ToolError::ExecutionFailed(msg) | ToolError::ExternalService(msg) => {
                Self::Internal(msg)
            }
        }
    }
}

/// What `tools/list` reports for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// A named operation callable through `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name. Must satisfy `^[A-Za-z0-9_-]{1,64}$`.
    fn name(&self) -> &str;

    /// Get a description of what the tool does.
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError>;

    /// Get the listing entry for this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Deserialize tool arguments into a typed struct.
///
/// A missing `arguments` object is treated as `{}` so tools without required
/// parameters accept bare calls.
pub fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, ToolError> {
    let params = if params.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// Extract a required string parameter from a JSON object.
///
/// Returns `ToolError::InvalidParameters` if the key is missing or not a string.
pub fn require_str<'a>(params: &'a serde_json::Value, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{}' parameter", name)))
}

/// Lenient structural validation of a tool's `parameters_schema()`.
///
/// Returns a list of validation errors. An empty list means the schema is valid.
///
/// # Rules enforced
///
/// 1. Top-level must have `"type": "object"`
/// 2. Top-level must have `"properties"` as an object
/// 3. Every key in `"required"` must exist in `"properties"`
/// 4. Nested objects follow the same rules recursively
/// 5. Array properties must have `"items"` defined
pub fn validate_tool_schema(schema: &serde_json::Value, path: &str) -> Vec<String> {
    let mut errors = Vec::new();

    match schema.get("type").and_then(|t| t.as_str()) {
        Some("object") => {}
        Some(other) => {
            errors.push(format!("{path}: expected type \"object\", got \"{other}\""));
            return errors;
        }
        None => {
            errors.push(format!("{path}: missing \"type\": \"object\""));
            return errors;
        }
    }

    let properties = match schema.get("properties").and_then(|p| p.as_object()) {
        Some(p) => p,
        None => {
            errors.push(format!("{path}: missing or non-object \"properties\""));
            return errors;
        }
    };

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for req in required {
            if let Some(key) = req.as_str()
                && !properties.contains_key(key)
            {
                errors.push(format!(
                    "{path}: required key \"{key}\" not found in properties"
                ));
            }
        }
    }

    for (key, prop) in properties {
        let prop_path = format!("{path}.{key}");
        match prop.get("type").and_then(|t| t.as_str()) {
            Some("object") => errors.extend(validate_tool_schema(prop, &prop_path)),
            Some("array") => match prop.get("items") {
                Some(items) if items.get("type").and_then(|t| t.as_str()) == Some("object") => {
                    errors.extend(validate_tool_schema(items, &format!("{prop_path}.items")));
                }
                Some(_) => {}
                None => errors.push(format!("{prop_path}: array property missing \"items\"")),
            },
            _ => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple no-op tool for testing.
    #[derive(Debug)]
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes back the input message"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The message to echo back"
                    }
                },
                "required": ["message"]
            })
        }

        async fn execute(
            &self,
            params: serde_json::Value,
        ) -> Result<Vec<ContentBlock>, ToolError> {
            let message = require_str(&params, "message")?;
            Ok(vec![ContentBlock::text(message)])
        }
    }

    #[tokio::test]
    async fn test_echo_tool() {
        let result = EchoTool
            .execute(serde_json::json!({"message": "hello"}))
            .await
            .unwrap();
        assert_eq!(result, vec![ContentBlock::text("hello")]);
    }

    #[test]
    fn test_definition_serializes_input_schema_camel_case() {
        let json = serde_json::to_value(EchoTool.definition()).unwrap();
        assert_eq!(json["name"], "echo");
        assert_eq!(json["inputSchema"]["type"], "object");
    }

    #[test]
    fn test_require_str_missing() {
        let err = require_str(&serde_json::json!({}), "name").unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn test_parse_params_accepts_null_as_empty_object() {
        #[derive(Deserialize)]
        struct Params {
            #[serde(default)]
            limit: Option<usize>,
        }
        let params: Params = parse_params(serde_json::Value::Null).unwrap();
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_parse_params_reports_type_errors() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Params {
            id: String,
        }
        let err = parse_params::<Params>(serde_json::json!({"id": 5})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[test]
    fn test_tool_error_maps_to_dispatch_codes() {
        let invalid: DispatchError = ToolError::InvalidParameters("x".into()).into();
        assert_eq!(invalid.code(), -32602);
        let upstream: DispatchError = ToolError::ExternalService("boom".into()).into();
        assert_eq!(upstream.code(), -32603);
        assert!(upstream.to_string().contains("boom"));
    }

    #[test]
    fn test_validate_schema_required_not_in_properties() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name", "age"]
        });
        let errors = validate_tool_schema(&schema, "test");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"age\" not found in properties"));
    }

    #[test]
    fn test_validate_schema_array_missing_items() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "inputs": { "type": "array" } }
        });
        let errors = validate_tool_schema(&schema, "test");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("array property missing \"items\""));
    }
}
