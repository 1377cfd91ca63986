//! Tool descriptions and argument schemas.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

/// Describes one tool to the model and, optionally, to the validator.
///
/// `parameters` is the JSON Schema advertised to the model in the wire
/// request. `schema` is an optional stricter runtime validator applied
/// to parsed arguments before dispatch; when absent, any JSON object
/// that parses is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name, matched against the model's function calls.
    pub name: String,
    /// Human-readable description shown to the model so it knows when
    /// to use this tool.
    pub description: String,
    /// JSON Schema describing the tool's expected input.
    pub parameters: Value,
    /// Optional runtime validation schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonSchema>,
}

impl ToolSpec {
    /// Creates a spec with the given name, description, and parameter
    /// schema, and no runtime validator.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            schema: None,
        }
    }

    /// Attaches a runtime validation schema, builder style.
    #[must_use]
    pub fn with_schema(mut self, schema: JsonSchema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// A JSON Schema document used for tool argument validation.
///
/// Wraps a [`serde_json::Value`] and provides validation via the
/// [`jsonschema`] crate. The inner value is private — use
/// [`as_value`](Self::as_value) for read access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema(Value);

impl JsonSchema {
    /// Creates a schema from a raw JSON value.
    pub fn new(schema: Value) -> Self {
        Self(schema)
    }

    /// Returns a reference to the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Validates `value` against this schema.
    ///
    /// Returns `Ok(())` if validation passes, or
    /// [`ChatError::SchemaValidation`] with details on failure. Returns
    /// [`ChatError::InvalidRequest`] if the schema itself is malformed.
    pub fn validate(&self, value: &Value) -> Result<(), ChatError> {
        let validator = jsonschema::validator_for(&self.0)
            .map_err(|e| ChatError::InvalidRequest(format!("invalid JSON schema: {e}")))?;
        let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChatError::SchemaValidation {
                message: errors.join("; "),
            })
        }
    }
}
