//! Serialized shape of a tool dispatch result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of one tool dispatch, as recorded in the conversation.
///
/// Serializes untagged: a success is the handler's raw JSON value, and
/// a failure is `{"error": "...", "toolName": "..."}`. The model sees
/// both shapes as tool-message content and can react to either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    /// The handler's failure, timeout, or dispatch error.
    ///
    /// Listed before `Ok` so deserialization prefers the error shape
    /// when both match.
    Err {
        /// Human-readable failure description.
        error: String,
        /// The tool that failed.
        #[serde(rename = "toolName")]
        tool_name: String,
    },
    /// The handler's return value, verbatim.
    Ok(Value),
}

impl ToolOutcome {
    /// Creates a failure outcome for the named tool.
    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Err {
            error: error.into(),
            tool_name: tool_name.into(),
        }
    }

    /// Returns the outcome as a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ok(value) => value.clone(),
            Self::Err { error, tool_name } => serde_json::json!({
                "error": error,
                "toolName": tool_name,
            }),
        }
    }

    /// Serializes the outcome for use as tool-message content.
    pub fn to_content(&self) -> String {
        self.to_value().to_string()
    }
}
