//! Tool error type.

/// Error returned by tool execution.
///
/// Tool failures never abort the conversation; the engine serializes
/// them into error tool-result messages so the model can react.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Human-readable error description.
    pub message: String,
}

impl ToolError {
    /// Creates a new tool error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
