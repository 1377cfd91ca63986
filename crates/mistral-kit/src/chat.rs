//! Conversation message types.
//!
//! [`ChatMessage`] is the unit of conversation history. Every message
//! carries a stable unique `id` assigned at construction; the engine
//! relies on those ids to update streaming placeholders in place and
//! [`MessageOrder`](crate::ordering::MessageOrder) relies on them to
//! assign display sequence numbers.
//!
//! Serialization uses camelCase field names so snapshots round-trip with
//! the JSON shape other clients of the same API produce.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that shape model behavior.
    System,
    /// End-user input.
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// The result of a tool invocation.
    Tool,
}

/// A single message in conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Stable unique identifier, assigned once at construction.
    pub id: String,
    /// Who authored this message.
    pub role: Role,
    /// Text content. `None` when the message only carries tool-call
    /// metadata.
    pub content: Option<String>,
    /// Optional human-facing alternative to `content` (e.g. the prompt
    /// before attachment context was appended).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_content: Option<String>,
    /// Files associated with this message. Informational only; the
    /// engine never branches on attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<ChatAttachment>,
    /// Name of the tool that produced this result. Tool messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Id of the tool call this message answers. Tool messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool invocations requested by the model. Assistant messages only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatMessage {
    fn base(role: Role, content: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            display_content: None,
            attachments: Vec::new(),
            tool_name: None,
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::base(Role::User, Some(content.into()))
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::base(Role::System, Some(content.into()))
    }

    /// Creates an assistant message with the given content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::base(Role::Assistant, Some(content.into()))
    }

    /// Creates an empty assistant message to serve as a streaming target.
    ///
    /// The engine appends this before calling the transport so streamed
    /// deltas have a stable id to attach to.
    pub fn assistant_placeholder() -> Self {
        Self::base(Role::Assistant, Some(String::new()))
    }

    /// Creates a tool-result message linked to a tool call.
    pub fn tool_result(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut msg = Self::base(Role::Tool, Some(content.into()));
        msg.tool_name = Some(tool_name.into());
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    /// Attaches a display-content override, builder style.
    #[must_use]
    pub fn with_display_content(mut self, display: impl Into<String>) -> Self {
        self.display_content = Some(display.into());
        self
    }

    /// Attaches file metadata, builder style.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<ChatAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// Metadata about a file associated with a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    /// Original file name.
    pub file_name: String,
    /// Number of chunks the file was split into, if it was chunked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    /// Arbitrary extra metadata.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

/// A tool invocation requested by the model.
///
/// `function.arguments` is kept as the raw JSON-encoded string exactly
/// as it arrived on the wire; the engine parses it at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id. May be absent on some backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Call kind, `"function"` for every current backend.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    /// The function to invoke.
    pub function: FunctionCall,
}

/// The function half of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Registered tool name.
    pub name: String,
    /// JSON-encoded argument object, verbatim from the wire.
    pub arguments: String,
}
