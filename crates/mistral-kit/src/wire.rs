//! Chat-completions request types.
//!
//! These structs serialize to the exact JSON shape the chat-completions
//! endpoint expects. [`build_request`] converts engine history into that
//! shape, prepending the optional system prompt and translating
//! registered tool specs into wire tool definitions.

use serde::Serialize;
use serde_json::Value;

use crate::chat::{ChatMessage, Role, ToolCallRequest};
use crate::tool::ToolSpec;

/// A chat-completions API request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. `"mistral-medium-latest"`.
    pub model: String,
    /// Full conversation history in wire order.
    pub messages: Vec<WireMessage>,
    /// Tool definitions offered to the model.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    /// `"auto"` whenever tools are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    /// Whether to request a streamed (SSE) response.
    pub stream: bool,
}

/// One message in a wire request.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    /// `"system"`, `"user"`, `"assistant"`, or `"tool"`.
    pub role: Role,
    /// Text content. Serialized as `null` when the message carries only
    /// tool calls.
    pub content: Option<String>,
    /// Present on tool-result messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Present on assistant messages that requested tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// A tool call echoed back in an assistant wire message.
#[derive(Debug, Clone, Serialize)]
pub struct WireToolCall {
    /// Provider-assigned call id, empty if none was given.
    pub id: String,
    /// Call kind, `"function"`.
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function that was invoked.
    pub function: WireFunctionCall,
}

/// The function half of an echoed tool call.
#[derive(Debug, Clone, Serialize)]
pub struct WireFunctionCall {
    /// Tool name.
    pub name: String,
    /// JSON-encoded argument string, verbatim.
    pub arguments: String,
}

/// A tool definition in the request body.
#[derive(Debug, Clone, Serialize)]
pub struct WireTool {
    /// Definition kind, `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function being offered.
    pub function: WireToolFunction,
}

/// The function half of a tool definition.
#[derive(Debug, Clone, Serialize)]
pub struct WireToolFunction {
    /// Tool name the model will call.
    pub name: String,
    /// Natural-language description shown to the model.
    pub description: String,
    /// JSON Schema for the arguments.
    pub parameters: Value,
}

/// Fallback schema for tools that declare no parameters.
fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Builds a wire request from engine history.
///
/// The system prompt, when present, is prepended as the first message.
/// Assistant messages that requested tool calls serialize their calls
/// verbatim so the model sees the pairing it produced; a call that
/// arrived without an id is given an empty one (the engine synthesizes
/// real ids for the matching tool messages before this point).
pub fn build_request(
    model: &str,
    system_prompt: Option<&str>,
    history: &[ChatMessage],
    tool_specs: &[ToolSpec],
    stream: bool,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if let Some(system) = system_prompt {
        messages.push(WireMessage {
            role: Role::System,
            content: Some(system.to_string()),
            tool_call_id: None,
            tool_calls: None,
        });
    }
    for msg in history {
        messages.push(WireMessage {
            role: msg.role,
            content: msg.content.clone(),
            tool_call_id: msg.tool_call_id.clone(),
            tool_calls: if msg.tool_calls.is_empty() {
                None
            } else {
                Some(msg.tool_calls.iter().map(wire_tool_call).collect())
            },
        });
    }

    let tools: Vec<WireTool> = tool_specs
        .iter()
        .map(|spec| WireTool {
            tool_type: "function".to_string(),
            function: WireToolFunction {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: if spec.parameters.is_null() {
                    empty_object_schema()
                } else {
                    spec.parameters.clone()
                },
            },
        })
        .collect();

    let tool_choice = (!tools.is_empty()).then(|| "auto".to_string());

    ChatRequest {
        model: model.to_string(),
        messages,
        tools,
        tool_choice,
        stream,
    }
}

fn wire_tool_call(call: &ToolCallRequest) -> WireToolCall {
    WireToolCall {
        id: call.id.clone().unwrap_or_default(),
        call_type: call
            .call_type
            .clone()
            .unwrap_or_else(|| "function".to_string()),
        function: WireFunctionCall {
            name: call.function.name.clone(),
            arguments: call.function.arguments.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::FunctionCall;

    fn spec(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.into(),
            description: format!("{name} tool"),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {"q": {"type": "string"}}
            }),
            schema: None,
        }
    }

    #[test]
    fn test_system_prompt_prepended() {
        let history = vec![ChatMessage::user("hi")];
        let req = build_request("m", Some("be brief"), &history, &[], false);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].content.as_deref(), Some("be brief"));
    }

    #[test]
    fn test_no_system_prompt() {
        let history = vec![ChatMessage::user("hi")];
        let req = build_request("m", None, &history, &[], false);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
    }

    #[test]
    fn test_tool_choice_auto_when_tools_present() {
        let req = build_request("m", None, &[], &[spec("calculator")], true);
        assert_eq!(req.tool_choice.as_deref(), Some("auto"));
        assert_eq!(req.tools.len(), 1);
        assert_eq!(req.tools[0].tool_type, "function");
    }

    #[test]
    fn test_tool_choice_absent_without_tools() {
        let req = build_request("m", None, &[], &[], true);
        assert!(req.tool_choice.is_none());
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }

    #[test]
    fn test_null_parameters_default_to_empty_object() {
        let bare = ToolSpec {
            name: "ping".into(),
            description: "ping".into(),
            parameters: Value::Null,
            schema: None,
        };
        let req = build_request("m", None, &[], &[bare], false);
        assert_eq!(
            req.tools[0].function.parameters,
            serde_json::json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_assistant_tool_calls_serialized() {
        let mut assistant = ChatMessage::assistant("");
        assistant.tool_calls = vec![ToolCallRequest {
            id: Some("call_1".into()),
            call_type: Some("function".into()),
            function: FunctionCall {
                name: "get_date".into(),
                arguments: "{}".into(),
            },
        }];
        let req = build_request("m", None, &[assistant], &[], false);
        let calls = req.messages[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].function.name, "get_date");
    }

    #[test]
    fn test_wire_json_field_names() {
        let req = build_request(
            "mistral-medium-latest",
            None,
            &[ChatMessage::user("hi")],
            &[spec("search_docs")],
            true,
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "mistral-medium-latest");
        assert_eq!(json["stream"], true);
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "search_docs");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
