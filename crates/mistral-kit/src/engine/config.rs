//! Engine configuration.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::chat::ChatMessage;

/// Telemetry callback fired after each tool dispatch completes,
/// successfully or not, with `(tool_name, args, result)`.
pub type ToolObserverFn = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Subscription callback fired with a history snapshot after every
/// mutation. UI layers use this instead of polling
/// [`ChatEngine::messages`](super::ChatEngine::messages).
pub type UpdateFn = Arc<dyn Fn(&[ChatMessage]) + Send + Sync>;

/// Configuration for a [`ChatEngine`](super::ChatEngine).
///
/// Use struct-update syntax for concise construction:
///
/// ```rust
/// use mistral_kit::engine::EngineConfig;
///
/// let config = EngineConfig {
///     system_prompt: Some("You are terse.".into()),
///     max_turns: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct EngineConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Optional system prompt prepended to every request.
    pub system_prompt: Option<String>,
    /// Upper bound on model turns per [`execute`](super::ChatEngine::execute)
    /// call. Reaching it stops the loop with a warning, never an error.
    pub max_turns: u32,
    /// Deadline for each individual tool dispatch.
    pub tool_timeout: Duration,
    /// Whether to request streamed responses.
    pub stream: bool,
    /// Telemetry observer for tool dispatches. Must not affect control
    /// flow.
    pub on_tool_call: Option<ToolObserverFn>,
    /// History-snapshot subscription.
    pub on_update: Option<UpdateFn>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "mistral-medium-latest".to_string(),
            system_prompt: None,
            max_turns: 10,
            tool_timeout: Duration::from_secs(30),
            stream: true,
            on_tool_call: None,
            on_update: None,
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("max_turns", &self.max_turns)
            .field("tool_timeout", &self.tool_timeout)
            .field("stream", &self.stream)
            .field("has_on_tool_call", &self.on_tool_call.is_some())
            .field("has_on_update", &self.on_update.is_some())
            .finish()
    }
}
