//! The tool-calling conversation engine.
//!
//! [`ChatEngine`] owns conversation history and drives the model/tool
//! loop: send the history, stream the assistant reply into a
//! placeholder message, dispatch any requested tools, append their
//! results, and repeat until the model answers without tool calls or
//! the turn budget runs out.
//!
//! The engine is an explicit state machine with synchronous getters
//! ([`messages`](ChatEngine::messages), [`is_executing`](ChatEngine::is_executing),
//! [`last_error`](ChatEngine::last_error)) and an optional
//! [`on_update`](EngineConfig::on_update) subscription; there is no
//! implicit global state.

mod config;

pub use config::{EngineConfig, ToolObserverFn, UpdateFn};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::chat::{ChatAttachment, ChatMessage};
use crate::error::ChatError;
use crate::tool::{ToolOutcome, ToolRegistry};
use crate::transport::ChatTransport;
use crate::wire::build_request;

/// Extra context attached to the user message of one `execute` call.
#[derive(Debug, Clone, Default)]
pub struct ExecuteContext {
    /// Files associated with the prompt. Informational only.
    pub attachments: Vec<ChatAttachment>,
    /// Human-facing alternative to the prompt text.
    pub display_content: Option<String>,
}

/// How an [`execute`](ChatEngine::execute) call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model answered without requesting tools.
    Done,
    /// The turn budget was exhausted. A stopping condition, not an
    /// error.
    MaxTurns,
    /// The call was cancelled, either directly or by a newer `execute`.
    Cancelled,
    /// A fatal transport or response error, retrievable via
    /// [`last_error`](ChatEngine::last_error).
    Failed,
}

/// A tool-calling conversation engine bound to one transport and one
/// tool registry.
///
/// History is only ever appended to; failures never roll messages back.
/// At most one `execute` call makes progress at a time: starting a new
/// one cancels the previous in-flight call.
pub struct ChatEngine {
    transport: Arc<dyn ChatTransport>,
    registry: ToolRegistry,
    config: EngineConfig,
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    executing: AtomicBool,
    last_error: Mutex<Option<ChatError>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("messages", &self.messages.lock().unwrap().len())
            .field("executing", &self.executing.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl ChatEngine {
    /// Creates an engine over the given transport, tools, and config.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        registry: ToolRegistry,
        config: EngineConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            config,
            messages: Arc::new(Mutex::new(Vec::new())),
            executing: AtomicBool::new(false),
            last_error: Mutex::new(None),
            in_flight: Mutex::new(None),
        }
    }

    /// Returns a snapshot of conversation history.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Returns whether an `execute` call is currently in flight.
    ///
    /// The flag flips synchronously at the start and end of `execute`,
    /// so rapid repeated submissions observe it reliably.
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    /// Returns the most recent fatal error, if any.
    ///
    /// Only transport failures and zero-choice responses land here;
    /// tool failures, max-turn stops, and cancellations never do.
    pub fn last_error(&self) -> Option<ChatError> {
        self.last_error.lock().unwrap().clone()
    }

    /// Returns the tool registry this engine dispatches against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Cancels any in-flight `execute` call.
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().unwrap().take() {
            token.cancel();
        }
    }

    /// Clears history and error state and cancels in-flight work.
    pub fn reset(&self) {
        self.cancel();
        self.messages.lock().unwrap().clear();
        *self.last_error.lock().unwrap() = None;
        self.executing.store(false, Ordering::SeqCst);
        self.notify_update();
    }

    fn notify_update(&self) {
        if let Some(on_update) = &self.config.on_update {
            let snapshot = self.messages.lock().unwrap().clone();
            on_update(&snapshot);
        }
    }

    fn push_message(&self, msg: ChatMessage) {
        self.messages.lock().unwrap().push(msg);
        self.notify_update();
    }

    /// Installs a fresh cancellation token, cancelling the previous one.
    fn begin_flight(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.in_flight.lock().unwrap().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    /// Runs the conversation loop for one user prompt.
    ///
    /// Appends the user message, then alternates model turns and tool
    /// dispatch until the model stops requesting tools, the turn budget
    /// is exhausted, the call is cancelled, or a fatal error occurs.
    /// History survives every exit path.
    pub async fn execute(&self, prompt: impl Into<String>, context: ExecuteContext) -> Termination {
        self.executing.store(true, Ordering::SeqCst);
        *self.last_error.lock().unwrap() = None;

        let cancel = self.begin_flight();

        let mut user_msg = ChatMessage::user(prompt).with_attachments(context.attachments);
        user_msg.display_content = context.display_content;
        self.push_message(user_msg);

        let termination = self.run_turns(&cancel).await;

        self.executing.store(false, Ordering::SeqCst);
        termination
    }

    async fn run_turns(&self, cancel: &CancellationToken) -> Termination {
        let mut turns = 0u32;

        while turns < self.config.max_turns {
            turns += 1;
            debug!(turn = turns, "starting model turn");

            let request = {
                let history = self.messages.lock().unwrap();
                build_request(
                    &self.config.model,
                    self.config.system_prompt.as_deref(),
                    &history,
                    &self.registry.specs(),
                    self.config.stream,
                )
            };

            let placeholder = ChatMessage::assistant_placeholder();
            let assistant_id = placeholder.id.clone();
            self.push_message(placeholder);

            let messages = Arc::clone(&self.messages);
            let delta_target = assistant_id.clone();
            let on_delta = move |fragment: &str| {
                let mut history = messages.lock().unwrap();
                if let Some(msg) = history.iter_mut().find(|m| m.id == delta_target) {
                    match &mut msg.content {
                        Some(content) => content.push_str(fragment),
                        None => msg.content = Some(fragment.to_string()),
                    }
                }
            };

            let delta_ref: &crate::transport::DeltaFn = &on_delta;
            let outcome = self
                .transport
                .send(&request, cancel, self.config.stream.then_some(delta_ref))
                .await;

            // Surface streamed content that arrived through on_delta.
            self.notify_update();

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(ChatError::Cancelled) => return Termination::Cancelled,
                Err(err) => {
                    error!(%err, "model turn failed");
                    *self.last_error.lock().unwrap() = Some(err);
                    return Termination::Failed;
                }
            };

            let tool_calls = {
                let mut history = self.messages.lock().unwrap();
                // A concurrent reset can clear history under us; the
                // token it cancelled makes this turn moot.
                let Some(msg) = history.iter_mut().find(|m| m.id == assistant_id) else {
                    return Termination::Cancelled;
                };
                if let Some(final_content) = &outcome.content
                    && !final_content.trim().is_empty()
                {
                    msg.content = Some(final_content.clone());
                }
                msg.tool_calls = outcome.tool_calls.clone();
                outcome.tool_calls
            };
            self.notify_update();

            if tool_calls.is_empty() {
                return Termination::Done;
            }

            for call in &tool_calls {
                if cancel.is_cancelled() {
                    return Termination::Cancelled;
                }
                self.dispatch_tool_call(call).await;
            }
        }

        warn!(
            max_turns = self.config.max_turns,
            "tool execution stopped: reached maximum turns"
        );
        Termination::MaxTurns
    }

    /// Dispatches one tool call and appends its result message.
    ///
    /// Skips (without a tool message) calls naming an unknown tool or
    /// carrying arguments that fail to parse or validate. Handler
    /// errors and timeouts become error results so the model can react.
    async fn dispatch_tool_call(&self, call: &crate::chat::ToolCallRequest) {
        let tool_name = call.function.name.as_str();
        if tool_name.is_empty() {
            return;
        }
        let tool_call_id = call
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let Some(handler) = self.registry.get(tool_name) else {
            warn!(tool_name, "unknown tool requested by model");
            return;
        };
        let handler = Arc::clone(handler);

        let raw_args = call.function.arguments.trim();
        let raw_args = if raw_args.is_empty() { "{}" } else { raw_args };
        let args: serde_json::Value = match serde_json::from_str(raw_args) {
            Ok(args) => args,
            Err(err) => {
                error!(tool_name, %err, "invalid tool arguments");
                return;
            }
        };
        if let Some(schema) = &handler.spec().schema
            && let Err(err) = schema.validate(&args)
        {
            error!(tool_name, %err, "tool arguments failed schema validation");
            return;
        }

        let outcome =
            match tokio::time::timeout(self.config.tool_timeout, handler.run(args.clone())).await {
                Ok(Ok(value)) => ToolOutcome::Ok(value),
                Ok(Err(tool_err)) => {
                    error!(tool_name, error = %tool_err, "tool execution failed");
                    ToolOutcome::failure(tool_name, tool_err.message)
                }
                Err(_) => {
                    let message = format!(
                        "Tool \"{tool_name}\" timed out after {}ms",
                        self.config.tool_timeout.as_millis()
                    );
                    error!(tool_name, "{message}");
                    ToolOutcome::failure(tool_name, message)
                }
            };

        if let Some(observer) = &self.config.on_tool_call {
            observer(tool_name, &args, &outcome.to_value());
        }

        self.push_message(ChatMessage::tool_result(
            tool_name,
            tool_call_id,
            outcome.to_content(),
        ));
    }
}
