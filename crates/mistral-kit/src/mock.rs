//! Mock transports for testing.
//!
//! [`MockTransport`] is a queue-based fake that lets tests control
//! exactly what each model turn returns, without touching the network.
//! It implements [`ChatTransport`], so it works anywhere the real
//! transport does. Every call records its [`ChatRequest`] for later
//! assertion via [`recorded_requests`](MockTransport::recorded_requests).
//!
//! [`PendingTransport`] never resolves until cancelled, which makes
//! cancellation paths testable without timing games.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::chat::{FunctionCall, ToolCallRequest};
use crate::error::ChatError;
use crate::transport::{ChatOutcome, ChatTransport, DeltaFn};
use crate::wire::ChatRequest;

/// One scripted model turn.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    /// Content fragments forwarded to `on_delta` before resolving.
    pub deltas: Vec<String>,
    /// The turn's final result.
    pub result: Result<ChatOutcome, ChatError>,
}

/// A queue-based mock transport for unit and integration tests.
///
/// Push replies with [`queue_reply`](Self::queue_reply) or the shorthand
/// constructors. Each call to `send` pops from the front of the queue.
///
/// # Panics
///
/// `send` panics if the reply queue is empty.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &self.replies.lock().unwrap().len())
            .field("recorded", &self.requests.lock().unwrap().len())
            .finish()
    }
}

impl MockTransport {
    /// Creates a mock with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a scripted reply.
    pub fn queue_reply(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Enqueues a plain content turn with no deltas.
    pub fn queue_content(&self, content: impl Into<String>) {
        self.queue_reply(ScriptedReply {
            deltas: Vec::new(),
            result: Ok(ChatOutcome {
                content: Some(content.into()),
                tool_calls: Vec::new(),
            }),
        });
    }

    /// Enqueues a streamed content turn: each delta is forwarded, and
    /// the final outcome carries no content (the stream was exhaustive).
    pub fn queue_streamed(&self, deltas: impl IntoIterator<Item = impl Into<String>>) {
        self.queue_reply(ScriptedReply {
            deltas: deltas.into_iter().map(Into::into).collect(),
            result: Ok(ChatOutcome::default()),
        });
    }

    /// Enqueues a turn requesting a single tool call.
    pub fn queue_tool_call(&self, id: Option<&str>, name: &str, arguments: &str) {
        self.queue_reply(ScriptedReply {
            deltas: Vec::new(),
            result: Ok(ChatOutcome {
                content: None,
                tool_calls: vec![ToolCallRequest {
                    id: id.map(String::from),
                    call_type: Some("function".into()),
                    function: FunctionCall {
                        name: name.into(),
                        arguments: arguments.into(),
                    },
                }],
            }),
        });
    }

    /// Enqueues a failing turn.
    pub fn queue_error(&self, error: ChatError) {
        self.queue_reply(ScriptedReply {
            deltas: Vec::new(),
            result: Err(error),
        });
    }

    /// Returns every request recorded so far.
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatTransport for MockTransport {
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
        cancel: &'a CancellationToken,
        on_delta: Option<&'a DeltaFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ChatOutcome, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            if cancel.is_cancelled() {
                return Err(ChatError::Cancelled);
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("MockTransport reply queue is empty");
            if let Some(on_delta) = on_delta {
                for delta in &reply.deltas {
                    on_delta(delta);
                }
            }
            reply.result
        })
    }
}

/// A transport that resolves only when cancelled.
#[derive(Debug, Default)]
pub struct PendingTransport;

impl ChatTransport for PendingTransport {
    fn send<'a>(
        &'a self,
        _request: &'a ChatRequest,
        cancel: &'a CancellationToken,
        _on_delta: Option<&'a DeltaFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ChatOutcome, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            cancel.cancelled().await;
            Err(ChatError::Cancelled)
        })
    }
}
