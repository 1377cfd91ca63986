//! Transport abstraction between the engine and a chat-completions
//! backend.
//!
//! [`ChatTransport`] is object-safe (boxed futures) so the engine can
//! hold any backend as `Arc<dyn ChatTransport>` — the HTTP
//! implementation lives in the `mistral-kit-http` crate, and tests use
//! the queue-based [`MockTransport`](crate::mock::MockTransport).

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::chat::ToolCallRequest;
use crate::error::ChatError;
use crate::wire::ChatRequest;

/// Callback invoked with each streamed content fragment.
pub type DeltaFn = dyn Fn(&str) + Send + Sync;

/// The completed result of one model turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOutcome {
    /// Final assistant content, if the model produced any.
    ///
    /// Streaming transports may leave this `None` when the full text was
    /// already delivered through the delta callback.
    pub content: Option<String>,
    /// Tool calls requested by the model, in the model's order.
    pub tool_calls: Vec<ToolCallRequest>,
}

/// A backend that can complete one model turn.
///
/// Implementations must honor `cancel` promptly: once the token is
/// cancelled, return [`ChatError::Cancelled`] rather than a partial
/// outcome. When `on_delta` is `Some`, content fragments are forwarded
/// as they arrive; the accumulated text is still reflected in the final
/// [`ChatOutcome`] unless the backend streams exhaustively.
pub trait ChatTransport: Send + Sync {
    /// Sends one request and resolves with the completed turn.
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
        cancel: &'a CancellationToken,
        on_delta: Option<&'a DeltaFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ChatOutcome, ChatError>> + Send + 'a>>;
}
