//! Tool handler trait and closure adapter.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use super::{ToolError, ToolSpec};

/// A single tool the model can invoke.
///
/// Implement this trait for tools that need complex state; for simple
/// tools, wrap an async closure with [`super::tool_fn`]. Handlers must
/// not reach into conversation state — anything they need is captured
/// at construction.
///
/// The trait is object-safe (uses boxed futures) so handlers can be
/// stored as `Arc<dyn ToolHandler>`.
pub trait ToolHandler: Send + Sync {
    /// Returns the tool's spec (name, description, parameter schema).
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with the given parsed JSON arguments.
    ///
    /// The returned value becomes the tool-result message content after
    /// JSON serialization.
    fn run<'a>(
        &'a self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + 'a>>;
}

/// A tool handler backed by an async closure, created by [`super::tool_fn`].
pub struct FnToolHandler<F> {
    pub(crate) spec: ToolSpec,
    pub(crate) handler: F,
}

impl<F> std::fmt::Debug for FnToolHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnToolHandler")
            .field("name", &self.spec.name)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> ToolHandler for FnToolHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    fn run<'a>(
        &'a self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + 'a>> {
        Box::pin((self.handler)(args))
    }
}

/// Wraps an async closure as a [`ToolHandler`].
///
/// # Example
///
/// ```rust
/// use mistral_kit::tool::{tool_fn, ToolSpec, ToolError};
/// use serde_json::json;
///
/// let echo = tool_fn(
///     ToolSpec::new("echo", "Echoes its input", json!({"type": "object"})),
///     |args| async move { Ok(args) },
/// );
/// ```
pub fn tool_fn<F, Fut>(spec: ToolSpec, handler: F) -> FnToolHandler<F>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    FnToolHandler { spec, handler }
}
