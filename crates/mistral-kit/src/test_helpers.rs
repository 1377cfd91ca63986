//! Pre-built helpers for testing code that uses `mistral-kit` types.
//!
//! Available when the `test-utils` feature is enabled, allowing
//! downstream crates to reuse these utilities in their own test
//! suites. Also compiled during `#[cfg(test)]` for this crate's own
//! tests.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::chat::{FunctionCall, ToolCallRequest};
use crate::tool::{ToolError, ToolHandler, ToolSpec, tool_fn};

/// Builds a tool call with the given id, name, and raw argument string.
pub fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: Some(id.into()),
        call_type: Some("function".into()),
        function: FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        },
    }
}

/// A tool that always returns the given JSON value.
pub fn constant_tool(name: &str, value: Value) -> Arc<dyn ToolHandler> {
    let spec = ToolSpec::new(name.to_string(), format!("{name} tool"), json!({"type": "object"}));
    Arc::new(tool_fn(spec, move |_| {
        let value = value.clone();
        async move { Ok::<_, ToolError>(value) }
    }))
}

/// A tool that always fails with the given message.
pub fn failing_tool(name: &str, message: &str) -> Arc<dyn ToolHandler> {
    let spec = ToolSpec::new(name.to_string(), format!("{name} tool"), json!({"type": "object"}));
    let message = message.to_string();
    Arc::new(tool_fn(spec, move |_| {
        let message = message.clone();
        async move { Err::<Value, _>(ToolError::new(message)) }
    }))
}

/// A tool that sleeps for `millis` before returning, for timeout tests.
pub fn slow_tool(name: &str, millis: u64) -> Arc<dyn ToolHandler> {
    let spec = ToolSpec::new(name.to_string(), format!("{name} tool"), json!({"type": "object"}));
    Arc::new(tool_fn(spec, move |_| async move {
        tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
        Ok::<_, ToolError>(json!({"slept": millis}))
    }))
}

/// A tool that echoes its parsed arguments back as its result.
pub fn echo_tool(name: &str) -> Arc<dyn ToolHandler> {
    let spec = ToolSpec::new(name.to_string(), format!("{name} tool"), json!({"type": "object"}));
    Arc::new(tool_fn(spec, |args| async move {
        Ok::<_, ToolError>(args)
    }))
}
