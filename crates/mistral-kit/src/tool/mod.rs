//! Tool definitions, handlers, and the registry.
//!
//! A tool is a named async function the model may invoke mid
//! conversation. [`ToolSpec`] describes it to the model, [`ToolHandler`]
//! executes it, and [`ToolRegistry`] holds the set offered on each
//! request. [`ToolOutcome`] is the serialized shape of a dispatch
//! result, success or failure.

mod error;
mod handler;
mod outcome;
mod registry;
mod spec;

pub use error::ToolError;
pub use handler::{FnToolHandler, ToolHandler, tool_fn};
pub use outcome::ToolOutcome;
pub use registry::ToolRegistry;
pub use spec::{JsonSchema, ToolSpec};
