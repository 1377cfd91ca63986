//! Built-in tools that need no network access.
//!
//! The weather tool lives in `mistral-kit-http` because it fetches
//! live conditions.

mod calculator;
mod date_time;

pub use calculator::calculator_tool;
pub use date_time::date_time_tool;
