//! Built-in date/time tool.

use chrono::Local;
use serde_json::{Value, json};

use crate::tool::{FnToolHandler, ToolError, ToolSpec, tool_fn};

/// Builds the `get_date` tool, reporting the current local date, time,
/// RFC 3339 timestamp, and UTC offset.
pub fn date_time_tool()
-> FnToolHandler<impl Fn(Value) -> std::future::Ready<Result<Value, ToolError>> + Send + Sync> {
    let spec = ToolSpec::new(
        "get_date",
        "Get the current date and time",
        json!({"type": "object", "properties": {}}),
    );
    tool_fn(spec, |_args| {
        let now = Local::now();
        std::future::ready(Ok(json!({
            "date": now.format("%B %-d, %Y").to_string(),
            "time": now.format("%I:%M:%S %p").to_string(),
            "timestamp": now.to_rfc3339(),
            "timezone": now.format("%:z").to_string(),
        })))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolHandler;

    #[tokio::test]
    async fn test_reports_all_fields() {
        let tool = date_time_tool();
        let out = tool.run(json!({})).await.unwrap();
        assert!(out["date"].is_string());
        assert!(out["time"].is_string());
        assert!(out["timezone"].is_string());
        // RFC 3339 timestamps parse back.
        let ts = out["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_spec_name() {
        assert_eq!(date_time_tool().spec().name, "get_date");
    }
}
