//! Built-in calculator tool.

use serde_json::{Value, json};

use crate::tool::{FnToolHandler, JsonSchema, ToolError, ToolSpec, tool_fn};

fn parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "operation": {
                "type": "string",
                "enum": ["add", "subtract", "multiply", "divide", "percentage"],
                "description": "The mathematical operation to perform"
            },
            "a": {"type": "number", "description": "First number"},
            "b": {
                "type": "number",
                "description": "Second number (required for most operations)"
            }
        },
        "required": ["operation", "a"]
    })
}

fn run(args: Value) -> Result<Value, ToolError> {
    let operation = args["operation"]
        .as_str()
        .ok_or_else(|| ToolError::new("operation is required"))?
        .to_string();
    let a = args["a"]
        .as_f64()
        .ok_or_else(|| ToolError::new("First number required"))?;
    let b = args["b"].as_f64();

    let require_b = |what: &str| {
        b.ok_or_else(|| ToolError::new(format!("Second number required for {what}")))
    };

    let result = match operation.as_str() {
        "add" => a + require_b("addition")?,
        "subtract" => a - require_b("subtraction")?,
        "multiply" => a * require_b("multiplication")?,
        "divide" => {
            let b = require_b("division")?;
            if b == 0.0 {
                return Err(ToolError::new("Cannot divide by zero"));
            }
            a / b
        }
        "percentage" => (a / 100.0) * require_b("percentage calculation")?,
        other => return Err(ToolError::new(format!("Unknown operation: {other}"))),
    };

    let operands = match b {
        Some(b) => json!([a, b]),
        None => json!([a]),
    };
    Ok(json!({
        "operation": operation,
        "operands": operands,
        "result": (result * 100.0).round() / 100.0,
    }))
}

/// Builds the `calculator` tool.
pub fn calculator_tool() -> FnToolHandler<impl Fn(Value) -> std::future::Ready<Result<Value, ToolError>> + Send + Sync>
{
    let spec = ToolSpec::new(
        "calculator",
        "Perform mathematical calculations (add, subtract, multiply, divide, percentage). \
         ONLY use this for math operations with numbers. Do NOT use for document analysis \
         or text-based queries.",
        parameters(),
    )
    .with_schema(JsonSchema::new(parameters()));
    tool_fn(spec, |args| std::future::ready(run(args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolHandler;

    async fn calc(args: Value) -> Result<Value, ToolError> {
        calculator_tool().run(args).await
    }

    #[tokio::test]
    async fn test_add() {
        let out = calc(json!({"operation": "add", "a": 2, "b": 3})).await.unwrap();
        assert_eq!(out["result"], 5.0);
        assert_eq!(out["operands"], json!([2.0, 3.0]));
        assert_eq!(out["operation"], "add");
    }

    #[tokio::test]
    async fn test_subtract_and_multiply() {
        let out = calc(json!({"operation": "subtract", "a": 10, "b": 4})).await.unwrap();
        assert_eq!(out["result"], 6.0);
        let out = calc(json!({"operation": "multiply", "a": 6, "b": 7})).await.unwrap();
        assert_eq!(out["result"], 42.0);
    }

    #[tokio::test]
    async fn test_divide_rounds_to_two_decimals() {
        let out = calc(json!({"operation": "divide", "a": 10, "b": 3})).await.unwrap();
        assert_eq!(out["result"], 3.33);
    }

    #[tokio::test]
    async fn test_divide_by_zero() {
        let err = calc(json!({"operation": "divide", "a": 1, "b": 0})).await.unwrap_err();
        assert_eq!(err.message, "Cannot divide by zero");
    }

    #[tokio::test]
    async fn test_percentage() {
        let out = calc(json!({"operation": "percentage", "a": 15, "b": 200}))
            .await
            .unwrap();
        assert_eq!(out["result"], 30.0);
    }

    #[tokio::test]
    async fn test_missing_b_is_an_error() {
        let err = calc(json!({"operation": "add", "a": 1})).await.unwrap_err();
        assert!(err.message.contains("Second number required"));
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let err = calc(json!({"operation": "modulo", "a": 1, "b": 2})).await.unwrap_err();
        assert!(err.message.contains("Unknown operation"));
    }

    #[test]
    fn test_schema_rejects_missing_operation() {
        let spec = calculator_tool().spec();
        let schema = spec.schema.unwrap();
        assert!(schema.validate(&json!({"a": 1})).is_err());
        assert!(schema.validate(&json!({"operation": "add", "a": 1})).is_ok());
    }
}
