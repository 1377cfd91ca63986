//! Live weather tool backed by wttr.in.

use std::future::Future;
use std::pin::Pin;

use mistral_kit::tool::{JsonSchema, ToolError, ToolHandler, ToolSpec};
use serde_json::{Value, json};
use tracing::warn;

/// Static conditions used when the live fetch fails.
const FALLBACK: &[(&str, f64, &str, f64)] = &[
    ("paris", 18.0, "sunny", 65.0),
    ("london", 14.0, "cloudy", 78.0),
    ("new york", 22.0, "partly cloudy", 55.0),
    ("tokyo", 26.0, "sunny", 70.0),
    ("sydney", 20.0, "rainy", 85.0),
];

fn fallback_report(location: &str) -> Value {
    let normalized = location.to_lowercase();
    let (temp, condition, humidity) = FALLBACK
        .iter()
        .find(|(name, ..)| *name == normalized)
        .map(|(_, temp, condition, humidity)| (*temp, *condition, *humidity))
        .unwrap_or((20.0, "clear", 60.0));
    json!({
        "location": location,
        "temperatureC": temp,
        "feelsLikeC": temp,
        "condition": condition,
        "humidity": humidity,
        "unit": "celsius",
        "source": "fallback",
    })
}

fn parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "location": {
                "type": "string",
                "description": "City name (e.g., 'Paris', 'New York')"
            }
        },
        "required": ["location"]
    })
}

/// Builds the `get_weather` tool.
///
/// Fetches current conditions from `wttr.in` and falls back to a small
/// static table when the fetch or parse fails, so the tool never errors
/// on network trouble.
pub fn weather_tool(client: reqwest::Client) -> WeatherTool {
    WeatherTool { client }
}

/// The `get_weather` tool handler. Build with [`weather_tool`].
#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: reqwest::Client,
}

impl WeatherTool {
    async fn fetch_live(&self, location: &str) -> Result<Value, ToolError> {
        let endpoint = format!(
            "https://wttr.in/{}?format=j1",
            urlencoding::encode(location)
        );
        let response = self
            .client
            .get(&endpoint)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| ToolError::new(format!("wttr.in request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ToolError::new(format!(
                "wttr.in error: {}",
                response.status().as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::new(format!("wttr.in response was not JSON: {e}")))?;
        let current = body["current_condition"]
            .get(0)
            .ok_or_else(|| ToolError::new("wttr.in response missing current conditions"))?;

        let number = |field: &str| {
            current[field]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| ToolError::new(format!("wttr.in response missing {field}")))
        };
        let condition = current["weatherDesc"][0]["value"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string();

        Ok(json!({
            "location": location,
            "temperatureC": number("temp_C")?,
            "feelsLikeC": number("FeelsLikeC")?,
            "condition": condition,
            "humidity": number("humidity")?,
            "unit": "celsius",
            "source": "wttr.in",
        }))
    }
}

impl ToolHandler for WeatherTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "get_weather",
            "Get current weather information for a specific location",
            parameters(),
        )
        .with_schema(JsonSchema::new(parameters()))
    }

    fn run<'a>(
        &'a self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            let location = args["location"]
                .as_str()
                .ok_or_else(|| ToolError::new("location is required"))?
                .to_string();

            match self.fetch_live(&location).await {
                Ok(report) => Ok(report),
                Err(err) => {
                    warn!(%location, error = %err, "falling back to static weather data");
                    Ok(fallback_report(&location))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_known_city() {
        let report = fallback_report("London");
        assert_eq!(report["temperatureC"], 14.0);
        assert_eq!(report["condition"], "cloudy");
        assert_eq!(report["source"], "fallback");
        assert_eq!(report["unit"], "celsius");
    }

    #[test]
    fn test_fallback_unknown_city_uses_default() {
        let report = fallback_report("Reykjavik");
        assert_eq!(report["temperatureC"], 20.0);
        assert_eq!(report["condition"], "clear");
        assert_eq!(report["humidity"], 60.0);
    }

    #[test]
    fn test_spec_requires_location() {
        let tool = weather_tool(reqwest::Client::new());
        let spec = tool.spec();
        assert_eq!(spec.name, "get_weather");
        let schema = spec.schema.unwrap();
        assert!(schema.validate(&json!({})).is_err());
        assert!(schema.validate(&json!({"location": "Paris"})).is_ok());
    }

    #[tokio::test]
    async fn test_missing_location_is_an_error() {
        let tool = weather_tool(reqwest::Client::new());
        let err = tool.run(json!({})).await.unwrap_err();
        assert!(err.message.contains("location"));
    }
}
