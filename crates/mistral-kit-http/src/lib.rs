//! # mistral-kit-http
//!
//! Network layer for [`mistral-kit`](mistral_kit): the reqwest-backed
//! [`MistralTransport`] (streaming and non-streaming chat completions),
//! the [`EmbeddingsClient`], and the live [`weather_tool`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mistral_kit::engine::{ChatEngine, EngineConfig, ExecuteContext};
//! use mistral_kit::tool::ToolRegistry;
//! use mistral_kit::tools::{calculator_tool, date_time_tool};
//! use mistral_kit_http::{MistralConfig, MistralTransport, weather_tool};
//!
//! # async fn example() {
//! let config = MistralConfig {
//!     api_key: std::env::var("MISTRAL_API_KEY").unwrap(),
//!     ..Default::default()
//! };
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(calculator_tool());
//! registry.register(date_time_tool());
//! registry.register(weather_tool(reqwest::Client::new()));
//!
//! let transport = Arc::new(MistralTransport::new(config));
//! let engine = ChatEngine::new(transport, registry, EngineConfig::default());
//! engine.execute("What's the weather in Paris?", ExecuteContext::default()).await;
//! # }
//! ```

pub mod config;
pub mod embeddings;
mod sse;
pub mod transport;
pub mod weather;
mod types;

pub use config::MistralConfig;
pub use embeddings::{EmbeddingsClient, MAX_BATCH_SIZE};
pub use transport::MistralTransport;
pub use weather::{WeatherTool, weather_tool};
