//! Embeddings client for the Mistral API.

use mistral_kit::error::ChatError;
use serde_json::json;
use tracing::instrument;

use crate::config::MistralConfig;
use crate::types::EmbeddingsResponse;

/// Maximum number of inputs per embeddings request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Client for the `/v1/embeddings` endpoint.
///
/// Splits large inputs into batches of at most [`MAX_BATCH_SIZE`] and
/// processes them sequentially to avoid overwhelming the API.
#[derive(Debug)]
pub struct EmbeddingsClient {
    config: MistralConfig,
    client: reqwest::Client,
    max_batch_size: usize,
}

impl EmbeddingsClient {
    /// Creates a client from configuration.
    pub fn new(config: MistralConfig) -> Self {
        let client = config.client.clone().unwrap_or_else(|| {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = config.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build().expect("failed to build HTTP client")
        });
        Self {
            config,
            client,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Overrides the batch size, builder style. Values above
    /// [`MAX_BATCH_SIZE`] are clamped.
    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    fn embeddings_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1/embeddings")
    }

    /// Embeds every input text, preserving input order.
    #[instrument(skip_all, fields(model = %self.config.embed_model, inputs = texts.len()))]
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.max_batch_size) {
            all.extend(self.embed_batch(batch).await?);
        }
        Ok(all)
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let auth_value = format!("Bearer {}", self.config.api_key);
        let response = self
            .client
            .post(self.embeddings_url())
            .header("authorization", auth_value)
            .json(&json!({
                "model": self.config.embed_model,
                "input": batch,
            }))
            .send()
            .await
            .map_err(|e| ChatError::Http {
                status: e.status().map(|s| {
                    http::StatusCode::from_u16(s.as_u16())
                        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
                }),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Http {
                status: Some(
                    http::StatusCode::from_u16(status.as_u16())
                        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
                ),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| ChatError::Format {
            message: format!("failed to read embeddings body: {e}"),
            raw: String::new(),
        })?;
        let parsed: EmbeddingsResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Format {
                message: e.to_string(),
                raw: body.clone(),
            })?;
        if parsed.data.is_empty() {
            return Err(ChatError::Format {
                message: "no embeddings in response".into(),
                raw: body,
            });
        }

        // The API may return items out of order; `index` is authoritative.
        let mut items = parsed.data;
        items.sort_unstable_by_key(|item| item.index);
        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}
