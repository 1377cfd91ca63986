//! Mistral API configuration.

use std::time::Duration;

/// Configuration for the Mistral transport and embeddings client.
///
/// Use struct update syntax with [`Default`] for ergonomic construction:
///
/// ```rust
/// use mistral_kit_http::MistralConfig;
///
/// let config = MistralConfig {
///     api_key: "sk-...".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct MistralConfig {
    /// Mistral API key. Required.
    pub api_key: String,
    /// Embedding model identifier used by the embeddings client.
    pub embed_model: String,
    /// Base URL for the API. Override for proxies or local gateways.
    pub base_url: String,
    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,
    /// Pre-configured HTTP client for connection pooling. When `None`,
    /// a new client is created.
    pub client: Option<reqwest::Client>,
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("api_key", &"[REDACTED]")
            .field("embed_model", &self.embed_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("client", &self.client.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            embed_model: "mistral-embed".into(),
            base_url: "https://api.mistral.ai".into(),
            timeout: None,
            client: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MistralConfig::default();
        assert_eq!(config.base_url, "https://api.mistral.ai");
        assert_eq!(config.embed_model, "mistral-embed");
        assert!(config.api_key.is_empty());
        assert!(config.timeout.is_none());
        assert!(config.client.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = MistralConfig {
            api_key: "sk-super-secret".into(),
            ..Default::default()
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sk-super-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
