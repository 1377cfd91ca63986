//! The reqwest-backed [`ChatTransport`] for the Mistral API.

use std::future::Future;
use std::pin::Pin;

use futures::StreamExt;
use mistral_kit::error::ChatError;
use mistral_kit::transport::{ChatOutcome, ChatTransport, DeltaFn};
use mistral_kit::wire::ChatRequest;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::config::MistralConfig;
use crate::sse::{Frame, ToolCallAccumulator, Utf8Carry, parse_frame};
use crate::types::ChatCompletionResponse;

/// Maximum buffered stream bytes before the stream is abandoned.
const MAX_BUF: usize = 16 * 1024 * 1024; // 16 MiB

/// Mistral chat-completions transport.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mistral_kit::engine::{ChatEngine, EngineConfig};
/// use mistral_kit::tool::ToolRegistry;
/// use mistral_kit_http::{MistralConfig, MistralTransport};
///
/// let transport = MistralTransport::new(MistralConfig {
///     api_key: std::env::var("MISTRAL_API_KEY").unwrap(),
///     ..Default::default()
/// });
/// let engine = ChatEngine::new(Arc::new(transport), ToolRegistry::new(), EngineConfig::default());
/// ```
#[derive(Debug)]
pub struct MistralTransport {
    config: MistralConfig,
    client: reqwest::Client,
}

impl MistralTransport {
    /// Creates a transport from configuration.
    ///
    /// If `config.client` is `Some`, that client is reused for
    /// connection pooling. Otherwise a new client is built with the
    /// configured timeout.
    pub fn new(config: MistralConfig) -> Self {
        let client = config.client.clone().unwrap_or_else(|| {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = config.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build().expect("failed to build HTTP client")
        });
        Self { config, client }
    }

    pub(crate) fn default_headers(&self) -> Result<HeaderMap, ChatError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            "authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|_| ChatError::Auth("API key contains invalid header characters".into()))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }

    async fn send_request(&self, request: &ChatRequest) -> Result<reqwest::Response, ChatError> {
        let headers = self.default_headers()?;
        let response = self
            .client
            .post(self.completions_url())
            .headers(headers)
            .json(request)
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
        Ok(response)
    }

    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete_turn(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome, ChatError> {
        let response = tokio::select! {
            () = cancel.cancelled() => return Err(ChatError::Cancelled),
            result = self.send_request(request) => result?,
        };

        let body = response.text().await.map_err(|e| ChatError::Format {
            message: format!("failed to read response body: {e}"),
            raw: String::new(),
        })?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Format {
                message: e.to_string(),
                raw: body.clone(),
            })?;

        let choice = parsed.choices.into_iter().next().ok_or(ChatError::NoChoices)?;
        Ok(ChatOutcome {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }

    #[instrument(skip_all, fields(model = %request.model))]
    async fn stream_turn(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
        on_delta: Option<&DeltaFn>,
    ) -> Result<ChatOutcome, ChatError> {
        let response = tokio::select! {
            () = cancel.cancelled() => return Err(ChatError::Cancelled),
            result = self.send_request(request) => result?,
        };

        let mut stream = response.bytes_stream();
        let mut carry = Utf8Carry::new();
        let mut buffer = String::new();
        let mut content = String::new();
        let mut tools = ToolCallAccumulator::new();

        loop {
            let chunk = tokio::select! {
                () = cancel.cancelled() => return Err(ChatError::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let bytes = chunk.map_err(|e| ChatError::Http {
                status: None,
                message: format!("stream read error: {e}"),
            })?;
            carry.decode(&bytes, &mut buffer);
            if buffer.len() + carry.pending_len() > MAX_BUF {
                return Err(ChatError::Format {
                    message: "SSE stream buffer exceeded 16 MiB".into(),
                    raw: String::new(),
                });
            }

            while let Some(pos) = buffer.find("\n\n") {
                let event: String = buffer.drain(..pos + 2).collect();
                match parse_frame(&event) {
                    Some(Frame::Chunk(chunk)) => {
                        if let Some(choice) = chunk.choices.first() {
                            if let Some(text) = &choice.delta.content
                                && !text.is_empty()
                            {
                                content.push_str(text);
                                if let Some(on_delta) = on_delta {
                                    on_delta(text);
                                }
                            }
                            if let Some(calls) = &choice.delta.tool_calls {
                                tools.absorb(calls);
                            }
                        }
                    }
                    // Sentinel reached; drain until the connection closes.
                    Some(Frame::Done) | None => {}
                }
            }
        }

        Ok(ChatOutcome {
            content: (!content.is_empty()).then_some(content),
            tool_calls: tools.finish(),
        })
    }
}

impl ChatTransport for MistralTransport {
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
        cancel: &'a CancellationToken,
        on_delta: Option<&'a DeltaFn>,
    ) -> Pin<Box<dyn Future<Output = Result<ChatOutcome, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            if request.stream {
                self.stream_turn(request, cancel, on_delta).await
            } else {
                self.complete_turn(request, cancel).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base_url: &str) -> MistralTransport {
        MistralTransport::new(MistralConfig {
            api_key: "test-key".into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_completions_url_joins_cleanly() {
        assert_eq!(
            transport("https://api.mistral.ai").completions_url(),
            "https://api.mistral.ai/v1/chat/completions"
        );
        assert_eq!(
            transport("https://api.mistral.ai/").completions_url(),
            "https://api.mistral.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_headers_carry_bearer_auth() {
        let headers = transport("https://api.mistral.ai").default_headers().unwrap();
        assert_eq!(headers["authorization"], "Bearer test-key");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_invalid_api_key_characters_rejected() {
        let result = transport("https://api.mistral.ai");
        let bad = MistralTransport::new(MistralConfig {
            api_key: "bad\nkey".into(),
            ..Default::default()
        });
        assert!(result.default_headers().is_ok());
        assert!(matches!(bad.default_headers(), Err(ChatError::Auth(_))));
    }

    #[tokio::test]
    async fn test_stream_reassembles_multibyte_char_split_across_reads() {
        use std::sync::{Arc, Mutex};

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await.unwrap();

            let payload =
                "data: {\"choices\":[{\"delta\":{\"content\":\"café au lait\"}}]}\n\n\
                 data: [DONE]\n\n";
            let bytes = payload.as_bytes();
            // Split between the two bytes of the accented 'e'.
            let split = payload.find('é').unwrap() + 1;

            let head = format!(
                "HTTP/1.1 200 OK\r\n\
                 content-type: text/event-stream\r\n\
                 content-length: {}\r\n\
                 connection: close\r\n\r\n",
                bytes.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&bytes[..split]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            socket.write_all(&bytes[split..]).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let transport = transport(&format!("http://{addr}"));
        let request = mistral_kit::wire::build_request(
            "m",
            None,
            &[mistral_kit::ChatMessage::user("hi")],
            &[],
            true,
        );

        let deltas = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&deltas);
        let on_delta = move |fragment: &str| sink.lock().unwrap().push_str(fragment);
        let delta_ref: &DeltaFn = &on_delta;

        let cancel = CancellationToken::new();
        let outcome = transport
            .send(&request, &cancel, Some(delta_ref))
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(outcome.content.as_deref(), Some("café au lait"));
        assert_eq!(*deltas.lock().unwrap(), "café au lait");
    }
}
