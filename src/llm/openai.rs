use crate::config::ApiKey;
use crate::error::LlmError;
use crate::llm::sse::{SseDecoder, StreamEvent};
use crate::llm::{ChatModel, ChatRequest};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, header};
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint for the chat-completion API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceRaw {
    message: ChatMessageRaw,
}

#[derive(Debug, Deserialize)]
struct ChatMessageRaw {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completion API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: ApiKey,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for the default endpoint
    pub fn new(api_key: ApiKey) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                ::log::warn!("Falling back to a default HTTP client: {}", e);
                Client::new()
            });

        Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (proxies, compatible servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// POST a request body and check the status
    async fn post(&self, body: &serde_json::Value) -> Result<Response, LlmError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose()),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| {
                ::log::warn!("Chat completion request failed: {}", e);
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            ::log::warn!("Chat completion API error {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

fn request_body(request: &ChatRequest, stream: bool) -> Result<serde_json::Value, LlmError> {
    let mut body = serde_json::to_value(request)
        .map_err(|e| LlmError::Parse(format!("could not serialize request: {}", e)))?;
    if stream {
        body["stream"] = serde_json::Value::Bool(true);
    }
    Ok(body)
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let started = std::time::Instant::now();
        let response = self.post(&request_body(request, false)?).await?;

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        ::log::debug!(
            "Chat completion with {} took {} ms",
            request.model,
            started.elapsed().as_millis()
        );
        Ok(content)
    }

    async fn complete_streaming(
        &self,
        request: &ChatRequest,
        on_delta: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, LlmError> {
        let response = self.post(&request_body(request, true)?).await?;

        let mut bytes = Box::pin(response.bytes_stream());
        let mut decoder = SseDecoder::new();
        let mut full_text = String::new();

        'stream: while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| LlmError::Network(e.to_string()))?;
            for event in decoder.push(&chunk)? {
                match event {
                    StreamEvent::Delta(delta) => {
                        on_delta(&delta);
                        full_text.push_str(&delta);
                    }
                    StreamEvent::Done => break 'stream,
                }
            }
        }
        if let Some(StreamEvent::Delta(delta)) = decoder.finish()? {
            on_delta(&delta);
            full_text.push_str(&delta);
        }

        Ok(full_text)
    }
}
