//! Client for OpenAI-style chat-completions APIs (OpenAI, Groq).

use crate::{DIRECTOR_INSTRUCTION, classify_status, classify_transport};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyreel_error::{CompletionError, CompletionErrorKind};
use storyreel_interface::CompletionProvider;
use tracing::{debug, error, instrument};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client shared by every OpenAI-compatible service.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a client for an arbitrary chat-completions endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token
    /// * `model` - Model identifier (e.g. "gpt-4-turbo")
    /// * `endpoint` - Full chat-completions URL
    /// * `provider` - Name reported in logs and run metadata
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        provider: &'static str,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CompletionError::new(CompletionErrorKind::Unknown(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;
        let model = model.into();
        debug!(provider, model = %model, "Creating OpenAI-compatible client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            model,
            endpoint: endpoint.into(),
            provider,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompatibleClient {
    #[instrument(skip(self, request_text), fields(provider = self.provider, model = %self.model))]
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: DIRECTOR_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: request_text,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send chat-completions request");
                CompletionError::new(classify_transport(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Chat-completions API returned error");
            return Err(CompletionError::new(classify_status(status, &headers, &text)));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            CompletionError::new(CompletionErrorKind::Unknown(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .unwrap_or_default();
        debug!(chars = text.len(), "Received completion");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
