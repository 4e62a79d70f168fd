//! Google Gemini client over the Generative Language REST API.

use crate::{DIRECTOR_INSTRUCTION, classify_status, classify_transport};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyreel_error::{CompletionError, CompletionErrorKind};
use storyreel_interface::CompletionProvider;
use tracing::{debug, error, instrument};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    ///
    /// `base_url` is the API root, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CompletionError::new(CompletionErrorKind::Unknown(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;
        let model = model.into();
        debug!(model = %model, "Creating Gemini client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            model,
            base_url: base_url.into(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    #[instrument(skip(self, request_text), fields(provider = "gemini", model = %self.model))]
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![TextPart {
                    text: DIRECTOR_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: request_text }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                CompletionError::new(classify_transport(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Gemini API returned error");
            return Err(CompletionError::new(classify_status(status, &headers, &text)));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            CompletionError::new(CompletionErrorKind::Unknown(format!(
                "Failed to parse Gemini response: {}",
                e
            )))
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        debug!(chars = text.len(), "Received Gemini completion");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
