//! Trait definitions for text-completion backends.

use async_trait::async_trait;
use std::sync::Arc;
use storyreel_error::CompletionError;

/// Core trait that every text-completion backend implements.
///
/// A provider turns one rendered scene request into prose visual-prompt
/// text. Failures are reported as [`CompletionError`] so the retry policy can
/// tell transient conditions from permanent ones.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete the request text and return the generated prompt.
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError>;

    /// Provider name (e.g., "gemini", "openai", "groq").
    fn provider_name(&self) -> &str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for Arc<P> {
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        (**self).complete(request_text).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        (**self).complete(request_text).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
