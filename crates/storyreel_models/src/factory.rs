//! Provider construction from configuration.

use crate::{
    GeminiClient, OfflineProvider, OpenAICompatibleClient, ProviderConfig, ProviderKind,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use storyreel_error::ConfigError;
use storyreel_interface::CompletionProvider;
use strum::IntoEnumIterator;
use tracing::{info, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Build the provider named `name` from its configuration.
///
/// A hosted provider without an API key in the environment falls back to
/// [`OfflineProvider`] with a warning, so a run still produces a sheet.
///
/// # Errors
///
/// Returns an error for an unknown provider name or if the HTTP client
/// cannot be constructed.
pub fn build_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Arc<dyn CompletionProvider>, ConfigError> {
    let kind = ProviderKind::from_str(name).map_err(|_| {
        let available: Vec<String> = ProviderKind::iter().map(|k| k.to_string()).collect();
        ConfigError::new(format!(
            "Unknown provider '{}'. Available: {}",
            name,
            available.join(", ")
        ))
    })?;

    if kind == ProviderKind::Offline {
        info!("Using offline composer");
        return Ok(Arc::new(OfflineProvider::new()));
    }

    let Some(api_key) = config.api_key(kind) else {
        warn!(
            provider = %kind,
            "No API key found in environment, falling back to offline composer"
        );
        return Ok(Arc::new(OfflineProvider::new()));
    };

    let model = config.model_or_default(kind);
    let endpoint = config.endpoint_or_default(kind);
    let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    let to_config_error = |e: storyreel_error::CompletionError| ConfigError::new(e.to_string());

    info!(provider = %kind, model = %model, "Connected completion provider");
    let provider: Arc<dyn CompletionProvider> = match kind {
        ProviderKind::Gemini => {
            Arc::new(GeminiClient::new(api_key, model, endpoint, timeout).map_err(to_config_error)?)
        }
        ProviderKind::OpenAI => Arc::new(
            OpenAICompatibleClient::new(api_key, model, endpoint, "openai", timeout)
                .map_err(to_config_error)?,
        ),
        ProviderKind::Groq => Arc::new(
            OpenAICompatibleClient::new(api_key, model, endpoint, "groq", timeout)
                .map_err(to_config_error)?,
        ),
        ProviderKind::Offline => Arc::new(OfflineProvider::new()),
    };
    Ok(provider)
}
