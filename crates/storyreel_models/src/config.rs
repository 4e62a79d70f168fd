//! Provider selection and per-provider settings.

use serde::{Deserialize, Serialize};
use storyreel_rate_limit::ProviderLimits;

/// Supported completion services.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// Google Gemini
    Gemini,
    /// OpenAI chat completions
    #[strum(serialize = "openai")]
    #[serde(rename = "openai")]
    OpenAI,
    /// Groq (OpenAI-compatible)
    Groq,
    /// Local deterministic composer
    Offline,
}

impl ProviderKind {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::OpenAI => "gpt-4-turbo",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::Offline => "offline-composer",
        }
    }

    /// Base URL used when none is configured.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenAI => "https://api.openai.com/v1/chat/completions",
            ProviderKind::Groq => "https://api.groq.com/openai/v1/chat/completions",
            ProviderKind::Offline => "",
        }
    }

    /// Environment variables searched for an API key, in order.
    pub fn default_key_vars(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Gemini => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
            ProviderKind::OpenAI => &["OPENAI_API_KEY"],
            ProviderKind::Groq => &["GROQ_API_KEY"],
            ProviderKind::Offline => &[],
        }
    }
}

/// Settings for one provider, from `[providers.<name>]`.
///
/// ```toml
/// [providers.groq]
/// model = "llama-3.3-70b-versatile"
/// rpm = 30
/// max_concurrent = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Override for the service URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Per-request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Maximum requests in flight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

impl ProviderConfig {
    /// Rate limits for this provider.
    pub fn limits(&self) -> ProviderLimits {
        ProviderLimits {
            rpm: self.rpm,
            max_concurrent: self.max_concurrent,
        }
    }

    /// Configured model or the provider's default.
    pub fn model_or_default(&self, kind: ProviderKind) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    /// Configured endpoint or the provider's default.
    pub fn endpoint_or_default(&self, kind: ProviderKind) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| kind.default_endpoint().to_string())
    }

    /// Look up the API key in the environment.
    ///
    /// An explicit `api_key_env` replaces the provider's default variables.
    /// Empty values count as missing.
    pub fn api_key(&self, kind: ProviderKind) -> Option<String> {
        let vars: Vec<&str> = match &self.api_key_env {
            Some(var) => vec![var.as_str()],
            None => kind.default_key_vars().to_vec(),
        };
        vars.into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!(ProviderKind::from_str("Gemini").unwrap(), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_str("OPENAI").unwrap(), ProviderKind::OpenAI);
        assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
        assert!(ProviderKind::from_str("claude").is_err());
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let config = ProviderConfig::default();
        assert_eq!(config.model_or_default(ProviderKind::Groq), "llama-3.3-70b-versatile");
        assert_eq!(config.limits(), ProviderLimits::default());
    }
}
