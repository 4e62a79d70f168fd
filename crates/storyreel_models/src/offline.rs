//! Offline provider: composes a visual prompt locally from the request sections.

use async_trait::async_trait;
use storyreel_error::CompletionError;
use storyreel_interface::CompletionProvider;
use tracing::{debug, instrument};

/// Section headers whose bodies make it into the composed prompt, in order.
const COMPOSED_SECTIONS: &[&str] = &[
    "SUBJECT",
    "ACTION",
    "SETTING",
    "STYLE",
    "CAMERA & LIGHTING",
    "TECHNICAL",
];

/// Deterministic stand-in used when no API key is configured.
///
/// The same request text always yields the same prompt, so runs without
/// network access remain reproducible.
#[derive(Debug, Clone, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    /// Creates the offline provider.
    pub fn new() -> Self {
        Self
    }

    /// Join the recognised section bodies into a single paragraph.
    pub fn compose(request_text: &str) -> String {
        let mut current: Option<&str> = None;
        let mut bodies: Vec<(&str, Vec<&str>)> = Vec::new();

        for line in request_text.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                current = COMPOSED_SECTIONS.iter().copied().find(|name| *name == header);
                if let Some(name) = current {
                    bodies.push((name, Vec::new()));
                }
                continue;
            }
            if trimmed.is_empty() || current.is_none() {
                continue;
            }
            if let Some((_, lines)) = bodies.last_mut() {
                lines.push(trimmed);
            }
        }

        let mut parts: Vec<String> = Vec::new();
        for name in COMPOSED_SECTIONS {
            for (section, lines) in bodies.iter().filter(|(section, _)| section == name) {
                let body = lines.join(" ");
                if body.is_empty() {
                    continue;
                }
                debug!(section, "Composing section");
                let body = body.trim_end_matches('.').to_string();
                parts.push(body);
            }
        }

        if parts.is_empty() {
            return request_text.trim().to_string();
        }
        format!("{}.", parts.join(". "))
    }
}

#[async_trait]
impl CompletionProvider for OfflineProvider {
    #[instrument(skip(self, request_text), fields(provider = "offline"))]
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        Ok(Self::compose(request_text))
    }

    fn provider_name(&self) -> &str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "offline-composer"
    }
}
