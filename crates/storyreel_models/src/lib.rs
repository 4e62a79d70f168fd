//! Text-completion provider integrations for Storyreel.
//!
//! Every provider implements [`CompletionProvider`](storyreel_interface::CompletionProvider)
//! and maps its transport failures onto
//! [`CompletionErrorKind`](storyreel_error::CompletionErrorKind).
//!
//! # Available Providers
//!
//! - **Gemini** (Google Generative Language REST API)
//! - **OpenAI** and **Groq** through the OpenAI-compatible chat-completions client
//! - **Offline**, a deterministic local composer used when no API key is set
//!
//! ```no_run
//! use storyreel_interface::CompletionProvider;
//! use storyreel_models::{ProviderConfig, build_provider};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = build_provider("gemini", &ProviderConfig::default())?;
//! let prompt = provider.complete("[ACTION]\nA bright light descends.").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod config;
mod factory;
mod gemini;
mod offline;
mod openai_compat;

pub use classify::{classify_status, classify_transport};
pub use config::{ProviderConfig, ProviderKind};
pub use factory::build_provider;
pub use gemini::GeminiClient;
pub use offline::OfflineProvider;
pub use openai_compat::OpenAICompatibleClient;

/// System instruction sent alongside every scene request.
pub const DIRECTOR_INSTRUCTION: &str = "You are a film director and cinematographer writing prompts for AI video \
generation tools such as Veo, Sora and Runway. Follow the section order SUBJECT, ACTION, SETTING, \
CAMERA, LIGHTING. Reuse every character and setting description from the continuity reference \
word for word. Reply with the visual prompt only, as a single paragraph, without headings or commentary.";
