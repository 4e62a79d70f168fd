//! Storyreel: prose stories to production-ready video scene prompts.
//!
//! A story is segmented into narrative beats, each beat gets a screen time,
//! every recurring character, creature, object and setting is described once
//! and reused verbatim, and a completion provider writes one visual prompt
//! per beat. The result is an ordered production sheet that can be exported
//! as CSV, JSON or Markdown.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyreel::{RunOverrides, StoryreelConfig, generate, SheetExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryreelConfig::load()?;
//!     let story = std::fs::read_to_string("story.txt")?;
//!     let sheet = generate(&config, &RunOverrides::default(), &story).await?;
//!     SheetExporter::new(&sheet).export_all("production_sheet")?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyreel_error` - Error types
//! - `storyreel_core` - Beats, entities, styles, requests, scene records
//! - `storyreel_interface` - The `CompletionProvider` trait
//! - `storyreel_rate_limit` - Retry policy and rate limiting
//! - `storyreel_models` - Gemini, OpenAI-compatible and offline providers
//! - `storyreel_scene` - Segmentation, durations, consistency registry, director
//! - `storyreel_export` - CSV, JSON and Markdown exporters
//!
//! This crate re-exports everything for convenience and adds configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pipeline;

pub use config::{
    CharacterSection, DurationSection, RunSection, StoryreelConfig, StyleSection,
};
pub use pipeline::{RunOverrides, build_director, generate, run_options};

pub use storyreel_core::*;
pub use storyreel_error::*;
pub use storyreel_export::*;
pub use storyreel_interface::*;
pub use storyreel_models::*;
pub use storyreel_rate_limit::*;
pub use storyreel_scene::*;
