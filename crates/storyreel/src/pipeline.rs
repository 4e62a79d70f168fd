//! Wiring configuration into a ready-to-run director.

use crate::StoryreelConfig;
use storyreel_core::ProductionSheet;
use storyreel_error::{ConfigError, StoryreelResult};
use storyreel_models::build_provider;
use storyreel_rate_limit::{RateLimiter, RetryPolicy};
use storyreel_scene::{
    BeatSegmenter, DurationAllocator, FailurePolicy, ProviderHandle, RunOptions, SceneDirector,
};
use tracing::{info, instrument};

/// Command-line values that take precedence over `[run]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    /// Style preset name
    pub style: Option<String>,
    /// Primary provider name
    pub provider: Option<String>,
    /// Model for the primary provider
    pub model: Option<String>,
    /// Requested total duration in seconds
    pub target_duration: Option<f64>,
    /// Completion calls in flight
    pub concurrency: Option<usize>,
    /// Omit failed scenes instead of aborting
    pub lenient: bool,
    /// Label for the story source
    pub source: Option<String>,
}

impl RunOverrides {
    /// Provider name after applying the override.
    pub fn provider_name<'a>(&'a self, config: &'a StoryreelConfig) -> &'a str {
        self.provider
            .as_deref()
            .unwrap_or_else(|| config.run().provider().as_str())
    }
}

/// Merge `[run]` with the overrides into per-run options.
///
/// # Errors
///
/// Returns an error if the options cannot be built.
pub fn run_options(config: &StoryreelConfig, overrides: &RunOverrides) -> StoryreelResult<RunOptions> {
    let run = config.run();
    let mut builder = RunOptions::builder();
    builder
        .style(overrides.style.clone().unwrap_or_else(|| run.style().clone()))
        .concurrency(overrides.concurrency.unwrap_or(*run.concurrency()).max(1))
        .failure_policy(if overrides.lenient {
            FailurePolicy::Lenient
        } else {
            *run.failure_policy()
        });
    if let Some(target) = overrides.target_duration.or(*run.target_duration()) {
        builder.target_duration(target);
    }
    if let Some(source) = &overrides.source {
        builder.source(source.clone());
    }
    let options = builder
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid run options: {}", e)))?;
    Ok(options)
}

/// Build a director from configuration.
///
/// The primary provider comes from the overrides or `[run].provider`; a
/// `[run].fallback` different from it is attached as the fallback.
///
/// # Errors
///
/// Returns an error for an unknown provider name.
#[instrument(skip_all, fields(provider = tracing::field::Empty))]
pub fn build_director(
    config: &StoryreelConfig,
    overrides: &RunOverrides,
) -> StoryreelResult<SceneDirector> {
    let provider_name = overrides.provider_name(config);
    tracing::Span::current().record("provider", provider_name);

    let mut provider_config = config.provider(provider_name);
    if let Some(model) = &overrides.model {
        provider_config.model = Some(model.clone());
    }
    let primary = ProviderHandle::new(
        build_provider(provider_name, &provider_config)?,
        RateLimiter::new(provider_config.limits()),
    );

    let mut director = SceneDirector::new(primary)
        .with_catalog(config.catalog())
        .with_segmenter(BeatSegmenter::new(config.durations().min_words))
        .with_allocator(DurationAllocator::new(config.durations().bounds()))
        .with_retry_policy(RetryPolicy::new(config.retry().clone()));

    if let Some(fallback) = config
        .run()
        .fallback()
        .as_deref()
        .filter(|fallback| !fallback.eq_ignore_ascii_case(provider_name))
    {
        let fallback_config = config.provider(fallback);
        info!(fallback = %fallback, "Attaching fallback provider");
        director = director.with_fallback(ProviderHandle::new(
            build_provider(fallback, &fallback_config)?,
            RateLimiter::new(fallback_config.limits()),
        ));
    }

    for entity in config.seeded_entities() {
        director = director.with_character(entity);
    }
    Ok(director)
}

/// Run the full pipeline on `story`.
///
/// # Errors
///
/// Configuration errors, then any error from [`SceneDirector::run`].
pub async fn generate(
    config: &StoryreelConfig,
    overrides: &RunOverrides,
    story: &str,
) -> StoryreelResult<ProductionSheet> {
    let director = build_director(config, overrides)?;
    let options = run_options(config, overrides)?;
    Ok(director.run(story, &options).await?)
}
