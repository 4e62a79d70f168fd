//! End-to-end run: story text in, production sheet out.

use crate::{
    BeatSegmenter, CharacterConsistencyRegistry, ContinuityTransitions, DurationAllocator,
    SceneContext, SceneRequestBuilder, StylePresetCatalog, TransitionPolicy, assemble,
    resolve_beats,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use storyreel_core::{
    Beat, Entity, GenerationRequest, OmittedScene, ProductionSheet, RunMetadata, SceneRecord,
};
use storyreel_error::{SceneError, SceneErrorKind};
use storyreel_interface::CompletionProvider;
use storyreel_rate_limit::{RateLimiter, RetryPolicy};
use tracing::{error, info, instrument, warn};

/// What to do when a scene cannot be produced.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FailurePolicy {
    /// Abort the run on the first failure, cancelling outstanding calls
    #[default]
    FailFast,
    /// Record the scene as omitted and carry on
    Lenient,
}

/// Per-run settings.
///
/// # Examples
///
/// ```
/// use storyreel_scene::{FailurePolicy, RunOptions};
///
/// let options = RunOptions::builder()
///     .style("anime")
///     .target_duration(30.0)
///     .failure_policy(FailurePolicy::Lenient)
///     .build()
///     .unwrap();
/// assert_eq!(options.concurrency(), &2);
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct RunOptions {
    /// Style preset name
    #[builder(default = "\"cinematic\".to_string()")]
    style: String,
    /// Requested total duration in seconds
    #[builder(default, setter(into, strip_option))]
    target_duration: Option<f64>,
    /// Completion calls in flight
    #[builder(default = "2")]
    concurrency: usize,
    /// Failure handling
    #[builder(default)]
    failure_policy: FailurePolicy,
    /// Label for the story source, e.g. its file name
    #[builder(default, setter(into, strip_option))]
    source: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            style: "cinematic".to_string(),
            target_duration: None,
            concurrency: 2,
            failure_policy: FailurePolicy::default(),
            source: None,
        }
    }
}

impl RunOptions {
    /// Creates a new builder.
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder::default()
    }
}

/// A completion provider with the rate limiter that guards it.
#[derive(Clone)]
pub struct ProviderHandle {
    provider: Arc<dyn CompletionProvider>,
    limiter: RateLimiter,
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_name())
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl ProviderHandle {
    /// Pair a provider with its limiter.
    pub fn new(provider: Arc<dyn CompletionProvider>, limiter: RateLimiter) -> Self {
        Self { provider, limiter }
    }

    /// A provider without rate limits.
    pub fn unlimited(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::new(provider, RateLimiter::unlimited())
    }

    /// The provider.
    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// The limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

/// One beat's work, fixed before fan-out.
struct SceneJob {
    beat: Beat,
    duration: u32,
    context: SceneContext,
    request: GenerationRequest,
}

/// Runs the whole pipeline.
///
/// Segmentation, allocation and entity resolution happen synchronously and in
/// beat order; completion calls then run with bounded concurrency and the
/// results are reassembled in beat order.
///
/// # Example
///
/// ```rust,ignore
/// let director = SceneDirector::new(ProviderHandle::unlimited(provider))
///     .with_retry_policy(RetryPolicy::default());
/// let sheet = director.run(&story, &RunOptions::default()).await?;
/// ```
pub struct SceneDirector {
    catalog: StylePresetCatalog,
    segmenter: BeatSegmenter,
    allocator: DurationAllocator,
    requests: SceneRequestBuilder,
    transitions: Arc<dyn TransitionPolicy>,
    characters: Vec<Entity>,
    primary: ProviderHandle,
    fallback: Option<ProviderHandle>,
}

impl fmt::Debug for SceneDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDirector")
            .field("styles", &self.catalog.names())
            .field("segmenter", &self.segmenter)
            .field("allocator", &self.allocator)
            .field("transitions", &self.transitions)
            .field("characters", &self.characters.len())
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl SceneDirector {
    /// Create a director with built-in styles and default settings.
    pub fn new(primary: ProviderHandle) -> Self {
        Self {
            catalog: StylePresetCatalog::default(),
            segmenter: BeatSegmenter::default(),
            allocator: DurationAllocator::default(),
            requests: SceneRequestBuilder::default(),
            transitions: Arc::new(ContinuityTransitions),
            characters: Vec::new(),
            primary,
            fallback: None,
        }
    }

    /// Replace the style catalog.
    pub fn with_catalog(mut self, catalog: StylePresetCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the segmenter.
    pub fn with_segmenter(mut self, segmenter: BeatSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Replace the duration allocator.
    pub fn with_allocator(mut self, allocator: DurationAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Retry policy for completion calls.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.requests = SceneRequestBuilder::new(policy);
        self
    }

    /// Replace the transition rules.
    pub fn with_transition_policy(mut self, policy: Arc<dyn TransitionPolicy>) -> Self {
        self.transitions = policy;
        self
    }

    /// Provider tried for a beat after the primary is unavailable.
    pub fn with_fallback(mut self, fallback: ProviderHandle) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Seed the registry with a known description before every run.
    pub fn with_character(mut self, entity: Entity) -> Self {
        self.characters.push(entity);
        self
    }

    /// Style catalog in use.
    pub fn catalog(&self) -> &StylePresetCatalog {
        &self.catalog
    }

    /// Turn `story` into a production sheet.
    ///
    /// # Errors
    ///
    /// - `UnknownStyle` if the style is not registered
    /// - `EmptyInput` for a blank story
    /// - `InfeasibleDuration` if the target cannot be met
    /// - `ProviderUnavailable` or `Assembly` for the first failed scene under
    ///   [`FailurePolicy::FailFast`], and `Assembly` under either policy
    #[instrument(
        skip(self, story, options),
        fields(
            style = %options.style(),
            provider = self.primary.provider().provider_name(),
            concurrency = options.concurrency()
        )
    )]
    pub async fn run(&self, story: &str, options: &RunOptions) -> Result<ProductionSheet, SceneError> {
        let style = self.catalog.resolve(options.style())?;
        let beats = self.segmenter.segment(story)?;
        let durations = self.allocator.allocate(&beats, *options.target_duration())?;

        let mut registry = CharacterConsistencyRegistry::new();
        for entity in &self.characters {
            registry.seed(
                entity.canonical_name(),
                *entity.kind(),
                entity.description_fingerprint(),
            );
        }
        let contexts = resolve_beats(&beats, &mut registry);
        let snapshot = registry.snapshot();
        info!(
            beats = beats.len(),
            entities = snapshot.len(),
            "Prepared scenes"
        );

        let jobs: Vec<SceneJob> = beats
            .into_iter()
            .zip(durations)
            .zip(contexts)
            .map(|((beat, duration), context)| {
                let request = self
                    .requests
                    .build(&beat, duration, style, &snapshot, &context);
                SceneJob {
                    beat,
                    duration,
                    context,
                    request,
                }
            })
            .collect();

        let scene_count = jobs.len();
        let texts: Vec<String> = jobs.iter().map(|job| job.beat.source_text().clone()).collect();
        let mut slots: Vec<Option<SceneRecord>> = vec![None; scene_count];
        let mut omitted = Vec::new();

        let mut results = stream::iter(jobs)
            .map(|job| async move {
                let index = *job.beat.index();
                (index, self.render(job).await)
            })
            .buffer_unordered((*options.concurrency()).max(1));

        while let Some((index, result)) = results.next().await {
            match result {
                Ok(record) => slots[index] = Some(record),
                Err(e) => match options.failure_policy() {
                    FailurePolicy::FailFast => {
                        error!(beat_index = index, error = %e, "Scene failed, aborting run");
                        return Err(e);
                    }
                    FailurePolicy::Lenient
                        if matches!(e.kind, SceneErrorKind::ProviderUnavailable { .. }) =>
                    {
                        warn!(beat_index = index, error = %e, "Scene failed, omitting");
                        omitted.push(OmittedScene::new(index, texts[index].clone(), e.kind.to_string()));
                    }
                    FailurePolicy::Lenient => {
                        error!(beat_index = index, error = %e, "Scene failed internally, aborting run");
                        return Err(e);
                    }
                },
            }
        }

        let scenes: Vec<SceneRecord> = slots.into_iter().flatten().collect();
        let mut metadata = RunMetadata::new(
            style.name().clone(),
            self.primary.provider().provider_name(),
            self.primary.provider().model_name(),
            *options.target_duration(),
            &scenes,
        );
        if let Some(source) = options.source() {
            metadata = metadata.with_source(source.clone());
        }
        info!(
            scenes = scenes.len(),
            omitted = omitted.len(),
            total_seconds = metadata.total_duration_seconds(),
            "Run complete"
        );
        Ok(ProductionSheet::new(metadata, scenes, omitted))
    }

    /// Complete and assemble one scene, trying the fallback provider if needed.
    async fn render(&self, job: SceneJob) -> Result<SceneRecord, SceneError> {
        let primary = self
            .requests
            .submit(&job.request, self.primary.provider(), self.primary.limiter())
            .await;

        let prompt = match (primary, &self.fallback) {
            (Ok(prompt), _) => prompt,
            (Err(e), Some(fallback))
                if matches!(e.kind, SceneErrorKind::ProviderUnavailable { .. }) =>
            {
                warn!(
                    beat_index = *job.beat.index(),
                    fallback = fallback.provider().provider_name(),
                    error = %e,
                    "Primary provider unavailable, trying fallback"
                );
                self.requests
                    .submit(&job.request, fallback.provider(), fallback.limiter())
                    .await?
            }
            (Err(e), _) => return Err(e),
        };

        assemble(
            &job.beat,
            job.duration,
            &prompt,
            &job.context,
            self.transitions.as_ref(),
        )
    }
}
