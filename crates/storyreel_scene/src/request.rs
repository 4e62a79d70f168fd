//! Per-beat generation requests and their submission to a provider.

use crate::{RegistrySnapshot, SceneContext};
use storyreel_core::{
    Beat, Entity, GenerationRequest, MotionIntensity, PromptSection, SectionKind, StylePreset,
};
use storyreel_error::{SceneError, SceneErrorKind};
use storyreel_interface::CompletionProvider;
use storyreel_rate_limit::{RateLimiter, RetryPolicy};
use tracing::{info, instrument, warn};

/// Composes one structured request per beat and submits it with retry.
///
/// Never touches the registry: descriptions come from a snapshot taken
/// after the sequential pre-pass.
#[derive(Debug, Clone, Default)]
pub struct SceneRequestBuilder {
    retry: RetryPolicy,
}

impl SceneRequestBuilder {
    /// Create a builder that submits with the given retry policy.
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// Retry policy used by [`submit`](Self::submit).
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build the request for one beat.
    ///
    /// Sections appear as SUBJECT, ACTION, SETTING, STYLE, CAMERA & LIGHTING,
    /// TECHNICAL; SUBJECT is left out when no entity is mentioned.
    #[instrument(skip_all, fields(beat_index = *beat.index(), duration = duration))]
    pub fn build(
        &self,
        beat: &Beat,
        duration: u32,
        style: &StylePreset,
        snapshot: &RegistrySnapshot,
        context: &SceneContext,
    ) -> GenerationRequest {
        let mut sections = Vec::with_capacity(6);

        if !context.subjects().is_empty() {
            let lines: Vec<String> = context
                .subjects()
                .iter()
                .map(|entity| describe(entity, snapshot))
                .collect();
            sections.push(PromptSection::new(SectionKind::Subject, lines.join("\n")));
        }

        sections.push(PromptSection::new(SectionKind::Action, beat.source_text().clone()));
        sections.push(PromptSection::new(
            SectionKind::Setting,
            setting_body(context, snapshot),
        ));

        let mut style_body = style.label().clone();
        for directive in style.directives() {
            style_body.push_str("\n- ");
            style_body.push_str(directive);
        }
        sections.push(PromptSection::new(SectionKind::Style, style_body));

        sections.push(PromptSection::new(
            SectionKind::CameraLighting,
            camera_body(style, context),
        ));

        sections.push(PromptSection::new(
            SectionKind::Technical,
            format!(
                "Aspect ratio {}. {}. {} seconds, 4K resolution, high detail, sharp focus.",
                style.aspect_ratio(),
                style.quality_markers(),
                duration
            ),
        ));

        let instruction = format!(
            "Scene {} of {}, {} seconds. Write one production-ready visual prompt for this scene.",
            beat.index() + 1,
            context.scene_count(),
            duration
        );

        GenerationRequest::new(
            *beat.index(),
            *context.scene_count(),
            duration,
            instruction,
            sections,
            snapshot.cast_reference(),
        )
    }

    /// Send a request and return the provider's prompt text.
    ///
    /// Transient failures are retried per the policy; each attempt takes a
    /// rate-limiter slot.
    ///
    /// # Errors
    ///
    /// Returns `ProviderUnavailable` with the beat index once the error is
    /// permanent or the attempts are exhausted.
    #[instrument(
        skip_all,
        fields(
            beat_index = *request.beat_index(),
            provider = provider.provider_name(),
            model = provider.model_name()
        )
    )]
    pub async fn submit(
        &self,
        request: &GenerationRequest,
        provider: &dyn CompletionProvider,
        limiter: &RateLimiter,
    ) -> Result<String, SceneError> {
        let text = request.render();
        match limiter
            .execute(&self.retry, || provider.complete(&text))
            .await
        {
            Ok(prompt) => {
                info!(chars = prompt.len(), "Received visual prompt");
                Ok(prompt)
            }
            Err(failure) => {
                warn!(
                    attempts = failure.attempts,
                    category = failure.error.kind.category(),
                    "Provider unavailable"
                );
                Err(SceneError::new(SceneErrorKind::ProviderUnavailable {
                    beat_index: *request.beat_index(),
                    provider: provider.provider_name().to_string(),
                    attempts: failure.attempts,
                    cause: failure.error.kind.to_string(),
                }))
            }
        }
    }
}

/// One registry line: the fingerprint, prefixed by the name unless it already contains it.
fn describe(entity: &Entity, snapshot: &RegistrySnapshot) -> String {
    let name = entity.canonical_name();
    let fingerprint = snapshot
        .fingerprint(name)
        .unwrap_or(entity.description_fingerprint());
    if fingerprint.to_lowercase().contains(&name.to_lowercase()) {
        fingerprint.to_string()
    } else {
        format!("{}: {}", name, fingerprint)
    }
}

fn setting_body(context: &SceneContext, snapshot: &RegistrySnapshot) -> String {
    if !context.settings().is_empty() {
        return context
            .settings()
            .iter()
            .map(|setting| describe(setting, snapshot))
            .collect::<Vec<_>>()
            .join("; ");
    }
    match context.established_setting() {
        Some(setting) => format!(
            "Same location as the previous scene: {}",
            describe(setting, snapshot)
        ),
        None => "Not stated; choose a location that fits the action and keep it for later scenes"
            .to_string(),
    }
}

fn camera_body(style: &StylePreset, context: &SceneContext) -> String {
    let movement = match context.motion() {
        MotionIntensity::Low => "Slow and steady: locked-off frame or gentle push-in",
        MotionIntensity::Medium => "Smooth tracking or dolly movement following the action",
        MotionIntensity::High => "Dynamic handheld or fast tracking shot matching the action",
    };
    let continuity = if context.is_first() {
        "Opening shot: establish the environment, lighting and atmosphere that persist through the sequence"
            .to_string()
    } else {
        format!(
            "Continue from scene {}: keep lighting direction, time of day and screen positions consistent",
            context.index()
        )
    };
    format!(
        "Camera: {}\nMovement: {}\nLighting: {}\nContinuity: {}",
        style.camera(),
        movement,
        style.lighting(),
        continuity
    )
}
