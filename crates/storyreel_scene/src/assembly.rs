//! Scene record assembly and transition selection.

use crate::SceneContext;
use crate::lexicon::ambient_for;
use std::collections::BTreeSet;
use std::fmt;
use storyreel_core::{Beat, EntityKind, MotionIntensity, SceneRecord, Transition};
use storyreel_error::{SceneError, SceneErrorKind};
use tracing::{debug, instrument};

/// Audio used when nothing in the scene suggests a sound bed.
pub const DEFAULT_AUDIO: &str = "Ambient atmosphere";

/// Chooses how a scene is entered.
pub trait TransitionPolicy: Send + Sync + fmt::Debug {
    /// Transition into the scene described by `context`.
    fn transition(&self, context: &SceneContext) -> Transition;
}

/// Default transition rules, applied in order:
///
/// 1. first and last scenes fade
/// 2. the previous beat looks at something: `eyeline_match`
/// 3. shares a subject with the previous beat and is high motion: `motion_match`
/// 4. shares a subject with the previous beat: `match_cut`
/// 5. high motion: `whip_pan` after another high-motion beat, else `cut`
/// 6. low motion: `dissolve`
/// 7. otherwise `cut`
///
/// Settings do not count as shared subjects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuityTransitions;

impl TransitionPolicy for ContinuityTransitions {
    fn transition(&self, context: &SceneContext) -> Transition {
        if context.is_first() || context.is_last() {
            return Transition::Fade;
        }
        let Some(previous) = context.previous() else {
            return Transition::Fade;
        };
        let motion = *context.motion();
        let shares_subject = !previous.subjects.is_disjoint(&context.subject_keys());

        if previous.gaze {
            Transition::EyelineMatch
        } else if shares_subject && motion == MotionIntensity::High {
            Transition::MotionMatch
        } else if shares_subject {
            Transition::MatchCut
        } else if motion == MotionIntensity::High {
            if previous.motion == MotionIntensity::High {
                Transition::WhipPan
            } else {
                Transition::Cut
            }
        } else if motion == MotionIntensity::Low {
            Transition::Dissolve
        } else {
            Transition::Cut
        }
    }
}

/// Sound suggestion: the ambient bed of the scene's setting plus a cue for its motion.
pub fn audio_suggestion(context: &SceneContext) -> String {
    let bed = context
        .effective_setting()
        .and_then(|setting| ambient_for(setting.canonical_name()))
        .unwrap_or(DEFAULT_AUDIO);
    match context.motion() {
        MotionIntensity::High => format!("{}, with a driving percussive score", bed),
        MotionIntensity::Low => format!("{}, with a soft sustained score", bed),
        MotionIntensity::Medium => bed.to_string(),
    }
}

/// Merge a provider's prompt text with the beat's structural metadata.
///
/// # Errors
///
/// Returns `Assembly` if the prompt text is empty or whitespace.
#[instrument(skip_all, fields(beat_index = *beat.index(), duration = duration))]
pub fn assemble(
    beat: &Beat,
    duration: u32,
    completion_text: &str,
    context: &SceneContext,
    policy: &dyn TransitionPolicy,
) -> Result<SceneRecord, SceneError> {
    let visual_prompt = completion_text.trim();
    if visual_prompt.is_empty() {
        return Err(SceneError::new(SceneErrorKind::Assembly {
            beat_index: *beat.index(),
            reason: "provider returned an empty prompt".to_string(),
        }));
    }

    let transition = policy.transition(context);
    let mut key_elements: BTreeSet<String> = context
        .subjects()
        .iter()
        .chain(context.settings())
        .map(|entity| entity.canonical_name().clone())
        .collect();
    key_elements.extend(context.actions().iter().cloned());

    let characters: Vec<String> = context
        .subjects()
        .iter()
        .filter(|entity| matches!(entity.kind(), EntityKind::Character | EntityKind::Creature))
        .map(|entity| entity.canonical_name().clone())
        .collect();

    debug!(%transition, motion = %context.motion(), "Assembling scene");
    SceneRecord::builder()
        .beat_index(*beat.index())
        .beat_text(beat.source_text().clone())
        .visual_prompt(visual_prompt)
        .duration_seconds(duration)
        .transition(transition)
        .motion_intensity(*context.motion())
        .audio_suggestion(audio_suggestion(context))
        .key_elements(key_elements)
        .characters(characters)
        .build()
        .map_err(|e| {
            SceneError::new(SceneErrorKind::Assembly {
                beat_index: *beat.index(),
                reason: e.to_string(),
            })
        })
}
