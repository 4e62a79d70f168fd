//! Sequential entity pre-pass producing per-beat scene context.

use crate::CharacterConsistencyRegistry;
use crate::analysis::{action_verbs, has_gaze, motion_intensity, sightings};
use std::collections::BTreeSet;
use storyreel_core::{Beat, Entity, EntityKind, MotionIntensity};
use tracing::{debug, instrument};

/// What a beat hands on to the one after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousScene {
    /// Motion level of the previous beat
    pub motion: MotionIntensity,
    /// The previous beat contains a verb of looking
    pub gaze: bool,
    /// Lowercased names of the non-setting entities it mentioned
    pub subjects: BTreeSet<String>,
}

/// Everything about a beat that is fixed before any completion call.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SceneContext {
    /// Beat index
    index: usize,
    /// Total beats in the run
    scene_count: usize,
    /// Motion level
    motion: MotionIntensity,
    /// Non-setting entities mentioned, with frozen descriptions
    subjects: Vec<Entity>,
    /// Settings mentioned in this beat
    settings: Vec<Entity>,
    /// Most recent setting from an earlier beat
    established_setting: Option<Entity>,
    /// Summary of the previous beat
    previous: Option<PreviousScene>,
    /// Base forms of the action verbs, in order
    actions: Vec<String>,
}

impl SceneContext {
    /// True for the first beat.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// True for the last beat.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.scene_count
    }

    /// Lowercased names of the non-setting entities in this beat.
    pub fn subject_keys(&self) -> BTreeSet<String> {
        self.subjects
            .iter()
            .map(|entity| entity.canonical_name().to_lowercase())
            .collect()
    }

    /// Setting of this beat, or the last one established before it.
    pub fn effective_setting(&self) -> Option<&Entity> {
        self.settings.first().or(self.established_setting.as_ref())
    }
}

/// Resolve every beat's entity sightings against the registry, in beat order.
///
/// Runs before any concurrent work so introduction order is beat order and
/// every request sees frozen descriptions.
#[instrument(skip_all, fields(beats = beats.len()))]
pub fn resolve_beats(
    beats: &[Beat],
    registry: &mut CharacterConsistencyRegistry,
) -> Vec<SceneContext> {
    let scene_count = beats.len();
    let mut contexts: Vec<SceneContext> = Vec::with_capacity(scene_count);
    let mut established: Option<Entity> = None;
    let mut previous_text: Option<&str> = None;

    for beat in beats {
        let text = beat.source_text().as_str();
        let mut seen = BTreeSet::new();
        let mut subjects = Vec::new();
        let mut settings = Vec::new();

        for sighting in sightings(text) {
            if !seen.insert(sighting.name.to_lowercase()) {
                continue;
            }
            registry.resolve(
                &sighting.name,
                sighting.kind,
                &sighting.proposed,
                Some(*beat.index()),
            );
            let Some(entity) = registry.get(&sighting.name).cloned() else {
                continue;
            };
            if *entity.kind() == EntityKind::Setting {
                settings.push(entity);
            } else {
                subjects.push(entity);
            }
        }

        let previous = contexts
            .last()
            .zip(previous_text)
            .map(|(prior, prior_text)| PreviousScene {
                motion: prior.motion,
                gaze: has_gaze(prior_text),
                subjects: prior.subject_keys(),
            });

        let context = SceneContext {
            index: *beat.index(),
            scene_count,
            motion: motion_intensity(text, *beat.complexity_score()),
            subjects,
            settings,
            established_setting: established.clone(),
            previous,
            actions: action_verbs(text).into_iter().map(str::to_string).collect(),
        };
        debug!(
            beat_index = context.index,
            subjects = context.subjects.len(),
            settings = context.settings.len(),
            motion = %context.motion,
            "Resolved beat"
        );
        if let Some(setting) = context.settings.last() {
            established = Some(setting.clone());
        }
        contexts.push(context);
        previous_text = Some(text);
    }
    contexts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BeatSegmenter;

    const STORY: &str = "Raju sits on the roof watching stars. A bright light descends. \
                         The light becomes a fairy who reaches out her hand.";

    #[test]
    fn entities_resolve_in_beat_order() {
        let beats = BeatSegmenter::default().segment(STORY).unwrap();
        let mut registry = CharacterConsistencyRegistry::new();
        let contexts = resolve_beats(&beats, &mut registry);

        let names: Vec<String> = registry
            .snapshot()
            .entities()
            .iter()
            .map(|e| e.canonical_name().clone())
            .collect();
        assert_eq!(names, vec!["Raju", "roof", "star", "light", "fairy"]);

        assert_eq!(
            contexts[2].subjects()[0].description_fingerprint(),
            "bright light"
        );
        assert_eq!(contexts[1].established_setting().as_ref().unwrap().canonical_name(), "roof");
        assert!(contexts[1].previous().as_ref().unwrap().gaze);
        assert!(contexts[0].is_first());
        assert!(contexts[2].is_last());
    }
}
