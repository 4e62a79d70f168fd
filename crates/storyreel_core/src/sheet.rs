//! Production sheets: the ordered scene list plus run-level metadata.

use crate::{MotionIntensity, SceneRecord, Transition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Run-level metadata exported alongside the scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RunMetadata {
    /// When the sheet was produced
    generated_at: DateTime<Utc>,
    /// Style preset name
    style: String,
    /// Completion provider identifier
    provider: String,
    /// Model identifier
    model: String,
    /// Requested total duration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_duration: Option<f64>,
    /// Sum of all scene durations
    total_duration_seconds: u32,
    /// Number of scenes produced
    scene_count: usize,
    /// Where the story came from (file path or label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl RunMetadata {
    /// Create metadata stamped with the current time.
    pub fn new(
        style: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
        target_duration: Option<f64>,
        scenes: &[SceneRecord],
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            style: style.into(),
            provider: provider.into(),
            model: model.into(),
            target_duration,
            total_duration_seconds: scenes.iter().map(|s| *s.duration_seconds()).sum(),
            scene_count: scenes.len(),
            source: None,
        }
    }

    /// Attach the story source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A beat that produced no scene under the lenient failure policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct OmittedScene {
    /// Beat that failed
    beat_index: usize,
    /// Source excerpt
    beat_text: String,
    /// Why it was dropped
    reason: String,
}

impl OmittedScene {
    /// Record an omitted beat.
    pub fn new(beat_index: usize, beat_text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            beat_index,
            beat_text: beat_text.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered scene list plus metadata, as consumed by exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProductionSheet {
    /// Run metadata
    metadata: RunMetadata,
    /// Scenes in ascending beat order
    scenes: Vec<SceneRecord>,
    /// Beats dropped under the lenient policy, in beat order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    omitted: Vec<OmittedScene>,
}

impl ProductionSheet {
    /// Create a sheet; scenes and omissions are ordered by beat index.
    pub fn new(
        metadata: RunMetadata,
        mut scenes: Vec<SceneRecord>,
        mut omitted: Vec<OmittedScene>,
    ) -> Self {
        scenes.sort_by_key(|scene| *scene.beat_index());
        omitted.sort_by_key(|omission| *omission.beat_index());
        Self {
            metadata,
            scenes,
            omitted,
        }
    }

    /// Compute summary statistics over the scenes.
    pub fn statistics(&self) -> SheetStatistics {
        SheetStatistics::from_scenes(&self.scenes)
    }
}

/// Summary figures for a production sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SheetStatistics {
    /// Number of scenes
    total_scenes: usize,
    /// Sum of durations in seconds
    total_duration_seconds: u32,
    /// Mean scene duration (0 for an empty sheet)
    average_scene_duration: f64,
    /// Scene count per motion intensity
    motion_distribution: BTreeMap<MotionIntensity, usize>,
    /// Scene count per transition
    transition_distribution: BTreeMap<Transition, usize>,
}

impl SheetStatistics {
    /// Tally the given scenes.
    pub fn from_scenes(scenes: &[SceneRecord]) -> Self {
        let total_duration_seconds: u32 = scenes.iter().map(|s| *s.duration_seconds()).sum();
        let mut motion_distribution = BTreeMap::new();
        let mut transition_distribution = BTreeMap::new();
        for scene in scenes {
            *motion_distribution.entry(*scene.motion_intensity()).or_insert(0) += 1;
            *transition_distribution.entry(*scene.transition()).or_insert(0) += 1;
        }
        let average_scene_duration = if scenes.is_empty() {
            0.0
        } else {
            f64::from(total_duration_seconds) / scenes.len() as f64
        };
        Self {
            total_scenes: scenes.len(),
            total_duration_seconds,
            average_scene_duration,
            motion_distribution,
            transition_distribution,
        }
    }

    /// Total duration expressed in minutes.
    pub fn total_duration_minutes(&self) -> f64 {
        f64::from(self.total_duration_seconds) / 60.0
    }
}
