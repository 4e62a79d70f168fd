//! Scene records handed to exporters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a scene is entered from the one before it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Transition {
    /// Hard cut for pace and energy
    Cut,
    /// Smooth blend for passing time or emotional connection
    Dissolve,
    /// Through black, for openings, endings and major shifts
    Fade,
    /// Same subject or shape from a different angle
    MatchCut,
    /// Fast pan following motion
    WhipPan,
    /// Movement carries across the cut
    MotionMatch,
    /// A look, then what is looked at
    EyelineMatch,
}

/// How much on-screen movement a scene carries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MotionIntensity {
    /// Breathing, glances, stillness
    Low,
    /// Walking, gesturing
    Medium,
    /// Running, impacts, rapid camera work
    High,
}

/// Final structured description of one generated video scene.
///
/// Built once per beat after the completion call returns; immutable afterwards.
///
/// # Examples
///
/// ```
/// use storyreel_core::{MotionIntensity, SceneRecord, Transition};
///
/// let scene = SceneRecord::builder()
///     .beat_index(0usize)
///     .beat_text("Raju sits on the roof watching stars.")
///     .visual_prompt("Low-angle 35mm wide shot of a boy on a moonlit rooftop.")
///     .duration_seconds(6u32)
///     .transition(Transition::Fade)
///     .motion_intensity(MotionIntensity::Low)
///     .audio_suggestion("Crickets, soft night breeze")
///     .build()
///     .unwrap();
/// assert_eq!(scene.scene_number(), 1);
/// assert!(scene.key_elements().is_empty());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct SceneRecord {
    /// Index of the beat this scene renders
    beat_index: usize,
    /// Source excerpt for the beat
    beat_text: String,
    /// Prompt text returned by the completion provider
    visual_prompt: String,
    /// Screen time in whole seconds
    duration_seconds: u32,
    /// Entry transition
    transition: Transition,
    /// Movement level
    motion_intensity: MotionIntensity,
    /// Sound design suggestion
    audio_suggestion: String,
    /// Entity and concept tags referenced by the beat
    #[builder(default)]
    #[serde(default)]
    key_elements: BTreeSet<String>,
    /// Canonical names of registry entities appearing in the beat
    #[builder(default)]
    #[serde(default)]
    characters: Vec<String>,
}

impl SceneRecord {
    /// Creates a new builder.
    pub fn builder() -> SceneRecordBuilder {
        SceneRecordBuilder::default()
    }

    /// One-based scene number for display.
    pub fn scene_number(&self) -> usize {
        self.beat_index + 1
    }
}
