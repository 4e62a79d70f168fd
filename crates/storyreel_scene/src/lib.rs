//! Scene decomposition and consistency engine.
//!
//! Turns a prose story into an ordered list of scene records:
//!
//! 1. [`BeatSegmenter`] splits the story into beats
//! 2. [`DurationAllocator`] gives each beat its screen time
//! 3. [`resolve_beats`] fixes every entity description in the
//!    [`CharacterConsistencyRegistry`], sequentially and in beat order
//! 4. [`SceneRequestBuilder`] composes and submits one request per beat
//! 5. [`assemble`] merges each completion with the beat's metadata
//!
//! [`SceneDirector`] runs the whole pipeline with bounded concurrency.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod assembly;
mod context;
mod director;
mod duration;
mod lexicon;
mod registry;
mod request;
mod segmenter;
mod style;

pub use analysis::{Sighting, complexity, motion_intensity, sightings, word_count};
pub use assembly::{
    ContinuityTransitions, DEFAULT_AUDIO, TransitionPolicy, assemble, audio_suggestion,
};
pub use context::{PreviousScene, SceneContext, resolve_beats};
pub use director::{
    FailurePolicy, ProviderHandle, RunOptions, RunOptionsBuilder, RunOptionsBuilderError,
    SceneDirector,
};
pub use duration::{DurationAllocator, DurationBounds};
pub use registry::{CharacterConsistencyRegistry, RegistrySnapshot};
pub use request::SceneRequestBuilder;
pub use segmenter::{BeatSegmenter, DEFAULT_MIN_WORDS};
pub use style::StylePresetCatalog;
