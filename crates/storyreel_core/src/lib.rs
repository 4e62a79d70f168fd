//! Core data types for Storyreel.
//!
//! Beats, entities, style presets, generation requests and the scene records
//! and production sheets that come out the other end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod beat;
mod entity;
mod request;
mod scene;
mod sheet;
mod style;

pub use beat::Beat;
pub use entity::{Entity, EntityKind};
pub use request::{GenerationRequest, PromptSection, SectionKind};
pub use scene::{MotionIntensity, SceneRecord, SceneRecordBuilder, SceneRecordBuilderError, Transition};
pub use sheet::{OmittedScene, ProductionSheet, RunMetadata, SheetStatistics};
pub use style::{StylePreset, StylePresetBuilder, StylePresetBuilderError};
