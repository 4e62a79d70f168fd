//! Visual style presets.

use serde::{Deserialize, Serialize};

/// Named bundle of camera, lighting and tone directives applied to every scene of a run.
///
/// # Examples
///
/// ```
/// use storyreel_core::StylePreset;
///
/// let noir = StylePreset::builder()
///     .name("noir")
///     .label("Film Noir")
///     .directives(vec!["High-contrast black and white".to_string()])
///     .camera("Low angles, slow push-ins")
///     .lighting("Hard key light through venetian blinds")
///     .aspect_ratio("1.37:1")
///     .quality_markers("35mm film grain, 4K")
///     .build()
///     .unwrap();
/// assert_eq!(noir.name(), "noir");
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
pub struct StylePreset {
    /// Lookup key (lowercase)
    name: String,
    /// Human-readable label
    label: String,
    /// Ordered instruction fragments merged into every request
    #[serde(default)]
    directives: Vec<String>,
    /// Camera philosophy
    camera: String,
    /// Lighting and colour grade
    lighting: String,
    /// Target aspect ratio
    aspect_ratio: String,
    /// Technical quality markers appended to prompts
    quality_markers: String,
}

impl StylePreset {
    /// Creates a new builder.
    pub fn builder() -> StylePresetBuilder {
        StylePresetBuilder::default()
    }

    /// Create a preset from its parts.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        directives: Vec<String>,
        camera: impl Into<String>,
        lighting: impl Into<String>,
        aspect_ratio: impl Into<String>,
        quality_markers: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            directives,
            camera: camera.into(),
            lighting: lighting.into(),
            aspect_ratio: aspect_ratio.into(),
            quality_markers: quality_markers.into(),
        }
    }

    /// Returns a copy registered under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}
