//! Style preset catalog.

use std::collections::BTreeMap;
use storyreel_core::StylePreset;
use storyreel_error::{SceneError, SceneErrorKind};
use tracing::debug;

/// Registry of named style presets.
///
/// Starts with the five built-in presets (cinematic, documentary, commercial,
/// artistic, anime); more can be registered from configuration. Lookup is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use storyreel_scene::StylePresetCatalog;
///
/// let catalog = StylePresetCatalog::default();
/// assert_eq!(catalog.resolve("Cinematic").unwrap().aspect_ratio(), "2.39:1");
/// assert!(catalog.resolve("steampunk").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StylePresetCatalog {
    presets: BTreeMap<String, StylePreset>,
}

impl Default for StylePresetCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for preset in builtin_presets() {
            catalog.register(preset);
        }
        catalog
    }
}

impl StylePresetCatalog {
    /// A catalog with no presets.
    pub fn empty() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// Add or replace a preset, keyed by its lowercased name.
    pub fn register(&mut self, preset: StylePreset) {
        let key = preset.name().to_lowercase();
        debug!(style = %key, "Registering style preset");
        let preset = if *preset.name() == key {
            preset
        } else {
            preset.renamed(key.clone())
        };
        self.presets.insert(key, preset);
    }

    /// Look up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStyle` listing the registered names.
    #[track_caller]
    pub fn resolve(&self, name: &str) -> Result<&StylePreset, SceneError> {
        self.presets
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| {
                SceneError::new(SceneErrorKind::UnknownStyle {
                    requested: name.to_string(),
                    available: self.names(),
                })
            })
    }

    /// Registered preset names in alphabetical order.
    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Iterate presets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &StylePreset> {
        self.presets.values()
    }
}

fn preset(
    name: &str,
    label: &str,
    directives: &[&str],
    camera: &str,
    lighting: &str,
    aspect_ratio: &str,
    quality_markers: &str,
) -> StylePreset {
    StylePreset::new(
        name,
        label,
        directives.iter().map(|d| d.to_string()).collect(),
        camera,
        lighting,
        aspect_ratio,
        quality_markers,
    )
}

fn builtin_presets() -> Vec<StylePreset> {
    vec![
        preset(
            "cinematic",
            "Cinematic Feature Film",
            &[
                "Emphasize dramatic camera angles and movements",
                "Use film industry standard terminology",
                "Include anamorphic lens characteristics",
                "Teal and orange color grade",
                "Add depth with foreground and background elements",
            ],
            "Anamorphic 2.39:1 framing, slow dolly and crane moves, 35mm wide to 85mm portrait lenses",
            "Motivated key light with deep shadows, teal and orange grade",
            "2.39:1",
            "Anamorphic lens, film grain, 4K, cinematic depth of field",
        ),
        preset(
            "documentary",
            "Documentary / Realistic",
            &[
                "Handheld camera movement for authenticity",
                "Natural, available lighting",
                "Avoid overly stylized shots",
                "Focus on realism and believability",
            ],
            "Handheld observational camera, eye-level framing, zoom lens",
            "Natural available light, no stylized grading",
            "16:9",
            "Natural lighting, handheld camera, 4K, documentary style, realistic",
        ),
        preset(
            "commercial",
            "Commercial / Advertisement",
            &[
                "Clean, polished, high production value",
                "Emphasize subject beauty",
                "Saturated, vibrant colors",
                "Quick cuts and energetic pacing",
            ],
            "Dynamic gimbal and slider moves, hero close-ups",
            "Perfect three-point lighting, bright and glossy",
            "16:9 or 1:1",
            "Perfect lighting, 8K, ultra-sharp, vibrant colors, commercial quality",
        ),
        preset(
            "artistic",
            "Artistic / Experimental",
            &[
                "Creative freedom with camera angles",
                "Abstract or symbolic visuals",
                "Unconventional color grading",
                "Focus on emotion and mood over clarity",
            ],
            "Unconventional angles, experimental movement, unusual lenses",
            "Unique, expressive lighting setups",
            "variable",
            "Artistic, experimental, unique perspective, creative lighting",
        ),
        preset(
            "anime",
            "Anime / Animation Style",
            &[
                "Anime aesthetic and art style",
                "Exaggerated expressions and movements",
                "Vibrant, saturated colors",
                "Anime visual effects: speed lines, dramatic close-ups",
            ],
            "Dramatic close-ups, sweeping pans, speed-line action framing",
            "Dramatic lighting with strong contrasts",
            "16:9",
            "Anime style, high quality animation, vibrant colors, detailed backgrounds",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let catalog = StylePresetCatalog::default();
        assert_eq!(
            catalog.names(),
            vec!["anime", "artistic", "cinematic", "commercial", "documentary"]
        );
    }

    #[test]
    fn unknown_style_lists_available() {
        let catalog = StylePresetCatalog::default();
        let err = catalog.resolve("steampunk").unwrap_err();
        match err.kind {
            SceneErrorKind::UnknownStyle {
                requested,
                available,
            } => {
                assert_eq!(requested, "steampunk");
                assert_eq!(available.len(), 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn registered_names_are_lowercased() {
        let mut catalog = StylePresetCatalog::empty();
        let noir = catalog_preset("Noir");
        catalog.register(noir);
        assert_eq!(catalog.resolve("NOIR").unwrap().name(), "noir");
    }

    fn catalog_preset(name: &str) -> StylePreset {
        preset(name, "Film Noir", &[], "low angles", "hard light", "1.37:1", "grain")
    }
}
