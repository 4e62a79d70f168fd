//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`storyreel.toml` compiled into the binary)
//! 2. `~/.config/storyreel/storyreel.toml`
//! 3. `./storyreel.toml`
//!
//! API keys never live here; providers read them from the environment.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use storyreel_core::{Entity, EntityKind, StylePreset};
use storyreel_error::{ConfigError, StoryreelResult};
use storyreel_export::ExportFormat;
use storyreel_models::ProviderConfig;
use storyreel_rate_limit::RetryConfig;
use storyreel_scene::{DEFAULT_MIN_WORDS, DurationBounds, FailurePolicy, StylePresetCatalog};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storyreel.toml");

/// `[run]`: defaults for a generation run, overridable on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Style preset name
    #[serde(default = "default_style")]
    style: String,
    /// Primary provider name
    #[serde(default = "default_provider")]
    provider: String,
    /// Provider tried when the primary is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
    /// Completion calls in flight
    #[serde(default = "default_concurrency")]
    concurrency: usize,
    /// Failure handling
    #[serde(default)]
    failure_policy: FailurePolicy,
    /// Requested total duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_duration: Option<f64>,
    /// Output base path, without extension
    #[serde(default = "default_output")]
    output: String,
    /// Export format
    #[serde(default)]
    format: ExportFormat,
}

fn default_style() -> String {
    "cinematic".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_concurrency() -> usize {
    2
}

fn default_output() -> String {
    "production_sheet".to_string()
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            style: default_style(),
            provider: default_provider(),
            fallback: None,
            concurrency: default_concurrency(),
            failure_policy: FailurePolicy::default(),
            target_duration: None,
            output: default_output(),
            format: ExportFormat::default(),
        }
    }
}

/// `[durations]`: allocation bounds plus the short-beat merge threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationSection {
    /// Shortest scene in seconds
    pub min: u32,
    /// Longest scene in seconds
    pub max: u32,
    /// Untargeted duration for a zero-complexity beat
    pub default_min: u32,
    /// Untargeted duration for a saturated beat
    pub default_max: u32,
    /// Permitted distance between the allocated total and the target
    pub tolerance: f64,
    /// Beats shorter than this many words are merged
    pub min_words: usize,
}

impl Default for DurationSection {
    fn default() -> Self {
        let bounds = DurationBounds::default();
        Self {
            min: bounds.min,
            max: bounds.max,
            default_min: bounds.default_min,
            default_max: bounds.default_max,
            tolerance: bounds.tolerance,
            min_words: DEFAULT_MIN_WORDS,
        }
    }
}

impl DurationSection {
    /// The allocator bounds.
    pub fn bounds(&self) -> DurationBounds {
        DurationBounds {
            min: self.min,
            max: self.max,
            default_min: self.default_min,
            default_max: self.default_max,
            tolerance: self.tolerance,
        }
    }
}

/// `[styles.<name>]`: an extra style preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSection {
    /// Human-readable label
    pub label: String,
    /// Instruction fragments merged into every request
    #[serde(default)]
    pub directives: Vec<String>,
    /// Camera philosophy
    pub camera: String,
    /// Lighting and colour grade
    pub lighting: String,
    /// Target aspect ratio
    pub aspect_ratio: String,
    /// Technical quality markers
    pub quality_markers: String,
}

/// `[characters.<key>]`: a description fixed before the story is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterSection {
    /// Name as it appears in the story; defaults to the table key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Entity category
    #[serde(default = "default_kind")]
    pub kind: EntityKind,
    /// Description used verbatim in every scene
    pub description: String,
}

fn default_kind() -> EntityKind {
    EntityKind::Character
}

/// Complete Storyreel configuration.
///
/// # Example
///
/// ```no_run
/// use storyreel::StoryreelConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryreelConfig::load()?;
/// println!("default style: {}", config.run().style());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct StoryreelConfig {
    /// Run defaults
    #[serde(default)]
    run: RunSection,
    /// Duration bounds
    #[serde(default)]
    durations: DurationSection,
    /// Retry policy
    #[serde(default)]
    retry: RetryConfig,
    /// Per-provider settings
    #[serde(default)]
    providers: BTreeMap<String, ProviderConfig>,
    /// Extra style presets
    #[serde(default)]
    styles: BTreeMap<String, StyleSection>,
    /// Seeded characters
    #[serde(default)]
    characters: BTreeMap<String, CharacterSection>,
}

impl StoryreelConfig {
    /// Load one configuration file, without the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration from file");
        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the bundled defaults overlaid with the user's files.
    ///
    /// `extra` is layered last, for a `--config` path given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file does not parse or the merged
    /// configuration is inconsistent.
    #[instrument]
    pub fn load_with(extra: Option<&Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyreel/storyreel.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyreel").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the bundled defaults overlaid with the user's files.
    pub fn load() -> StoryreelResult<Self> {
        Self::load_with(None)
    }

    /// The bundled defaults alone.
    pub fn bundled() -> StoryreelResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durations.bounds().validate()?;
        self.retry.validate()?;
        if self.run.concurrency == 0 {
            return Err(ConfigError::new("run.concurrency must be at least 1"));
        }
        if self.durations.min_words == 0 {
            return Err(ConfigError::new("durations.min_words must be at least 1"));
        }
        if matches!(self.run.target_duration, Some(target) if target <= 0.0) {
            return Err(ConfigError::new("run.target_duration must be positive"));
        }
        Ok(())
    }

    /// Settings for a provider; defaults if it has no section.
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Built-in presets plus the configured ones.
    pub fn catalog(&self) -> StylePresetCatalog {
        let mut catalog = StylePresetCatalog::default();
        for (name, style) in &self.styles {
            catalog.register(StylePreset::new(
                name.as_str(),
                style.label.as_str(),
                style.directives.clone(),
                style.camera.as_str(),
                style.lighting.as_str(),
                style.aspect_ratio.as_str(),
                style.quality_markers.as_str(),
            ));
        }
        catalog
    }

    /// Seeded characters as registry entities.
    pub fn seeded_entities(&self) -> Vec<Entity> {
        self.characters
            .iter()
            .map(|(key, character)| {
                Entity::new(
                    character.name.clone().unwrap_or_else(|| key.clone()),
                    character.kind,
                    character.description.as_str(),
                    None,
                )
            })
            .collect()
    }
}
