//! Scene pipeline error types.

/// Specific error conditions raised while turning a story into scenes.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum SceneErrorKind {
    /// No beats could be derived from the story
    #[display("Story is empty: no beats could be derived")]
    EmptyInput,
    /// The requested total duration cannot be honoured for this beat count
    #[display(
        "Target duration {}s is infeasible for {} beats (feasible range {}s..={}s)",
        requested,
        beat_count,
        minimum_total,
        maximum_total
    )]
    InfeasibleDuration {
        /// Number of beats being allocated
        beat_count: usize,
        /// Requested total in seconds
        requested: f64,
        /// Smallest total that respects the minimum per-beat duration
        minimum_total: u32,
        /// Largest total that respects the maximum per-beat duration
        maximum_total: u32,
    },
    /// The style name is not registered in the catalog
    #[display("Unknown style '{}' (available: {})", requested, available.join(", "))]
    UnknownStyle {
        /// Name that failed to resolve
        requested: String,
        /// Registered style names
        available: Vec<String>,
    },
    /// The completion provider could not produce a prompt for a beat
    #[display(
        "Provider '{}' unavailable for beat {} after {} attempt(s): {}",
        provider,
        beat_index,
        attempts,
        cause
    )]
    ProviderUnavailable {
        /// Beat being processed
        beat_index: usize,
        /// Provider that failed
        provider: String,
        /// Attempts made before giving up
        attempts: u32,
        /// Last provider error
        cause: String,
    },
    /// A scene record could not be assembled
    #[display("Failed to assemble scene for beat {}: {}", beat_index, reason)]
    Assembly {
        /// Beat being assembled
        beat_index: usize,
        /// What was wrong
        reason: String,
    },
}

impl SceneErrorKind {
    /// Pipeline stage that raised this error.
    pub fn stage(&self) -> &'static str {
        match self {
            SceneErrorKind::EmptyInput => "segmentation",
            SceneErrorKind::InfeasibleDuration { .. } => "duration_allocation",
            SceneErrorKind::UnknownStyle { .. } => "style_lookup",
            SceneErrorKind::ProviderUnavailable { .. } => "completion",
            SceneErrorKind::Assembly { .. } => "assembly",
        }
    }

    /// Beat index the error refers to, when it concerns a single beat.
    pub fn beat_index(&self) -> Option<usize> {
        match self {
            SceneErrorKind::ProviderUnavailable { beat_index, .. }
            | SceneErrorKind::Assembly { beat_index, .. } => Some(*beat_index),
            _ => None,
        }
    }
}

/// Error type for scene pipeline operations.
///
/// # Examples
///
/// ```
/// use storyreel_error::{SceneError, SceneErrorKind};
///
/// let err = SceneError::new(SceneErrorKind::EmptyInput);
/// assert!(format!("{}", err).contains("empty"));
/// assert_eq!(err.kind.stage(), "segmentation");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Scene Error: {} at line {} in {}", kind, line, file)]
pub struct SceneError {
    /// The specific error condition
    pub kind: SceneErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SceneError {
    /// Create a new SceneError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SceneErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
