//! Top-level error wrapper types.

use crate::{CompletionError, ConfigError, ExportError, SceneError};

/// Every error family the workspace can surface.
///
/// # Examples
///
/// ```
/// use storyreel_error::{ConfigError, StoryreelError};
///
/// let config_err = ConfigError::new("run.concurrency must be at least 1");
/// let err: StoryreelError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryreelErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Scene pipeline error
    #[from(SceneError)]
    Scene(SceneError),
    /// Completion provider error
    #[from(CompletionError)]
    Completion(CompletionError),
    /// Export error
    #[from(ExportError)]
    Export(ExportError),
}

/// Storyreel error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyreel Error: {}", _0)]
pub struct StoryreelError(Box<StoryreelErrorKind>);

impl StoryreelError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryreelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryreelErrorKind {
        &self.0
    }

    /// The scene pipeline error, if that is what this wraps.
    pub fn as_scene(&self) -> Option<&SceneError> {
        match self.kind() {
            StoryreelErrorKind::Scene(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StoryreelErrorKind
impl<T> From<T> for StoryreelError
where
    T: Into<StoryreelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyreel operations.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StoryreelResult, SceneError, SceneErrorKind};
///
/// fn segment() -> StoryreelResult<Vec<String>> {
///     Err(SceneError::new(SceneErrorKind::EmptyInput))?
/// }
/// assert!(segment().is_err());
/// ```
pub type StoryreelResult<T> = std::result::Result<T, StoryreelError>;
