//! Production sheet export errors.

/// Specific export failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExportErrorKind {
    /// Writing an output file failed
    #[display("Failed to write {}: {}", path, message)]
    Write {
        /// Destination path
        path: String,
        /// Underlying error message
        message: String,
    },
    /// Reading a production sheet failed
    #[display("Failed to read {}: {}", path, message)]
    Read {
        /// Source path
        path: String,
        /// Underlying error message
        message: String,
    },
    /// CSV encoding failed
    #[display("CSV encoding failed: {}", _0)]
    Csv(String),
    /// The file is not a recognised production sheet
    #[display("Invalid production sheet: {}", _0)]
    InvalidSheet(String),
}

/// Export error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The specific error condition
    pub kind: ExportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExportError {
    /// Create a new ExportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
