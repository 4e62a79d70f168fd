//! Error types for Storyreel.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! `StoryreelError` boxes any of them so `?` works across crate boundaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod config;
mod error;
mod export;
mod scene;

pub use completion::{CompletionError, CompletionErrorKind, RetryableError};
pub use config::ConfigError;
pub use error::{StoryreelError, StoryreelErrorKind, StoryreelResult};
pub use export::{ExportError, ExportErrorKind};
pub use scene::{SceneError, SceneErrorKind};
