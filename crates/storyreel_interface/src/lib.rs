//! Trait definitions for Storyreel.
//!
//! The scene engine only ever talks to a text-completion service through
//! [`CompletionProvider`]; each hosted service gets its own implementation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::CompletionProvider;
