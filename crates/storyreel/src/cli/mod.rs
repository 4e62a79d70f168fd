//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyreel binary.

mod commands;
mod display;
mod generate;
mod styles;

pub use commands::{Cli, Commands};
pub use generate::{GenerateArgs, run_export, run_generate};
pub use styles::list_styles;
