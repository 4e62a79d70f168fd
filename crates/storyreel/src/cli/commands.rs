//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyreel::ExportFormat;

/// Storyreel - turn a story into production-ready video scene prompts
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(about = "Turn a story into production-ready video scene prompts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a production sheet from a story file
    Generate {
        /// Path to the story text file
        #[arg(short, long)]
        input: PathBuf,

        /// Visual style preset
        #[arg(short, long)]
        style: Option<String>,

        /// Completion provider (gemini, openai, groq, offline)
        #[arg(short, long, env = "DEFAULT_PROVIDER")]
        provider: Option<String>,

        /// Model to use instead of the provider's default
        #[arg(short, long)]
        model: Option<String>,

        /// Target total duration in seconds
        #[arg(short = 'd', long)]
        target_duration: Option<f64>,

        /// Completion calls in flight
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Omit failed scenes instead of aborting the run
        #[arg(long)]
        lenient: bool,

        /// Output base path, without extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, json, markdown, all)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Re-export an existing JSON production sheet without calling a provider
    Export {
        /// Path to a JSON production sheet
        #[arg(short, long)]
        load: PathBuf,

        /// Output base path, without extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, json, markdown, all)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// List the available style presets
    Styles,
}
