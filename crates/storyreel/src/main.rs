//! Storyreel CLI binary.
//!
//! - Generate a production sheet from a story file
//! - Re-export a saved JSON production sheet
//! - List style presets

use clap::Parser;
use storyreel::{RunOverrides, StoryreelConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, GenerateArgs, list_styles, run_export, run_generate};

    // API keys may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let config = StoryreelConfig::load_with(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            input,
            style,
            provider,
            model,
            target_duration,
            concurrency,
            lenient,
            output,
            format,
        } => {
            let overrides = RunOverrides {
                style,
                provider,
                model,
                target_duration,
                concurrency,
                lenient,
                source: None,
            };
            let args = GenerateArgs {
                input,
                output,
                format,
            };
            run_generate(&config, args, overrides).await?;
        }

        Commands::Export {
            load,
            output,
            format,
        } => {
            run_export(&config, &load, output.as_deref(), format)?;
        }

        Commands::Styles => {
            list_styles(&config);
        }
    }

    Ok(())
}
