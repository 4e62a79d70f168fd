//! `generate` and `export` command handlers.

use super::display::{print_exported, print_scenes, print_statistics};
use std::path::{Path, PathBuf};
use storyreel::{
    ExportError, ExportErrorKind, ExportFormat, RunOverrides, SheetExporter, StoryreelConfig,
    StoryreelResult, generate, load_json,
};
use tracing::info;

/// Story file and output settings for `generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Story text file
    pub input: PathBuf,
    /// Output base path
    pub output: Option<PathBuf>,
    /// Output format
    pub format: Option<ExportFormat>,
}

/// Generate a production sheet from a story file and export it.
pub async fn run_generate(
    config: &StoryreelConfig,
    args: GenerateArgs,
    mut overrides: RunOverrides,
) -> StoryreelResult<()> {
    let story = std::fs::read_to_string(&args.input).map_err(|e| {
        ExportError::new(ExportErrorKind::Read {
            path: args.input.display().to_string(),
            message: e.to_string(),
        })
    })?;
    info!(
        path = %args.input.display(),
        chars = story.len(),
        "Story loaded"
    );
    overrides.source = Some(args.input.display().to_string());

    let sheet = generate(config, &overrides, &story).await?;

    print_scenes(&sheet);
    println!();
    print_statistics(&sheet);
    println!();

    let base = output_base(config, args.output.as_deref());
    let format = args.format.unwrap_or(*config.run().format());
    let files = SheetExporter::new(&sheet).export(format, &base)?;
    print_exported(&files);
    Ok(())
}

/// Re-export a saved JSON production sheet.
pub fn run_export(
    config: &StoryreelConfig,
    load: &Path,
    output: Option<&Path>,
    format: Option<ExportFormat>,
) -> StoryreelResult<()> {
    let sheet = load_json(load)?;

    print_scenes(&sheet);
    println!();
    print_statistics(&sheet);
    println!();

    let base = output_base(config, output);
    let format = format.unwrap_or(*config.run().format());
    let files = SheetExporter::new(&sheet).export(format, &base)?;
    print_exported(&files);
    Ok(())
}

fn output_base(config: &StoryreelConfig, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(config.run().output()))
}
