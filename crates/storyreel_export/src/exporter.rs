//! File output and re-loading of production sheets.

use crate::{render_csv, render_markdown};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use storyreel_core::ProductionSheet;
use storyreel_error::{ExportError, ExportErrorKind};
use tracing::{info, instrument};

/// Output format selected on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// One row per scene
    Csv,
    /// Metadata, scenes and omissions
    Json,
    /// Master production sheet
    #[strum(to_string = "markdown", serialize = "md")]
    #[serde(alias = "md")]
    Markdown,
    /// Every format above
    #[default]
    All,
}

impl ExportFormat {
    /// File extension, without the dot. `All` has none.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => Some("csv"),
            ExportFormat::Json => Some("json"),
            ExportFormat::Markdown => Some("md"),
            ExportFormat::All => None,
        }
    }
}

/// Paths written by an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct ExportedFiles {
    /// CSV file, if written
    csv: Option<PathBuf>,
    /// JSON file, if written
    json: Option<PathBuf>,
    /// Markdown file, if written
    markdown: Option<PathBuf>,
}

impl ExportedFiles {
    /// All written paths, in CSV, JSON, Markdown order.
    pub fn paths(&self) -> Vec<&Path> {
        [&self.csv, &self.json, &self.markdown]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Pretty-printed JSON of the whole sheet.
///
/// # Errors
///
/// Returns `ExportErrorKind::InvalidSheet` if serialization fails.
pub fn render_json(sheet: &ProductionSheet) -> Result<String, ExportError> {
    serde_json::to_string_pretty(sheet)
        .map_err(|e| ExportError::new(ExportErrorKind::InvalidSheet(e.to_string())))
}

/// Read a production sheet previously written by [`SheetExporter::to_json`].
///
/// # Errors
///
/// `Read` if the file cannot be opened, `InvalidSheet` if it does not parse.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_json(path: impl AsRef<Path>) -> Result<ProductionSheet, ExportError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        ExportError::new(ExportErrorKind::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    let sheet: ProductionSheet = serde_json::from_str(&text).map_err(|e| {
        ExportError::new(ExportErrorKind::InvalidSheet(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    info!(scenes = sheet.scenes().len(), "Loaded production sheet");
    Ok(sheet)
}

/// Writes one production sheet to disk.
///
/// # Example
///
/// ```rust,ignore
/// let files = SheetExporter::new(&sheet).export_all("output/production_sheet")?;
/// for path in files.paths() {
///     println!("wrote {}", path.display());
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SheetExporter<'a> {
    sheet: &'a ProductionSheet,
}

impl<'a> SheetExporter<'a> {
    /// Create an exporter for `sheet`.
    pub fn new(sheet: &'a ProductionSheet) -> Self {
        Self { sheet }
    }

    /// Write the CSV export.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        write_file(path.as_ref(), &render_csv(self.sheet)?)
    }

    /// Write the JSON export.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        write_file(path.as_ref(), &render_json(self.sheet)?)
    }

    /// Write the Markdown export.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn to_markdown(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        write_file(path.as_ref(), &render_markdown(self.sheet))
    }

    /// Write `format` next to `base`, which has no extension.
    ///
    /// `base` "output/sheet" with [`ExportFormat::All`] writes
    /// `output/sheet.csv`, `output/sheet.json` and `output/sheet.md`.
    #[instrument(skip(self, base), fields(format = %format, base = %base.as_ref().display()))]
    pub fn export(&self, format: ExportFormat, base: impl AsRef<Path>) -> Result<ExportedFiles, ExportError> {
        let base = base.as_ref();
        let mut files = ExportedFiles::default();
        if matches!(format, ExportFormat::Csv | ExportFormat::All) {
            let path = with_extension(base, "csv");
            self.to_csv(&path)?;
            files.csv = Some(path);
        }
        if matches!(format, ExportFormat::Json | ExportFormat::All) {
            let path = with_extension(base, "json");
            self.to_json(&path)?;
            files.json = Some(path);
        }
        if matches!(format, ExportFormat::Markdown | ExportFormat::All) {
            let path = with_extension(base, "md");
            self.to_markdown(&path)?;
            files.markdown = Some(path);
        }
        Ok(files)
    }

    /// Write every format next to `base`.
    pub fn export_all(&self, base: impl AsRef<Path>) -> Result<ExportedFiles, ExportError> {
        self.export(ExportFormat::All, base)
    }
}

// Appends rather than replaces, so "sheet.v2" becomes "sheet.v2.csv"
fn with_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    let write_error = |e: std::io::Error| {
        ExportError::new(ExportErrorKind::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)?;
    info!(bytes = contents.len(), "Wrote export");
    Ok(())
}
