//! Production sheet exporters.
//!
//! A [`ProductionSheet`](storyreel_core::ProductionSheet) can be written as
//! CSV (one row per scene), JSON (metadata, scenes and omissions, re-readable
//! with [`load_json`]) or a Markdown "Master Production Sheet".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod csv_format;
mod exporter;
mod markdown;

pub use csv_format::{CSV_COLUMNS, render_csv};
pub use exporter::{ExportFormat, ExportedFiles, SheetExporter, load_json, render_json};
pub use markdown::render_markdown;
