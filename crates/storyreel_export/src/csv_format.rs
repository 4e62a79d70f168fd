//! CSV rendering.

use storyreel_core::{ProductionSheet, SceneRecord};
use storyreel_error::{ExportError, ExportErrorKind};

/// Column order of the CSV export.
pub const CSV_COLUMNS: [&str; 9] = [
    "scene_number",
    "narrative_beat",
    "visual_prompt",
    "duration_seconds",
    "transition_type",
    "motion_intensity",
    "key_elements",
    "characters",
    "audio_suggestion",
];

/// Render the scenes as CSV with a header row.
///
/// List fields are joined with ", ". Omitted beats do not appear.
///
/// # Errors
///
/// Returns `ExportErrorKind::Csv` if encoding fails.
pub fn render_csv(sheet: &ProductionSheet) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS).map_err(csv_error)?;
    for scene in sheet.scenes() {
        writer.write_record(row(scene)).map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::new(ExportErrorKind::Csv(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| ExportError::new(ExportErrorKind::Csv(e.to_string())))
}

fn row(scene: &SceneRecord) -> [String; 9] {
    [
        scene.scene_number().to_string(),
        scene.beat_text().clone(),
        scene.visual_prompt().clone(),
        scene.duration_seconds().to_string(),
        scene.transition().to_string(),
        scene.motion_intensity().to_string(),
        scene
            .key_elements()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        scene.characters().join(", "),
        scene.audio_suggestion().clone(),
    ]
}

#[track_caller]
fn csv_error(e: csv::Error) -> ExportError {
    ExportError::new(ExportErrorKind::Csv(e.to_string()))
}
