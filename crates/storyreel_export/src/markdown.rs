//! Markdown "Master Production Sheet".

use storyreel_core::{ProductionSheet, SceneRecord};

/// Render a human-readable production sheet.
///
/// Layout: a header with totals, the generation settings, one section per
/// scene (beat, visual prompt, detail table, key elements), omitted beats if
/// any, then the motion and transition distributions.
pub fn render_markdown(sheet: &ProductionSheet) -> String {
    let metadata = sheet.metadata();
    let stats = sheet.statistics();
    let mut out = String::from("# Master Production Sheet\n\n");

    out.push_str(&format!(
        "**Generated:** {}  \n",
        metadata.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("**Total Scenes:** {}  \n", stats.total_scenes()));
    out.push_str(&format!(
        "**Estimated Duration:** {} seconds ({:.1} minutes)\n\n",
        stats.total_duration_seconds(),
        stats.total_duration_minutes()
    ));

    out.push_str("## Generation Settings\n\n");
    out.push_str(&format!("- **Style:** {}\n", metadata.style()));
    out.push_str(&format!("- **Provider:** {}\n", metadata.provider()));
    out.push_str(&format!("- **Model:** {}\n", metadata.model()));
    if let Some(target) = metadata.target_duration() {
        out.push_str(&format!("- **Target Duration:** {} seconds\n", target));
    }
    if let Some(source) = metadata.source() {
        out.push_str(&format!("- **Source:** {}\n", source));
    }
    out.push_str("\n---\n\n");

    for scene in sheet.scenes() {
        out.push_str(&scene_section(scene));
    }

    if !sheet.omitted().is_empty() {
        out.push_str("## Omitted Beats\n\n");
        for omission in sheet.omitted() {
            out.push_str(&format!(
                "- **Beat {}:** {} ({})\n",
                omission.beat_index() + 1,
                omission.beat_text(),
                omission.reason()
            ));
        }
        out.push('\n');
    }

    out.push_str("## Statistics\n\n");
    out.push_str(&format!(
        "- **Average Scene Duration:** {:.1} seconds\n",
        stats.average_scene_duration()
    ));
    for (motion, count) in stats.motion_distribution() {
        out.push_str(&format!("- **Motion {}:** {} scene(s)\n", motion, count));
    }
    for (transition, count) in stats.transition_distribution() {
        out.push_str(&format!("- **Transition {}:** {} scene(s)\n", transition, count));
    }

    out
}

fn scene_section(scene: &SceneRecord) -> String {
    let mut out = format!("## Scene {}\n\n", scene.scene_number());
    out.push_str(&format!("**Beat:** {}\n\n", scene.beat_text()));

    out.push_str("### Visual Prompt\n\n");
    for line in scene.visual_prompt().lines() {
        out.push_str(&format!("> {}\n", line));
    }
    out.push('\n');

    out.push_str("| Aspect | Details |\n");
    out.push_str("|--------|---------|\n");
    out.push_str(&format!("| Duration | {} seconds |\n", scene.duration_seconds()));
    out.push_str(&format!("| Transition | {} |\n", scene.transition()));
    out.push_str(&format!("| Motion | {} |\n", scene.motion_intensity()));
    out.push_str(&format!("| Audio | {} |\n", escape_cell(scene.audio_suggestion())));
    if !scene.characters().is_empty() {
        out.push_str(&format!("| Characters | {} |\n", scene.characters().join(", ")));
    }
    out.push('\n');

    if !scene.key_elements().is_empty() {
        out.push_str("**Key Elements:**\n\n");
        for element in scene.key_elements() {
            out.push_str(&format!("- {}\n", element));
        }
        out.push('\n');
    }
    out.push_str("---\n\n");
    out
}

// Pipes would end the table cell early
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
