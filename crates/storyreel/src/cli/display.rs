//! Terminal summaries of a production sheet.

use storyreel::{ExportedFiles, ProductionSheet};

const BEAT_WIDTH: usize = 25;
const PROMPT_WIDTH: usize = 50;

/// Print the scene table.
pub fn print_scenes(sheet: &ProductionSheet) {
    println!("Master Production Sheet");
    println!(
        "{:>5}  {:<beat$}  {:<prompt$}  {:>8}  {:<6}",
        "Scene",
        "Beat",
        "Visual Prompt",
        "Duration",
        "Motion",
        beat = BEAT_WIDTH,
        prompt = PROMPT_WIDTH
    );
    for scene in sheet.scenes() {
        println!(
            "{:>5}  {:<beat$}  {:<prompt$}  {:>8}  {:<6}",
            scene.scene_number(),
            truncate(scene.beat_text(), BEAT_WIDTH),
            truncate(scene.visual_prompt(), PROMPT_WIDTH),
            format!("{}s", scene.duration_seconds()),
            scene.motion_intensity().as_ref().to_uppercase(),
            beat = BEAT_WIDTH,
            prompt = PROMPT_WIDTH
        );
    }
    for omission in sheet.omitted() {
        println!(
            "{:>5}  omitted: {}",
            omission.beat_index() + 1,
            omission.reason()
        );
    }
}

/// Print the production statistics.
pub fn print_statistics(sheet: &ProductionSheet) {
    let stats = sheet.statistics();
    println!("Production Statistics");
    println!("  Total scenes:      {}", stats.total_scenes());
    println!(
        "  Total duration:    {}s ({:.1} minutes)",
        stats.total_duration_seconds(),
        stats.total_duration_minutes()
    );
    println!("  Average per scene: {:.1}s", stats.average_scene_duration());
    println!("  Motion distribution:");
    for (motion, count) in stats.motion_distribution() {
        println!("    {}: {} scene(s)", motion, count);
    }
    println!("  Transition distribution:");
    for (transition, count) in stats.transition_distribution() {
        println!("    {}: {} scene(s)", transition, count);
    }
}

/// Print the exported paths.
pub fn print_exported(files: &ExportedFiles) {
    println!("Production sheets exported:");
    for path in files.paths() {
        println!("  {}", path.display());
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
