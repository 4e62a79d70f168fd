//! `styles` command handler.

use storyreel::StoryreelConfig;

/// Print every style preset, built-in and configured.
pub fn list_styles(config: &StoryreelConfig) {
    let catalog = config.catalog();
    for preset in catalog.iter() {
        println!("{:<12} {} ({})", preset.name(), preset.label(), preset.aspect_ratio());
        for directive in preset.directives() {
            println!("{:<12} - {}", "", directive);
        }
    }
}
