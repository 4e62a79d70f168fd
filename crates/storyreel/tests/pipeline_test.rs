//! End-to-end runs through configuration with the offline composer.

use storyreel::{
    ExportFormat, FailurePolicy, RunOverrides, SceneErrorKind, SheetExporter, StoryreelConfig,
    Transition, build_director, generate, load_json, run_options,
};
use tempfile::TempDir;

const STORY: &str = "Raju sits on the roof watching stars. A bright light descends. \
                     The light becomes a fairy who reaches out her hand.";

fn offline() -> RunOverrides {
    RunOverrides {
        provider: Some("offline".to_string()),
        ..RunOverrides::default()
    }
}

#[test]
fn test_overrides_take_precedence() -> anyhow::Result<()> {
    let config = StoryreelConfig::bundled()?;
    let overrides = RunOverrides {
        style: Some("anime".to_string()),
        target_duration: Some(30.0),
        concurrency: Some(0),
        lenient: true,
        ..RunOverrides::default()
    };

    let options = run_options(&config, &overrides)?;

    assert_eq!(options.style(), "anime");
    assert_eq!(options.target_duration(), &Some(30.0));
    assert_eq!(options.concurrency(), &1);
    assert_eq!(options.failure_policy(), &FailurePolicy::Lenient);
    Ok(())
}

#[test]
fn test_unknown_provider_rejected() -> anyhow::Result<()> {
    let config = StoryreelConfig::bundled()?;
    let overrides = RunOverrides {
        provider: Some("cohere".to_string()),
        ..RunOverrides::default()
    };

    let Err(err) = build_director(&config, &overrides) else {
        panic!("Expected unknown provider to be rejected");
    };
    assert!(format!("{}", err).contains("Unknown provider"));
    Ok(())
}

#[tokio::test]
async fn test_offline_generation_end_to_end() -> anyhow::Result<()> {
    let config = StoryreelConfig::bundled()?;
    let overrides = RunOverrides {
        target_duration: Some(15.0),
        source: Some("raju.txt".to_string()),
        ..offline()
    };

    let sheet = generate(&config, &overrides, STORY).await?;

    assert_eq!(sheet.scenes().len(), 3);
    assert_eq!(sheet.metadata().total_duration_seconds(), &15);
    assert_eq!(sheet.metadata().provider(), "offline");
    assert_eq!(sheet.scenes()[0].transition(), &Transition::Fade);
    assert_eq!(sheet.scenes()[2].transition(), &Transition::Fade);
    assert!(
        sheet
            .scenes()
            .iter()
            .all(|scene| !scene.visual_prompt().trim().is_empty())
    );
    assert!(sheet.scenes()[1].visual_prompt().contains("bright light"));

    let dir = TempDir::new()?;
    let base = dir.path().join("production_sheet");
    let files = SheetExporter::new(&sheet).export(ExportFormat::All, &base)?;
    assert_eq!(files.paths().len(), 3);

    let reloaded = load_json(dir.path().join("production_sheet.json"))?;
    assert_eq!(reloaded, sheet);
    Ok(())
}

#[tokio::test]
async fn test_unknown_style_surfaces_scene_error() -> anyhow::Result<()> {
    let config = StoryreelConfig::bundled()?;
    let overrides = RunOverrides {
        style: Some("steampunk".to_string()),
        ..offline()
    };

    let err = generate(&config, &overrides, STORY).await.unwrap_err();

    let scene = err.as_scene().expect("scene error");
    assert!(matches!(scene.kind, SceneErrorKind::UnknownStyle { .. }));
    Ok(())
}
