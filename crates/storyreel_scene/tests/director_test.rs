//! End-to-end runs of the scene director against a scripted provider.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{Entity, EntityKind, Transition};
use storyreel_error::{CompletionErrorKind, SceneErrorKind};
use storyreel_rate_limit::{ProviderLimits, RateLimiter, RetryConfig, RetryPolicy};
use storyreel_scene::{FailurePolicy, ProviderHandle, RunOptions, SceneDirector};
use test_utils::{RAJU_STORY, ScriptedProvider};

const FIVE_BEATS: &str = "Mira walks into the forest. The wind moves the tall trees. \
                          A small fox watches her closely. She kneels beside the river. \
                          The moon rises over the hills.";

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(RetryConfig {
        max_attempts,
        initial_backoff_ms: 50,
        factor: 2.0,
        max_delay_ms: 1000,
        jitter: false,
    })
}

#[tokio::test]
async fn test_raju_story_end_to_end() -> anyhow::Result<()> {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder()
        .style("cinematic")
        .target_duration(15.0)
        .source("raju.txt")
        .build()?;

    let sheet = director.run(RAJU_STORY, &options).await?;

    assert_eq!(sheet.scenes().len(), 3);
    assert!(sheet.omitted().is_empty());
    let durations: Vec<u32> = sheet.scenes().iter().map(|s| *s.duration_seconds()).collect();
    assert_eq!(durations.iter().sum::<u32>(), 15);
    assert!(durations.iter().all(|d| (3..=10).contains(d)));

    let indices: Vec<usize> = sheet.scenes().iter().map(|s| *s.beat_index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(sheet.scenes()[0].transition(), &Transition::Fade);
    assert_eq!(sheet.scenes()[2].transition(), &Transition::Fade);

    assert_eq!(sheet.metadata().scene_count(), &3);
    assert_eq!(sheet.metadata().total_duration_seconds(), &15);
    assert_eq!(sheet.metadata().style(), "cinematic");
    assert_eq!(sheet.metadata().provider(), "scripted");
    assert_eq!(sheet.metadata().source().as_deref(), Some("raju.txt"));

    // The light introduced in scene 2 keeps its description in scene 3
    let second = provider.request(2).unwrap();
    let third = provider.request(3).unwrap();
    assert!(second.contains("bright light"));
    assert!(third.contains("bright light"));
    assert!(third.contains("[CONTINUITY REFERENCE]"));
    assert_eq!(provider.call_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_completions_are_reordered() -> anyhow::Result<()> {
    let provider = Arc::new(
        ScriptedProvider::new("scripted")
            .with_delay(1, Duration::from_millis(300))
            .with_delay(2, Duration::from_millis(200))
            .with_delay(3, Duration::from_millis(100)),
    );
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder().concurrency(3usize).build()?;

    let sheet = director.run(RAJU_STORY, &options).await?;

    assert_eq!(provider.finished(), vec![3, 2, 1]);
    let indices: Vec<usize> = sheet.scenes().iter().map(|s| *s.beat_index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(sheet.scenes()[2].visual_prompt().ends_with("scene 3"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_is_bounded() -> anyhow::Result<()> {
    let mut scripted = ScriptedProvider::new("scripted");
    for scene in 1..=5 {
        scripted = scripted.with_delay(scene, Duration::from_millis(100));
    }
    let provider = Arc::new(scripted);
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder().concurrency(2usize).build()?;

    let sheet = director.run(FIVE_BEATS, &options).await?;

    assert_eq!(sheet.scenes().len(), 5);
    assert_eq!(provider.max_in_flight(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_limiter_slots_bound_concurrency() -> anyhow::Result<()> {
    let mut scripted = ScriptedProvider::new("scripted");
    for scene in 1..=5 {
        scripted = scripted.with_delay(scene, Duration::from_millis(100));
    }
    let provider = Arc::new(scripted);
    let limiter = RateLimiter::new(ProviderLimits {
        rpm: None,
        max_concurrent: Some(1),
    });
    let director = SceneDirector::new(ProviderHandle::new(provider.clone(), limiter));
    let options = RunOptions::builder().concurrency(4usize).build()?;

    director.run(FIVE_BEATS, &options).await?;

    assert_eq!(provider.max_in_flight(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_fail_fast_reports_failed_beat() {
    let provider = Arc::new(
        ScriptedProvider::new("scripted")
            .with_failures(2, vec![CompletionErrorKind::Unauthenticated("bad key".into())]),
    );
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));

    let err = director
        .run(RAJU_STORY, &RunOptions::default())
        .await
        .unwrap_err();

    match err.kind {
        SceneErrorKind::ProviderUnavailable {
            beat_index,
            attempts,
            provider,
            ..
        } => {
            assert_eq!(beat_index, 1);
            assert_eq!(attempts, 1);
            assert_eq!(provider, "scripted");
        }
        other => panic!("Expected ProviderUnavailable, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_lenient_policy_omits_failed_scene() -> anyhow::Result<()> {
    let provider = Arc::new(
        ScriptedProvider::new("scripted")
            .with_failures(2, vec![CompletionErrorKind::QuotaExceeded("billing".into())]),
    );
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder()
        .failure_policy(FailurePolicy::Lenient)
        .build()?;

    let sheet = director.run(RAJU_STORY, &options).await?;

    let indices: Vec<usize> = sheet.scenes().iter().map(|s| *s.beat_index()).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(sheet.omitted().len(), 1);
    assert_eq!(sheet.omitted()[0].beat_index(), &1);
    assert_eq!(sheet.omitted()[0].beat_text(), "A bright light descends.");
    assert!(sheet.omitted()[0].reason().contains("Quota"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_is_retried() -> anyhow::Result<()> {
    let provider = Arc::new(ScriptedProvider::new("scripted").with_failures(
        1,
        vec![
            CompletionErrorKind::Timeout("slow".into()),
            CompletionErrorKind::RateLimited {
                message: "busy".into(),
                retry_after_ms: None,
            },
        ],
    ));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()))
        .with_retry_policy(fast_retry(3));

    let sheet = director.run(RAJU_STORY, &RunOptions::default()).await?;

    assert_eq!(sheet.scenes().len(), 3);
    assert_eq!(provider.calls().iter().filter(|&&scene| scene == 1).count(), 3);
    assert_eq!(provider.call_count(), 5);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_report_attempts() {
    let provider = Arc::new(
        ScriptedProvider::new("scripted").failing(CompletionErrorKind::Timeout("slow".into())),
    );
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()))
        .with_retry_policy(fast_retry(2));
    let options = RunOptions::builder().concurrency(1usize).build().unwrap();

    let err = director.run(RAJU_STORY, &options).await.unwrap_err();

    match err.kind {
        SceneErrorKind::ProviderUnavailable { beat_index, attempts, cause, .. } => {
            assert_eq!(beat_index, 0);
            assert_eq!(attempts, 2);
            assert!(cause.contains("Timed out"));
        }
        other => panic!("Expected ProviderUnavailable, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_fallback_provider_takes_over() -> anyhow::Result<()> {
    let primary = Arc::new(
        ScriptedProvider::new("primary")
            .failing(CompletionErrorKind::Unauthenticated("revoked".into())),
    );
    let backup = Arc::new(ScriptedProvider::new("backup"));
    let director = SceneDirector::new(ProviderHandle::unlimited(primary.clone()))
        .with_fallback(ProviderHandle::unlimited(backup.clone()));

    let sheet = director.run(RAJU_STORY, &RunOptions::default()).await?;

    assert_eq!(sheet.scenes().len(), 3);
    assert!(
        sheet
            .scenes()
            .iter()
            .all(|s| s.visual_prompt().starts_with("backup"))
    );
    assert_eq!(primary.call_count(), 3);
    assert_eq!(backup.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_empty_completion_is_assembly_error() {
    let provider = Arc::new(ScriptedProvider::new("scripted").with_empty(2));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider));

    let err = director
        .run(RAJU_STORY, &RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, SceneErrorKind::Assembly { beat_index: 1, .. }));
}

#[tokio::test]
async fn test_lenient_policy_still_fails_on_assembly_error() {
    let provider = Arc::new(ScriptedProvider::new("scripted").with_empty(2));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider));
    let options = RunOptions::builder()
        .failure_policy(FailurePolicy::Lenient)
        .build()
        .unwrap();

    let err = director.run(RAJU_STORY, &options).await.unwrap_err();

    assert!(matches!(err.kind, SceneErrorKind::Assembly { beat_index: 1, .. }));
}

#[tokio::test]
async fn test_blank_story_is_empty_input() {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));

    let err = director
        .run("   \n\n  ", &RunOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, SceneErrorKind::EmptyInput);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_style_is_rejected_before_calls() {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder().style("steampunk").build().unwrap();

    let err = director.run(RAJU_STORY, &options).await.unwrap_err();

    match err.kind {
        SceneErrorKind::UnknownStyle { requested, available } => {
            assert_eq!(requested, "steampunk");
            assert!(available.contains(&"cinematic".to_string()));
        }
        other => panic!("Expected UnknownStyle, got {:?}", other),
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_infeasible_target_is_rejected() {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone()));
    let options = RunOptions::builder().target_duration(100.0).build().unwrap();

    let err = director.run(RAJU_STORY, &options).await.unwrap_err();

    assert!(matches!(
        err.kind,
        SceneErrorKind::InfeasibleDuration { beat_count: 3, maximum_total: 30, .. }
    ));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_seeded_character_description_is_used() -> anyhow::Result<()> {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let director = SceneDirector::new(ProviderHandle::unlimited(provider.clone())).with_character(
        Entity::new("Raju", EntityKind::Character, "Raju, a ten-year-old boy in a red kurta", None),
    );

    director.run(RAJU_STORY, &RunOptions::default()).await?;

    let first = provider.request(1).unwrap();
    assert!(first.contains("Raju, a ten-year-old boy in a red kurta"));
    Ok(())
}
