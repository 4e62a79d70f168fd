use storyreel_core::{
    GenerationRequest, MotionIntensity, ProductionSheet, PromptSection, RunMetadata, SceneRecord,
    SectionKind, Transition,
};

fn scene(index: usize, duration: u32, motion: MotionIntensity, transition: Transition) -> SceneRecord {
    SceneRecord::builder()
        .beat_index(index)
        .beat_text(format!("beat {}", index))
        .visual_prompt(format!("prompt {}", index))
        .duration_seconds(duration)
        .transition(transition)
        .motion_intensity(motion)
        .audio_suggestion("Ambient atmosphere")
        .build()
        .expect("valid scene")
}

#[test]
fn sheet_orders_scenes_by_beat_index() {
    let scenes = vec![
        scene(2, 5, MotionIntensity::Medium, Transition::Fade),
        scene(0, 6, MotionIntensity::Low, Transition::Fade),
        scene(1, 4, MotionIntensity::High, Transition::EyelineMatch),
    ];
    let metadata = RunMetadata::new("cinematic", "offline", "offline-director", Some(15.0), &scenes);
    let sheet = ProductionSheet::new(metadata, scenes, Vec::new());

    let order: Vec<usize> = sheet.scenes().iter().map(|s| *s.beat_index()).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert_eq!(*sheet.metadata().total_duration_seconds(), 15);
    assert_eq!(*sheet.metadata().scene_count(), 3);
}

#[test]
fn statistics_tally_motion_and_transitions() {
    let scenes = vec![
        scene(0, 6, MotionIntensity::Low, Transition::Fade),
        scene(1, 4, MotionIntensity::High, Transition::Cut),
        scene(2, 5, MotionIntensity::High, Transition::Fade),
    ];
    let metadata = RunMetadata::new("anime", "gemini", "gemini-2.0-flash", None, &scenes);
    let stats = ProductionSheet::new(metadata, scenes, Vec::new()).statistics();

    assert_eq!(*stats.total_scenes(), 3);
    assert_eq!(*stats.total_duration_seconds(), 15);
    assert!((stats.average_scene_duration() - 5.0).abs() < f64::EPSILON);
    assert_eq!(stats.motion_distribution()[&MotionIntensity::High], 2);
    assert_eq!(stats.transition_distribution()[&Transition::Fade], 2);
    assert!((stats.total_duration_minutes() - 0.25).abs() < 1e-9);
}

#[test]
fn request_renders_sections_in_canonical_order() {
    let request = GenerationRequest::new(
        1,
        3,
        5,
        "Write the prompt for scene 2 of 3.",
        vec![
            PromptSection::new(SectionKind::Technical, "4K"),
            PromptSection::new(SectionKind::Action, "A bright light descends."),
            PromptSection::new(SectionKind::Subject, "Raju: a ten-year-old boy"),
        ],
        vec![("Raju".to_string(), "a ten-year-old boy".to_string())],
    );

    let text = request.render();
    let subject = text.find("[SUBJECT]").unwrap();
    let action = text.find("[ACTION]").unwrap();
    let technical = text.find("[TECHNICAL]").unwrap();
    assert!(subject < action && action < technical);
    assert!(text.ends_with("- Raju: a ten-year-old boy"));
    assert_eq!(request.section(SectionKind::Action), Some("A bright light descends."));
}

#[test]
fn transition_serializes_snake_case() {
    let json = serde_json::to_string(&Transition::EyelineMatch).unwrap();
    assert_eq!(json, "\"eyeline_match\"");
    assert_eq!(Transition::MatchCut.to_string(), "match_cut");
}
