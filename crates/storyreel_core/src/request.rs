//! Structured prompt requests sent to completion providers.

use serde::{Deserialize, Serialize};

/// Sections of a generation request, in the order they are rendered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Who or what is on screen, with frozen descriptions
    #[strum(to_string = "SUBJECT")]
    Subject,
    /// What happens in this beat
    #[strum(to_string = "ACTION")]
    Action,
    /// Where it happens
    #[strum(to_string = "SETTING")]
    Setting,
    /// Style preset directives
    #[strum(to_string = "STYLE")]
    Style,
    /// Camera movement, lens and lighting
    #[strum(to_string = "CAMERA & LIGHTING")]
    CameraLighting,
    /// Resolution and format boilerplate
    #[strum(to_string = "TECHNICAL")]
    Technical,
}

/// One titled block of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PromptSection {
    /// Which block this is
    kind: SectionKind,
    /// Block content
    body: String,
}

impl PromptSection {
    /// Create a section.
    pub fn new(kind: SectionKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }
}

/// Provider-agnostic request for one scene's visual prompt.
///
/// Sections are kept in [`SectionKind`] order regardless of insertion order so
/// the rendered text is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerationRequest {
    /// Beat this request renders
    beat_index: usize,
    /// Total number of scenes in the run
    scene_count: usize,
    /// Allocated screen time
    duration_seconds: u32,
    /// Opening instruction line
    instruction: String,
    /// Ordered prompt sections
    sections: Vec<PromptSection>,
    /// Complete cast introduced so far, for continuity
    cast_reference: Vec<(String, String)>,
}

impl GenerationRequest {
    /// Create a request; sections are sorted into canonical order.
    pub fn new(
        beat_index: usize,
        scene_count: usize,
        duration_seconds: u32,
        instruction: impl Into<String>,
        mut sections: Vec<PromptSection>,
        cast_reference: Vec<(String, String)>,
    ) -> Self {
        sections.sort_by_key(|section| section.kind);
        Self {
            beat_index,
            scene_count,
            duration_seconds,
            instruction: instruction.into(),
            sections,
            cast_reference,
        }
    }

    /// Body of the given section, if present.
    pub fn section(&self, kind: SectionKind) -> Option<&str> {
        self.sections
            .iter()
            .find(|section| section.kind == kind)
            .map(|section| section.body.as_str())
    }

    /// Render the request as the single text block sent to a provider.
    pub fn render(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.instruction);
        text.push_str("\n\n");
        for section in &self.sections {
            text.push_str(&format!("[{}]\n{}\n\n", section.kind, section.body));
        }
        if !self.cast_reference.is_empty() {
            text.push_str("[CONTINUITY REFERENCE]\n");
            for (name, fingerprint) in &self.cast_reference {
                text.push_str(&format!("- {}: {}\n", name, fingerprint));
            }
        }
        text.trim_end().to_string()
    }
}
