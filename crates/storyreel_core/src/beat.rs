//! Narrative beats produced by segmentation.

use serde::{Deserialize, Serialize};

/// A contiguous span of the source story representing one unit of visual action.
///
/// `start..end` is a byte range into the original story. Spans of consecutive
/// beats touch, so the spans of a segmentation cover the whole story;
/// `source_text` is the trimmed content of that span.
///
/// # Examples
///
/// ```
/// use storyreel_core::Beat;
///
/// let story = "Raju sits on the roof. ";
/// let beat = Beat::new(0, "Raju sits on the roof.", 0, story.len(), 2);
/// assert_eq!(beat.index(), &0);
/// assert_eq!(beat.span_of(story), story);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Beat {
    /// Position in the sequence
    index: usize,
    /// Raw excerpt in the story's original language
    source_text: String,
    /// Byte offset where the span starts
    start: usize,
    /// Byte offset one past the end of the span
    end: usize,
    /// Complexity signal used for pacing
    complexity_score: u32,
}

impl Beat {
    /// Create a beat.
    pub fn new(
        index: usize,
        source_text: impl Into<String>,
        start: usize,
        end: usize,
        complexity_score: u32,
    ) -> Self {
        Self {
            index,
            source_text: source_text.into(),
            start,
            end,
            complexity_score,
        }
    }

    /// Slice of `story` covered by this beat, including surrounding whitespace.
    pub fn span_of<'a>(&self, story: &'a str) -> &'a str {
        &story[self.start..self.end]
    }

    /// Number of whitespace-separated words in the beat.
    pub fn word_count(&self) -> usize {
        self.source_text.split_whitespace().count()
    }
}
