//! Story segmentation into narrative beats.

use crate::analysis::{complexity, word_count};
use crate::lexicon::{ABBREVIATIONS, BEAT_MARKERS};
use storyreel_core::Beat;
use storyreel_error::{SceneError, SceneErrorKind};
use tracing::{debug, instrument};

/// Sentence terminators.
const TERMINATORS: &[char] = &['.', '!', '?', '…', '।', '。', '！', '？'];

/// Terminators that end a sentence without following whitespace.
const FULL_WIDTH_TERMINATORS: &[char] = &['。', '！', '？'];

/// Closing quotes and brackets kept with the sentence they end.
const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '}', '»', '」', '』'];

/// Default minimum words per beat.
pub const DEFAULT_MIN_WORDS: usize = 3;

/// Splits a story into ordered, contiguous beats.
///
/// Explicit marker lines (`---`, `***`, `===`, `[beat]`) take precedence.
/// Without them the story is split at paragraph breaks and sentence
/// terminators, then beats shorter than the minimum word count are merged
/// forward (a short final beat merges backward).
///
/// # Examples
///
/// ```
/// use storyreel_scene::BeatSegmenter;
///
/// let story = "Raju sits on the roof. A bright light descends. It grows.";
/// let beats = BeatSegmenter::default().segment(story).unwrap();
/// assert_eq!(beats.len(), 2);
/// assert_eq!(beats[1].source_text(), "A bright light descends. It grows.");
/// let rebuilt: String = beats.iter().map(|b| b.span_of(story)).collect();
/// assert_eq!(rebuilt, story);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatSegmenter {
    min_words: usize,
}

impl Default for BeatSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORDS)
    }
}

impl BeatSegmenter {
    /// Create a segmenter with the given minimum words per beat.
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }

    /// Minimum words per beat.
    pub fn min_words(&self) -> usize {
        self.min_words
    }

    /// Split `story` into beats.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` when the story has no non-whitespace content.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub fn segment(&self, story: &str) -> Result<Vec<Beat>, SceneError> {
        if story.trim().is_empty() {
            return Err(SceneError::new(SceneErrorKind::EmptyInput));
        }

        let spans = match marker_spans(story) {
            Some(spans) => spans,
            None => self.merge_short(story, sentence_spans(story)),
        };

        let beats: Vec<Beat> = spans
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let text = story[start..end].trim();
                Beat::new(index, text, start, end, complexity(text))
            })
            .collect();

        if beats.is_empty() {
            return Err(SceneError::new(SceneErrorKind::EmptyInput));
        }
        debug!(beats = beats.len(), "Segmented story");
        Ok(beats)
    }

    /// Merge spans below the word threshold into their neighbours.
    fn merge_short(&self, story: &str, spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        let words = |start: usize, end: usize| word_count(&story[start..end]);
        let count = spans.len();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(count);
        let mut pending: Option<usize> = None;

        for (position, (start, end)) in spans.into_iter().enumerate() {
            let start = pending.unwrap_or(start);
            if words(start, end) < self.min_words && position + 1 < count {
                pending = Some(start);
                continue;
            }
            pending = None;
            merged.push((start, end));
        }

        if merged.len() > 1 {
            if let Some(&(start, end)) = merged.last() {
                if words(start, end) < self.min_words {
                    merged.pop();
                    if let Some(previous) = merged.last_mut() {
                        previous.1 = end;
                    }
                }
            }
        }
        merged
    }
}

/// Spans between marker lines, or `None` if the story has no markers.
fn marker_spans(story: &str) -> Option<Vec<(usize, usize)>> {
    let mut spans = Vec::new();
    let mut chunk_start = 0;
    let mut found = false;
    let mut offset = 0;

    for line in story.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();
        if BEAT_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
        {
            found = true;
            push_non_blank(story, &mut spans, chunk_start, line_start);
            chunk_start = offset;
        }
    }

    if !found {
        return None;
    }
    push_non_blank(story, &mut spans, chunk_start, story.len());
    Some(spans)
}

fn push_non_blank(story: &str, spans: &mut Vec<(usize, usize)>, start: usize, end: usize) {
    if start < end && !story[start..end].trim().is_empty() {
        spans.push((start, end));
    }
}

/// Contiguous spans covering the story, cut after sentence terminators and
/// paragraph breaks. Each cut sits at the next non-whitespace character so
/// trailing whitespace stays with the preceding sentence.
fn sentence_spans(story: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = story.char_indices().collect();
    let mut cuts = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if TERMINATORS.contains(&c) {
            let mut j = i + 1;
            while j < chars.len()
                && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1))
            {
                j += 1;
            }
            let at_end = j >= chars.len();
            let followed_by_space = !at_end && chars[j].1.is_whitespace();
            let full_width = FULL_WIDTH_TERMINATORS.contains(&c);
            let next = skip_whitespace(&chars, j);
            // Dialogue attribution continues the sentence: "Run!" she cried.
            let continues = next < chars.len() && chars[next].1.is_lowercase();
            if (followed_by_space || full_width || at_end)
                && !continues
                && !ends_with_abbreviation(story, position, c)
            {
                if next < chars.len() {
                    cuts.push(chars[next].0);
                }
                i = next;
                continue;
            }
            i = j;
            continue;
        }

        if c == '\n' {
            let next = skip_whitespace(&chars, i);
            let blank_line = chars[i..next.min(chars.len())]
                .iter()
                .filter(|(_, ch)| *ch == '\n')
                .count()
                > 1;
            if blank_line && next < chars.len() {
                cuts.push(chars[next].0);
            }
            i = next;
            continue;
        }

        i += 1;
    }

    let mut spans = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        if cut > start {
            spans.push((start, cut));
            start = cut;
        }
    }
    spans.push((start, story.len()));
    spans
}

fn skip_whitespace(chars: &[(usize, char)], mut j: usize) -> usize {
    while j < chars.len() && chars[j].1.is_whitespace() {
        j += 1;
    }
    j
}

/// True if the period at `position` closes an abbreviation such as "Dr.".
fn ends_with_abbreviation(story: &str, position: usize, terminator: char) -> bool {
    if terminator != '.' {
        return false;
    }
    let word_start = story[..position]
        .rfind(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '“')
        .map(|i| i + 1)
        .unwrap_or(0);
    let word = story[word_start..=position].to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(story: &str) -> Vec<String> {
        BeatSegmenter::default()
            .segment(story)
            .unwrap()
            .iter()
            .map(|b| b.source_text().clone())
            .collect()
    }

    #[test]
    fn splits_on_sentences() {
        assert_eq!(
            texts("Raju sits on the roof watching stars. A bright light descends. The light becomes a fairy who reaches out her hand."),
            vec![
                "Raju sits on the roof watching stars.",
                "A bright light descends.",
                "The light becomes a fairy who reaches out her hand.",
            ]
        );
    }

    #[test]
    fn keeps_closing_quotes_and_abbreviations() {
        assert_eq!(
            texts("\"Look up there!\" she cried loudly. Dr. Rao nodded at the sky."),
            vec!["\"Look up there!\" she cried loudly.", "Dr. Rao nodded at the sky."]
        );
    }

    #[test]
    fn quoted_exclamation_splits_before_next_sentence() {
        assert_eq!(
            texts("She shouted \"Run now!\" The wolves came closer."),
            vec!["She shouted \"Run now!\"", "The wolves came closer."]
        );
    }

    #[test]
    fn no_terminator_is_single_beat() {
        assert_eq!(texts("a story without any ending"), vec!["a story without any ending"]);
    }

    #[test]
    fn paragraph_breaks_split() {
        assert_eq!(
            texts("The village sleeps under stars\n\nA lantern flickers in the window"),
            vec!["The village sleeps under stars", "A lantern flickers in the window"]
        );
    }

    #[test]
    fn short_beats_merge_forward_and_backward() {
        assert_eq!(
            texts("Night. The owl hoots softly. It flies away over the fields. Silence."),
            vec!["Night. The owl hoots softly.", "It flies away over the fields. Silence."]
        );
    }

    #[test]
    fn markers_take_precedence() {
        let story = "One. Two sentences here.\n---\nThird part.\n[BEAT]\nFourth.\n";
        assert_eq!(
            texts(story),
            vec!["One. Two sentences here.", "Third part.", "Fourth."]
        );
    }

    #[test]
    fn full_width_terminators() {
        assert_eq!(
            texts("星が光る夜に少年が座る。妖精が 空から 降りてくる。"),
            vec!["星が光る夜に少年が座る。", "妖精が 空から 降りてくる。"]
        );
        assert_eq!(
            texts("少年は屋根に座って星を見ている。明るい光が降りてくる。光は手を差し伸べる妖精になる。"),
            vec![
                "少年は屋根に座って星を見ている。",
                "明るい光が降りてくる。",
                "光は手を差し伸べる妖精になる。",
            ]
        );
        assert_eq!(texts("夜。少年は星を見ている。"), vec!["夜。少年は星を見ている。"]);
    }

    #[test]
    fn whitespace_only_is_empty_input() {
        let err = BeatSegmenter::default().segment("  \n\t ").unwrap_err();
        assert_eq!(err.kind, SceneErrorKind::EmptyInput);
    }
}
