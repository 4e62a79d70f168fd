//! Lexical analysis of beat text: tokens, action verbs, entity sightings and motion.

use crate::lexicon;
use regex::Regex;
use std::sync::OnceLock;
use storyreel_core::{EntityKind, MotionIntensity};

static WORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"[\p{L}\p{M}][\p{L}\p{M}\p{N}'’-]*").expect("Valid word regex")
    })
}

/// Han ideographs and kana, written without spaces between words.
fn is_unspaced_script(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
    )
}

/// Number of words in `text`. Each Han or kana character counts as one word.
///
/// ```
/// use storyreel_scene::word_count;
///
/// assert_eq!(word_count("A bright light descends."), 4);
/// assert_eq!(word_count("光が降りる。"), 5);
/// ```
pub fn word_count(text: &str) -> usize {
    let unspaced = text.chars().filter(|&c| is_unspaced_script(c)).count();
    let rest: String = text
        .chars()
        .map(|c| if is_unspaced_script(c) { ' ' } else { c })
        .collect();
    let spaced = rest
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .count();
    unspaced + spaced
}

/// Characters that end a descriptive clause.
const CLAUSE_END: &[char] = &[
    ',', '.', ';', ':', '!', '?', '…', '。', '！', '？', '।', '"', '“', '”', '(', ')',
];

/// Characters after which a capitalised word may just be sentence case.
const SENTENCE_END: &[char] = &['.', '!', '?', '…', '。', '！', '？', '।', '\n'];

/// Longest descriptive clause kept in a fingerprint, in words.
const MAX_CLAUSE_WORDS: usize = 10;

/// Preceding adjectives kept in a fingerprint.
const MAX_ADJECTIVES: usize = 3;

/// A word and its byte position in the analysed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

impl Token<'_> {
    /// The word without a trailing possessive.
    fn bare(&self) -> &str {
        self.text
            .strip_suffix("'s")
            .or_else(|| self.text.strip_suffix("’s"))
            .unwrap_or(self.text)
    }

    fn is_capitalised(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

fn tokens(text: &str) -> Vec<Token<'_>> {
    word_regex()
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// An entity mention found in a beat, with the description it would be
/// registered under if this is its first sighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    /// Name as written (proper nouns) or the singular noun (archetypes)
    pub name: String,
    /// Category
    pub kind: EntityKind,
    /// Description proposed from this mention
    pub proposed: String,
}

/// Base forms of the action verbs in `text`, in order of appearance.
pub fn action_verbs(text: &str) -> Vec<&'static str> {
    tokens(text)
        .iter()
        .filter_map(|token| lexicon::verb_lemma(token.bare()))
        .collect()
}

/// Every entity mention in `text`, in order, including repeats.
pub fn sightings(text: &str) -> Vec<Sighting> {
    let tokens = tokens(text);
    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let bare = token.bare();

        if let Some((noun, _)) = lexicon::setting(bare) {
            found.push(Sighting {
                name: noun.to_string(),
                kind: EntityKind::Setting,
                proposed: describe_common(text, &tokens, i, noun),
            });
            i += 1;
            continue;
        }

        if let Some((noun, kind)) = lexicon::archetype(bare) {
            found.push(Sighting {
                name: noun.to_string(),
                kind,
                proposed: describe_common(text, &tokens, i, noun),
            });
            i += 1;
            continue;
        }

        if is_name_part(text, &tokens, i) {
            // Consecutive capitalised words form one name: "Captain Rao".
            let mut j = i;
            while j + 1 < tokens.len()
                && is_name_part(text, &tokens, j + 1)
                && text[tokens[j].end..tokens[j + 1].start].trim().is_empty()
                && tokens[j].bare() == tokens[j].text
            {
                j += 1;
            }
            let name = text[token.start..tokens[j].start].to_string() + tokens[j].bare();
            let proposed = describe_proper(text, tokens[j].end, &name);
            found.push(Sighting {
                name,
                kind: EntityKind::Character,
                proposed,
            });
            i = j + 1;
            continue;
        }

        i += 1;
    }
    found
}

fn is_name_part(text: &str, tokens: &[Token<'_>], i: usize) -> bool {
    let token = tokens[i];
    let bare = token.bare();
    token.is_capitalised()
        && !lexicon::is_stopword(bare)
        && lexicon::verb_lemma(bare).is_none()
        && lexicon::archetype(bare).is_none()
        && lexicon::setting(bare).is_none()
        && !(is_sentence_start(text, tokens, i) && bare.to_lowercase().ends_with("ly"))
}

fn is_sentence_start(text: &str, tokens: &[Token<'_>], i: usize) -> bool {
    i == 0 || text[tokens[i - 1].end..tokens[i].start].contains(SENTENCE_END)
}

/// Description for a proper name: an appositive ("Raju, a boy in a blue
/// shirt,"), a qualifying clause ("Raju wearing a red scarf") or the bare name.
fn describe_proper(text: &str, after: usize, name: &str) -> String {
    let rest = &text[after..];
    if let Some(appositive) = appositive(rest) {
        return format!("{}, {}", name, appositive);
    }
    match qualifier_clause(rest) {
        Some(clause) => format!("{} {}", name, clause),
        None => name.to_string(),
    }
}

fn appositive(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix(',')?;
    let close = inner.find(CLAUSE_END)?;
    if !inner[close..].starts_with(',') {
        return None;
    }
    let phrase = inner[..close].trim();
    let lower = phrase.to_lowercase();
    let is_noun_phrase = ["a ", "an ", "the "].iter().any(|article| lower.starts_with(article));
    let words = phrase.split_whitespace().count();
    (is_noun_phrase && words <= MAX_CLAUSE_WORDS + 2).then_some(phrase)
}

fn qualifier_clause(rest: &str) -> Option<String> {
    let end = rest.find(CLAUSE_END).unwrap_or(rest.len());
    let words: Vec<&str> = rest[..end].split_whitespace().collect();
    let first = words.first()?.to_lowercase();
    if !lexicon::QUALIFIERS.contains(&first.as_str()) || words.len() < 2 {
        return None;
    }
    Some(words[..words.len().min(MAX_CLAUSE_WORDS)].join(" "))
}

/// Description for a common noun: preceding adjectives, the noun and any
/// qualifying clause ("bright light", "fairy who reaches out her hand").
fn describe_common(text: &str, tokens: &[Token<'_>], i: usize, noun: &str) -> String {
    let mut adjectives = Vec::new();
    let mut j = i;
    while j > 0 && adjectives.len() < MAX_ADJECTIVES {
        let previous = tokens[j - 1];
        let gap = &text[previous.end..tokens[j].start];
        if !gap.trim().is_empty() {
            break;
        }
        let word = previous.bare();
        if lexicon::is_stopword(word)
            || lexicon::verb_lemma(word).is_some()
            || lexicon::archetype(word).is_some()
            || previous.is_capitalised()
        {
            break;
        }
        adjectives.push(word.to_lowercase());
        j -= 1;
    }
    adjectives.reverse();
    adjectives.push(noun.to_string());
    let phrase = adjectives.join(" ");

    match qualifier_clause(&text[tokens[i].end..]) {
        Some(clause) => format!("{} {}", phrase, clause),
        None => phrase,
    }
}

/// Complexity signal: action verbs + entity mentions + one point per ten words.
///
/// # Examples
///
/// ```
/// use storyreel_scene::complexity;
///
/// // sits, watching + Raju, roof, stars
/// assert_eq!(complexity("Raju sits on the roof watching stars."), 5);
/// ```
pub fn complexity(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    (action_verbs(text).len() + sightings(text).len() + words / 10) as u32
}

/// Motion level of a beat.
///
/// Any rapid verb or a complexity of 7 or more is high; only calm verbs (or
/// none) with a complexity of at most 2 is low; everything else is medium.
pub fn motion_intensity(text: &str, complexity: u32) -> MotionIntensity {
    let verbs = action_verbs(text);
    if complexity >= 7 || verbs.iter().any(|verb| lexicon::is_rapid(verb)) {
        MotionIntensity::High
    } else if complexity <= 2 && verbs.iter().all(|verb| lexicon::is_calm(verb)) {
        MotionIntensity::Low
    } else {
        MotionIntensity::Medium
    }
}

/// True if the text contains a verb of looking.
pub fn has_gaze(text: &str) -> bool {
    action_verbs(text).iter().any(|verb| lexicon::is_gaze(verb))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<(String, EntityKind)> {
        sightings(text)
            .into_iter()
            .map(|s| (s.name, s.kind))
            .collect()
    }

    #[test]
    fn finds_names_archetypes_and_settings() {
        assert_eq!(
            names("Raju sits on the roof watching stars."),
            vec![
                ("Raju".to_string(), EntityKind::Character),
                ("roof".to_string(), EntityKind::Setting),
                ("star".to_string(), EntityKind::Object),
            ]
        );
    }

    #[test]
    fn sentence_start_adverbs_are_not_names() {
        assert!(names("Slowly the door creaks.").is_empty());
        assert!(names("Suddenly, nothing.").is_empty());
    }

    #[test]
    fn multi_word_names_join() {
        assert_eq!(
            names("Captain Rao's ship sails.")[0],
            ("Captain Rao".to_string(), EntityKind::Character)
        );
    }

    #[test]
    fn appositive_becomes_fingerprint() {
        let found = sightings("Meera, a tall woman in a green sari, opens the gate.");
        assert_eq!(found[0].proposed, "Meera, a tall woman in a green sari");
    }

    #[test]
    fn qualifier_clause_becomes_fingerprint() {
        let found = sightings("The light becomes a fairy who reaches out her hand.");
        assert_eq!(found[0].proposed, "light");
        assert_eq!(found[1].proposed, "fairy who reaches out her hand");
    }

    #[test]
    fn adjectives_precede_common_nouns() {
        let found = sightings("A bright light descends.");
        assert_eq!(found[0].name, "light");
        assert_eq!(found[0].proposed, "bright light");
    }

    #[test]
    fn motion_levels() {
        assert_eq!(motion_intensity("The dog runs.", 2), MotionIntensity::High);
        assert_eq!(motion_intensity("She sleeps.", 1), MotionIntensity::Low);
        assert_eq!(motion_intensity("Quiet.", 0), MotionIntensity::Low);
        assert_eq!(
            motion_intensity("Raju sits on the roof watching stars.", 5),
            MotionIntensity::Medium
        );
        assert_eq!(motion_intensity("Everything stops.", 9), MotionIntensity::High);
    }

    #[test]
    fn word_count_handles_unspaced_scripts() {
        assert_eq!(word_count("Raju sits on the roof, watching stars."), 6);
        assert_eq!(word_count("少年は屋根に座って星を見ている。"), 15);
        assert_eq!(word_count("Tokyo の夜"), 3);
        assert_eq!(word_count("... --- !"), 0);
        assert_eq!(word_count("Wait 10 minutes."), 3);
    }

    #[test]
    fn gaze_detection() {
        assert!(has_gaze("Raju sits on the roof watching stars."));
        assert!(!has_gaze("A bright light descends."));
    }
}
