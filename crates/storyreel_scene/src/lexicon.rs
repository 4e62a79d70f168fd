//! Word lists used for complexity scoring, motion classification and entity spotting.
//!
//! English only. Words are matched lowercased; verbs match their common
//! inflections (`sit`, `sits`, `sitting`, `sat`).

use storyreel_core::EntityKind;

/// Verbs of fast or violent movement.
pub const RAPID_VERBS: &[&str] = &[
    "run", "dash", "sprint", "leap", "jump", "chase", "flee", "race", "crash", "explode",
    "burst", "fight", "strike", "charge", "swoop", "plunge", "hurl", "throw", "slam", "spin",
    "whirl", "fall", "tumble", "rush", "gallop", "smash", "dive", "bolt", "scramble", "attack",
];

/// Verbs of stillness.
pub const CALM_VERBS: &[&str] = &[
    "sit", "stand", "rest", "sleep", "lie", "wait", "breathe", "smile", "sigh", "linger",
    "float", "drift", "kneel", "pause", "whisper", "dream", "hover",
];

/// Verbs of looking; a scene that follows one opens on what was seen.
pub const GAZE_VERBS: &[&str] = &[
    "watch", "look", "gaze", "stare", "see", "glance", "peer", "notice", "observe", "spot",
    "behold", "glimpse",
];

/// Other visible actions.
pub const ACTION_VERBS: &[&str] = &[
    "walk", "reach", "turn", "descend", "rise", "climb", "open", "close", "grab", "hold",
    "pull", "push", "lift", "carry", "wave", "nod", "enter", "leave", "approach", "follow",
    "glow", "shine", "step", "move", "touch", "point", "raise", "speak", "shout", "call",
    "sing", "dance", "cry", "laugh", "hug", "kiss", "write", "read", "eat", "drink", "dig",
    "swim", "fly", "land", "appear", "vanish", "emerge", "flicker", "transform", "shake",
    "tremble", "sparkle", "wander", "kick", "grip", "release", "catch",
];

/// Irregular past forms mapped to their base verb.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("ran", "run"),
    ("sat", "sit"),
    ("stood", "stand"),
    ("slept", "sleep"),
    ("lay", "lie"),
    ("lying", "lie"),
    ("fell", "fall"),
    ("flew", "fly"),
    ("fought", "fight"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("struck", "strike"),
    ("leapt", "leap"),
    ("saw", "see"),
    ("seen", "see"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("held", "hold"),
    ("spoke", "speak"),
    ("dove", "dive"),
    ("swam", "swim"),
    ("spun", "spin"),
    ("knelt", "kneel"),
    ("ate", "eat"),
    ("drank", "drink"),
    ("wrote", "write"),
    ("dug", "dig"),
    ("shook", "shake"),
    ("caught", "catch"),
    ("sang", "sing"),
    ("left", "leave"),
];

/// Nouns that introduce a trackable entity without a proper name.
pub const ARCHETYPES: &[(&str, EntityKind)] = &[
    ("boy", EntityKind::Character),
    ("girl", EntityKind::Character),
    ("man", EntityKind::Character),
    ("woman", EntityKind::Character),
    ("child", EntityKind::Character),
    ("king", EntityKind::Character),
    ("queen", EntityKind::Character),
    ("prince", EntityKind::Character),
    ("princess", EntityKind::Character),
    ("soldier", EntityKind::Character),
    ("farmer", EntityKind::Character),
    ("mother", EntityKind::Character),
    ("father", EntityKind::Character),
    ("grandmother", EntityKind::Character),
    ("grandfather", EntityKind::Character),
    ("stranger", EntityKind::Character),
    ("wizard", EntityKind::Character),
    ("witch", EntityKind::Character),
    ("teacher", EntityKind::Character),
    ("knight", EntityKind::Character),
    ("sailor", EntityKind::Character),
    ("merchant", EntityKind::Character),
    ("fairy", EntityKind::Creature),
    ("dragon", EntityKind::Creature),
    ("dog", EntityKind::Creature),
    ("cat", EntityKind::Creature),
    ("bird", EntityKind::Creature),
    ("horse", EntityKind::Creature),
    ("wolf", EntityKind::Creature),
    ("owl", EntityKind::Creature),
    ("tiger", EntityKind::Creature),
    ("lion", EntityKind::Creature),
    ("elephant", EntityKind::Creature),
    ("monster", EntityKind::Creature),
    ("ghost", EntityKind::Creature),
    ("angel", EntityKind::Creature),
    ("unicorn", EntityKind::Creature),
    ("fox", EntityKind::Creature),
    ("snake", EntityKind::Creature),
    ("deer", EntityKind::Creature),
    ("butterfly", EntityKind::Creature),
    ("light", EntityKind::Object),
    ("star", EntityKind::Object),
    ("moon", EntityKind::Object),
    ("sun", EntityKind::Object),
    ("sword", EntityKind::Object),
    ("lantern", EntityKind::Object),
    ("lamp", EntityKind::Object),
    ("book", EntityKind::Object),
    ("box", EntityKind::Object),
    ("key", EntityKind::Object),
    ("ship", EntityKind::Object),
    ("boat", EntityKind::Object),
    ("car", EntityKind::Object),
    ("train", EntityKind::Object),
    ("letter", EntityKind::Object),
    ("crown", EntityKind::Object),
    ("ring", EntityKind::Object),
    ("mirror", EntityKind::Object),
    ("candle", EntityKind::Object),
    ("kite", EntityKind::Object),
];

/// Irregular plurals of archetype nouns.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("wolves", "wolf"),
    ("fairies", "fairy"),
    ("butterflies", "butterfly"),
];

/// Places, with the ambient sound bed suggested for them.
pub const SETTINGS: &[(&str, &str)] = &[
    ("roof", "Open-air breeze and distant neighbourhood sounds"),
    ("rooftop", "Open-air breeze and distant neighbourhood sounds"),
    ("village", "Distant village life, dogs barking and wind through trees"),
    ("forest", "Rustling leaves, birdsong and creaking branches"),
    ("jungle", "Dense insect chorus and distant calls"),
    ("city", "Urban hum, traffic and distant sirens"),
    ("street", "Footsteps, passing traffic and street chatter"),
    ("house", "Quiet interior room tone and a ticking clock"),
    ("room", "Quiet interior room tone"),
    ("kitchen", "Clinking dishes and a simmering pot"),
    ("river", "Flowing water and wind over the banks"),
    ("sea", "Rolling waves and seabirds"),
    ("ocean", "Rolling waves and seabirds"),
    ("beach", "Rolling waves and seabirds"),
    ("mountain", "High wind and distant echoes"),
    ("desert", "Dry wind and shifting sand"),
    ("field", "Wind through grass and insects"),
    ("meadow", "Wind through grass and insects"),
    ("garden", "Birdsong and rustling plants"),
    ("castle", "Echoing stone halls and crackling torches"),
    ("temple", "Temple bells and soft chanting"),
    ("market", "Bustling crowd and vendors calling out"),
    ("school", "Distant chatter and a ringing bell"),
    ("sky", "Open-air wind"),
];

/// Capitalised words that are never names.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "he", "she", "it", "they", "we", "i", "you", "his", "her", "its", "their",
    "our", "my", "your", "him", "them", "this", "that", "these", "those", "there", "here",
    "then", "when", "while", "as", "and", "but", "or", "so", "yet", "if", "in", "on", "at",
    "of", "to", "from", "with", "without", "by", "for", "after", "before", "suddenly",
    "finally", "later", "soon", "now", "once", "meanwhile", "still", "just", "even", "only",
    "all", "every", "some", "no", "not", "what", "who", "where", "why", "how", "mr", "mrs",
    "ms", "dr", "st", "jr", "sr", "above", "below", "under", "over", "into", "onto", "through",
    "across", "around", "behind", "beyond", "near", "far", "inside", "outside", "together",
    "again", "also", "yes", "oh", "well", "night", "day", "morning", "evening", "today",
    "tomorrow", "yesterday", "one", "two", "three", "chapter", "scene", "everyone", "someone",
    "nothing", "something", "everything", "nobody", "each", "both", "is", "was", "are", "were",
];

/// Words that open a descriptive clause after an entity.
pub const QUALIFIERS: &[&str] = &["who", "with", "wearing", "holding", "carrying", "dressed", "in"];

/// Abbreviations that end in a period but do not end a sentence.
pub const ABBREVIATIONS: &[&str] = &["mr.", "mrs.", "ms.", "dr.", "st.", "jr.", "sr.", "vs.", "etc."];

/// Beat marker lines, compared case-insensitively.
pub const BEAT_MARKERS: &[&str] = &["---", "***", "===", "[beat]"];

/// Base form of `word` if it is a known verb in any of the lists.
pub fn verb_lemma(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    if let Some((_, base)) = IRREGULAR_VERBS.iter().find(|(form, _)| *form == word) {
        return Some(base);
    }
    [RAPID_VERBS, CALM_VERBS, GAZE_VERBS, ACTION_VERBS]
        .iter()
        .flat_map(|list| list.iter())
        .copied()
        .find(|base| inflects(&word, base))
}

/// True if `word` is `base` or a regular inflection of it.
fn inflects(word: &str, base: &str) -> bool {
    if word == base {
        return true;
    }
    let Some(suffix) = word.strip_prefix(base) else {
        return irregular_stem(word, base);
    };
    match suffix {
        "s" | "es" | "ed" | "ing" => true,
        "d" => base.ends_with('e'),
        _ => {
            // Doubled final consonant: run → running, stop → stopped.
            let last = base.chars().last();
            let mut chars = suffix.chars();
            last.is_some() && chars.next() == last && matches!(chars.as_str(), "ing" | "ed")
        }
    }
}

fn irregular_stem(word: &str, base: &str) -> bool {
    if let Some(stem) = base.strip_suffix('e') {
        if word.strip_prefix(stem) == Some("ing") {
            return true;
        }
    }
    if let Some(stem) = base.strip_suffix('y') {
        if matches!(word.strip_prefix(stem), Some("ies") | Some("ied")) {
            return true;
        }
    }
    false
}

/// True if `lemma` denotes fast movement.
pub fn is_rapid(lemma: &str) -> bool {
    RAPID_VERBS.contains(&lemma)
}

/// True if `lemma` denotes stillness.
pub fn is_calm(lemma: &str) -> bool {
    CALM_VERBS.contains(&lemma)
}

/// True if `lemma` is a verb of looking.
pub fn is_gaze(lemma: &str) -> bool {
    GAZE_VERBS.contains(&lemma)
}

/// Singular archetype noun and its kind, if `word` is one.
pub fn archetype(word: &str) -> Option<(&'static str, EntityKind)> {
    let word = word.to_lowercase();
    let singular = singular_candidates(&word);
    ARCHETYPES
        .iter()
        .find(|(noun, _)| singular.iter().any(|candidate| candidate == noun))
        .map(|(noun, kind)| (*noun, *kind))
}

/// Setting noun and its ambient sound, if `word` is one.
pub fn setting(word: &str) -> Option<(&'static str, &'static str)> {
    let word = word.to_lowercase();
    let singular = singular_candidates(&word);
    SETTINGS
        .iter()
        .find(|(noun, _)| singular.iter().any(|candidate| candidate == noun))
        .copied()
}

/// Ambient sound for a setting noun.
pub fn ambient_for(setting_name: &str) -> Option<&'static str> {
    setting(setting_name).map(|(_, ambient)| ambient)
}

/// True if `word` can never be a name.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

fn singular_candidates(word: &str) -> Vec<String> {
    let mut candidates = vec![word.to_string()];
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        candidates.push(singular.to_string());
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_match_inflections() {
        assert_eq!(verb_lemma("sits"), Some("sit"));
        assert_eq!(verb_lemma("sitting"), Some("sit"));
        assert_eq!(verb_lemma("sat"), Some("sit"));
        assert_eq!(verb_lemma("watching"), Some("watch"));
        assert_eq!(verb_lemma("descends"), Some("descend"));
        assert_eq!(verb_lemma("reaches"), Some("reach"));
        assert_eq!(verb_lemma("running"), Some("run"));
        assert_eq!(verb_lemma("smiled"), Some("smile"));
        assert_eq!(verb_lemma("diving"), Some("dive"));
        assert_eq!(verb_lemma("flies"), Some("fly"));
        assert_eq!(verb_lemma("becomes"), None);
        assert_eq!(verb_lemma("roof"), None);
    }

    #[test]
    fn nouns_match_plurals() {
        assert_eq!(archetype("stars"), Some(("star", EntityKind::Object)));
        assert_eq!(archetype("Fairies"), Some(("fairy", EntityKind::Creature)));
        assert_eq!(archetype("boxes"), Some(("box", EntityKind::Object)));
        assert_eq!(setting("rooftops").map(|(noun, _)| noun), Some("rooftop"));
        assert!(archetype("hand").is_none());
    }

    #[test]
    fn verb_classes() {
        assert!(is_gaze("watch"));
        assert!(is_calm("sit"));
        assert!(is_rapid("run"));
        assert!(!is_rapid("descend"));
    }
}
