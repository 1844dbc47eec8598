//! Input text normalization for typed and speech-transcribed symptom lists.

use once_cell::sync::Lazy;
use regex::Regex;

/// Known speech-recognition mispronunciations → intended word.
///
/// Applied as whole-word substitutions. Identity entries mark phrases that must
/// survive as-is and are skipped when compiling.
pub const SPEECH_CORRECTIONS: &[(&str, &str)] = &[
    ("feaver", "fever"),
    ("fevr", "fever"),
    ("couh", "cough"),
    ("cugh", "cough"),
    ("colt", "cold"),
    ("codl", "cold"),
    ("headack", "headache"),
    ("headace", "headache"),
    ("stomac", "stomach"),
    ("stomache", "stomach"),
    ("throte", "throat"),
    ("sorn", "sore"),
    ("soar", "sore"),
    ("paine", "pain"),
    ("aching", "ache"),
    ("runny nose", "runny nose"),
    ("sore throat", "sore throat"),
    ("body pain", "body pain"),
    ("chest pain", "chest pain"),
];

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());
static NON_WORD_OR_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s,]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SPEECH_CORRECTIONS
        .iter()
        .filter(|(heard, intended)| heard != intended)
        .map(|&(heard, intended)| {
            let pattern = format!(r"\b{}\b", regex::escape(heard));
            (Regex::new(&pattern).unwrap(), intended)
        })
        .collect()
});

/// Normalize typed input: lowercase, keep only letters, digits and whitespace, collapse whitespace.
pub fn normalize_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lower = text.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lower, "");
    collapse_whitespace(&stripped)
}

/// Clean speech-transcribed input.
///
/// Corrects known mispronunciations first, then strips punctuation while keeping
/// commas, which separate individual symptoms.
pub fn clean_speech_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut corrected = text.to_lowercase();
    for (pattern, intended) in CORRECTIONS.iter() {
        if pattern.is_match(&corrected) {
            corrected = pattern.replace_all(&corrected, *intended).into_owned();
        }
    }
    let stripped = NON_WORD_OR_COMMA.replace_all(&corrected, "");
    collapse_whitespace(&stripped)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
