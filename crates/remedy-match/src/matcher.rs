//! Approximate symptom matcher.
//!
//! Resolution order for one input string:
//! 1. The whole input is a vocabulary symptom (verbatim, normalized, or via a direct synonym).
//! 2. Greedy scan: the longest 4/3/2-word phrase that is a vocabulary entry.
//! 3. Single word: direct synonym, else the best fuzzy candidate at or above the threshold.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::normalize::normalize_input;
use crate::similarity::similarity;
use crate::vocabulary::SymptomIndex;

/// Longest phrase (in words) tried by the greedy scan.
pub const MAX_PHRASE_WORDS: usize = 4;

/// Everyday wording → canonical vocabulary symptom.
static DIRECT_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fever", "high_fever"),
        ("cold", "chills"),
        ("head ache", "headache"),
        ("head-ache", "headache"),
        ("coughing", "cough"),
        ("sneezing", "continuous_sneezing"),
    ])
});

/// Ordered, de-duplicated symptoms recognized in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    symptoms: Vec<String>,
}

impl MatchResult {
    /// Append a symptom unless already present. Returns whether it was added.
    pub fn push(&mut self, symptom: impl Into<String>) -> bool {
        let symptom = symptom.into();
        if self.symptoms.contains(&symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn extend(&mut self, other: MatchResult) {
        for symptom in other.symptoms {
            self.push(symptom);
        }
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symptoms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.symptoms
    }
}

impl<S: Into<String>> FromIterator<S> for MatchResult {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut result = MatchResult::default();
        for symptom in iter {
            result.push(symptom);
        }
        result
    }
}

/// Matches free text against the vocabulary of a `SymptomIndex`.
pub struct SymptomMatcher<'a> {
    index: &'a SymptomIndex,
}

impl<'a> SymptomMatcher<'a> {
    pub fn new(index: &'a SymptomIndex) -> Self {
        Self { index }
    }

    /// Recognize vocabulary symptoms in `input`.
    ///
    /// `threshold` (0.0–1.0) is the minimum similarity for a fuzzy single-word match.
    /// Never fails: empty input or an empty vocabulary yields an empty result.
    pub fn find_matches(&self, input: &str, threshold: f64) -> MatchResult {
        let mut result = MatchResult::default();
        if input.trim().is_empty() || self.index.vocabulary().is_empty() {
            return result;
        }

        let verbatim = input.trim().to_lowercase();
        if self.index.contains(&verbatim) {
            result.push(verbatim);
            return result;
        }

        let normalized = normalize_input(input);
        if let Some(symptom) = self.whole_input_match(&normalized) {
            result.push(symptom);
            return result;
        }

        let words: Vec<&str> = normalized.split_whitespace().collect();
        let mut cursor = 0;
        while cursor < words.len() {
            if let Some((phrase, width)) = self.longest_phrase_at(&words, cursor) {
                result.push(phrase);
                cursor += width;
                continue;
            }
            if let Some(symptom) = self.resolve_word(words[cursor], threshold) {
                result.push(symptom);
            }
            cursor += 1;
        }

        tracing::debug!("Matched {:?} → {:?}", input, result.as_slice());
        result
    }

    fn whole_input_match(&self, normalized: &str) -> Option<String> {
        if normalized.is_empty() {
            return None;
        }
        if self.index.contains(normalized) {
            return Some(normalized.to_string());
        }
        self.direct_synonym(normalized)
    }

    fn longest_phrase_at(&self, words: &[&str], start: usize) -> Option<(String, usize)> {
        (2..=MAX_PHRASE_WORDS).rev().find_map(|width| {
            let end = start + width;
            if end > words.len() {
                return None;
            }
            let phrase = words[start..end].join(" ");
            self.index.contains(&phrase).then_some((phrase, width))
        })
    }

    fn resolve_word(&self, word: &str, threshold: f64) -> Option<String> {
        if let Some(symptom) = self.direct_synonym(word) {
            return Some(symptom);
        }
        best_fuzzy_match(word, self.index.vocabulary(), threshold)
            .map(|(symptom, _)| symptom.to_string())
    }

    fn direct_synonym(&self, text: &str) -> Option<String> {
        DIRECT_SYNONYMS
            .get(text)
            .filter(|mapped| self.index.contains(mapped))
            .map(|mapped| mapped.to_string())
    }
}

/// Best-scoring vocabulary entry for `word` with similarity ≥ `threshold`.
///
/// Ties keep the first candidate in vocabulary order.
pub fn best_fuzzy_match<'v>(
    word: &str,
    vocabulary: &'v BTreeSet<String>,
    threshold: f64,
) -> Option<(&'v str, f64)> {
    let mut best: Option<(&'v str, f64)> = None;
    for candidate in vocabulary {
        let score = similarity(word, candidate);
        let best_score = best.map(|(_, s)| s).unwrap_or(0.0);
        if score >= threshold && score > best_score {
            best = Some((candidate.as_str(), score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::SymptomRow;

    fn index() -> SymptomIndex {
        SymptomIndex::build(vec![
            SymptomRow::new("Fungal infection", &["itching", "skin_rash", "nodal_skin_eruptions"]),
            SymptomRow::new("Allergy", &["continuous_sneezing", "shivering", "chills"]),
            SymptomRow::new("Common Cold", &["high_fever", "cough", "headache", "chills"]),
            SymptomRow::new("GERD", &["stomach pain", "acidity", "stomach", "pain"]),
        ])
    }

    #[test]
    fn test_direct_synonym_for_whole_input() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        assert_eq!(matcher.find_matches("fever", 0.6).as_slice(), ["high_fever"]);
        assert_eq!(matcher.find_matches("Cold", 0.6).as_slice(), ["chills"]);
        assert_eq!(matcher.find_matches("coughing", 0.9).as_slice(), ["cough"]);
        assert_eq!(matcher.find_matches("head ache", 0.9).as_slice(), ["headache"]);
    }

    #[test]
    fn test_vocabulary_entry_shadows_synonym() {
        let index = SymptomIndex::build(vec![
            SymptomRow::new("Common Cold", &["cold", "chills", "high_fever"]),
            SymptomRow::new("Malaria", &["fever", "chills"]),
        ]);
        let matcher = SymptomMatcher::new(&index);
        assert_eq!(matcher.find_matches("cold", 0.6).as_slice(), ["cold"]);
        assert_eq!(matcher.find_matches("Fever!", 0.6).as_slice(), ["fever"]);
        // A synonym whose target is not in the vocabulary is ignored.
        assert!(matcher.find_matches("coughing", 0.6).is_empty());
        // Inside a sentence the synonym table still applies per word.
        assert_eq!(matcher.find_matches("bad cold", 0.9).as_slice(), ["chills"]);
    }

    #[test]
    fn test_underscored_symptom_typed_loosely() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        assert_eq!(matcher.find_matches("Skin_Rash!", 0.8).as_slice(), ["skin_rash"]);
    }

    #[test]
    fn test_vocabulary_symptom_matches_itself() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        for symptom in index.vocabulary() {
            for threshold in [0.0, 0.5, 0.75, 1.0] {
                let result = matcher.find_matches(symptom, threshold);
                assert_eq!(result.as_slice(), [symptom.clone()], "{symptom} @ {threshold}");
            }
        }
    }

    #[test]
    fn test_greedy_prefers_longer_phrase() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        let result = matcher.find_matches("severe stomach pain", 0.9);
        assert_eq!(result.as_slice(), ["stomach pain"]);
        assert!(!result.contains("stomach"));
        assert!(!result.contains("pain"));
    }

    #[test]
    fn test_fuzzy_single_words_and_threshold() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        // "itchin" vs "itching" = 1 - 1/7 ≈ 0.857
        assert_eq!(matcher.find_matches("itchin acidty", 0.8).as_slice(), ["itching", "acidity"]);
        assert!(matcher.find_matches("itchin", 0.9).is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_occurrence() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        let result = matcher.find_matches("cough itching coughing itching", 0.8);
        assert_eq!(result.as_slice(), ["cough", "itching"]);
    }

    #[test]
    fn test_synonym_word_inside_sentence() {
        let index = index();
        let matcher = SymptomMatcher::new(&index);
        let result = matcher.find_matches("fever and sneezing", 0.8);
        assert_eq!(result.as_slice(), ["high_fever", "continuous_sneezing"]);
    }

    #[test]
    fn test_empty_input_or_vocabulary() {
        let index = index();
        assert!(SymptomMatcher::new(&index).find_matches("", 0.5).is_empty());
        assert!(SymptomMatcher::new(&index).find_matches("  ,. ", 0.5).is_empty());

        let empty = SymptomIndex::default();
        assert!(SymptomMatcher::new(&empty).find_matches("itching", 0.0).is_empty());
    }

    #[test]
    fn test_match_result_from_iter_dedups() {
        let result: MatchResult = ["a", "b", "a", "c"].into_iter().collect();
        assert_eq!(result.as_slice(), ["a", "b", "c"]);
        assert_eq!(result.len(), 3);
    }
}
