//! Remedy Match: symptom vocabulary, input normalization, approximate matching.
//!
//! Free text is cleaned by `normalize`, segmented and fuzzy-resolved against a
//! closed symptom vocabulary by `matcher`, using the edit-distance ratio in
//! `similarity`. The vocabulary itself lives in an immutable `SymptomIndex`.

pub mod matcher;
pub mod normalize;
pub mod similarity;
pub mod vocabulary;

pub use matcher::{MatchResult, SymptomMatcher};
pub use normalize::{clean_speech_input, normalize_input};
pub use similarity::{levenshtein, similarity};
pub use vocabulary::{canonical_symptom, IndexStats, SymptomIndex, SymptomRow};
