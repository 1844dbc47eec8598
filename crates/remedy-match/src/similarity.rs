//! Normalized Levenshtein similarity.

/// Unit-cost edit distance (insert, delete, substitute) over chars.
pub use strsim::levenshtein;

/// Similarity ratio in `0.0..=1.0`: `1 - distance / max(len)`, case-insensitive.
///
/// Equal strings (including two empty ones) score 1.0; one empty side scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}
