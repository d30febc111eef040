//! Normalized edit-distance similarity between a line and a heading keyword.

use rapidfuzz::distance::levenshtein;

/// Levenshtein similarity normalized by the longer string's length:
/// `1 - distance / max_len`. Identical strings score 1.0.
///
/// Compares by `char`, not byte, so accented headings are not penalised.
pub fn keyword_similarity(normalized_line: &str, keyword: &str) -> f64 {
    levenshtein::normalized_similarity(normalized_line.chars(), keyword.chars())
}

/// Whether `normalized_line` is at least `threshold` similar to `keyword`.
pub fn matches_keyword(normalized_line: &str, keyword: &str, threshold: f64) -> bool {
    keyword_similarity(normalized_line, keyword) >= threshold
}
