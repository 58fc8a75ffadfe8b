//! Levenshtein-based similarity on normalized strings.

use rapidfuzz::distance::levenshtein;

/// Similarity between two already-normalized strings, in [0, 1].
///
/// Exact match scores 1.0. Containment either way scores 0.9: a partial
/// reference like `"inv1001"` inside `"inv1001rev2"` is a strong signal
/// that edit distance alone would undervalue. Otherwise the score is
/// `1 - distance / max_len`.
///
/// Two empty strings are an exact match (1.0); empty against non-empty
/// scores 0.0.
pub fn similarity_score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(b) || b.contains(a) {
        return 0.9;
    }

    let distance = levenshtein::distance(a.chars(), b.chars());
    let max_len = a.chars().count().max(b.chars().count());
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}
