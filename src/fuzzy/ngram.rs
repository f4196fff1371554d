//! Character n-gram sets and their Jaccard similarity.

use std::collections::BTreeSet;

/// Default n for the n-gram strategy.
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Forms this short or shorter get no n-grams in the index.
pub const MIN_NGRAM_SOURCE_LEN: usize = 3;

/// Distinct contiguous character n-grams of `s`.
///
/// Strings shorter than `n` produce an empty set.
pub fn ngram_set(s: &str, n: usize) -> BTreeSet<String> {
    let chars: Vec<char> = s.chars().collect();
    if n == 0 || chars.len() < n {
        return BTreeSet::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// N-grams to index for a normalized form, empty for forms of three chars or fewer.
pub fn indexable_ngrams(normalized: &str, n: usize) -> BTreeSet<String> {
    if normalized.chars().count() <= MIN_NGRAM_SOURCE_LEN {
        return BTreeSet::new();
    }
    ngram_set(normalized, n)
}

/// Jaccard similarity of the n-gram sets of `a` and `b`.
///
/// When either string is too short to have an n-gram the answer falls back
/// to plain equality.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    let left = ngram_set(a, n);
    let right = ngram_set(b, n);
    if left.is_empty() || right.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }
    jaccard(&left, &right)
}

/// |A ∩ B| / |A ∪ B| over two prepared sets.
pub fn jaccard(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    let shared = left.intersection(right).count();
    let union = left.len() + right.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}
