//! Edit distance against `strsim` as the reference.

use fuzzdex::{damerau_levenshtein, distance_to_similarity, levenshtein, ngram_similarity};
use proptest::prelude::*;

/// Small alphabet so random pairs actually share structure.
fn word() -> impl Strategy<Value = String> {
    "[abcdé]{0,9}"
}

fn bounded(distance: usize, max: usize) -> usize {
    if distance <= max {
        distance
    } else {
        max + 1
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_levenshtein_matches_reference(a in word(), b in word(), max in 0usize..5) {
        let expected = bounded(strsim::levenshtein(&a, &b), max);
        prop_assert_eq!(levenshtein(&a, &b, max), expected);
    }

    #[test]
    fn prop_damerau_matches_osa_reference(a in word(), b in word(), max in 0usize..5) {
        let expected = bounded(strsim::osa_distance(&a, &b), max);
        prop_assert_eq!(damerau_levenshtein(&a, &b, max), expected);
    }

    #[test]
    fn prop_transpositions_never_cost_more(a in word(), b in word()) {
        prop_assert!(damerau_levenshtein(&a, &b, 20) <= levenshtein(&a, &b, 20));
    }

    #[test]
    fn prop_similarity_non_increasing(max_len in 1usize..30, d in 0usize..30) {
        prop_assert!(distance_to_similarity(d + 1, max_len) <= distance_to_similarity(d, max_len));
        let s = distance_to_similarity(d, max_len);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn prop_ngram_similarity_symmetric_and_bounded(a in word(), b in word()) {
        let ab = ngram_similarity(&a, &b, 3);
        prop_assert_eq!(ab, ngram_similarity(&b, &a, 3));
        prop_assert!((0.0..=1.0).contains(&ab));
    }
}

#[test]
fn sentinel_is_max_plus_one() {
    assert_eq!(levenshtein("kitten", "sitting", 3), 3);
    assert_eq!(levenshtein("kitten", "sitting", 2), 3);
    assert_eq!(levenshtein("", "abcdef", 2), 3);
    assert_eq!(damerau_levenshtein("ca", "ac", 1), 1);
    assert_eq!(levenshtein("ca", "ac", 1), 2);
}
