// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distances against an unbounded reference.

#![no_main]

use arbitrary::Arbitrary;
use fuzzdex::{damerau_levenshtein, levenshtein, ngram_similarity};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Pair {
    a: String,
    b: String,
    max: u8,
}

/// Plain two-row Levenshtein with no cutoff.
fn reference(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fuzz_target!(|input: Pair| {
    let a: String = input.a.chars().take(40).collect();
    let b: String = input.b.chars().take(40).collect();
    let max = usize::from(input.max % 8);

    let exact = reference(
        &a.chars().collect::<Vec<_>>(),
        &b.chars().collect::<Vec<_>>(),
    );
    let bounded = levenshtein(&a, &b, max);
    if exact <= max {
        assert_eq!(bounded, exact);
    } else {
        assert_eq!(bounded, max + 1);
    }

    // Transpositions can only help
    assert!(damerau_levenshtein(&a, &b, max) <= bounded);
    assert_eq!(levenshtein(&a, &b, max), levenshtein(&b, &a, max));

    let sim = ngram_similarity(&a, &b, 2);
    assert!((0.0..=1.0).contains(&sim));
    assert_eq!(sim, ngram_similarity(&b, &a, 2));
});
