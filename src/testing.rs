//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures to avoid duplication.

#![doc(hidden)]

use crate::types::Record;

/// Small mixed vocabulary: typo neighbours, shared prefixes, phrases,
/// German compounds and a diacritic.
pub fn sample_words() -> Vec<&'static str> {
    vec![
        "hello",
        "hallo",
        "hullo",
        "helo",
        "help",
        "apple",
        "application",
        "apply",
        "maple",
        "banana",
        "bandana",
        "new york",
        "newark",
        "Krankenhaus",
        "Hauptstrasse",
        "Smith",
        "Schmidt",
        "café",
        "data",
        "database",
    ]
}

const SYLLABLES: [&str; 24] = [
    "ka", "lo", "mi", "re", "tan", "sor", "vel", "qui", "bra", "den", "fu", "gor", "hal", "ist",
    "jun", "pe", "nar", "os", "ul", "wen", "xa", "yor", "zim", "chi",
];

/// `n` distinct pronounceable words, deterministic for a given `seed`.
///
/// Word `i` is `i + 1` written in bijective base-24 over a syllable table
/// rotated by `seed`, so no two words collide.
pub fn generated_corpus(n: usize, seed: usize) -> Vec<String> {
    let base = SYLLABLES.len();
    (0..n)
        .map(|i| {
            let mut value = i + 1;
            let mut word = String::new();
            while value > 0 {
                let digit = (value - 1) % base;
                word.push_str(SYLLABLES[(digit + seed) % base]);
                value = (value - 1) / base;
            }
            word
        })
        .collect()
}

/// Build a record from `(field, value)` pairs.
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}
