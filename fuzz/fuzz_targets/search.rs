// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary corpora and queries through the full search pipeline.

#![no_main]

use arbitrary::Arbitrary;
use fuzzdex::{build_index, Config, PluginSet, SearchOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct SearchInput {
    words: Vec<String>,
    query: String,
    max_results: u8,
    inverted: bool,
    transpositions: bool,
    spans: bool,
}

fuzz_target!(|input: SearchInput| {
    let words: Vec<String> = input
        .words
        .into_iter()
        .take(64)
        .map(|w| w.chars().take(32).collect())
        .collect();
    let query: String = input.query.chars().take(32).collect();

    let mut config = Config::default();
    config.use_inverted_index = input.inverted;
    config.features.transpositions = input.transpositions;
    let Ok(index) = build_index(words.iter(), config, &PluginSet::builtin()) else {
        return;
    };

    let mut options = SearchOptions::default();
    options.include_spans = input.spans;
    let max_results = usize::from(input.max_results % 20);
    let results = index.search(&query, max_results, &options);

    assert!(results.len() <= max_results);
    for pair in results.windows(2) {
        assert!(pair[0].score + 1e-3 >= pair[1].score);
    }
    for result in &results {
        assert!((0.0..=1.0).contains(&result.score));
        for span in &result.spans {
            assert!(span.start <= span.end);
        }
    }
});
