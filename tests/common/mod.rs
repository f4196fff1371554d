//! Shared test utilities and fixtures.

#![allow(dead_code)]

use fuzzdex::{build_index, Config, Index, PluginSet, SearchOptions, SuggestionResult};

// Re-export canonical test utilities from fuzzdex::testing
pub use fuzzdex::testing::{generated_corpus, record, sample_words};

/// Build a string index with the built-in plugins.
pub fn build(words: &[&str], config: Config) -> Index {
    build_index(words.iter().copied(), config, &PluginSet::builtin())
        .expect("test corpus should build")
}

/// Build the mixed sample vocabulary with default settings.
pub fn sample_index() -> Index {
    build(&sample_words(), Config::default())
}

/// Search with default options.
pub fn query(index: &Index, query: &str, max_results: usize) -> Vec<SuggestionResult> {
    index.search(query, max_results, &SearchOptions::default())
}

pub fn displays(results: &[SuggestionResult]) -> Vec<&str> {
    results.iter().map(|r| r.display.as_str()).collect()
}

pub fn position(results: &[SuggestionResult], display: &str) -> Option<usize> {
    results.iter().position(|r| r.display == display)
}

/// German-primary config used by the compound-word scenarios.
pub fn german() -> Config {
    Config::default().with_languages(["de", "en"])
}
