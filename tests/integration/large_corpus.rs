//! 100k generated words: automatic inverted layout and lookup latency.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use crate::common::generated_corpus;
use fuzzdex::{build_index, Config, Index, Layout, MatchType, PluginSet, SearchOptions};

const CORPUS_SIZE: usize = 100_000;

static WORDS: LazyLock<Vec<String>> = LazyLock::new(|| generated_corpus(CORPUS_SIZE, 7));

static INDEX: LazyLock<Index> = LazyLock::new(|| {
    build_index(WORDS.iter(), Config::default(), &PluginSet::builtin())
        .expect("generated corpus should build")
});

/// Fastest of several runs, after one warm-up.
fn best_of<F: FnMut()>(runs: usize, mut f: F) -> Duration {
    f();
    (0..runs)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[test]
fn inverted_layout_is_automatic() {
    let index = &*INDEX;
    assert_eq!(index.len(), CORPUS_SIZE);
    assert!(matches!(index.layout(), Layout::WithInverted(_)));
    assert!(index.corpus_stats().is_some());
    assert!(index.bloom().is_some());
    assert!(!index.config().use_inverted_index);
}

#[test]
fn exact_terms_rank_first() {
    let index = &*INDEX;
    for word in WORDS.iter().step_by(9_973) {
        let results = index.search_uncached(word, 5, &SearchOptions::default());
        assert_eq!(&results[0].display, word);
        assert_eq!(results[0].match_type, MatchType::Exact);
        assert_eq!(results[0].score, 1.0);
    }
}

#[test]
fn exact_lookup_is_sub_millisecond() {
    let index = &*INDEX;
    let word = &WORDS[CORPUS_SIZE / 2];
    let lookup = best_of(20, || {
        assert_eq!(index.postings(word).len(), 1);
    });
    let search = best_of(5, || {
        let results = index.search_uncached(word, 10, &SearchOptions::default());
        assert_eq!(&results[0].display, word);
    });
    // Debug builds are too slow to say anything about latency
    if !cfg!(debug_assertions) {
        assert!(lookup < Duration::from_millis(1), "posting lookup took {:?}", lookup);
        assert!(search < Duration::from_millis(25), "search took {:?}", search);
    }
}

#[test]
fn absent_terms_are_rejected_by_the_bloom_filter() {
    let index = &*INDEX;
    let bloom = index.bloom().unwrap();
    let rejected = (0..1_000)
        .filter(|i| !bloom.might_contain(&format!("{}-missing", i)))
        .count();
    assert!(rejected > 900, "only {} of 1000 rejected", rejected);
    assert!(index.postings("0-missing").is_empty());
}
