//! Embeddable fuzzy full-text search with typo, phonetic and compound-word
//! tolerance.
//!
//! Given a corpus of strings or multi-field records, the index answers a
//! short, possibly misspelled query with a ranked top-K list of suggestions,
//! each carrying a score in [0, 1], the strategy that matched and
//! optional highlight spans.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   lang/     │────▶│   index/     │────▶│   search/    │
//! │ (normalize, │     │ (classic map,│     │ (strategies, │
//! │  phonetics) │     │  postings,   │     │  merge,      │
//! └─────────────┘     │  trie, bloom)│     │  spans)      │
//!                     └──────────────┘     └──────────────┘
//!                            │                    │
//!        ┌───────────────────┼────────────────────┤
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  binary/    │     │   fuzzy/     │     │  scoring/    │
//! │ (versioned  │     │ (Levenshtein,│     │ (base scores,│
//! │  format)    │     │  Damerau,    │     │  BM25, rank) │
//! └─────────────┘     │  n-grams)    │     └──────────────┘
//!                     └──────────────┘
//! ```
//!
//! Small corpora are served from the classic variant maps alone. Once the
//! corpus reaches `Config::inverted_threshold` items (10,000 by default), the
//! index also carries posting lists, a prefix trie, corpus statistics and a
//! bloom filter, and exact/prefix/fuzzy lookups go through them.
//!
//! # Usage
//!
//! ```
//! use fuzzdex::{build_index, search, Config, PluginSet, SearchOptions};
//!
//! let index = build_index(
//!     ["hello", "hallo", "help"],
//!     Config::default(),
//!     &PluginSet::builtin(),
//! )
//! .unwrap();
//!
//! let results = search(&index, "helo", 5, &SearchOptions::default());
//! assert_eq!(results[0].display, "hello");
//! ```

// Module declarations
pub mod binary;
pub mod cache;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod lang;
pub mod scoring;
pub mod search;
mod shared;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub mod testing;

// Re-exports for public API
pub use binary::{deserialize, serialize};
pub use cache::CacheStats;
pub use config::{
    Bm25Params, Config, Features, LengthNormalization, PerformanceTier, SearchOptions,
};
pub use error::{IndexError, Result};
pub use fuzzy::{
    are_strings_similar, damerau_levenshtein, distance_to_similarity, levenshtein,
    levenshtein_within, ngram_similarity,
};
pub use index::{
    build_index, remove_from_index, update_index, Index, IndexStats, Layout, PostingList,
};
pub use lang::{English, German, LanguagePlugin, Languages, PluginSet};
pub use search::{match_span, search};
pub use shared::SharedIndex;
pub use types::{
    Candidate, DocId, Document, Item, MatchSpan, MatchType, Record, Schema, SuggestionResult,
};
pub use utils::normalize;
