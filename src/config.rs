//! Index configuration and per-call search options.
//!
//! `Config` is fixed for the lifetime of an index: it is serialized with it and
//! drives every later mutation. All tuned constants (length penalty curve,
//! BM25 parameters, score weights) live here as named fields so callers can
//! override them instead of patching code.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::types::MatchType;

/// Number of items at which the inverted index is built without being asked.
pub const DEFAULT_INVERTED_THRESHOLD: usize = 10_000;

/// How many variants get generated per indexed word.
///
/// Fast keeps the variant map small by capping prefix variants. Comprehensive
/// registers every prefix and every morphological form a plugin offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Fast,
    #[default]
    Balanced,
    Comprehensive,
}

impl PerformanceTier {
    /// Upper bound on prefix variants per word, `None` for unbounded.
    pub fn max_prefix_variants(self) -> Option<usize> {
        match self {
            PerformanceTier::Fast => Some(3),
            PerformanceTier::Balanced => Some(8),
            PerformanceTier::Comprehensive => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceTier::Fast => "fast",
            PerformanceTier::Balanced => "balanced",
            PerformanceTier::Comprehensive => "comprehensive",
        }
    }
}

/// Matching strategies that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub phonetic: bool,
    pub compound: bool,
    pub synonyms: bool,
    pub ngram: bool,
    pub fuzzy: bool,
    /// Use Damerau-Levenshtein so adjacent swaps cost one edit.
    pub transpositions: bool,
    /// Let a query match the start of any word inside a multi-word entry.
    pub partial_words: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            phonetic: true,
            compound: true,
            synonyms: true,
            ngram: true,
            fuzzy: true,
            transpositions: false,
            partial_words: true,
        }
    }
}

/// BM25 parameters and the weight of BM25 against the strategy score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    /// Floor applied to every IDF value.
    pub min_idf: f64,
    pub bm25_weight: f64,
    pub fuzzy_weight: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            min_idf: 0.1,
            bm25_weight: 0.6,
            fuzzy_weight: 0.4,
        }
    }
}

/// Shape of the length adjustment applied after candidates are merged.
///
/// Entries within `boost_max_delta` characters of the query get multiplied by
/// `boost`. Entries longer than `penalty_start_ratio` times the query lose
/// `penalty_per_ratio` per extra ratio step, never below `penalty_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthNormalization {
    pub boost: f64,
    pub boost_max_delta: usize,
    pub penalty_start_ratio: f64,
    pub penalty_per_ratio: f64,
    pub penalty_floor: f64,
}

impl Default for LengthNormalization {
    fn default() -> Self {
        Self {
            boost: 1.05,
            boost_max_delta: 1,
            penalty_start_ratio: 2.0,
            penalty_per_ratio: 0.1,
            penalty_floor: 0.7,
        }
    }
}

/// Immutable per-index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language tags resolved against the plugin set. The first one is primary.
    pub languages: Vec<String>,
    pub features: Features,
    pub performance: PerformanceTier,
    pub min_query_length: usize,
    /// Similarity threshold; the n-gram pre-filter rejects below `fuzzy_threshold - 0.2`.
    pub fuzzy_threshold: f64,
    /// Minimum Jaccard similarity for the n-gram strategy.
    pub ngram_threshold: f64,
    pub max_edit_distance: usize,
    pub ngram_size: usize,
    /// Results scoring below this are dropped.
    pub min_score: f64,
    /// Record fields to index. Empty means the index holds plain strings.
    pub fields: Vec<String>,
    pub field_weights: BTreeMap<String, f64>,
    pub bm25: Bm25Params,
    pub length: LengthNormalization,
    /// Build the inverted index regardless of corpus size.
    pub use_inverted_index: bool,
    pub inverted_threshold: usize,
    /// Blend BM25 into the final score.
    pub use_bm25: bool,
    /// Build the bloom filter even without an inverted index.
    pub use_bloom_filter: bool,
    pub bloom_fp_rate: f64,
    pub enable_cache: bool,
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            features: Features::default(),
            performance: PerformanceTier::default(),
            min_query_length: 2,
            fuzzy_threshold: 0.6,
            ngram_threshold: 0.4,
            max_edit_distance: 2,
            ngram_size: 3,
            min_score: 0.0,
            fields: Vec::new(),
            field_weights: BTreeMap::new(),
            bm25: Bm25Params::default(),
            length: LengthNormalization::default(),
            use_inverted_index: false,
            inverted_threshold: DEFAULT_INVERTED_THRESHOLD,
            use_bm25: false,
            use_bloom_filter: false,
            bloom_fp_rate: 0.01,
            enable_cache: true,
            cache_capacity: 100,
        }
    }
}

impl Config {
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field_weight(mut self, field: impl Into<String>, weight: f64) -> Self {
        self.field_weights.insert(field.into(), weight);
        self
    }

    pub fn with_performance(mut self, tier: PerformanceTier) -> Self {
        self.performance = tier;
        self
    }

    pub fn with_inverted_index(mut self) -> Self {
        self.use_inverted_index = true;
        self
    }

    pub fn with_bm25(mut self) -> Self {
        self.use_bm25 = true;
        self
    }

    pub fn with_bloom_filter(mut self) -> Self {
        self.use_bloom_filter = true;
        self
    }

    pub fn with_transpositions(mut self) -> Self {
        self.features.transpositions = true;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }

    /// Weight for a record field. Unlisted fields weigh 1.0.
    pub fn field_weight(&self, field: &str) -> f64 {
        self.field_weights.get(field).copied().unwrap_or(1.0)
    }

    /// True when the corpus is big enough (or the caller asked) for the inverted index.
    pub fn wants_inverted_index(&self, item_count: usize) -> bool {
        self.use_inverted_index || item_count >= self.inverted_threshold
    }

    /// Reject contradictory settings before anything gets built.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(IndexError::Config("at least one language is required".into()));
        }
        if self.min_query_length == 0 {
            return Err(IndexError::Config("min_query_length must be at least 1".into()));
        }
        if self.ngram_size == 0 {
            return Err(IndexError::Config("ngram_size must be at least 1".into()));
        }
        // Range checks below pass NaN; the JSON config section cannot hold it
        let (bm25, length) = (&self.bm25, &self.length);
        let floats = [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("ngram_threshold", self.ngram_threshold),
            ("min_score", self.min_score),
            ("bloom_fp_rate", self.bloom_fp_rate),
            ("bm25.k1", bm25.k1),
            ("bm25.b", bm25.b),
            ("bm25.min_idf", bm25.min_idf),
            ("bm25.bm25_weight", bm25.bm25_weight),
            ("bm25.fuzzy_weight", bm25.fuzzy_weight),
            ("length.boost", length.boost),
            ("length.penalty_start_ratio", length.penalty_start_ratio),
            ("length.penalty_per_ratio", length.penalty_per_ratio),
            ("length.penalty_floor", length.penalty_floor),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(IndexError::Config(format!("{} must be finite, got {}", name, value)));
        }
        for (name, value) in [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("ngram_threshold", self.ngram_threshold),
            ("min_score", self.min_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(IndexError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(self.bloom_fp_rate > 0.0 && self.bloom_fp_rate < 1.0) {
            return Err(IndexError::Config(format!(
                "bloom_fp_rate must be within (0, 1), got {}",
                self.bloom_fp_rate
            )));
        }
        if self.enable_cache && self.cache_capacity == 0 {
            return Err(IndexError::Config(
                "cache_capacity must be positive when caching is enabled".into(),
            ));
        }
        if bm25.k1 < 0.0 || !(0.0..=1.0).contains(&bm25.b) {
            return Err(IndexError::Config(format!(
                "BM25 parameters out of range: k1={}, b={}",
                bm25.k1, bm25.b
            )));
        }
        if bm25.bm25_weight < 0.0 || bm25.fuzzy_weight < 0.0 {
            return Err(IndexError::Config("BM25/fuzzy weights must be non-negative".into()));
        }
        if let Some((field, weight)) = self
            .field_weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(IndexError::Config(format!(
                "field weight for '{}' must be finite and non-negative ({})",
                field, weight
            )));
        }
        if length.boost < 1.0 || !(0.0..=1.0).contains(&length.penalty_floor) {
            return Err(IndexError::Config(
                "length boost must be >= 1 and penalty floor within [0, 1]".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.fields.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(IndexError::Config(format!("field '{}' listed twice", dup)));
        }
        Ok(())
    }
}

/// Per-call knobs for `search`. Everything defaults to the index config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Only keep results produced by these match types.
    pub match_types: Option<Vec<MatchType>>,
    /// Only keep results whose language is listed.
    pub languages: Option<Vec<String>>,
    pub min_score: Option<f64>,
    pub max_edit_distance: Option<usize>,
    pub fuzzy_threshold: Option<f64>,
    /// Attach highlight spans to every result.
    pub include_spans: bool,
}

impl SearchOptions {
    pub fn with_spans(mut self) -> Self {
        self.include_spans = true;
        self
    }

    pub fn with_match_types(mut self, types: impl Into<Vec<MatchType>>) -> Self {
        self.match_types = Some(types.into());
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Stable hash of every option, used as part of the cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.match_types.hash(&mut hasher);
        self.languages.hash(&mut hasher);
        self.min_score.map(f64::to_bits).hash(&mut hasher);
        self.max_edit_distance.hash(&mut hasher);
        self.fuzzy_threshold.map(f64::to_bits).hash(&mut hasher);
        self.include_spans.hash(&mut hasher);
        hasher.finish()
    }
}
