// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind candidate scores.
//!
//! Every strategy has a base score. Exact always wins, prefix comes next,
//! and the softer strategies (phonetic, synonym) sit well below a close
//! fuzzy match so a sound-alike never buries a one-typo hit.
//!
//! # Constants
//!
//! | Strategy | Score | Notes |
//! |----------|-------|-------|
//! | Exact    | 1.0   | Never adjusted |
//! | Prefix   | 0.9   | Reduced when the word is more than twice the query |
//! | Variant  | 0.8   | Morphological or transliterated form |
//! | Compound | 0.75  | Query is one part of a compound |
//! | Phonetic | 0.7   | Same code from a language plugin |
//! | Synonym  | 0.6   | Synonym table hit |
//! | N-gram   | 0.8 × Jaccard | Only above the n-gram threshold |
//! | Fuzzy    | 1 - d / max_len | Bounded edit distance |
//!
//! After merging, scores are adjusted for length (and optionally blended with
//! BM25), then clamped to [0, 1]. Exact matches are pinned to 1.0 at the end.

use crate::config::{Bm25Params, LengthNormalization};
use crate::fuzzy::distance_to_similarity;
use crate::types::MatchType;

// =============================================================================
// STRATEGY BASE SCORES
// =============================================================================

pub const EXACT_SCORE: f64 = 1.0;
pub const PREFIX_SCORE: f64 = 0.9;
pub const VARIANT_SCORE: f64 = 0.8;
pub const COMPOUND_SCORE: f64 = 0.75;
pub const PHONETIC_SCORE: f64 = 0.7;
pub const SYNONYM_SCORE: f64 = 0.6;
pub const NGRAM_WEIGHT: f64 = 0.8;

/// Query/word length ratio at or above which a prefix keeps its full score.
pub const PREFIX_FULL_RATIO: f64 = 0.5;

/// Prefix hits on an inner word of a phrase count slightly less.
pub const TOKEN_PREFIX_FACTOR: f64 = 0.95;

/// Prefix score: full 0.9 when the query covers at least half of the word,
/// falling off linearly to 0.54 for a vanishingly short query.
///
/// Continuous at the breakpoint: `0.9 · (0.6 + 0.8 · 0.5) = 0.9`.
pub fn prefix_score(query_len: usize, word_len: usize) -> f64 {
    if word_len == 0 {
        return 0.0;
    }
    let ratio = (query_len as f64 / word_len as f64).min(1.0);
    if ratio >= PREFIX_FULL_RATIO {
        PREFIX_SCORE
    } else {
        PREFIX_SCORE * (0.6 + 0.8 * ratio)
    }
}

/// Fuzzy score from a real edit distance.
pub fn fuzzy_score(distance: usize, query_len: usize, word_len: usize) -> f64 {
    distance_to_similarity(distance, query_len.max(word_len))
}

pub fn ngram_score(similarity: f64) -> f64 {
    NGRAM_WEIGHT * similarity
}

// =============================================================================
// ADJUSTMENTS
// =============================================================================

/// Length adjustment multiplier.
///
/// - within `boost_max_delta` chars of the query: `boost`
/// - more than `penalty_start_ratio` times the query: lose
///   `penalty_per_ratio` per ratio step beyond the start, floored
/// - otherwise 1.0
pub fn length_factor(query_len: usize, word_len: usize, shape: &LengthNormalization) -> f64 {
    if query_len == 0 {
        return 1.0;
    }
    if query_len.abs_diff(word_len) <= shape.boost_max_delta {
        return shape.boost;
    }
    let ratio = word_len as f64 / query_len as f64;
    if ratio > shape.penalty_start_ratio {
        let penalty = 1.0 - shape.penalty_per_ratio * (ratio - shape.penalty_start_ratio);
        return penalty.max(shape.penalty_floor);
    }
    1.0
}

/// Blend a normalized BM25 value into the strategy score.
pub fn blend_bm25(strategy_score: f64, bm25_normalized: f64, params: &Bm25Params) -> f64 {
    let total = params.bm25_weight + params.fuzzy_weight;
    if total <= 0.0 {
        return strategy_score;
    }
    (params.bm25_weight * bm25_normalized + params.fuzzy_weight * strategy_score) / total
}

/// Clamp into [0, 1] and pin exact matches to 1.0.
pub fn finalize_score(match_type: MatchType, score: f64) -> f64 {
    if match_type == MatchType::Exact {
        return EXACT_SCORE;
    }
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}
