// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how search results get sorted.
//!
//! Scores are compared in buckets of [`SCORE_EPSILON`], not raw. Two results
//! whose scores differ only in floating-point noise land in the same bucket,
//! and the tie-breakers decide.
//!
//! Bucketing (rather than comparing `|a - b| < ε`) keeps the comparator a
//! total order, which `sort_by` requires.

use std::cmp::Ordering;

use crate::types::{DocId, SuggestionResult};

/// Scores closer than this are treated as equal for ranking.
pub const SCORE_EPSILON: f64 = 1e-3;

/// A result plus the keys ranking needs but callers never see.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub doc: DocId,
    /// Char length of the matched value.
    pub length: usize,
    pub result: SuggestionResult,
}

fn score_bucket(score: f64) -> i64 {
    (score / SCORE_EPSILON).round() as i64
}

/// Compare two results for ranking.
///
/// Sort order:
/// 1. **Score bucket** - descending
/// 2. **Edit distance** - ascending, results without one last
/// 3. **Length** - shorter matched value first
/// 4. **Raw score** - descending, inside the bucket
/// 5. **Display** - alphabetical, for determinism
/// 6. **Doc ID** - final tiebreaker when everything else is equal
pub fn compare_results(a: &RankedResult, b: &RankedResult) -> Ordering {
    score_bucket(b.result.score)
        .cmp(&score_bucket(a.result.score))
        .then_with(|| match (a.result.edit_distance, b.result.edit_distance) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.length.cmp(&b.length))
        .then_with(|| b.result.score.total_cmp(&a.result.score))
        .then_with(|| a.result.display.cmp(&b.result.display))
        .then_with(|| a.doc.cmp(&b.doc))
}

/// Sort in place and keep the best `max_results`.
pub fn rank(results: &mut Vec<RankedResult>, max_results: usize) {
    results.sort_by(compare_results);
    results.truncate(max_results);
}
