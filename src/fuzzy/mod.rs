// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching primitives: edit distance and n-gram similarity.
//!
//! Bounded Levenshtein with early exit for the common case, Damerau-Levenshtein
//! when transpositions are enabled, and Jaccard similarity over character
//! n-grams used both as a cheap pre-filter and as a strategy of its own.

mod levenshtein;
mod ngram;

pub use levenshtein::*;
pub use ngram::*;
