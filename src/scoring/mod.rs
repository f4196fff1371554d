// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! Strategy base scores and the length adjustment live in `core`, the BM25
//! blend in `bm25`, and the total order used to sort results in `ranking`.

pub mod bm25;
mod core;
pub mod ranking;

pub use bm25::CorpusStats;
pub use core::*;
