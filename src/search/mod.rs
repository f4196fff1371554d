// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search: from a query string to ranked suggestions.
//!
//! The pipeline for one query:
//!
//! 1. Normalize with the primary language plugin. Too short means no results.
//! 2. Check the result cache (keyed by normalized query, limit and options).
//! 3. Run the strategies ([`strategies`]) and merge by base word.
//! 4. Score every (document, value) owner of a surviving base word: length
//!    adjustment, field weight, optional BM25 blend, clamp.
//! 5. Keep each document's best value, apply the option filters, rank and
//!    truncate.
//!
//! The cache lock is never held while steps 3 to 5 run, so concurrent
//! searches on a shared index only serialize on the map lookup itself.

pub mod spans;
pub mod strategies;

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cache::CacheKey;
use crate::config::SearchOptions;
use crate::fuzzy::{indexable_ngrams, jaccard, EditBuffers};
use crate::index::{Analyzer, BaseEntry, Index, Owner};
use crate::scoring::ranking::{rank, RankedResult};
use crate::scoring::{
    blend_bm25, finalize_score, fuzzy_score, length_factor, ngram_score, PHONETIC_SCORE,
    SYNONYM_SCORE, VARIANT_SCORE,
};
use crate::types::{Candidate, DocId, MatchType, SuggestionResult};
use crate::utils::char_len;

pub use spans::match_span;
pub use strategies::{adaptive_max_distance, Matcher, QueryParams, Strategy};

/// One owner of a matched base word, scored.
struct Scored<'a> {
    owner: Owner,
    entry: &'a BaseEntry,
    candidate: &'a Candidate,
    score: f64,
    bm25: f64,
}

impl Index {
    /// Ranked suggestions for `query`, at most `max_results` of them.
    ///
    /// Never fails: unmatched, empty or too-short queries give an empty list.
    pub fn search(
        &self,
        query: &str,
        max_results: usize,
        options: &SearchOptions,
    ) -> Vec<SuggestionResult> {
        let normalized = self.languages.normalize(query);
        if !self.is_searchable(&normalized, max_results) {
            return Vec::new();
        }
        let Some(cache) = &self.cache else {
            return self.run_search(&normalized, max_results, options);
        };

        let key = CacheKey {
            query: normalized,
            max_results,
            options: options.fingerprint(),
        };
        if let Some(hit) = cache.lock().get(&key) {
            return hit;
        }
        let results = self.run_search(&key.query, max_results, options);
        cache.lock().insert(key, results.clone());
        results
    }

    /// Same as [`Index::search`] but bypasses the cache in both directions.
    pub fn search_uncached(
        &self,
        query: &str,
        max_results: usize,
        options: &SearchOptions,
    ) -> Vec<SuggestionResult> {
        let normalized = self.languages.normalize(query);
        if !self.is_searchable(&normalized, max_results) {
            return Vec::new();
        }
        self.run_search(&normalized, max_results, options)
    }

    /// Search several queries. Each distinct query runs once; results come
    /// back in input order.
    pub fn batch_search<S: AsRef<str> + Sync>(
        &self,
        queries: &[S],
        max_results: usize,
        options: &SearchOptions,
    ) -> Vec<Vec<SuggestionResult>> {
        let mut distinct: Vec<&str> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for query in queries {
            let query = query.as_ref();
            slot.entry(query).or_insert_with(|| {
                distinct.push(query);
                distinct.len() - 1
            });
        }

        #[cfg(feature = "parallel")]
        let answers: Vec<Vec<SuggestionResult>> = distinct
            .par_iter()
            .map(|q| self.search(q, max_results, options))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let answers: Vec<Vec<SuggestionResult>> = distinct
            .iter()
            .map(|q| self.search(q, max_results, options))
            .collect();

        queries
            .iter()
            .map(|q| answers[slot[q.as_ref()]].clone())
            .collect()
    }

    /// Score `term` against `query` directly, without consulting the index
    /// maps. The best strategy wins; `None` when nothing matches.
    ///
    /// Meant for a query layer that already holds a candidate set and only
    /// needs a consistent score for it.
    pub fn score_candidate(&self, query: &str, term: &str) -> Option<Candidate> {
        let normalized = self.languages.normalize(query);
        if normalized.is_empty() {
            return None;
        }
        let value = Analyzer::new(&self.config, &self.languages).analyze_value(term, None)?;
        let params = QueryParams::new(self, &normalized, &SearchOptions::default());
        let features = &self.config.features;
        let q = params.query.as_str();

        let mut found: Vec<Candidate> = Vec::new();
        let mut push = |match_type, score, edit_distance, language: Option<String>| {
            found.push(Candidate {
                base_word: value.key.clone(),
                variant: q.to_string(),
                match_type,
                score,
                edit_distance,
                language,
            });
        };

        if let Some((match_type, score, distance)) =
            strategies::classify(&params, &value.normalized, &value.compound_parts)
        {
            push(match_type, score, distance, None);
        } else if value.variants.contains(q) {
            push(MatchType::Variant, VARIANT_SCORE, None, None);
        }
        if let Some(code) = params.phonetic_keys.iter().find(|k| value.phonetic.contains(k)) {
            let language = code.split_once(':').map(|(lang, _)| lang.to_string());
            push(MatchType::Phonetic, PHONETIC_SCORE, None, language);
        }
        if features.synonyms && value.synonyms.iter().any(|s| s == q) {
            push(MatchType::Synonym, SYNONYM_SCORE, None, None);
        }
        if features.ngram && !params.grams.is_empty() {
            let similarity = jaccard(
                &indexable_ngrams(&value.normalized, self.config.ngram_size),
                &params.grams,
            );
            if similarity >= params.ngram_threshold {
                push(MatchType::Ngram, ngram_score(similarity), None, None);
            }
        }
        if features.fuzzy {
            let mut buffers = EditBuffers::new();
            let distance = strategies::fuzzy_distance(&params, &mut buffers, &value.normalized);
            if let Some((d, len)) = distance {
                push(MatchType::Fuzzy, fuzzy_score(d, params.query_len, len), Some(d), None);
            }
        }
        strategies::merge_candidates(vec![found], None).into_values().next()
    }

    fn is_searchable(&self, normalized: &str, max_results: usize) -> bool {
        max_results > 0
            && !normalized.is_empty()
            && char_len(normalized) >= self.config.min_query_length
            && !self.documents.is_empty()
    }

    fn run_search(
        &self,
        normalized: &str,
        max_results: usize,
        options: &SearchOptions,
    ) -> Vec<SuggestionResult> {
        let params = QueryParams::new(self, normalized, options);
        let merged = Matcher::new(self, &params).collect(options.match_types.as_deref());
        let mut ranked = self.score_matches(&params, &merged, options);
        rank(&mut ranked, max_results);

        ranked
            .into_iter()
            .map(|r| r.result)
            .collect()
    }

    /// Final scores per document, best value per document, filters applied.
    fn score_matches(
        &self,
        params: &QueryParams,
        merged: &BTreeMap<String, Candidate>,
        options: &SearchOptions,
    ) -> Vec<RankedResult> {
        let config = &self.config;
        let stats = if config.use_bm25 { self.stats.as_ref() } else { None };

        let mut scored: Vec<Scored<'_>> = Vec::new();
        for (key, candidate) in merged {
            let Some(entry) = self.classic.bases.get(key) else {
                continue;
            };
            for owner in &entry.owners {
                let Some(doc) = self.documents.get(owner.doc.as_usize()) else {
                    continue;
                };
                if let Some(languages) = &options.languages {
                    let language = candidate.language.as_ref().or(doc.language.as_ref());
                    if !language.is_some_and(|l| languages.contains(l)) {
                        continue;
                    }
                }

                let mut score = candidate.score;
                if candidate.match_type != MatchType::Exact {
                    score *= length_factor(params.query_len, entry.char_len(), &config.length);
                    score *= self.owner_weight(owner);
                }

                let bm25: f64 = match stats {
                    Some(stats) => {
                        let tokens = self.document_tokens(doc);
                        let mut terms: Vec<&str> = entry.normalized.split_whitespace().collect();
                        terms.sort_unstable();
                        terms.dedup();
                        terms
                            .into_iter()
                            .map(|term| {
                                let tf = tokens.iter().filter(|t| **t == term).count() as u32;
                                stats.term_score(term, tf, doc.length, &config.bm25)
                            })
                            .sum()
                    }
                    None => 0.0,
                };

                scored.push(Scored {
                    owner: *owner,
                    entry,
                    candidate,
                    score,
                    bm25,
                });
            }
        }

        let max_bm25 = scored.iter().map(|s| s.bm25).fold(0.0, f64::max);
        let min_score = options.min_score.unwrap_or(config.min_score);
        let mut best: BTreeMap<DocId, RankedResult> = BTreeMap::new();

        for s in scored {
            let match_type = s.candidate.match_type;
            let mut score = s.score;
            if stats.is_some() && match_type != MatchType::Exact {
                let normalized = if max_bm25 > 0.0 { s.bm25 / max_bm25 } else { 0.0 };
                score = blend_bm25(score, normalized, &config.bm25);
            }
            let score = finalize_score(match_type, score);
            if score < min_score {
                continue;
            }

            let ranked = self.to_result(params, &s, score, options.include_spans);
            let replace = match best.get(&s.owner.doc) {
                None => true,
                Some(current) => {
                    let (a, b) = (&ranked.result, &current.result);
                    a.score > b.score
                        || (a.score == b.score
                            && (a.match_type, ranked.length) < (b.match_type, current.length))
                }
            };
            if replace {
                best.insert(s.owner.doc, ranked);
            }
        }

        best.into_values().collect()
    }

    fn owner_weight(&self, owner: &Owner) -> f64 {
        owner
            .field
            .and_then(|i| self.config.fields.get(usize::from(i)))
            .map(|name| self.config.field_weight(name))
            .unwrap_or(1.0)
    }

    fn to_result(
        &self,
        params: &QueryParams,
        scored: &Scored<'_>,
        score: f64,
        include_spans: bool,
    ) -> RankedResult {
        let doc = &self.documents[scored.owner.doc.as_usize()];
        let candidate = scored.candidate;
        let field = scored
            .owner
            .field
            .and_then(|i| self.config.fields.get(usize::from(i)))
            .cloned();
        let spans = if include_spans {
            vec![match_span(
                &params.query,
                &scored.entry.normalized,
                candidate.match_type,
                field,
            )]
        } else {
            Vec::new()
        };

        RankedResult {
            doc: doc.id,
            length: scored.entry.char_len(),
            result: SuggestionResult {
                display: doc.display.clone(),
                base_word: scored.entry.display.clone(),
                score,
                match_type: candidate.match_type,
                edit_distance: candidate.edit_distance,
                language: candidate.language.clone().or_else(|| doc.language.clone()),
                fields: doc.fields.clone(),
                spans,
            },
        }
    }
}

/// Search an index. See [`Index::search`].
pub fn search(
    index: &Index,
    query: &str,
    max_results: usize,
    options: &SearchOptions,
) -> Vec<SuggestionResult> {
    index.search(query, max_results, options)
}
