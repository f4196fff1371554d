// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate-generating strategies.
//!
//! Each strategy reads the index and writes only to its own candidate
//! buffer, so on the inverted layout they fan out across rayon workers. The
//! buffers are collected in strategy order and merged by base word, which
//! keeps the outcome independent of completion order.
//!
//! | Strategy | Classic layout | Inverted layout |
//! |----------|----------------|-----------------|
//! | Variant  | variant map    | variant map |
//! | Exact    | (via Variant)  | bloom filter, then term postings |
//! | Prefix   | ordered word-map range | trie |
//! | Phonetic | phonetic map   | phonetic postings |
//! | Synonym  | synonym map    | synonym postings |
//! | N-gram   | n-gram map + Jaccard | n-gram postings, count-pruned |
//! | Fuzzy    | scan of every base | n-gram / first-char candidates |

use std::collections::{BTreeMap, BTreeSet, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Config, SearchOptions};
use crate::fuzzy::{indexable_ngrams, jaccard, ngram_set, EditBuffers};
use crate::index::{BaseEntry, Index, InvertedIndex};
use crate::scoring::{
    fuzzy_score, ngram_score, prefix_score, COMPOUND_SCORE, EXACT_SCORE, PHONETIC_SCORE,
    SYNONYM_SCORE, TOKEN_PREFIX_FACTOR, VARIANT_SCORE,
};
use crate::types::{Candidate, DocId, MatchType};
use crate::utils::char_len;

/// Queries up to this many chars allow no edits.
const NO_EDIT_MAX_LEN: usize = 2;
/// Queries up to this many chars allow one edit.
const ONE_EDIT_MAX_LEN: usize = 4;

/// Edit budget for a query of `query_len` chars.
pub fn adaptive_max_distance(query_len: usize, configured: usize) -> usize {
    if query_len <= NO_EDIT_MAX_LEN {
        0
    } else if query_len <= ONE_EDIT_MAX_LEN {
        configured.min(1)
    } else {
        configured
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    Variant,
    Exact,
    Prefix,
    Phonetic,
    Synonym,
    Ngram,
    Fuzzy,
}

/// Everything derived from the query once, shared by all strategies.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub query: String,
    pub query_len: usize,
    pub max_distance: usize,
    pub fuzzy_threshold: f64,
    pub ngram_threshold: f64,
    pub transpositions: bool,
    pub partial_words: bool,
    pub grams: BTreeSet<String>,
    pub phonetic_keys: Vec<String>,
}

impl QueryParams {
    pub fn new(index: &Index, normalized: &str, options: &SearchOptions) -> Self {
        let config = &index.config;
        let query_len = char_len(normalized);
        let configured = options.max_edit_distance.unwrap_or(config.max_edit_distance);
        let phonetic_keys = if config.features.phonetic {
            index.languages.phonetic_keys(normalized)
        } else {
            Vec::new()
        };
        Self {
            query: normalized.to_string(),
            query_len,
            max_distance: adaptive_max_distance(query_len, configured),
            fuzzy_threshold: options.fuzzy_threshold.unwrap_or(config.fuzzy_threshold),
            ngram_threshold: config.ngram_threshold,
            transpositions: config.features.transpositions,
            partial_words: config.features.partial_words,
            grams: ngram_set(normalized, config.ngram_size),
            phonetic_keys,
        }
    }
}

/// Exact, prefix, token-prefix, compound or plain variant: decided by how
/// the query relates to the value it reached through the variant map.
pub fn classify(
    params: &QueryParams,
    normalized: &str,
    compound_parts: &[String],
) -> Option<(MatchType, f64, Option<usize>)> {
    let q = params.query.as_str();
    if normalized == q {
        return Some((MatchType::Exact, EXACT_SCORE, Some(0)));
    }
    if normalized.starts_with(q) {
        let score = prefix_score(params.query_len, char_len(normalized));
        return Some((MatchType::Prefix, score, None));
    }
    if params.partial_words {
        let best_token = normalized
            .split_whitespace()
            .filter(|token| token.starts_with(q))
            .map(|token| prefix_score(params.query_len, char_len(token)) * TOKEN_PREFIX_FACTOR)
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
        if let Some(score) = best_token {
            return Some((MatchType::Prefix, score, None));
        }
    }
    if compound_parts.iter().any(|part| part == q) {
        return Some((MatchType::Compound, COMPOUND_SCORE, None));
    }
    None
}

/// Closest edit distance between the query and the value or, for phrases,
/// any of its words. Returns the distance and the length compared against.
pub fn fuzzy_distance(
    params: &QueryParams,
    buffers: &mut EditBuffers,
    normalized: &str,
) -> Option<(usize, usize)> {
    if params.max_distance == 0 {
        return None;
    }
    let mut best: Option<(usize, usize)> = None;
    let mut consider = |target: &str, buffers: &mut EditBuffers| {
        if let Some(d) = buffers.similar_distance(
            &params.query,
            target,
            params.fuzzy_threshold,
            params.max_distance,
            params.transpositions,
        ) {
            if d > 0 && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, char_len(target)));
            }
        }
    };
    consider(normalized, buffers);
    if params.partial_words && normalized.contains(' ') {
        for token in normalized.split_whitespace() {
            consider(token, buffers);
        }
    }
    best
}

fn candidate(
    key: &str,
    variant: &str,
    match_type: MatchType,
    score: f64,
    edit_distance: Option<usize>,
    language: Option<String>,
) -> Candidate {
    Candidate {
        base_word: key.to_string(),
        variant: variant.to_string(),
        match_type,
        score,
        edit_distance,
        language,
    }
}

fn synonym_candidate(key: &str, query: &str) -> Candidate {
    candidate(key, query, MatchType::Synonym, SYNONYM_SCORE, None, None)
}

fn language_of(phonetic_key: &str) -> Option<String> {
    phonetic_key.split_once(':').map(|(lang, _)| lang.to_string())
}

/// Candidate preference: higher score, then the earlier match type.
fn better(a: &Candidate, b: &Candidate) -> bool {
    match a.score.total_cmp(&b.score) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => a.match_type < b.match_type,
    }
}

/// Merge per-strategy buffers by base word, keeping the best candidate.
/// With `allowed` set, candidates of other match types are dropped first.
pub fn merge_candidates(
    lists: Vec<Vec<Candidate>>,
    allowed: Option<&[MatchType]>,
) -> BTreeMap<String, Candidate> {
    let mut merged: BTreeMap<String, Candidate> = BTreeMap::new();
    let kept = lists
        .into_iter()
        .flatten()
        .filter(|c| allowed.map_or(true, |types| types.contains(&c.match_type)));
    for candidate in kept {
        match merged.get_mut(&candidate.base_word) {
            Some(existing) => {
                if better(&candidate, existing) {
                    *existing = candidate;
                }
            }
            None => {
                merged.insert(candidate.base_word.clone(), candidate);
            }
        }
    }
    merged
}

/// Runs strategies for one query against one index.
pub struct Matcher<'a> {
    index: &'a Index,
    params: &'a QueryParams,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a Index, params: &'a QueryParams) -> Self {
        Self { index, params }
    }

    fn config(&self) -> &Config {
        &self.index.config
    }

    /// Strategies enabled by the config, in merge order.
    pub fn strategies(&self) -> Vec<Strategy> {
        let features = &self.config().features;
        let inverted = self.index.inverted().is_some();
        let mut list = vec![Strategy::Variant];
        if inverted {
            list.push(Strategy::Exact);
        }
        list.push(Strategy::Prefix);
        if features.phonetic && !self.params.phonetic_keys.is_empty() {
            list.push(Strategy::Phonetic);
        }
        if features.synonyms {
            list.push(Strategy::Synonym);
        }
        if features.ngram && !self.params.grams.is_empty() {
            list.push(Strategy::Ngram);
        }
        if features.fuzzy && self.params.max_distance > 0 {
            list.push(Strategy::Fuzzy);
        }
        list
    }

    /// Run every strategy and merge.
    pub fn collect(&self, allowed: Option<&[MatchType]>) -> BTreeMap<String, Candidate> {
        let strategies = self.strategies();

        #[cfg(feature = "parallel")]
        let lists: Vec<Vec<Candidate>> = if self.index.inverted().is_some() {
            strategies.par_iter().map(|s| self.run(*s)).collect()
        } else {
            strategies.iter().map(|s| self.run(*s)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let lists: Vec<Vec<Candidate>> = strategies.iter().map(|s| self.run(*s)).collect();

        merge_candidates(lists, allowed)
    }

    pub fn run(&self, strategy: Strategy) -> Vec<Candidate> {
        match (strategy, self.index.inverted()) {
            (Strategy::Variant, _) => self.variant_lookup(),
            (Strategy::Exact, Some(inverted)) => self.exact_postings(inverted),
            (Strategy::Prefix, Some(inverted)) => self.trie_prefix(inverted),
            (Strategy::Prefix, None) => self.word_prefix(),
            (Strategy::Exact, None) => Vec::new(),
            (Strategy::Phonetic, inverted) => self.phonetic(inverted),
            (Strategy::Synonym, inverted) => self.synonym(inverted),
            (Strategy::Ngram, inverted) => self.ngram(inverted),
            (Strategy::Fuzzy, inverted) => self.fuzzy(inverted),
        }
    }

    /// Base entries owned by `doc`.
    fn doc_entries(&self, doc: DocId) -> impl Iterator<Item = (&'a str, &'a BaseEntry)> + 'a {
        let index = self.index;
        index
            .documents
            .get(doc.as_usize())
            .into_iter()
            .flat_map(|d| d.bases.iter())
            .filter_map(move |key| index.classic.bases.get(key).map(|e| (key.as_str(), e)))
    }

    /// Distinct base entries owned by `docs`, in first-seen order.
    fn entries_of<I>(&self, docs: I) -> Vec<(&'a str, &'a BaseEntry)>
    where
        I: IntoIterator<Item = DocId>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for doc in docs {
            for (key, entry) in self.doc_entries(doc) {
                if seen.insert(key) {
                    out.push((key, entry));
                }
            }
        }
        out
    }

    fn variant_lookup(&self) -> Vec<Candidate> {
        let classic = &self.index.classic;
        let q = self.params.query.as_str();
        classic
            .lookup(&classic.variants, q)
            .map(|(key, entry)| {
                let (match_type, score, distance) =
                    classify(self.params, &entry.normalized, &entry.compound_parts)
                        .unwrap_or((MatchType::Variant, VARIANT_SCORE, None));
                candidate(key, q, match_type, score, distance, None)
            })
            .collect()
    }

    fn exact_postings(&self, inverted: &InvertedIndex) -> Vec<Candidate> {
        let q = self.params.query.as_str();
        if self.index.bloom.as_ref().is_some_and(|b| !b.might_contain(q)) {
            return Vec::new();
        }
        let Some(list) = inverted.term(q) else {
            return Vec::new();
        };
        self.entries_of(list.iter())
            .into_iter()
            .filter_map(|(key, entry)| {
                let (match_type, score, distance) = classify(self.params, &entry.normalized, &[])?;
                Some(candidate(key, q, match_type, score, distance, None))
            })
            .collect()
    }

    fn trie_prefix(&self, inverted: &InvertedIndex) -> Vec<Candidate> {
        let q = self.params.query.as_str();
        let Some(list) = inverted.trie.lookup_prefix(q) else {
            return Vec::new();
        };
        self.entries_of(list.iter())
            .into_iter()
            .filter_map(|(key, entry)| {
                let (match_type, score, distance) = classify(self.params, &entry.normalized, &[])?;
                Some(candidate(key, q, match_type, score, distance, None))
            })
            .collect()
    }

    fn word_prefix(&self) -> Vec<Candidate> {
        let q = self.params.query.as_str();
        self.index
            .classic
            .prefix_scan(q)
            .into_iter()
            .filter_map(|(key, entry)| {
                let (match_type, score, distance) = classify(self.params, &entry.normalized, &[])?;
                Some(candidate(key, q, match_type, score, distance, None))
            })
            .collect()
    }

    fn phonetic(&self, inverted: Option<&InvertedIndex>) -> Vec<Candidate> {
        let classic = &self.index.classic;
        let mut out = Vec::new();
        for code in &self.params.phonetic_keys {
            let language = language_of(code);
            match inverted {
                Some(inverted) => {
                    let Some(list) = inverted.phonetics.get(code) else {
                        continue;
                    };
                    for (key, entry) in self.entries_of(list.iter()) {
                        if entry.phonetic.contains(code) {
                            out.push(candidate(
                                key,
                                code,
                                MatchType::Phonetic,
                                PHONETIC_SCORE,
                                None,
                                language.clone(),
                            ));
                        }
                    }
                }
                None => {
                    for (key, _) in classic.lookup(&classic.phonetics, code) {
                        out.push(candidate(
                            key,
                            code,
                            MatchType::Phonetic,
                            PHONETIC_SCORE,
                            None,
                            language.clone(),
                        ));
                    }
                }
            }
        }
        out
    }

    fn synonym(&self, inverted: Option<&InvertedIndex>) -> Vec<Candidate> {
        let classic = &self.index.classic;
        let q = self.params.query.as_str();
        match inverted {
            Some(inverted) => {
                let Some(list) = inverted.synonyms.get(q) else {
                    return Vec::new();
                };
                self.entries_of(list.iter())
                    .into_iter()
                    .filter(|(_, entry)| entry.synonyms.iter().any(|s| s == q))
                    .map(|(key, _)| synonym_candidate(key, q))
                    .collect()
            }
            None => classic
                .lookup(&classic.synonyms, q)
                .map(|(key, _)| synonym_candidate(key, q))
                .collect(),
        }
    }

    /// Jaccard over n-gram sets. A value can only reach threshold `t` if it
    /// shares at least `ceil(t · |Q|)` grams with the query, so anything
    /// below that count is pruned before the exact similarity is computed.
    fn ngram(&self, inverted: Option<&InvertedIndex>) -> Vec<Candidate> {
        let params = self.params;
        let threshold = params.ngram_threshold;
        let min_shared = ((threshold * params.grams.len() as f64).ceil() as usize).max(1);
        let n = self.config().ngram_size;

        let entries: Vec<(&str, &BaseEntry)> = match inverted {
            Some(inverted) => {
                let docs = inverted
                    .ngram_overlap(&params.grams, min_shared)
                    .into_iter()
                    .map(|(doc, _)| doc);
                self.entries_of(docs)
            }
            None => {
                let classic = &self.index.classic;
                let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
                for gram in &params.grams {
                    for (key, _) in classic.lookup(&classic.ngrams, gram) {
                        *counts.entry(key).or_insert(0) += 1;
                    }
                }
                counts
                    .into_iter()
                    .filter(|(_, shared)| *shared >= min_shared)
                    .filter_map(|(key, _)| classic.bases.get_key_value(key))
                    .map(|(key, entry)| (key.as_str(), entry))
                    .collect()
            }
        };

        entries
            .into_iter()
            .filter_map(|(key, entry)| {
                let grams = indexable_ngrams(&entry.normalized, n);
                let similarity = jaccard(&grams, &params.grams);
                (similarity >= threshold).then(|| {
                    let score = ngram_score(similarity);
                    candidate(key, &params.query, MatchType::Ngram, score, None, None)
                })
            })
            .collect()
    }

    fn fuzzy(&self, inverted: Option<&InvertedIndex>) -> Vec<Candidate> {
        let params = self.params;
        let mut buffers = EditBuffers::new();

        let entries: Vec<(&str, &BaseEntry)> = match inverted {
            Some(inverted) => {
                let mut docs: BTreeSet<DocId> = inverted
                    .ngram_overlap(&params.grams, 1)
                    .into_iter()
                    .map(|(doc, _)| doc)
                    .collect();
                // Short queries share few grams with their typos; widen by first char
                if params.query_len <= self.config().ngram_size + 1 {
                    if let Some(first) = params.query.chars().next() {
                        let mut buf = [0u8; 4];
                        let first = first.encode_utf8(&mut buf);
                        if let Some(list) = inverted.trie.lookup_prefix(first) {
                            docs.extend(list.iter());
                        }
                    }
                }
                self.entries_of(docs)
            }
            None => self
                .index
                .classic
                .bases
                .iter()
                .map(|(key, entry)| (key.as_str(), entry))
                .collect(),
        };

        entries
            .into_iter()
            .filter_map(|(key, entry)| {
                let (distance, target_len) =
                    fuzzy_distance(params, &mut buffers, &entry.normalized)?;
                let score = fuzzy_score(distance, params.query_len, target_len);
                Some(candidate(key, &params.query, MatchType::Fuzzy, score, Some(distance), None))
            })
            .collect()
    }
}
