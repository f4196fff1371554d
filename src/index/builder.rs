// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index builder: items in, `Index` out.
//!
//! Building is two phases:
//!
//! 1. **Analyze** each item independently: normalize, generate variants,
//!    phonetic keys, synonyms, compound parts and n-grams. No shared state,
//!    so with the `parallel` feature this is a rayon `par_iter`.
//! 2. **Register** the analyses sequentially in insertion order, assigning
//!    dense document ids, then derive the inverted structures in one pass.
//!
//! Nothing is observable until the whole build returns.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::bloom::BloomFilter;
use super::classic::Owner;
use super::inverted::InvertedIndex;
use super::{Index, Layout};
use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::fuzzy::indexable_ngrams;
use crate::lang::{Languages, PluginSet};
use crate::scoring::CorpusStats;
use crate::types::{record_identity, DocId, Document, Item, Record, Schema};
use crate::utils::fold_case;

/// Shortest prefix registered as a variant.
const MIN_PREFIX_VARIANT_LEN: usize = 2;

/// Everything derived from one indexed value (a string, or one record field).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedValue {
    pub field: Option<u16>,
    /// Case-folded display text: the base-word key.
    pub key: String,
    pub display: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub phonetic: Vec<String>,
    pub compound_parts: Vec<String>,
    pub synonyms: Vec<String>,
    /// Normalized keys to link in the variant map.
    pub variants: BTreeSet<String>,
    pub ngrams: BTreeSet<String>,
}

/// One item after analysis, ready to become a `Document`.
#[derive(Debug, Clone)]
pub struct AnalyzedItem {
    pub display: String,
    pub phonetic: Option<String>,
    pub fields: Option<Record>,
    pub values: Vec<AnalyzedValue>,
}

/// Per-item analysis against one config and plugin set.
pub(crate) struct Analyzer<'a> {
    pub config: &'a Config,
    pub languages: &'a Languages,
}

/// Prefixes of `word` from `MIN_PREFIX_VARIANT_LEN` (or the minimum query
/// length) up to one char short of the whole word, capped by the tier.
///
/// The cap only bounds index size. Prefix search walks the classic word map
/// (or the trie), so longer prefixes still match.
fn prefixes(word: &str, min_len: usize, cap: Option<usize>) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let start = min_len.max(MIN_PREFIX_VARIANT_LEN);
    let lens = start..chars.len();
    let take = cap.unwrap_or(usize::MAX);
    lens.take(take).map(|n| chars[..n].iter().collect()).collect()
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a Config, languages: &'a Languages) -> Self {
        Self { config, languages }
    }

    pub fn analyze_value(&self, raw: &str, field: Option<u16>) -> Option<AnalyzedValue> {
        let display = raw.trim();
        if display.is_empty() {
            return None;
        }
        let normalized = self.languages.normalize(display);
        if normalized.is_empty() {
            return None;
        }
        let key = fold_case(display);
        let features = &self.config.features;
        let tier = self.config.performance;
        let cap = tier.max_prefix_variants();
        let min_len = self.config.min_query_length;
        let tokens: Vec<String> = normalized.split_whitespace().map(str::to_string).collect();

        let phonetic = if features.phonetic {
            self.languages.phonetic_keys(display)
        } else {
            Vec::new()
        };
        let compound_parts: Vec<String> = if features.compound {
            self.languages
                .compound_parts(&normalized)
                .iter()
                .map(|part| self.languages.normalize(part))
                .filter(|part| !part.is_empty() && *part != normalized)
                .collect()
        } else {
            Vec::new()
        };
        let synonyms = if features.synonyms {
            self.languages.synonyms(&normalized)
        } else {
            Vec::new()
        };

        let mut variants = BTreeSet::new();
        variants.insert(normalized.clone());
        variants.extend(prefixes(&normalized, min_len, cap));
        if features.partial_words && tokens.len() > 1 {
            for token in &tokens {
                variants.insert(token.clone());
                variants.extend(prefixes(token, min_len, cap));
            }
        }
        for variant in self.languages.variants(&key, tier) {
            let variant = self.languages.normalize(&variant);
            if !variant.is_empty() {
                variants.insert(variant);
            }
        }
        variants.extend(compound_parts.iter().cloned());

        let ngrams = if features.ngram {
            indexable_ngrams(&normalized, self.config.ngram_size)
        } else {
            BTreeSet::new()
        };

        Some(AnalyzedValue {
            field,
            key,
            display: display.to_string(),
            normalized,
            tokens,
            phonetic,
            compound_parts,
            synonyms,
            variants,
            ngrams,
        })
    }

    pub fn analyze_item(&self, item: &Item) -> Option<AnalyzedItem> {
        let (values, fields) = match item {
            Item::Text(text) => (vec![self.analyze_value(text, None)?], None),
            Item::Record(record) => {
                let values: Vec<AnalyzedValue> = self
                    .config
                    .fields
                    .iter()
                    .enumerate()
                    .filter_map(|(i, field)| {
                        let raw = record.get(field)?;
                        self.analyze_value(raw, Some(i as u16))
                    })
                    .collect();
                if values.is_empty() {
                    return None;
                }
                (values, Some(record.clone()))
            }
        };
        let display = values[0].display.clone();
        let phonetic = self.languages.primary().phonetic_code(&display);
        Some(AnalyzedItem {
            display,
            phonetic,
            fields,
            values,
        })
    }

    /// Case-insensitive identity of an item, `None` for items with nothing to index.
    pub fn identity(&self, item: &Item) -> Option<String> {
        match item {
            Item::Text(text) => {
                let folded = fold_case(text.trim());
                (!folded.is_empty()).then_some(folded)
            }
            Item::Record(record) => {
                let has_value = self
                    .config
                    .fields
                    .iter()
                    .any(|f| record.get(f).is_some_and(|v| !v.trim().is_empty()));
                has_value.then(|| record_identity(record, &self.config.fields))
            }
        }
    }

    /// Drop duplicates (first occurrence wins, `seen` holds the identities
    /// already indexed), then analyze the survivors.
    pub fn analyze_all(&self, items: &[Item], seen: &mut HashSet<String>) -> Vec<AnalyzedItem> {
        let fresh: Vec<&Item> = items
            .iter()
            .filter(|item| match self.identity(item) {
                Some(identity) => seen.insert(identity),
                None => false,
            })
            .collect();

        #[cfg(feature = "parallel")]
        let analyzed = fresh
            .par_iter()
            .filter_map(|item| self.analyze_item(item))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let analyzed = fresh
            .iter()
            .filter_map(|item| self.analyze_item(item))
            .collect();

        analyzed
    }
}

/// Describe how `items` break `schema`, if they do.
pub(crate) fn schema_violation(items: &[Item], schema: &Schema) -> Option<String> {
    match schema {
        Schema::Strings => items.iter().any(Item::is_record).then(|| {
            "records need a field list: set Config::fields before indexing records".to_string()
        }),
        Schema::Records { fields } => items.iter().any(|i| !i.is_record()).then(|| {
            format!(
                "plain strings given to a record index (fields: {})",
                fields.join(", ")
            )
        }),
    }
}

impl Index {
    /// Build an index from `items`.
    ///
    /// Fails with [`IndexError::Config`] on an invalid config, an unknown
    /// language, records without `Config::fields`, or strings when fields
    /// are configured.
    pub fn build<I, T>(items: I, config: Config, plugins: &PluginSet) -> Result<Index>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let start = Instant::now();
        config.validate()?;
        let languages = plugins.resolve(&config.languages)?;
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        if let Some(problem) = schema_violation(&items, &Schema::from_fields(&config.fields)) {
            return Err(IndexError::Config(problem));
        }

        let mut index = Index::empty(config, languages);
        let mut seen = HashSet::new();
        let analyzed = Analyzer::new(&index.config, &index.languages).analyze_all(&items, &mut seen);
        index.register_all(analyzed);
        index.rebuild_derived();

        debug!(
            "built index: {} items in, {} documents, {} bases, layout {} ({:.2?})",
            items.len(),
            index.documents.len(),
            index.classic.bases.len(),
            index.layout.name(),
            start.elapsed()
        );
        Ok(index)
    }

    /// Append analyzed items as new documents and link their values.
    pub(crate) fn register_all(&mut self, analyzed: Vec<AnalyzedItem>) {
        for item in analyzed {
            let id = DocId(self.documents.len() as u32);
            let mut bases: Vec<String> = Vec::with_capacity(item.values.len());
            for value in &item.values {
                self.classic.register(
                    value,
                    Owner {
                        doc: id,
                        field: value.field,
                    },
                );
                if !bases.contains(&value.key) {
                    bases.push(value.key.clone());
                }
            }
            let first = &item.values[0];
            self.documents.push(Document {
                id,
                display: item.display,
                normalized: first.normalized.clone(),
                language: Some(self.languages.primary_tag().to_string()),
                phonetic: item.phonetic,
                compound_parts: first.compound_parts.clone(),
                length: item.values.iter().map(|v| v.tokens.len() as u32).sum(),
                fields: item.fields,
                bases,
            });
        }
    }

    /// Recompute the inverted layout, corpus stats and bloom filter from the
    /// documents and classic maps. Used after build and after every mutation.
    pub(crate) fn rebuild_derived(&mut self) {
        let doc_count = self.documents.len();
        let wants_inverted = self.config.wants_inverted_index(doc_count);

        self.layout = if wants_inverted {
            Layout::WithInverted(InvertedIndex::build(
                &self.documents,
                &self.classic,
                self.config.ngram_size,
            ))
        } else {
            Layout::ClassicOnly
        };

        self.stats = (wants_inverted || self.config.use_bm25).then(|| {
            CorpusStats::from_documents(
                self.documents
                    .iter()
                    .map(|doc| (doc, self.document_tokens(doc))),
            )
        });

        self.bloom = (wants_inverted || self.config.use_bloom_filter).then(|| {
            let terms = self.term_set();
            BloomFilter::from_terms(
                terms.iter().map(String::as_str),
                terms.len(),
                self.config.bloom_fp_rate,
            )
        });
    }

    /// Every normalized token of every value a document owns.
    pub(crate) fn document_tokens<'s>(&'s self, doc: &Document) -> Vec<&'s str> {
        doc.bases
            .iter()
            .filter_map(|key| self.classic.bases.get(key))
            .flat_map(|entry| entry.normalized.split_whitespace())
            .collect()
    }

    /// Whole normalized values and their tokens: the keys exact lookups use.
    fn term_set(&self) -> BTreeSet<String> {
        let mut terms = BTreeSet::new();
        for entry in self.classic.bases.values() {
            terms.insert(entry.normalized.clone());
            for token in entry.normalized.split_whitespace() {
                terms.insert(token.to_string());
            }
        }
        terms
    }
}

/// Build an index. See [`Index::build`].
pub fn build_index<I, T>(items: I, config: Config, plugins: &PluginSet) -> Result<Index>
where
    I: IntoIterator<Item = T>,
    T: Into<Item>,
{
    Index::build(items, config, plugins)
}
