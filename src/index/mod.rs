// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: the data structures that make search fast.
//!
//! Two layouts, chosen by corpus size:
//! - **Classic**: base words and variant maps. Always present. Small corpora
//!   answer every query from here.
//! - **Inverted**: posting lists, a prefix trie, corpus statistics and a
//!   bloom filter on top of the classic maps. Built automatically once the
//!   corpus reaches `Config::inverted_threshold` items, or on request.
//!
//! The layout is an enum, not a nullable field: code that wants the inverted
//! structures has to match on it.

pub mod bloom;
mod builder;
pub mod classic;
pub mod inverted;
mod mutation;
pub mod postings;
pub mod trie;

use parking_lot::Mutex;
use serde::Serialize;

pub use bloom::BloomFilter;
pub use builder::{build_index, AnalyzedItem, AnalyzedValue};
pub use classic::{BaseEntry, ClassicIndex, Owner, VariantMap};
pub use inverted::{InvertedIndex, PostingMap};
pub use mutation::{remove_from_index, update_index};
pub use postings::PostingList;
pub use trie::{PrefixTrie, TrieNode};

pub(crate) use builder::{schema_violation, Analyzer};

use crate::cache::{CacheStats, SearchCache};
use crate::config::Config;
use crate::lang::Languages;
use crate::scoring::CorpusStats;
use crate::types::{DocId, Document, Schema};

/// Which structures back the index.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    ClassicOnly,
    WithInverted(InvertedIndex),
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::ClassicOnly => "classic",
            Layout::WithInverted(_) => "inverted",
        }
    }
}

/// Size summary of a built index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub base_words: usize,
    pub variant_keys: usize,
    pub posting_keys: usize,
    pub trie_nodes: usize,
    pub bloom_bits: u64,
    pub layout: &'static str,
}

/// A built, searchable index.
///
/// Logically immutable between mutations: `search` takes `&self`, while
/// `update` and `remove` take `&mut self`. Wrap it in [`crate::SharedIndex`]
/// to share it across threads with a single writer.
#[derive(Debug)]
pub struct Index {
    pub(crate) config: Config,
    pub(crate) languages: Languages,
    pub(crate) documents: Vec<Document>,
    pub(crate) classic: ClassicIndex,
    pub(crate) layout: Layout,
    pub(crate) stats: Option<CorpusStats>,
    pub(crate) bloom: Option<BloomFilter>,
    pub(crate) cache: Option<Mutex<SearchCache>>,
}

impl Index {
    pub(crate) fn empty(config: Config, languages: Languages) -> Self {
        let cache = config
            .enable_cache
            .then(|| Mutex::new(SearchCache::new(config.cache_capacity)));
        Self {
            config,
            languages,
            documents: Vec::new(),
            classic: ClassicIndex::default(),
            layout: Layout::ClassicOnly,
            stats: None,
            bloom: None,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn schema(&self) -> Schema {
        Schema::from_fields(&self.config.fields)
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id.as_usize())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn classic(&self) -> &ClassicIndex {
        &self.classic
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The inverted structures, when the layout has them.
    pub fn inverted(&self) -> Option<&InvertedIndex> {
        match &self.layout {
            Layout::WithInverted(inverted) => Some(inverted),
            Layout::ClassicOnly => None,
        }
    }

    pub fn corpus_stats(&self) -> Option<&CorpusStats> {
        self.stats.as_ref()
    }

    pub fn bloom(&self) -> Option<&BloomFilter> {
        self.bloom.as_ref()
    }

    /// Documents containing `term` as a whole value or as one of its words.
    ///
    /// Works on both layouts; the boolean query layer combines the lists with
    /// [`PostingList::intersect`], [`PostingList::union`] and
    /// [`PostingList::difference`].
    pub fn postings(&self, term: &str) -> PostingList {
        let term = self.languages.normalize(term);
        if term.is_empty() {
            return PostingList::new();
        }
        if let Some(inverted) = self.inverted() {
            if self.bloom.as_ref().is_some_and(|b| !b.might_contain(&term)) {
                return PostingList::new();
            }
            return inverted.term(&term).cloned().unwrap_or_default();
        }
        self.classic
            .lookup(&self.classic.variants, &term)
            .filter(|(_, entry)| {
                entry.normalized == term || entry.normalized.split_whitespace().any(|t| t == term)
            })
            .flat_map(|(_, entry)| entry.owners.iter().map(|o| o.doc))
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let inverted = self.inverted();
        IndexStats {
            documents: self.documents.len(),
            base_words: self.classic.bases.len(),
            variant_keys: self.classic.key_count(),
            posting_keys: inverted.map(InvertedIndex::posting_key_count).unwrap_or(0),
            trie_nodes: inverted.map(|i| i.trie.node_count()).unwrap_or(0),
            bloom_bits: self.bloom.as_ref().map(BloomFilter::num_bits).unwrap_or(0),
            layout: self.layout.name(),
        }
    }

    /// Cache counters, `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.lock().stats())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}
