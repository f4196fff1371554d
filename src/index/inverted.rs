//! Inverted index construction.
//!
//! Built for large corpora (or on request) from the documents and the
//! classic base entries. Fully derived: after any mutation it is thrown away
//! and rebuilt, never patched.
//!
//! # Invariants
//!
//! 1. **POSTINGS_SORTED**: every posting list is strictly ascending.
//! 2. **NON_EMPTY**: every key has at least one posting.
//! 3. **IN_RANGE**: every id is below the document count.
//!
//! Documents are visited in id order and each list only ever receives
//! appends, so (1) holds by construction and building stays linear.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::classic::ClassicIndex;
use super::postings::PostingList;
use super::trie::PrefixTrie;
use crate::fuzzy::indexable_ngrams;
use crate::types::{DocId, Document};

/// Key -> documents.
pub type PostingMap = BTreeMap<String, PostingList>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    /// Whole normalized values and their tokens.
    pub terms: PostingMap,
    /// Tagged phonetic keys.
    pub phonetics: PostingMap,
    /// N-grams of normalized values, always built: fuzzy candidate
    /// generation draws on them even when the n-gram strategy is off.
    pub ngrams: PostingMap,
    pub synonyms: PostingMap,
    /// Normalized values and tokens, every prefix.
    pub trie: PrefixTrie,
}

fn post(map: &mut PostingMap, key: &str, doc: DocId) {
    match map.get_mut(key) {
        Some(list) => {
            list.insert(doc);
        }
        None => {
            let mut list = PostingList::new();
            list.insert(doc);
            map.insert(key.to_string(), list);
        }
    }
}

impl InvertedIndex {
    pub fn build(documents: &[Document], classic: &ClassicIndex, ngram_size: usize) -> Self {
        let mut index = InvertedIndex::default();
        // N-gram sets per base, computed once even when many documents share a base
        let mut gram_cache: HashMap<&str, BTreeSet<String>> = HashMap::new();

        for doc in documents {
            for key in &doc.bases {
                let Some(entry) = classic.bases.get(key) else {
                    continue;
                };
                let normalized = entry.normalized.as_str();
                post(&mut index.terms, normalized, doc.id);
                index.trie.insert(normalized, doc.id);

                let mut tokens = normalized.split_whitespace();
                if let (Some(_), Some(_)) = (tokens.next(), tokens.next()) {
                    for token in normalized.split_whitespace() {
                        post(&mut index.terms, token, doc.id);
                        index.trie.insert(token, doc.id);
                    }
                }

                for code in &entry.phonetic {
                    post(&mut index.phonetics, code, doc.id);
                }
                for synonym in &entry.synonyms {
                    post(&mut index.synonyms, synonym, doc.id);
                }
                let grams = gram_cache
                    .entry(key.as_str())
                    .or_insert_with(|| indexable_ngrams(normalized, ngram_size));
                for gram in grams.iter() {
                    post(&mut index.ngrams, gram, doc.id);
                }
            }
        }
        index
    }

    pub fn term(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    /// Documents sharing at least `min_shared` of `grams`, with the shared count.
    pub fn ngram_overlap(
        &self,
        grams: &BTreeSet<String>,
        min_shared: usize,
    ) -> Vec<(DocId, usize)> {
        let mut counts: BTreeMap<DocId, usize> = BTreeMap::new();
        for gram in grams {
            if let Some(list) = self.ngrams.get(gram) {
                for doc in list.iter() {
                    *counts.entry(doc).or_insert(0) += 1;
                }
            }
        }
        counts
            .into_iter()
            .filter(|(_, shared)| *shared >= min_shared.max(1))
            .collect()
    }

    /// Number of keys over all posting maps.
    pub fn posting_key_count(&self) -> usize {
        self.terms.len() + self.phonetics.len() + self.ngrams.len() + self.synonyms.len()
    }

    /// Iterate all posting maps with their section names.
    pub fn maps(&self) -> [(&'static str, &PostingMap); 4] {
        [
            ("terms", &self.terms),
            ("phonetics", &self.phonetics),
            ("ngrams", &self.ngrams),
            ("synonyms", &self.synonyms),
        ]
    }
}
