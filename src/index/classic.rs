//! Classic index: base words plus variant maps, nothing else.
//!
//! Always present. Small corpora answer every query from here; large corpora
//! still use it for variant and compound lookups, which are single map hits.
//!
//! # Structure
//!
//! ```text
//! bases:     "krankenhaus" -> BaseEntry { normalized, phonetic, owners: [#0] }
//! variants:  "kra" | "krankenh" | "haus" | ... -> {"krankenhaus"}
//! phonetics: "de:476468" -> {"krankenhaus"}
//! ngrams:    "kra" | "ran" | ... -> {"krankenhaus"}
//! synonyms:  "klinik" | "spital" -> {"krankenhaus"}
//! ```
//!
//! A base word is stored once no matter how many variants point at it. The
//! maps hold base keys (case-folded display text), never document ids, so
//! removing a document only touches the bases it owned.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use super::builder::AnalyzedValue;
use crate::types::DocId;

/// Variant string -> base keys.
pub type VariantMap = BTreeMap<String, BTreeSet<String>>;

/// A document (and record field) that contributed a base word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Owner {
    pub doc: DocId,
    /// Index into `Config::fields`, `None` for string items.
    pub field: Option<u16>,
}

/// One distinct indexed value.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseEntry {
    /// Text as first indexed.
    pub display: String,
    pub normalized: String,
    /// Tagged phonetic keys (`"lang:code"`).
    pub phonetic: Vec<String>,
    pub compound_parts: Vec<String>,
    pub synonyms: Vec<String>,
    /// Sorted, unique.
    pub owners: Vec<Owner>,
}

impl BaseEntry {
    pub fn char_len(&self) -> usize {
        self.normalized.chars().count()
    }

    fn add_owner(&mut self, owner: Owner) {
        if let Err(pos) = self.owners.binary_search(&owner) {
            self.owners.insert(pos, owner);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassicIndex {
    pub bases: BTreeMap<String, BaseEntry>,
    pub variants: VariantMap,
    pub phonetics: VariantMap,
    pub ngrams: VariantMap,
    pub synonyms: VariantMap,
    /// Normalized values and the words of multi-word values -> base keys.
    /// Derived from `bases`, never serialized.
    words: VariantMap,
}

fn link(map: &mut VariantMap, key: &str, base: &str) {
    map.entry(key.to_string())
        .or_default()
        .insert(base.to_string());
}

/// Link `normalized` and, when it has several words, each word.
fn link_words(map: &mut VariantMap, normalized: &str, base: &str) {
    link(map, normalized, base);
    let mut tokens = normalized.split_whitespace();
    if let (Some(_), Some(_)) = (tokens.next(), tokens.next()) {
        for token in normalized.split_whitespace() {
            link(map, token, base);
        }
    }
}

fn unlink(map: &mut VariantMap, gone: &BTreeSet<String>) {
    map.retain(|_, bases| {
        bases.retain(|b| !gone.contains(b));
        !bases.is_empty()
    });
}

impl ClassicIndex {
    /// Assemble from decoded maps, deriving the word map from `bases`.
    pub fn from_maps(
        bases: BTreeMap<String, BaseEntry>,
        variants: VariantMap,
        phonetics: VariantMap,
        ngrams: VariantMap,
        synonyms: VariantMap,
    ) -> Self {
        let mut words = VariantMap::new();
        for (key, entry) in &bases {
            link_words(&mut words, &entry.normalized, key);
        }
        Self {
            bases,
            variants,
            phonetics,
            ngrams,
            synonyms,
            words,
        }
    }

    /// Register one analyzed value for `owner`.
    ///
    /// A value already present only gains an owner: its variants are a pure
    /// function of the key, so they are already linked.
    pub fn register(&mut self, value: &AnalyzedValue, owner: Owner) {
        if let Some(entry) = self.bases.get_mut(&value.key) {
            entry.add_owner(owner);
            return;
        }

        let key = value.key.as_str();
        for variant in &value.variants {
            link(&mut self.variants, variant, key);
        }
        for code in &value.phonetic {
            link(&mut self.phonetics, code, key);
        }
        for gram in &value.ngrams {
            link(&mut self.ngrams, gram, key);
        }
        for synonym in &value.synonyms {
            link(&mut self.synonyms, synonym, key);
        }
        link_words(&mut self.words, &value.normalized, key);

        self.bases.insert(
            value.key.clone(),
            BaseEntry {
                display: value.display.clone(),
                normalized: value.normalized.clone(),
                phonetic: value.phonetic.clone(),
                compound_parts: value.compound_parts.clone(),
                synonyms: value.synonyms.clone(),
                owners: vec![owner],
            },
        );
    }

    /// Drop owners for which `remap` returns `None`, renumber the rest, and
    /// scrub every base that lost its last owner from all maps.
    ///
    /// Returns the removed base keys.
    pub fn retain_owners<F>(&mut self, remap: F) -> BTreeSet<String>
    where
        F: Fn(DocId) -> Option<DocId>,
    {
        let mut gone = BTreeSet::new();
        for (key, entry) in self.bases.iter_mut() {
            entry.owners = entry
                .owners
                .iter()
                .filter_map(|owner| {
                    remap(owner.doc).map(|doc| Owner {
                        doc,
                        field: owner.field,
                    })
                })
                .collect();
            // Renumbering is monotone, so order is preserved
            if entry.owners.is_empty() {
                gone.insert(key.clone());
            }
        }
        if gone.is_empty() {
            return gone;
        }

        self.bases.retain(|key, _| !gone.contains(key));
        unlink(&mut self.variants, &gone);
        unlink(&mut self.phonetics, &gone);
        unlink(&mut self.ngrams, &gone);
        unlink(&mut self.synonyms, &gone);
        unlink(&mut self.words, &gone);
        gone
    }

    pub fn base(&self, key: &str) -> Option<&BaseEntry> {
        self.bases.get(key)
    }

    /// Base entries reachable from `key` in `map`, in key order.
    pub fn lookup<'a>(
        &'a self,
        map: &'a VariantMap,
        key: &str,
    ) -> impl Iterator<Item = (&'a str, &'a BaseEntry)> + 'a {
        map.get(key)
            .into_iter()
            .flatten()
            .filter_map(|base| self.bases.get(base).map(|entry| (base.as_str(), entry)))
    }

    /// Bases whose normalized value, or one of its words, starts with
    /// `prefix`. Walks the ordered word map from `prefix` and stops at the
    /// first word that no longer matches, so the cost follows the number of
    /// hits rather than the corpus size. Each base appears once, in key order.
    pub fn prefix_scan(&self, prefix: &str) -> Vec<(&str, &BaseEntry)> {
        let keys: BTreeSet<&str> = self
            .words
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(word, _)| word.starts_with(prefix))
            .flat_map(|(_, bases)| bases.iter().map(String::as_str))
            .collect();
        keys.into_iter()
            .filter_map(|key| self.bases.get(key).map(|entry| (key, entry)))
            .collect()
    }

    /// Total number of distinct keys over the four maps.
    pub fn key_count(&self) -> usize {
        self.variants.len() + self.phonetics.len() + self.ngrams.len() + self.synonyms.len()
    }

    /// Documents owning any base reachable from `key` through the variant map.
    pub fn docs_for_variant(&self, key: &str) -> BTreeSet<DocId> {
        self.lookup(&self.variants, key)
            .flat_map(|(_, entry)| entry.owners.iter().map(|o| o.doc))
            .collect()
    }
}
