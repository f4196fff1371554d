// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting lists: the documents a key occurs in.
//!
//! # Invariant
//!
//! Ids are strictly ascending with no duplicates. Every constructor and
//! mutator preserves this, and the set operations rely on it for linear
//! merges.

use serde::{Deserialize, Serialize};

use crate::types::DocId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingList(Vec<DocId>);

impl PostingList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from arbitrary ids: sorts and drops duplicates.
    pub fn from_unsorted(mut ids: Vec<DocId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    /// Adopt ids that are already strictly ascending, or `None`.
    pub fn from_sorted(ids: Vec<DocId>) -> Option<Self> {
        ids.windows(2).all(|w| w[0] < w[1]).then_some(Self(ids))
    }

    /// Insert keeping order. Returns `false` if the id was already present.
    pub fn insert(&mut self, doc: DocId) -> bool {
        // Build order appends in ascending id order, so check the tail first
        match self.0.last() {
            None => {
                self.0.push(doc);
                true
            }
            Some(&last) if last < doc => {
                self.0.push(doc);
                true
            }
            _ => match self.0.binary_search(&doc) {
                Ok(_) => false,
                Err(pos) => {
                    self.0.insert(pos, doc);
                    true
                }
            },
        }
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.0.binary_search(&doc).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.0
    }

    /// Documents in both lists.
    pub fn intersect(&self, other: &PostingList) -> PostingList {
        let (mut i, mut j) = (0, 0);
        let mut out = Vec::with_capacity(self.len().min(other.len()));
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        PostingList(out)
    }

    /// Documents in either list.
    pub fn union(&self, other: &PostingList) -> PostingList {
        let (mut i, mut j) = (0, 0);
        let mut out = Vec::with_capacity(self.len() + other.len());
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => {
                    out.push(self.0[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(other.0[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&self.0[i..]);
        out.extend_from_slice(&other.0[j..]);
        PostingList(out)
    }

    /// Documents in `self` but not in `other`.
    pub fn difference(&self, other: &PostingList) -> PostingList {
        PostingList(
            self.0
                .iter()
                .copied()
                .filter(|doc| !other.contains(*doc))
                .collect(),
        )
    }
}

impl FromIterator<DocId> for PostingList {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[u32]) -> PostingList {
        ids.iter().map(|&i| DocId(i)).collect()
    }

    #[test]
    fn insert_keeps_order_and_uniqueness() {
        let mut postings = PostingList::new();
        assert!(postings.insert(DocId(5)));
        assert!(postings.insert(DocId(1)));
        assert!(postings.insert(DocId(9)));
        assert!(!postings.insert(DocId(5)));
        assert_eq!(postings, list(&[1, 5, 9]));
    }

    #[test]
    fn from_sorted_rejects_disorder() {
        assert!(PostingList::from_sorted(vec![DocId(1), DocId(1)]).is_none());
        assert!(PostingList::from_sorted(vec![DocId(2), DocId(1)]).is_none());
        assert!(PostingList::from_sorted(vec![DocId(1), DocId(2)]).is_some());
    }

    #[test]
    fn set_operations() {
        let a = list(&[1, 3, 5, 7]);
        let b = list(&[3, 4, 5]);
        assert_eq!(a.intersect(&b), list(&[3, 5]));
        assert_eq!(a.union(&b), list(&[1, 3, 4, 5, 7]));
        assert_eq!(a.difference(&b), list(&[1, 7]));
    }
}
