// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental mutation: add and remove items on a built index.
//!
//! Both operations check the schema before touching anything, so a rejected
//! call leaves the index exactly as it was. The classic maps are patched in
//! place; the inverted structures, corpus stats and bloom filter are derived
//! data and get rebuilt from scratch. The result cache is cleared last.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use log::debug;

use super::{schema_violation, Analyzer, Index};
use crate::error::{IndexError, Result};
use crate::types::{DocId, Item};

impl Index {
    /// Add `items`, skipping any whose identity is already indexed.
    ///
    /// Fails with [`IndexError::SchemaMismatch`] when a record is given to a
    /// string index or the other way round; the index is then unchanged.
    pub fn update<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let start = Instant::now();
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        if let Some(problem) = schema_violation(&items, &self.schema()) {
            return Err(IndexError::SchemaMismatch(problem));
        }

        let mut seen: HashSet<String> = self
            .documents
            .iter()
            .map(|doc| doc.identity(&self.config.fields))
            .collect();
        let analyzed = Analyzer::new(&self.config, &self.languages).analyze_all(&items, &mut seen);
        let added = analyzed.len();
        if added > 0 {
            self.register_all(analyzed);
            self.rebuild_derived();
        }
        self.clear_cache();

        debug!(
            "update: {} items in, {} added, {} documents, layout {} ({:.2?})",
            items.len(),
            added,
            self.documents.len(),
            self.layout.name(),
            start.elapsed()
        );
        Ok(())
    }

    /// Remove every document matching one of `items` case-insensitively.
    /// Returns how many documents were removed.
    ///
    /// Surviving documents are renumbered so ids stay dense. Removing
    /// something that is not indexed is a no-op, not an error.
    pub fn remove<I, T>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let start = Instant::now();
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        if let Some(problem) = schema_violation(&items, &self.schema()) {
            return Err(IndexError::SchemaMismatch(problem));
        }

        let analyzer = Analyzer::new(&self.config, &self.languages);
        let targets: HashSet<String> = items.iter().filter_map(|i| analyzer.identity(i)).collect();
        let fields = &self.config.fields;
        let doomed: HashSet<DocId> = self
            .documents
            .iter()
            .filter(|doc| targets.contains(&doc.identity(fields)))
            .map(|doc| doc.id)
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        // Old id -> new dense id for survivors
        let mut remap: HashMap<DocId, DocId> = HashMap::with_capacity(self.documents.len());
        let mut next = 0u32;
        for doc in &self.documents {
            if !doomed.contains(&doc.id) {
                remap.insert(doc.id, DocId(next));
                next += 1;
            }
        }

        let gone = self.classic.retain_owners(|doc| remap.get(&doc).copied());
        self.documents.retain(|doc| !doomed.contains(&doc.id));
        for doc in &mut self.documents {
            if let Some(id) = remap.get(&doc.id) {
                doc.id = *id;
            }
        }
        self.rebuild_derived();
        self.clear_cache();

        debug!(
            "remove: {} documents removed, {} base words dropped, {} left ({:.2?})",
            doomed.len(),
            gone.len(),
            self.documents.len(),
            start.elapsed()
        );
        Ok(doomed.len())
    }
}

/// Add items to an index. See [`Index::update`].
pub fn update_index<I, T>(index: &mut Index, items: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<Item>,
{
    index.update(items)
}

/// Remove items from an index. See [`Index::remove`].
pub fn remove_from_index<I, T>(index: &mut Index, items: I) -> Result<usize>
where
    I: IntoIterator<Item = T>,
    T: Into<Item>,
{
    index.remove(items)
}
