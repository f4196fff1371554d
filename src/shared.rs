//! Thread-safe handle: many concurrent readers, one writer.
//!
//! Searches take the read lock, so they run in parallel and never observe a
//! half-applied mutation. `update` and `remove` take the write lock and wait
//! for in-flight searches to finish.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::SearchOptions;
use crate::error::Result;
use crate::index::Index;
use crate::types::{Item, SuggestionResult};

/// Cloneable, `Send + Sync` wrapper around an [`Index`].
#[derive(Debug, Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<Index>>,
}

impl SharedIndex {
    pub fn new(index: Index) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn search(
        &self,
        query: &str,
        max_results: usize,
        options: &SearchOptions,
    ) -> Vec<SuggestionResult> {
        self.inner.read().search(query, max_results, options)
    }

    pub fn update<I, T>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        self.inner.write().update(items)
    }

    pub fn remove<I, T>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        self.inner.write().remove(items)
    }

    /// Hold the read lock, e.g. to run several searches against one snapshot.
    pub fn read(&self) -> RwLockReadGuard<'_, Index> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Index> {
        self.inner.write()
    }

    /// Unwrap the index when this is the last handle.
    pub fn try_into_inner(self) -> std::result::Result<Index, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<Index> for SharedIndex {
    fn from(index: Index) -> Self {
        Self::new(index)
    }
}
