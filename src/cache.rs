//! LRU cache of ranked results, keyed by query signature.
//!
//! The cache sits behind a `parking_lot::Mutex` inside the index, so shared
//! `&Index` searches can still record hits. The lock is held only for the map
//! operation itself, never while a search runs.
//!
//! Every mutation clears it. A stale hit after `update` or `remove` would be
//! a wrong answer, not a slow one.

use std::num::NonZeroUsize;

use log::trace;
use lru::LruCache;
use serde::Serialize;

use crate::types::SuggestionResult;

/// Query signature: normalized text, result limit and options fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub max_results: usize,
    pub options: u64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
    pub hit_rate: f64,
}

#[derive(Debug)]
pub struct SearchCache {
    entries: LruCache<CacheKey, Vec<SuggestionResult>>,
    hits: u64,
    misses: u64,
}

impl SearchCache {
    /// A zero capacity is bumped to one. `Config::validate` rejects it
    /// anyway when caching is enabled.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up `key`, counting a hit or a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<SuggestionResult>> {
        match self.entries.get(key) {
            Some(results) => {
                self.hits += 1;
                trace!("cache hit for {:?}", key.query);
                Some(results.clone())
            }
            None => {
                self.misses += 1;
                trace!("cache miss for {:?}", key.query);
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, results: Vec<SuggestionResult>) {
        self.entries.put(key, results);
    }

    /// Drop every entry. Counters survive so hit rates stay meaningful.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
            capacity: self.entries.cap().get(),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f64 / lookups as f64
            },
        }
    }
}
