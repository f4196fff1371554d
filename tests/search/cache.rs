//! Result cache: read-through, keys, eviction and invalidation.

use crate::common::{build, position, query, sample_index};
use fuzzdex::{Config, MatchType, SearchOptions};

#[test]
fn hit_after_miss_and_miss_after_update() {
    let mut index = sample_index();
    let first = query(&index, "app", 5);
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses), (0, 1));

    let second = query(&index, "app", 5);
    assert_eq!(first, second);
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses), (1, 1));

    index.update(["appetite"]).unwrap();
    assert_eq!(index.cache_stats().unwrap().len, 0);
    let third = query(&index, "app", 5);
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses), (1, 2));
    assert!(position(&third, "appetite").is_some());
}

#[test]
fn key_includes_limit_and_options() {
    let index = sample_index();
    query(&index, "hel", 5);
    query(&index, "hel", 3);
    index.search("hel", 5, &SearchOptions::default().with_spans());
    index.search("hel", 5, &SearchOptions::default().with_match_types(vec![MatchType::Prefix]));
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses, stats.len), (0, 4, 4));

    // Case and surrounding whitespace normalize to the same key
    query(&index, "  HEL ", 5);
    assert_eq!(index.cache_stats().unwrap().hits, 1);
}

#[test]
fn removal_invalidates_cached_results() {
    let mut index = sample_index();
    assert_eq!(query(&index, "banana", 5)[0].display, "banana");
    assert_eq!(index.remove(["Banana"]).unwrap(), 1);
    let after = query(&index, "banana", 5);
    assert!(position(&after, "banana").is_none());
    assert_eq!(index.cache_stats().unwrap().misses, 2);
}

#[test]
fn lru_evicts_oldest_entry() {
    let index = build(&["apple", "banana", "cherry"], Config::default().with_cache_capacity(2));
    query(&index, "apple", 5);
    query(&index, "banana", 5);
    query(&index, "cherry", 5);
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.len, stats.capacity), (2, 2));

    // "apple" was evicted, "cherry" is still there
    query(&index, "cherry", 5);
    query(&index, "apple", 5);
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses), (1, 4));
}

#[test]
fn disabled_cache_reports_nothing() {
    let index = build(&["apple"], Config::default().without_cache());
    assert_eq!(query(&index, "apple", 5)[0].display, "apple");
    assert!(index.cache_stats().is_none());
}

#[test]
fn uncached_search_leaves_counters_alone() {
    let index = sample_index();
    let results = index.search_uncached("apple", 5, &SearchOptions::default());
    assert_eq!(results[0].display, "apple");
    let stats = index.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses, stats.len), (0, 0, 0));
}
