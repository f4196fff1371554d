//! Ranking order, length normalization and score bounds.

use crate::common::{build, displays, position, query, sample_index, sample_words};
use fuzzdex::scoring::ranking::SCORE_EPSILON;
use fuzzdex::{Config, MatchType, SearchOptions};

#[test]
fn long_prefix_hit_does_not_beat_close_typo() {
    let index = build(&["housekeepingstaff", "horse"], Config::default());
    let results = query(&index, "house", 5);
    let horse = position(&results, "horse").expect("one edit away");
    let long = position(&results, "housekeepingstaff").expect("prefix hit");
    assert!(horse < long, "{:?}", displays(&results));
    assert_eq!(results[long].match_type, MatchType::Prefix);
    assert!(results[long].score < results[horse].score);
}

#[test]
fn transpositions_count_as_one_edit_when_enabled() {
    let words = ["application", "apple"];
    let plain = build(&words, Config::default());
    let swapped = build(&words, Config::default().with_transpositions());

    let a = query(&plain, "applicaiton", 5);
    let b = query(&swapped, "applicaiton", 5);
    assert_eq!(a[0].display, "application");
    assert_eq!(b[0].display, "application");
    assert_eq!(a[0].edit_distance, Some(2));
    assert_eq!(b[0].edit_distance, Some(1));
    assert!(b[0].score > a[0].score);
}

#[test]
fn results_are_sorted_and_bounded() {
    let index = sample_index();
    for q in ["hel", "helo", "app", "aple", "banan", "york", "krank", "dat"] {
        let results = query(&index, q, 20);
        for pair in results.windows(2) {
            assert!(
                pair[0].score + SCORE_EPSILON >= pair[1].score,
                "query {}: {:?}",
                q,
                displays(&results)
            );
        }
        for r in &results {
            assert!((0.0..=1.0).contains(&r.score), "query {}: {}", q, r.score);
            if r.match_type == MatchType::Exact {
                assert_eq!(r.score, 1.0);
            } else {
                assert!(r.score < 1.0);
            }
        }
    }
}

#[test]
fn max_results_truncates() {
    let index = sample_index();
    let all = query(&index, "hel", 20);
    assert!(all.len() > 2);
    let two = query(&index, "hel", 2);
    assert_eq!(two, all[..2].to_vec());
}

#[test]
fn batch_matches_individual_searches() {
    let index = sample_index();
    let queries: Vec<&str> = sample_words().into_iter().chain(["helo", "helo", "zzz"]).collect();
    let batch = index.batch_search(&queries, 5, &SearchOptions::default());
    assert_eq!(batch.len(), queries.len());
    for (q, results) in queries.iter().zip(&batch) {
        assert_eq!(results, &index.search_uncached(q, 5, &SearchOptions::default()));
    }
}

#[test]
fn bm25_scores_stay_in_range() {
    let words = ["data", "data science", "big data", "database", "science"];
    let config = Config::default().with_bm25().with_inverted_index();
    let index = build(&words, config);
    assert!(index.corpus_stats().is_some());

    let results = query(&index, "data", 10);
    assert_eq!(results[0].display, "data");
    assert_eq!(results[0].score, 1.0);
    assert!(results.len() >= 3);
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
}
