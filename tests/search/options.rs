//! Per-call search options.

use crate::common::{build, german, position, sample_index};
use fuzzdex::{Config, MatchType, SearchOptions};

fn fuzzy_only() -> SearchOptions {
    SearchOptions::default().with_match_types(vec![MatchType::Fuzzy])
}

#[test]
fn max_edit_distance_override() {
    let index = build(&["hello", "help"], Config::default());
    assert!(!index.search("helo", 5, &fuzzy_only()).is_empty());

    let strict = SearchOptions {
        max_edit_distance: Some(0),
        ..fuzzy_only()
    };
    assert!(index.search("helo", 5, &strict).is_empty());
}

#[test]
fn fuzzy_threshold_override_tightens_the_prefilter() {
    let index = build(&["hello", "help"], Config::default());
    let strict = SearchOptions {
        fuzzy_threshold: Some(1.0),
        ..fuzzy_only()
    };
    assert!(index.search("helo", 5, &strict).is_empty());
}

#[test]
fn min_score_override_beats_config() {
    let index = sample_index();
    let loose = index.search("hel", 10, &SearchOptions::default());
    let strict = index.search("hel", 10, &SearchOptions::default().with_min_score(0.9));
    assert!(strict.len() < loose.len());
    assert!(strict.iter().all(|r| r.score >= 0.9));
}

#[test]
fn language_filter() {
    let index = build(&["Krankenhaus", "Apotheke"], german());
    let de = SearchOptions {
        languages: Some(vec!["de".into()]),
        ..SearchOptions::default()
    };
    let xx = SearchOptions {
        languages: Some(vec!["xx".into()]),
        ..SearchOptions::default()
    };
    let results = index.search("krankenh", 5, &de);
    assert_eq!(results[0].display, "Krankenhaus");
    assert_eq!(results[0].language.as_deref(), Some("de"));
    assert!(index.search("krankenh", 5, &xx).is_empty());
}

#[test]
fn several_match_types() {
    let index = sample_index();
    let options = SearchOptions::default().with_match_types(vec![MatchType::Exact, MatchType::Prefix]);
    let results = index.search("hel", 10, &options);
    assert!(position(&results, "hello").is_some());
    assert!(results
        .iter()
        .all(|r| matches!(r.match_type, MatchType::Exact | MatchType::Prefix)));
}

#[test]
fn spans_only_when_asked() {
    let index = sample_index();
    let plain = index.search("appl", 3, &SearchOptions::default());
    assert!(plain.iter().all(|r| r.spans.is_empty()));

    let spanned = index.search("appl", 3, &SearchOptions::default().with_spans());
    let apple = &spanned[position(&spanned, "apple").unwrap()];
    assert_eq!(apple.spans.len(), 1);
    assert_eq!((apple.spans[0].start, apple.spans[0].end), (0, 4));
    assert_eq!(apple.spans[0].field, None);
}
