//! End-to-end scenarios, one per matching strategy.

use crate::common::{build, displays, german, position, query, sample_index, sample_words};
use fuzzdex::{Config, MatchType, SearchOptions};

#[test]
fn german_compound_prefix() {
    let index = build(&["Krankenhaus", "Apotheke", "Zahnarzt"], german());
    let results = query(&index, "krankenh", 5);
    assert_eq!(results[0].display, "Krankenhaus");
    assert_eq!(results[0].match_type, MatchType::Prefix);
    assert!(results[0].score > 0.85, "score {}", results[0].score);
}

#[test]
fn german_compound_part() {
    let index = build(&["Krankenhaus", "Apotheke"], german());
    let results = query(&index, "haus", 5);
    assert_eq!(displays(&results), vec!["Krankenhaus"]);
    assert_eq!(results[0].match_type, MatchType::Compound);
    assert!(results[0].score < 0.75);
}

#[test]
fn one_typo_beats_two() {
    let index = build(&["hello", "hallo", "hullo", "helo", "help"], Config::default());
    let results = query(&index, "helo", 10);
    assert_eq!(results[0].display, "helo");
    assert_eq!(results[0].score, 1.0);

    let hello = position(&results, "hello").expect("hello is one edit away");
    let help = position(&results, "help").expect("help is one edit away");
    assert!(hello < help, "{:?}", displays(&results));
    assert_eq!(results[hello].edit_distance, Some(1));
}

#[test]
fn every_sample_word_finds_itself_first() {
    let index = sample_index();
    for word in sample_words() {
        let results = query(&index, word, 5);
        assert_eq!(results[0].display, word, "query {}", word);
        assert_eq!(results[0].score, 1.0, "query {}", word);
        assert_eq!(results[0].match_type, MatchType::Exact, "query {}", word);
    }
}

#[test]
fn diacritics_are_folded() {
    let index = sample_index();
    let results = query(&index, "CAFE", 3);
    assert_eq!(results[0].display, "café");
    assert_eq!(results[0].score, 1.0);
}

#[test]
fn sound_alikes_match_phonetically() {
    let index = sample_index();
    let options = SearchOptions::default().with_match_types(vec![MatchType::Phonetic]);
    let results = index.search("smyth", 5, &options);
    let smith = position(&results, "Smith").expect("Smith sounds like smyth");
    assert_eq!(results[smith].match_type, MatchType::Phonetic);
    assert_eq!(results[smith].language.as_deref(), Some("en"));
    assert!(results[smith].edit_distance.is_none());
}

#[test]
fn synonyms_bridge_different_words() {
    let index = build(&["physician", "nurse"], Config::default());
    let results = query(&index, "doctor", 5);
    assert_eq!(displays(&results), vec!["physician"]);
    assert_eq!(results[0].match_type, MatchType::Synonym);
}

#[test]
fn inner_word_prefix() {
    let index = build(&["new york", "boston"], Config::default());
    let results = index.search("yor", 5, &SearchOptions::default().with_spans());
    assert_eq!(displays(&results), vec!["new york"]);
    assert_eq!(results[0].match_type, MatchType::Prefix);
    let span = &results[0].spans[0];
    assert_eq!((span.start, span.end), (4, 7));
}

#[test]
fn unmatched_and_degenerate_queries_are_empty() {
    let index = sample_index();
    for q in ["", "   ", "x", "qqqqqqqq", "!!!"] {
        assert!(query(&index, q, 10).is_empty(), "query {:?}", q);
    }
}
