//! Incremental update and removal.

use crate::common::{build, displays, generated_corpus, query, record, sample_index};
use fuzzdex::{
    remove_from_index, serialize, update_index, Config, IndexError, Layout, SearchOptions,
};

#[test]
fn updated_words_are_searchable() {
    let mut index = sample_index();
    let before = index.len();
    update_index(&mut index, ["Zahnarzt", "zebra"]).unwrap();
    assert_eq!(index.len(), before + 2);
    assert_eq!(query(&index, "zebra", 3)[0].display, "zebra");
    assert_eq!(query(&index, "zahnarzt", 3)[0].display, "Zahnarzt");
}

#[test]
fn update_skips_case_insensitive_duplicates() {
    let mut index = sample_index();
    let before = serialize(&index).unwrap();
    update_index(&mut index, ["APPLE", "Hello", "  banana "]).unwrap();
    assert_eq!(serialize(&index).unwrap(), before);
}

#[test]
fn removal_scrubs_every_trace() {
    let mut index = build(&["apple", "apples", "maple"], Config::default().with_inverted_index());
    assert_eq!(remove_from_index(&mut index, ["Apple"]).unwrap(), 1);
    assert_eq!(index.len(), 2);
    assert!(index.postings("apple").is_empty());
    assert!(index.classic().base("apple").is_none());

    let inverted = index.inverted().unwrap();
    for (name, map) in inverted.maps() {
        for (key, list) in map {
            assert!(list.iter().all(|d| d.as_usize() < 2), "{} {:?}", name, key);
        }
    }
    assert!(query(&index, "apple", 5).iter().all(|r| r.display != "apple"));
}

#[test]
fn failed_mutations_leave_the_index_untouched() {
    let mut index = sample_index();
    let before = serialize(&index).unwrap();

    let err = update_index(&mut index, [record(&[("name", "x")])]).unwrap_err();
    assert!(matches!(err, IndexError::SchemaMismatch(_)));
    let err = remove_from_index(&mut index, [record(&[("name", "apple")])]).unwrap_err();
    assert!(matches!(err, IndexError::SchemaMismatch(_)));

    assert_eq!(serialize(&index).unwrap(), before);
}

#[test]
fn removing_everything_then_refilling() {
    let words = ["alpha", "beta", "gamma"];
    let mut index = build(&words, Config::default());
    assert_eq!(remove_from_index(&mut index, words).unwrap(), 3);
    assert!(index.is_empty());
    assert!(query(&index, "alpha", 5).is_empty());

    update_index(&mut index, ["delta"]).unwrap();
    assert_eq!(displays(&query(&index, "delta", 5)), vec!["delta"]);
    assert_eq!(index.documents()[0].id.get(), 0);
}

#[test]
fn layout_follows_corpus_size_through_mutations() {
    let mut config = Config::default();
    config.inverted_threshold = 50;
    let words = generated_corpus(60, 1);
    let mut index = fuzzdex::build_index(words.iter(), config, &fuzzdex::PluginSet::builtin()).unwrap();
    assert!(matches!(index.layout(), Layout::WithInverted(_)));

    let doomed: Vec<&str> = words[..20].iter().map(String::as_str).collect();
    assert_eq!(index.remove(doomed).unwrap(), 20);
    assert!(matches!(index.layout(), Layout::ClassicOnly));
    assert!(index.bloom().is_none());

    let back: Vec<&str> = words[..20].iter().map(String::as_str).collect();
    index.update(back).unwrap();
    assert!(matches!(index.layout(), Layout::WithInverted(_)));
    assert_eq!(
        index.search(&words[5], 1, &SearchOptions::default())[0].display,
        words[5]
    );
}
