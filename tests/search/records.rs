//! Multi-field record indexes.

use crate::common::record;
use fuzzdex::{build_index, Config, Index, IndexError, MatchType, PluginSet, SearchOptions};

fn people() -> Index {
    build_index(
        [
            record(&[("name", "Anna"), ("city", "Hamburg")]),
            record(&[("name", "Bernd"), ("city", "Bremen")]),
            record(&[("name", "Berlin Bar"), ("city", "Berlin")]),
        ],
        Config::default().with_fields(["name", "city"]),
        &PluginSet::builtin(),
    )
    .unwrap()
}

#[test]
fn records_need_a_field_list() {
    let err = build_index(
        [record(&[("name", "Anna")])],
        Config::default(),
        &PluginSet::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::Config(_)));

    let err = build_index(
        ["Anna"],
        Config::default().with_fields(["name"]),
        &PluginSet::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::Config(_)));
}

#[test]
fn secondary_field_match_returns_the_record() {
    let index = people();
    let results = index.search("hamburg", 5, &SearchOptions::default().with_spans());
    assert_eq!(results[0].display, "Anna");
    assert_eq!(results[0].match_type, MatchType::Exact);
    assert_eq!(results[0].score, 1.0);

    let fields = results[0].fields.as_ref().unwrap();
    assert_eq!(fields.get("city").map(String::as_str), Some("Hamburg"));
    let span = &results[0].spans[0];
    assert_eq!(span.field.as_deref(), Some("city"));
    assert_eq!((span.start, span.end), (0, 7));
}

#[test]
fn one_result_per_record() {
    let index = people();
    let results = index.search("berlin", 5, &SearchOptions::default().with_spans());
    let bar: Vec<_> = results.iter().filter(|r| r.display == "Berlin Bar").collect();
    assert_eq!(bar.len(), 1);
    assert_eq!(bar[0].match_type, MatchType::Exact);
    assert_eq!(bar[0].spans[0].field.as_deref(), Some("city"));
}

#[test]
fn records_deduplicate_on_field_values() {
    let index = build_index(
        [
            record(&[("name", "Anna"), ("city", "Berlin")]),
            record(&[("name", "ANNA"), ("city", "berlin"), ("note", "ignored")]),
            record(&[("name", "Anna"), ("city", "Bonn")]),
        ],
        Config::default().with_fields(["name", "city"]),
        &PluginSet::builtin(),
    )
    .unwrap();
    assert_eq!(index.len(), 2);
}

#[test]
fn record_mutation_round() {
    let mut index = people();
    index
        .update([record(&[("name", "Clara"), ("city", "Cottbus")])])
        .unwrap();
    assert_eq!(index.search("cottbus", 3, &SearchOptions::default())[0].display, "Clara");

    let err = index.update(["Dora"]).unwrap_err();
    assert!(matches!(err, IndexError::SchemaMismatch(_)));

    let removed = index
        .remove([record(&[("name", "clara"), ("city", "COTTBUS")])])
        .unwrap();
    assert_eq!(removed, 1);
    assert!(index
        .search("cottbus", 3, &SearchOptions::default())
        .iter()
        .all(|r| r.display != "Clara"));
}
