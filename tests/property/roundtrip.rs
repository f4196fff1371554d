//! Serialization keeps search behavior, and no-op removal keeps bytes.

use fuzzdex::{build_index, deserialize, serialize, Config, PerformanceTier, PluginSet, SearchOptions};
use proptest::prelude::*;

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{2,8}( [a-z]{3,6})?", 1..40)
}

fn config() -> impl Strategy<Value = Config> {
    (any::<bool>(), any::<bool>(), 0usize..3).prop_map(|(inverted, bm25, tier)| {
        let mut config = Config::default();
        config.use_inverted_index = inverted;
        config.use_bm25 = bm25;
        config.performance = [
            PerformanceTier::Fast,
            PerformanceTier::Balanced,
            PerformanceTier::Comprehensive,
        ][tier];
        config
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_roundtrip_preserves_search(
        words in corpus(),
        config in config(),
        queries in prop::collection::vec("[a-z]{2,6}", 1..8),
    ) {
        let index = build_index(words.iter(), config, &PluginSet::builtin()).unwrap();
        let bytes = serialize(&index).unwrap();
        let restored = deserialize(&bytes).unwrap();
        prop_assert_eq!(serialize(&restored).unwrap(), bytes);

        let options = SearchOptions::default();
        for q in queries.iter().chain(words.iter().take(3)) {
            prop_assert_eq!(
                index.search_uncached(q, 10, &options),
                restored.search_uncached(q, 10, &options),
                "query {:?}", q
            );
        }
    }

    #[test]
    fn prop_removing_absent_items_changes_nothing(words in corpus(), absent in "[0-9]{3,6}") {
        let mut index = build_index(words.iter(), Config::default(), &PluginSet::builtin()).unwrap();
        let before = serialize(&index).unwrap();
        prop_assert_eq!(index.remove([absent.as_str()]).unwrap(), 0);
        prop_assert_eq!(serialize(&index).unwrap(), before);
    }

    #[test]
    fn prop_truncation_never_panics(words in corpus(), cut in any::<prop::sample::Index>()) {
        let index = build_index(words.iter(), Config::default(), &PluginSet::builtin()).unwrap();
        let bytes = serialize(&index).unwrap();
        let len = cut.index(bytes.len());
        prop_assert!(deserialize(&bytes[..len]).is_err());
    }
}
