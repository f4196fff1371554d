//! Classic and inverted layouts agree on prefix queries at every tier.

use fuzzdex::{build_index, Config, PerformanceTier, PluginSet, SearchOptions};
use proptest::prelude::*;

fn tier() -> impl Strategy<Value = PerformanceTier> {
    prop_oneof![
        Just(PerformanceTier::Fast),
        Just(PerformanceTier::Balanced),
        Just(PerformanceTier::Comprehensive),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A prefix of an indexed word reaches that word with the same match type
    /// and score whichever layout serves it, including prefixes longer than
    /// the tier's prefix-variant cap.
    #[test]
    fn prop_prefix_matches_agree_across_layouts(
        words in prop::collection::vec("[a-z]{10,16}", 1..20),
        pick in any::<prop::sample::Index>(),
        cut in any::<prop::sample::Index>(),
        tier in tier(),
    ) {
        let word = pick.get(&words).clone();
        let len = word.chars().count();
        let prefix: String = word.chars().take(2 + cut.index(len - 1)).collect();

        let classic_config = Config::default().with_performance(tier);
        let inverted_config = classic_config.clone().with_inverted_index();
        let classic = build_index(words.iter(), classic_config, &PluginSet::builtin()).unwrap();
        let inverted = build_index(words.iter(), inverted_config, &PluginSet::builtin()).unwrap();
        prop_assert!(classic.inverted().is_none());
        prop_assert!(inverted.inverted().is_some());

        let options = SearchOptions::default();
        let a = classic.search_uncached(&prefix, 64, &options);
        let b = inverted.search_uncached(&prefix, 64, &options);
        let on_classic = a.iter().find(|r| r.display == word);
        let on_inverted = b.iter().find(|r| r.display == word);
        prop_assert!(on_classic.is_some(), "{} lost on classic for {}", word, prefix);
        prop_assert!(on_inverted.is_some(), "{} lost on inverted for {}", word, prefix);

        let (a, b) = (on_classic.unwrap(), on_inverted.unwrap());
        prop_assert_eq!(a.match_type, b.match_type);
        prop_assert!((a.score - b.score).abs() < 1e-9, "{} vs {}", a.score, b.score);
    }
}
