//! Posting lists: ordering and set algebra.

use std::collections::BTreeSet;

use fuzzdex::{build_index, Config, DocId, PluginSet, PostingList};
use proptest::prelude::*;

fn ids() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..200, 0..60)
}

fn list(values: &[u32]) -> PostingList {
    PostingList::from_unsorted(values.iter().copied().map(DocId).collect())
}

fn set(values: &[u32]) -> BTreeSet<u32> {
    values.iter().copied().collect()
}

fn raw(list: &PostingList) -> Vec<u32> {
    list.iter().map(DocId::get).collect()
}

fn strictly_ascending(list: &PostingList) -> bool {
    list.as_slice().windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_set_algebra_matches_btreeset(a in ids(), b in ids()) {
        let (la, lb) = (list(&a), list(&b));
        let (sa, sb) = (set(&a), set(&b));

        let union = la.union(&lb);
        let inter = la.intersect(&lb);
        let diff = la.difference(&lb);
        prop_assert_eq!(raw(&union), sa.union(&sb).copied().collect::<Vec<_>>());
        prop_assert_eq!(raw(&inter), sa.intersection(&sb).copied().collect::<Vec<_>>());
        prop_assert_eq!(raw(&diff), sa.difference(&sb).copied().collect::<Vec<_>>());
        prop_assert!(strictly_ascending(&union));
        prop_assert!(strictly_ascending(&inter));
        prop_assert!(strictly_ascending(&diff));
    }

    #[test]
    fn prop_insert_keeps_order(values in ids()) {
        let mut list = PostingList::new();
        for v in &values {
            list.insert(DocId(*v));
        }
        prop_assert!(strictly_ascending(&list));
        prop_assert_eq!(raw(&list), set(&values).into_iter().collect::<Vec<_>>());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every posting list in a built index is ascending, duplicate-free and
    /// only names real documents.
    #[test]
    fn prop_index_postings_well_formed(words in prop::collection::vec("[a-z]{2,7}( [a-z]{2,6})?", 1..40)) {
        let config = Config::default().with_inverted_index();
        let index = build_index(words.iter(), config, &PluginSet::builtin()).unwrap();
        let inverted = index.inverted().unwrap();
        for (name, map) in inverted.maps() {
            for (key, postings) in map {
                prop_assert!(!postings.is_empty(), "{} {:?} is empty", name, key);
                prop_assert!(strictly_ascending(postings), "{} {:?} unsorted", name, key);
                prop_assert!(postings.iter().all(|d| d.as_usize() < index.len()));
            }
        }
        for doc in index.documents() {
            prop_assert!(inverted.term(&doc.normalized).is_some_and(|l| l.contains(doc.id)));
        }
    }
}
