//! Bloom filter: no false negatives, bounded false positives.

use fuzzdex::index::BloomFilter;
use fuzzdex::testing::generated_corpus;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_false_negatives(terms in prop::collection::vec("[a-z0-9 ]{1,12}", 1..300), rate in 0.001f64..0.2) {
        let filter = BloomFilter::from_terms(terms.iter().map(String::as_str), terms.len(), rate);
        for term in &terms {
            prop_assert!(filter.might_contain(term), "lost {:?}", term);
        }
    }
}

#[test]
fn false_positive_rate_near_configured() {
    let terms = generated_corpus(10_000, 0);
    let filter = BloomFilter::from_terms(terms.iter().map(String::as_str), terms.len(), 0.01);

    let lookups = 20_000;
    let false_positives = (0..lookups)
        .filter(|i| filter.might_contain(&format!("absent-{}", i)))
        .count();
    let observed = false_positives as f64 / lookups as f64;
    assert!(observed < 0.03, "observed false-positive rate {}", observed);
    assert!(filter.estimated_fp_rate() < 0.02);
}
