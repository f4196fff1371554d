//! Bloom filter for fast "definitely absent" term checks.
//!
//! A hand-rolled filter: `k` independently seeded hashes over a `u64` bit
//! array.
//!
//! - False positives possible (says "maybe" when a term is absent)
//! - False negatives impossible (never says "absent" when a term is present)
//! - O(k) lookup regardless of set size
//!
//! The hash is FNV-1a with a splitmix64 finish, written over little-endian
//! bytes, so a filter built from the same terms has the same bits on every
//! platform. Serialized filters depend on that.

use std::hash::Hasher;

/// Probabilistic membership set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
    items: u64,
}

impl BloomFilter {
    /// Create a filter for `expected_items` terms with target `fp_rate`.
    pub fn new(expected_items: usize, fp_rate: f64) -> Self {
        let expected_items = expected_items.max(1) as f64;
        let fp_rate = fp_rate.clamp(1e-10, 0.5);
        let ln2 = std::f64::consts::LN_2;

        // Optimal number of bits: m = -n * ln(p) / (ln(2))^2
        let num_bits = (-expected_items * fp_rate.ln() / ln2.powi(2)).ceil() as u64;
        let num_bits = num_bits.max(64);

        // Optimal number of hashes: k = (m/n) * ln(2)
        let num_hashes = ((num_bits as f64 / expected_items) * ln2).ceil() as u32;
        let num_hashes = num_hashes.clamp(1, 30);

        BloomFilter {
            bits: vec![0u64; num_bits.div_ceil(64) as usize],
            num_bits,
            num_hashes,
            items: 0,
        }
    }

    /// Build a filter holding every term of `terms`.
    pub fn from_terms<'a, I>(terms: I, expected_items: usize, fp_rate: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut filter = Self::new(expected_items, fp_rate);
        for term in terms {
            filter.insert(term);
        }
        filter
    }

    /// Reassemble a filter from its serialized parts.
    ///
    /// Returns `None` when the word count does not cover `num_bits`.
    pub fn from_parts(bits: Vec<u64>, num_bits: u64, num_hashes: u32, items: u64) -> Option<Self> {
        if num_bits == 0 || num_hashes == 0 || bits.len() as u64 != num_bits.div_ceil(64) {
            return None;
        }
        Some(Self {
            bits,
            num_bits,
            num_hashes,
            items,
        })
    }

    pub fn insert(&mut self, term: &str) {
        for seed in 0..self.num_hashes {
            let bit = self.bit_index(term, seed);
            self.bits[(bit / 64) as usize] |= 1u64 << (bit % 64);
        }
        self.items += 1;
    }

    /// `false` if the term is definitely absent, `true` if it might be present.
    pub fn might_contain(&self, term: &str) -> bool {
        (0..self.num_hashes).all(|seed| {
            let bit = self.bit_index(term, seed);
            self.bits[(bit / 64) as usize] & (1u64 << (bit % 64)) != 0
        })
    }

    /// Expected false-positive rate given how many items went in.
    pub fn estimated_fp_rate(&self) -> f64 {
        let k = f64::from(self.num_hashes);
        let m = self.num_bits as f64;
        let n = self.items as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    pub fn bits(&self) -> &[u64] {
        &self.bits
    }

    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub fn items(&self) -> u64 {
        self.items
    }

    /// Approximate memory usage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.bits.len() * 8
    }

    fn bit_index(&self, term: &str, seed: u32) -> u64 {
        let mut hasher = StableHasher::default();
        hasher.write(&seed.to_le_bytes());
        hasher.write(term.as_bytes());
        hasher.finish() % self.num_bits
    }
}

/// FNV-1a over the written bytes, finished with splitmix64.
struct StableHasher(u64);

impl Default for StableHasher {
    fn default() -> Self {
        StableHasher(0xcbf2_9ce4_8422_2325)
    }
}

impl Hasher for StableHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = (self.0 ^ u64::from(*byte)).wrapping_mul(0x0000_0100_0000_01b3);
        }
    }

    fn finish(&self) -> u64 {
        let mut x = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }
}
