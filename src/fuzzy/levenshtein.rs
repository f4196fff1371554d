// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! The key insight: `|len(a) - len(b)|` is a lower bound on edit distance.
//! If two strings differ in length by more than the threshold, skip the O(nm) DP.
//! Inside the DP, once every cell of a row exceeds the bound the final distance
//! must too, so we stop there.
//!
//! Both bounded functions return `max_distance + 1` for "too far". That value is
//! a sentinel, not a distance: callers treat it as "no match".

use super::ngram::ngram_similarity;

/// N-gram size used by the cheap similarity pre-filter.
///
/// Bigrams rather than trigrams: short words with one typo share almost no
/// trigrams ("helo" / "hello" share one of four) but most of their bigrams.
pub const PREFILTER_NGRAM_SIZE: usize = 2;

/// How far below the fuzzy threshold the n-gram pre-filter still lets pairs through.
pub const PREFILTER_SLACK: f64 = 0.2;

/// Reusable scratch space for the DP distance functions.
///
/// Keep one per search (or per worker) and the rows, matrix and char buffers
/// get reused across every comparison instead of reallocated.
#[derive(Debug, Default, Clone)]
pub struct EditBuffers {
    a: Vec<char>,
    b: Vec<char>,
    prev: Vec<usize>,
    curr: Vec<usize>,
    matrix: Vec<usize>,
}

impl EditBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load both strings, longer one first so rows are as short as possible.
    fn load(&mut self, a: &str, b: &str) {
        self.a.clear();
        self.a.extend(a.chars());
        self.b.clear();
        self.b.extend(b.chars());
        if self.b.len() > self.a.len() {
            std::mem::swap(&mut self.a, &mut self.b);
        }
    }

    /// Bounded Levenshtein distance with two rolling rows.
    ///
    /// Returns the distance when it is `<= max_distance`, otherwise
    /// `max_distance + 1`.
    pub fn levenshtein(&mut self, a: &str, b: &str, max_distance: usize) -> usize {
        self.load(a, b);
        let too_far = max_distance.saturating_add(1);
        let (n, m) = (self.a.len(), self.b.len());

        // Early-exit: length difference is a lower bound on edit distance
        if n - m > max_distance {
            return too_far;
        }
        if m == 0 {
            return n;
        }

        self.prev.clear();
        self.prev.extend(0..=m);
        self.curr.clear();
        self.curr.resize(m + 1, 0);

        for i in 0..n {
            let ac = self.a[i];
            self.curr[0] = i + 1;
            let mut row_min = self.curr[0];

            for j in 0..m {
                let cost = usize::from(ac != self.b[j]);
                let value = (self.prev[j + 1] + 1)
                    .min(self.curr[j] + 1)
                    .min(self.prev[j] + cost);
                self.curr[j + 1] = value;
                row_min = row_min.min(value);
            }

            // Early-exit: if minimum in this row exceeds max, no point continuing
            if row_min > max_distance {
                return too_far;
            }
            std::mem::swap(&mut self.prev, &mut self.curr);
        }

        let distance = self.prev[m];
        if distance > max_distance {
            too_far
        } else {
            distance
        }
    }

    /// Damerau-Levenshtein (optimal string alignment) over a full matrix.
    ///
    /// Adjacent transpositions cost one edit. Same sentinel contract as
    /// [`EditBuffers::levenshtein`].
    pub fn damerau_levenshtein(&mut self, a: &str, b: &str, max_distance: usize) -> usize {
        self.load(a, b);
        let too_far = max_distance.saturating_add(1);
        let (n, m) = (self.a.len(), self.b.len());

        if n - m > max_distance {
            return too_far;
        }
        if m == 0 {
            return n;
        }

        let width = m + 1;
        self.matrix.clear();
        self.matrix.resize((n + 1) * width, 0);
        for i in 0..=n {
            self.matrix[i * width] = i;
        }
        for j in 0..=m {
            self.matrix[j] = j;
        }

        for i in 1..=n {
            for j in 1..=m {
                let cost = usize::from(self.a[i - 1] != self.b[j - 1]);
                let mut value = (self.matrix[(i - 1) * width + j] + 1)
                    .min(self.matrix[i * width + j - 1] + 1)
                    .min(self.matrix[(i - 1) * width + j - 1] + cost);
                if i > 1
                    && j > 1
                    && self.a[i - 1] == self.b[j - 2]
                    && self.a[i - 2] == self.b[j - 1]
                {
                    value = value.min(self.matrix[(i - 2) * width + j - 2] + 1);
                }
                self.matrix[i * width + j] = value;
            }
        }

        let distance = self.matrix[n * width + m];
        if distance > max_distance {
            too_far
        } else {
            distance
        }
    }

    /// Cheap rejections first, DP only for the survivors.
    ///
    /// 1. Length difference beyond `max_distance`
    /// 2. Bigram similarity below `threshold - 0.2`
    /// 3. Bounded DP (Damerau when `transpositions` is set)
    ///
    /// Returns the real distance for pairs within bounds.
    pub fn similar_distance(
        &mut self,
        a: &str,
        b: &str,
        threshold: f64,
        max_distance: usize,
        transpositions: bool,
    ) -> Option<usize> {
        if a == b {
            return Some(0);
        }
        let a_len = a.chars().count();
        let b_len = b.chars().count();
        if a_len.abs_diff(b_len) > max_distance {
            return None;
        }
        if ngram_similarity(a, b, PREFILTER_NGRAM_SIZE) < threshold - PREFILTER_SLACK {
            return None;
        }
        let distance = if transpositions {
            self.damerau_levenshtein(a, b, max_distance)
        } else {
            self.levenshtein(a, b, max_distance)
        };
        (distance <= max_distance).then_some(distance)
    }
}

/// Bounded Levenshtein distance; `max_distance + 1` means "too far".
pub fn levenshtein(a: &str, b: &str, max_distance: usize) -> usize {
    EditBuffers::new().levenshtein(a, b, max_distance)
}

/// Bounded Damerau-Levenshtein distance; `max_distance + 1` means "too far".
pub fn damerau_levenshtein(a: &str, b: &str, max_distance: usize) -> usize {
    EditBuffers::new().damerau_levenshtein(a, b, max_distance)
}

/// Are these strings within `max` edits of each other?
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    levenshtein(a, b, max) <= max
}

/// Pre-filtered similarity check. See [`EditBuffers::similar_distance`].
pub fn are_strings_similar(a: &str, b: &str, threshold: f64, max_distance: usize) -> bool {
    EditBuffers::new()
        .similar_distance(a, b, threshold, max_distance, false)
        .is_some()
}

/// Map an edit distance onto [0, 1]. Non-increasing in `distance`.
pub fn distance_to_similarity(distance: usize, max_len: usize) -> f64 {
    if max_len == 0 {
        return if distance == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(levenshtein("hello", "hello", 0), 0);
        assert!(levenshtein_within("hello", "hello", 0));
    }

    #[test]
    fn test_one_edit() {
        assert_eq!(levenshtein("hello", "hallo", 2), 1);
        assert_eq!(levenshtein("hello", "hell", 2), 1);
        assert_eq!(levenshtein("hello", "helloo", 2), 1);
    }

    #[test]
    fn test_sentinel_when_too_far() {
        // Length difference is 5, so distance must be >= 5
        assert_eq!(levenshtein("a", "abcdef", 1), 2);
        // Same length but every char differs: the row minimum trips early
        assert_eq!(levenshtein("abcd", "wxyz", 2), 3);
    }

    #[test]
    fn test_unbounded_max_does_not_overflow() {
        assert_eq!(levenshtein("kitten", "sitting", usize::MAX), 3);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(levenshtein("", "", 0), 0);
        assert_eq!(levenshtein("", "ab", 2), 2);
        assert_eq!(levenshtein("abc", "", 2), 3);
    }

    #[test]
    fn test_unicode_diacritics() {
        assert!(levenshtein_within("cafe", "café", 1));
        assert!(levenshtein_within("muller", "müller", 1));
    }

    #[test]
    fn test_transposition_costs_one() {
        assert_eq!(levenshtein("form", "from", 3), 2);
        assert_eq!(damerau_levenshtein("form", "from", 3), 1);
        assert_eq!(damerau_levenshtein("ca", "abc", 3), 3);
    }

    #[test]
    fn test_buffers_are_reusable() {
        let mut buffers = EditBuffers::new();
        assert_eq!(buffers.levenshtein("kitten", "sitting", 3), 3);
        assert_eq!(buffers.levenshtein("ab", "ab", 1), 0);
        assert_eq!(buffers.damerau_levenshtein("abcdef", "abdcef", 2), 1);
        assert_eq!(buffers.levenshtein("flaw", "lawn", 2), 2);
    }

    #[test]
    fn test_prefilter_rejects_length_delta() {
        assert!(!are_strings_similar("hi", "hippopotamus", 0.6, 2));
    }

    #[test]
    fn test_prefilter_keeps_single_typos() {
        assert!(are_strings_similar("helo", "hello", 0.6, 2));
        assert!(are_strings_similar("krankenhaus", "krankenhuas", 0.6, 2));
    }

    #[test]
    fn test_similarity_is_monotone() {
        let mut last = f64::INFINITY;
        for d in 0..8 {
            let s = distance_to_similarity(d, 6);
            assert!(s <= last);
            assert!((0.0..=1.0).contains(&s));
            last = s;
        }
        assert_eq!(distance_to_similarity(0, 0), 1.0);
    }
}
