//! Utility functions for string processing.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: lowercase, strip diacritics, and collapse whitespace.
///
/// This enables fuzzy matching between ASCII and accented versions:
/// - "café" → "cafe"
/// - "naïve" → "naive"
/// - "Zürich" → "zurich"
///
/// # Algorithm
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks
/// 3. Lowercase
/// 4. Collapse whitespace
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and collapse whitespace, keeping diacritics.
pub fn fold_case(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Length in Unicode scalar values. Every length in scoring is counted this way.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Character offset of every token start in `normalized`.
pub fn token_starts(normalized: &str) -> Vec<(usize, &str)> {
    let mut starts = Vec::new();
    let mut offset = 0;
    let mut in_token = false;
    let mut token_byte = 0;
    let mut token_char = 0;
    for (byte, c) in normalized.char_indices() {
        if c.is_whitespace() {
            if in_token {
                starts.push((token_char, &normalized[token_byte..byte]));
                in_token = false;
            }
        } else if !in_token {
            in_token = true;
            token_byte = byte;
            token_char = offset;
        }
        offset += 1;
    }
    if in_token {
        starts.push((token_char, &normalized[token_byte..]));
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_diacritics_and_case() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("  Zürich   Hauptbahnhof "), "zurich hauptbahnhof");
        assert_eq!(normalize("NAÏVE"), "naive");
    }

    #[test]
    fn fold_case_keeps_accents() {
        assert_eq!(fold_case("Café  Noir"), "café noir");
    }

    #[test]
    fn token_starts_counts_chars() {
        let starts = token_starts("über alles ok");
        assert_eq!(starts, vec![(0, "über"), (5, "alles"), (11, "ok")]);
    }
}
