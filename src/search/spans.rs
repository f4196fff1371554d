// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Match spans for highlighting.
//!
//! Offsets are chars into the normalized matched value, end exclusive. The
//! renderer maps them back onto display text itself; nothing here produces
//! markup.

use crate::types::{MatchSpan, MatchType};
use crate::utils::{char_len, token_starts};

/// Span of `query` inside `normalized` for a match of `match_type`.
///
/// - exact: the whole value
/// - prefix: the leading chars, or the start of the word the query prefixes
/// - compound: where the part occurs in the value
/// - anything else: the whole value, since no substring matched literally
pub fn match_span(
    query: &str,
    normalized: &str,
    match_type: MatchType,
    field: Option<String>,
) -> MatchSpan {
    let query_len = char_len(query);
    let whole = (0, char_len(normalized));

    let (start, end) = match match_type {
        MatchType::Prefix => {
            if normalized.starts_with(query) {
                (0, query_len)
            } else {
                token_starts(normalized)
                    .into_iter()
                    .find(|(_, token)| token.starts_with(query))
                    .map(|(start, _)| (start, start + query_len))
                    .unwrap_or(whole)
            }
        }
        MatchType::Compound => normalized
            .find(query)
            .map(|byte| {
                let start = char_len(&normalized[..byte]);
                (start, start + query_len)
            })
            .unwrap_or(whole),
        _ => whole,
    };

    MatchSpan {
        field,
        start,
        end,
        match_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(query: &str, value: &str, kind: MatchType) -> (usize, usize) {
        let span = match_span(query, value, kind, None);
        (span.start, span.end)
    }

    #[test]
    fn prefix_spans() {
        assert_eq!(bounds("app", "apple", MatchType::Prefix), (0, 3));
        assert_eq!(bounds("yo", "new york", MatchType::Prefix), (4, 6));
    }

    #[test]
    fn compound_span_counts_chars() {
        assert_eq!(bounds("haus", "krankenhaus", MatchType::Compound), (7, 11));
        assert_eq!(bounds("strasse", "hauptstrasse", MatchType::Compound), (5, 12));
    }

    #[test]
    fn other_types_cover_everything() {
        assert_eq!(bounds("helo", "hello", MatchType::Fuzzy), (0, 5));
        assert_eq!(bounds("hello", "hello", MatchType::Exact), (0, 5));
    }

    #[test]
    fn field_is_carried() {
        let span = match_span("ber", "berlin", MatchType::Prefix, Some("city".into()));
        assert_eq!(span.field.as_deref(), Some("city"));
    }
}
