// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of an index and of its search results.
//!
//! # Invariants
//!
//! - **DocId**: dense, assigned in insertion order. After a removal the
//!   survivors are renumbered so ids stay dense.
//! - **Document**: owned by the index. Everything else refers to it by id.
//! - **SuggestionResult**: `score` is always within [0, 1]; an exact match
//!   scores exactly 1.0.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::fold_case;

/// Type-safe document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A multi-field record: field name to value.
pub type Record = BTreeMap<String, String>;

/// One unit of input: a plain string or a record projected through `Config::fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Text(String),
    Record(Record),
}

impl Item {
    pub fn is_record(&self) -> bool {
        matches!(self, Item::Record(_))
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_string())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

impl From<&String> for Item {
    fn from(text: &String) -> Self {
        Item::Text(text.clone())
    }
}

impl From<Record> for Item {
    fn from(record: Record) -> Self {
        Item::Record(record)
    }
}

/// What kind of items an index holds. Derived from `Config::fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Strings,
    Records { fields: Vec<String> },
}

impl Schema {
    pub fn from_fields(fields: &[String]) -> Self {
        if fields.is_empty() {
            Schema::Strings
        } else {
            Schema::Records {
                fields: fields.to_vec(),
            }
        }
    }

    pub fn is_records(&self) -> bool {
        matches!(self, Schema::Records { .. })
    }
}

/// One indexed unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    /// Original text shown to the user (primary field value for records).
    pub display: String,
    pub normalized: String,
    pub language: Option<String>,
    pub phonetic: Option<String>,
    pub compound_parts: Vec<String>,
    /// Length in tokens across every indexed value, used by BM25.
    pub length: u32,
    /// Record values for the configured fields. `None` for string items.
    pub fields: Option<Record>,
    /// Base-word keys owned by this document, one per indexed value.
    pub bases: Vec<String>,
}

impl Document {
    /// Case-insensitive identity used for deduplication and removal.
    pub fn identity(&self, fields: &[String]) -> String {
        match &self.fields {
            None => fold_case(&self.display),
            Some(record) => record_identity(record, fields),
        }
    }
}

/// Dedup key of a record: its configured field values, lowercased.
pub fn record_identity(record: &Record, fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| record.get(f).map(|v| fold_case(v)).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

/// Which strategy produced a match.
///
/// Declaration order doubles as precedence when two strategies give the
/// same score for the same word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Prefix,
    Variant,
    Compound,
    Fuzzy,
    Ngram,
    Phonetic,
    Synonym,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Prefix => "prefix",
            MatchType::Variant => "variant",
            MatchType::Compound => "compound",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Ngram => "ngram",
            MatchType::Phonetic => "phonetic",
            MatchType::Synonym => "synonym",
        }
    }
}

/// Transient match record produced while answering one query. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Base-word key (lowercased display form).
    pub base_word: String,
    /// The key that matched: a variant, phonetic code, n-gram source or synonym.
    pub variant: String,
    pub match_type: MatchType,
    pub score: f64,
    /// Real edit distance, only set when one was computed and within bounds.
    pub edit_distance: Option<usize>,
    pub language: Option<String>,
}

/// Highlight metadata: which characters of which value matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Record field the span belongs to, `None` for string items.
    pub field: Option<String>,
    /// Char offsets into the normalized matched value, end exclusive.
    pub start: usize,
    pub end: usize,
    pub match_type: MatchType,
}

/// Final ranked output of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub display: String,
    pub base_word: String,
    /// Confidence in [0, 1]. Exactly 1.0 for exact matches.
    pub score: f64,
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_distance: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<MatchSpan>,
}
