//! BM25 over corpus statistics.
//!
//! ```text
//! idf(t)     = max(ln((N - df + 0.5) / (df + 0.5) + 1), min_idf)
//! score(t,d) = idf(t) · tf · (k1 + 1) / (tf + k1 · (1 - b + b · |d| / avgdl))
//! ```
//!
//! The `+ 1` inside the log keeps IDF positive even for terms in more than
//! half the corpus.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Bm25Params;
use crate::types::Document;

/// Document count, average length and document frequencies.
///
/// Derived data: recomputed from scratch after every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    pub total_docs: u64,
    pub avg_doc_len: f64,
    /// Term -> number of documents containing it.
    pub doc_freq: BTreeMap<String, u64>,
}

impl CorpusStats {
    /// Collect statistics from each document's token list.
    pub fn from_documents<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (&'a Document, Vec<&'a str>)>,
    {
        let mut stats = CorpusStats::default();
        let mut total_len = 0u64;
        for (doc, tokens) in docs {
            stats.total_docs += 1;
            total_len += u64::from(doc.length);
            let distinct: BTreeSet<&str> = tokens.into_iter().collect();
            for term in distinct {
                *stats.doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        if stats.total_docs > 0 {
            stats.avg_doc_len = total_len as f64 / stats.total_docs as f64;
        }
        stats
    }

    pub fn doc_freq(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn idf(&self, term: &str, params: &Bm25Params) -> f64 {
        idf(self.total_docs, self.doc_freq(term), params.min_idf)
    }

    /// BM25 contribution of `term` appearing `tf` times in a document of `doc_len` tokens.
    pub fn term_score(&self, term: &str, tf: u32, doc_len: u32, params: &Bm25Params) -> f64 {
        if tf == 0 {
            return 0.0;
        }
        let idf = self.idf(term, params);
        let avg = if self.avg_doc_len > 0.0 {
            self.avg_doc_len
        } else {
            1.0
        };
        let tf = f64::from(tf);
        let norm = 1.0 - params.b + params.b * f64::from(doc_len) / avg;
        idf * tf * (params.k1 + 1.0) / (tf + params.k1 * norm)
    }
}

pub fn idf(total_docs: u64, doc_freq: u64, min_idf: f64) -> f64 {
    let n = total_docs as f64;
    let df = doc_freq.min(total_docs) as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln().max(min_idf)
}
