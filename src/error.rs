//! Error taxonomy for building, mutating and loading an index.
//!
//! Unmatched queries are never errors. They produce an empty result list.

use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Invalid or contradictory configuration. Raised before anything is built.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Records given to a string index or the other way around.
    /// The index is left untouched.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Malformed, truncated or version-incompatible serialized index.
    #[error("corrupt index data: {0}")]
    CorruptData(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl From<io::Error> for IndexError {
    fn from(e: io::Error) -> Self {
        IndexError::CorruptData(e.to_string())
    }
}
