//! Core types for the sift ranked-retrieval engine.
//!
//! This crate provides the fundamental types shared across the sift
//! ecosystem. Keeping types separate ensures:
//!
//! - **Cross-crate compatibility**: the engine and any host program share
//!   the same vocabulary
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;

/// Unique document identifier.
///
/// Ids are caller-assigned. They must be non-negative and unique across
/// the store; the engine rejects violations with
/// [`SearchError::InvalidDocumentId`] or
/// [`SearchError::DuplicateDocumentId`].
pub type DocId = i32;

/// Lifecycle status attached to a document when it is added.
///
/// The status never changes afterward; documents are immutable apart from
/// whole-document removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    /// Live content, matched by default searches.
    Active,
    /// Indexed but excluded from default searches.
    Irrelevant,
    /// Moderated out of default searches.
    Banned,
    /// Scheduled for deletion.
    Removed,
}

/// A ranked search hit: document id, TF-IDF relevance and stored rating.
///
/// Result lists are ordered by relevance (descending); near-ties are broken
/// by rating (descending), then by id (ascending).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Document {
    /// Document identifier.
    pub id: DocId,
    /// Accumulated TF-IDF relevance for the query.
    pub relevance: f64,
    /// Rating computed at insertion from the caller's rating list.
    pub rating: i32,
}

impl Document {
    /// Creates a new search hit.
    #[inline(always)]
    pub const fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self {
            id,
            relevance,
            rating,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "doc={} relevance={:.6} rating={}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Execution mode for query and removal operations.
///
/// Both modes produce identical results for identical inputs; the parallel
/// mode fans independent per-term work out over a worker pool and joins
/// before returning, so callers see either mode as a plain blocking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Single-threaded, no internal parallelism.
    #[default]
    Sequential,
    /// Data-parallel over independent terms or documents.
    Parallel,
}

/// Errors surfaced for malformed caller input.
///
/// Every variant is detected synchronously before any index mutation; a
/// failed operation leaves the engine unchanged. Lookups on absent but
/// validly shaped ids are not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A negative document id was passed to any operation.
    #[error("invalid document id: {0}")]
    InvalidDocumentId(DocId),
    /// The id is already present in the store.
    #[error("duplicate document id: {0}")]
    DuplicateDocumentId(DocId),
    /// A document word contains control characters below 0x20.
    #[error("word {0:?} contains control characters")]
    InvalidWord(String),
    /// A stop word failed the control-character check at construction.
    #[error("stop word {0:?} contains control characters")]
    InvalidStopWord(String),
    /// A query term is empty, a bare or doubled minus, or contains control
    /// characters.
    #[error("query word {0:?} is malformed")]
    MalformedQueryWord(String),
}
