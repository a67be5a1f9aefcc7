//! Engine type and tuning constants.

use crate::analyzer::split_words;
use crate::concurrent::ShardedIndex;
use crate::index::api::is_valid_word;
use crate::intern::WordPool;
use rustc_hash::FxHashSet;
use sift_types::{DocId, DocumentStatus, SearchError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of hits returned by top-document queries.
pub const MAX_RESULT_COUNT: usize = 5;

/// Relevance deltas below this are ties, broken by rating and then id.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Shard count for the live inverted index.
pub(crate) const INDEX_SHARDS: usize = 8;

/// Shard count for the per-query relevance accumulator.
pub(crate) const ACCUMULATOR_SHARDS: usize = 10;

/// Per-document metadata, fixed at insertion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentEntry {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// In-memory TF-IDF ranked-retrieval engine.
///
/// The engine owns a dual index kept mutually consistent at the two
/// mutation sites (add, remove): an inverted index (word to per-document
/// term frequencies, sharded for independent locking) and a forward index
/// (document to its own word frequencies). The stop-word set is fixed at
/// construction.
pub struct Sift {
    pub(crate) stop_words: FxHashSet<String>,
    pub(crate) pool: WordPool,
    pub(crate) inverted: ShardedIndex,
    pub(crate) forward: BTreeMap<DocId, BTreeMap<Arc<str>, f64>>,
    pub(crate) documents: BTreeMap<DocId, DocumentEntry>,
}

impl Default for Sift {
    fn default() -> Self {
        Self::new()
    }
}

impl Sift {
    /// Creates an engine with an empty stop-word set.
    pub fn new() -> Self {
        Self {
            stop_words: FxHashSet::default(),
            pool: WordPool::new(),
            inverted: ShardedIndex::new(INDEX_SHARDS),
            forward: BTreeMap::new(),
            documents: BTreeMap::new(),
        }
    }

    /// Creates an engine with the given stop words.
    ///
    /// Empty entries are dropped; the rest are deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidStopWord`] if any stop word contains
    /// control characters below 0x20.
    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FxHashSet::default();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self {
            stop_words: set,
            ..Self::new()
        })
    }

    /// Creates an engine from a space-separated stop-word string.
    ///
    /// # Errors
    ///
    /// Same contract as [`Sift::with_stop_words`].
    pub fn with_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::with_stop_words(split_words(text))
    }
}
