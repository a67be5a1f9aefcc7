//! Document lifecycle: insertion, removal and lookups.

use crate::analyzer::split_words;
use crate::index::types::{DocumentEntry, Sift};
use rayon::prelude::*;
use sift_types::{DocId, DocumentStatus, ExecutionPolicy, SearchError};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A word is valid when it contains no control characters below space.
#[inline]
pub(crate) fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    ratings.iter().sum::<i32>() / ratings.len() as i32
}

impl Sift {
    /// Adds a document under `id`.
    ///
    /// The text is split into words, stop words are dropped, and every
    /// remaining word contributes `1 / total_words` of term frequency to
    /// both indices. The rating is the truncating integer average of
    /// `ratings` (0 for an empty list).
    ///
    /// # Errors
    ///
    /// Returns an error for a negative id, an id already present, or a word
    /// containing control characters. Validation completes before the first
    /// index write, so a failed call leaves the engine unchanged.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if id < 0 {
            return Err(SearchError::InvalidDocumentId(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateDocumentId(id));
        }
        let words = self.split_into_words_no_stop(text)?;

        let rating = average_rating(ratings);
        let inv_count = 1.0 / words.len() as f64;

        let mut freqs: BTreeMap<Arc<str>, f64> = BTreeMap::new();
        for &word in &words {
            let word = self.pool.intern(word);
            self.inverted.accumulate(&word, id, inv_count);
            *freqs.entry(word).or_insert(0.0) += inv_count;
        }
        self.forward.insert(id, freqs);
        self.documents.insert(id, DocumentEntry { rating, status });
        debug!(id, words = words.len(), "document added");
        Ok(())
    }

    /// Removes document `id` from both indices and the store.
    ///
    /// Under [`ExecutionPolicy::Parallel`] the per-word bucket erasure fans
    /// out over a worker pool; each bucket mutation takes the write lock of
    /// the owning index shard.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present. Callers are expected to check
    /// membership, e.g. via [`Sift::document_ids`].
    pub fn remove_document(&mut self, policy: ExecutionPolicy, id: DocId) {
        let freqs = self
            .forward
            .remove(&id)
            .unwrap_or_else(|| panic!("removal of unknown document id {id}"));
        let words: Vec<Arc<str>> = freqs.into_keys().collect();

        match policy {
            ExecutionPolicy::Sequential => {
                for word in &words {
                    self.inverted.remove_doc_mut(word, id);
                }
            }
            ExecutionPolicy::Parallel => {
                let inverted = &self.inverted;
                words.par_iter().for_each(|word| inverted.remove_doc(word, id));
            }
        }

        self.documents.remove(&id);
        let word_count = words.len();
        for word in words {
            self.pool.release(word);
        }
        debug!(id, words = word_count, "document removed");
    }

    /// Term frequencies recorded for `id`, or an empty map when the id is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidDocumentId`] for a negative id;
    /// absence of a valid id is not an error.
    pub fn word_frequencies(&self, id: DocId) -> Result<&BTreeMap<Arc<str>, f64>, SearchError> {
        static EMPTY: BTreeMap<Arc<str>, f64> = BTreeMap::new();
        if id < 0 {
            return Err(SearchError::InvalidDocumentId(id));
        }
        Ok(self.forward.get(&id).unwrap_or(&EMPTY))
    }

    /// Number of live documents.
    #[inline(always)]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.keys().copied()
    }

    #[inline(always)]
    pub(crate) fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Splits `text` into validated words with stop words removed.
    pub(crate) fn split_into_words_no_stop<'t>(
        &self,
        text: &'t str,
    ) -> Result<SmallVec<[&'t str; 32]>, SearchError> {
        let mut words = SmallVec::new();
        for word in split_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.is_stop_word(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}
