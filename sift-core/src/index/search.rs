//! Query execution: ranking, top-K selection and per-document matching.

use crate::concurrent::ShardedAccumulator;
use crate::index::query::Query;
use crate::index::scoring::rank_order;
use crate::index::types::{Sift, ACCUMULATOR_SHARDS, MAX_RESULT_COUNT};
use rayon::prelude::*;
use sift_types::{DocId, Document, DocumentStatus, ExecutionPolicy, SearchError};
use std::collections::BTreeMap;

impl Sift {
    /// Top documents for `raw_query`: sequential mode, Active status only.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed query.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_by_status(
            ExecutionPolicy::Sequential,
            raw_query,
            DocumentStatus::Active,
        )
    }

    /// Top documents whose status equals `status`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed query.
    pub fn find_top_documents_by_status(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with(policy, raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents accepted by `predicate`, which sees each candidate's
    /// id, status and rating during plus-term accumulation.
    ///
    /// Results are sorted by relevance descending; ties within
    /// [`crate::RELEVANCE_EPSILON`] are broken by rating descending, then
    /// ascending id. At most [`MAX_RESULT_COUNT`] hits are returned.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed query.
    pub fn find_top_documents_with<F>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>, SearchError>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(policy, &query, &predicate);
        matched.sort_by(rank_order);
        matched.truncate(MAX_RESULT_COUNT);
        Ok(matched)
    }

    /// Scores every candidate document for `query`.
    ///
    /// Plus-term contributions accumulate first, gated by the predicate;
    /// minus-term exclusion runs after all plus work and is unconditional.
    /// Both execution modes yield the same set, ascending by id.
    fn find_all_documents<F>(
        &self,
        policy: ExecutionPolicy,
        query: &Query<'_>,
        predicate: &F,
    ) -> Vec<Document>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance = match policy {
            ExecutionPolicy::Sequential => self.accumulate_relevance(query, predicate),
            ExecutionPolicy::Parallel => self.accumulate_relevance_parallel(query, predicate),
        };
        relevance
            .into_iter()
            .map(|(id, relevance)| Document::new(id, relevance, self.documents[&id].rating))
            .collect()
    }

    fn accumulate_relevance<F>(&self, query: &Query<'_>, predicate: &F) -> BTreeMap<DocId, f64>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance = BTreeMap::new();
        for &word in &query.plus_words {
            self.inverted.with_bucket(word, |bucket| {
                let Some(bucket) = bucket else { return };
                let idf = self.inverse_document_freq(bucket.len());
                for (&id, &tf) in bucket {
                    let entry = &self.documents[&id];
                    if predicate(id, entry.status, entry.rating) {
                        *relevance.entry(id).or_insert(0.0) += tf * idf;
                    }
                }
            });
        }
        for &word in &query.minus_words {
            self.inverted.with_bucket(word, |bucket| {
                let Some(bucket) = bucket else { return };
                for id in bucket.keys() {
                    relevance.remove(id);
                }
            });
        }
        relevance
    }

    fn accumulate_relevance_parallel<F>(
        &self,
        query: &Query<'_>,
        predicate: &F,
    ) -> BTreeMap<DocId, f64>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator = ShardedAccumulator::new(ACCUMULATOR_SHARDS);
        query.plus_words.par_iter().for_each(|&word| {
            self.inverted.with_bucket(word, |bucket| {
                let Some(bucket) = bucket else { return };
                let idf = self.inverse_document_freq(bucket.len());
                for (&id, &tf) in bucket {
                    let entry = &self.documents[&id];
                    if predicate(id, entry.status, entry.rating) {
                        accumulator.add(id, tf * idf);
                    }
                }
            });
        });
        // The plus fan-out joins before the first erase runs, so every
        // contribution is visible when exclusion starts.
        query.minus_words.par_iter().for_each(|&word| {
            self.inverted.with_bucket(word, |bucket| {
                let Some(bucket) = bucket else { return };
                for id in bucket.keys() {
                    accumulator.erase(id);
                }
            });
        });
        accumulator.into_map()
    }

    /// Reports which plus-terms of `raw_query` occur in document `id`,
    /// paired with the document's status.
    ///
    /// If any minus-term occurs in the document the word list is empty and
    /// plus-terms are not inspected. Otherwise the list is sorted and
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative id or a malformed query.
    ///
    /// # Panics
    ///
    /// Panics if `id` is non-negative but not present.
    pub fn match_document(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        if id < 0 {
            return Err(SearchError::InvalidDocumentId(id));
        }
        match policy {
            ExecutionPolicy::Sequential => self.match_document_sequential(raw_query, id),
            ExecutionPolicy::Parallel => self.match_document_parallel(raw_query, id),
        }
    }

    fn match_document_sequential(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        let query = self.parse_query(raw_query)?;
        let status = self.documents[&id].status;

        for &word in &query.minus_words {
            if self.inverted.contains(word, id) {
                return Ok((Vec::new(), status));
            }
        }

        // Plus words come from an ordered set, so the output is already
        // sorted and deduplicated.
        let mut matched = Vec::new();
        for &word in &query.plus_words {
            if self.inverted.contains(word, id) {
                matched.push(word.to_string());
            }
        }
        Ok((matched, status))
    }

    fn match_document_parallel(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        let query = self.parse_query_unsorted(raw_query)?;
        let status = self.documents[&id].status;

        if query
            .minus_words
            .par_iter()
            .any(|&word| self.inverted.contains(word, id))
        {
            return Ok((Vec::new(), status));
        }

        let mut matched: Vec<String> = query
            .plus_words
            .par_iter()
            .filter(|&&word| self.inverted.contains(word, id))
            .map(|&word| word.to_string())
            .collect();
        matched.sort_unstable();
        matched.dedup();
        Ok((matched, status))
    }
}
