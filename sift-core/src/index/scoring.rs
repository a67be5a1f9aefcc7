//! Relevance scoring and result ordering.

use crate::index::types::{Sift, RELEVANCE_EPSILON};
use sift_types::Document;
use std::cmp::Ordering;

impl Sift {
    /// Natural log of (live documents / documents containing the word).
    ///
    /// `containing` is the bucket size of a word present in the index, so
    /// it is never zero.
    #[inline(always)]
    pub(crate) fn inverse_document_freq(&self, containing: usize) -> f64 {
        (self.document_count() as f64 / containing as f64).ln()
    }
}

/// Relevance descending; near-ties (|delta| < [`RELEVANCE_EPSILON`]) fall
/// back to rating descending, then ascending id, so equal-score equal-rating
/// runs order deterministically.
pub(crate) fn rank_order(a: &Document, b: &Document) -> Ordering {
    if (a.relevance - b.relevance).abs() < RELEVANCE_EPSILON {
        b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id))
    } else {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(Ordering::Equal)
    }
}
