//! Duplicate detection over the forward index.

use crate::index::Sift;
use sift_types::ExecutionPolicy;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Removes every document whose distinct-word set repeats an earlier one.
///
/// Two documents are duplicates when they index the same set of words;
/// frequencies, order and ratings are ignored. Scanning runs in ascending
/// id order, so the lowest id of each group survives.
pub fn remove_duplicates(engine: &mut Sift) {
    let ids: Vec<_> = engine.document_ids().collect();

    let mut seen: BTreeSet<Vec<Arc<str>>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        let Ok(freqs) = engine.word_frequencies(id) else {
            continue;
        };
        let words: Vec<Arc<str>> = freqs.keys().cloned().collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }

    for id in duplicates {
        info!(id, "removing duplicate document");
        engine.remove_document(ExecutionPolicy::Sequential, id);
    }
}
