//! Batch query fan-out over a shared engine.

use crate::index::Sift;
use rayon::prelude::*;
use sift_types::{Document, SearchError};

/// Runs every query against `engine` in parallel.
///
/// The output has one slot per input query, in input order; each slot is
/// the query's own result, so one malformed query does not poison the rest
/// of the batch.
pub fn process_queries<Q>(engine: &Sift, queries: &[Q]) -> Vec<Result<Vec<Document>, SearchError>>
where
    Q: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| engine.find_top_documents(query.as_ref()))
        .collect()
}

/// Like [`process_queries`], flattened into one hit list.
///
/// Hits keep batch order: all of query 0's hits, then query 1's, and so on.
///
/// # Errors
///
/// Returns the first malformed query's error, in input order.
pub fn process_queries_joined<Q>(
    engine: &Sift,
    queries: &[Q],
) -> Result<Vec<Document>, SearchError>
where
    Q: AsRef<str> + Sync,
{
    let mut joined = Vec::new();
    for result in process_queries(engine, queries) {
        joined.extend(result?);
    }
    Ok(joined)
}
