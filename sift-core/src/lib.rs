//! In-memory document indexing and TF-IDF ranked retrieval.
//!
//! Callers add text documents with metadata (status, ratings), then issue
//! free-text queries with optional minus-terms and receive the top documents
//! ranked by TF-IDF relevance. Documents are immutable once added; only
//! whole-document removal is supported.
//!
//! Threading:
//! - Every `&self` operation on [`Sift`] is safe to call from many threads.
//! - `&mut self` operations (add, remove) require exclusive access; the
//!   parallel removal path fans work out internally over shard locks.
//!
//! ```
//! use sift_core::{DocumentStatus, Sift};
//!
//! let mut engine = Sift::with_stop_words_text("in the").unwrap();
//! engine
//!     .add_document(1, "cat in the city", DocumentStatus::Active, &[1, 2, 3])
//!     .unwrap();
//!
//! let hits = engine.find_top_documents("cat").unwrap();
//! assert_eq!(hits[0].id, 1);
//! ```

pub mod analyzer;
pub mod batch;
pub mod concurrent;
pub mod dedup;
pub mod index;
mod intern;

pub use index::{Sift, MAX_RESULT_COUNT, RELEVANCE_EPSILON};
pub use sift_types::{DocId, Document, DocumentStatus, ExecutionPolicy, SearchError};
