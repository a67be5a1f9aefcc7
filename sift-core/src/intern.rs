//! Shared-ownership word pool.
//!
//! Every distinct word in the index is allocated exactly once; the inverted
//! buckets, forward entries and transient removal buffers all hold
//! `Arc<str>` clones of the pooled allocation. The refcount makes the
//! removal contract automatic: a word's storage is freed only once the last
//! index structure referencing it has been purged.

use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Deduplicating pool of word allocations.
#[derive(Default)]
pub(crate) struct WordPool {
    words: FxHashSet<Arc<str>>,
}

impl WordPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct pooled words.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns the shared allocation for `word`, creating it on first use.
    pub fn intern(&mut self, word: &str) -> Arc<str> {
        if let Some(existing) = self.words.get(word) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(word);
        self.words.insert(Arc::clone(&shared));
        shared
    }

    /// Drops the pooled entry once nothing else references `word`.
    ///
    /// `word` must be the caller's last clone: when only the pool's copy and
    /// `word` itself remain, the entry is removed and the allocation freed
    /// on return.
    pub fn release(&mut self, word: Arc<str>) {
        if Arc::strong_count(&word) == 2 {
            self.words.remove(&*word);
        }
    }
}
