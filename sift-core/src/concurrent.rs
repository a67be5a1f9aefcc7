//! Concurrency primitives for parallel ranking and removal.
//!
//! Two structures share the same partitioning discipline: keys are hashed
//! into a fixed number of shards chosen at construction, and each shard
//! guards its slice of the key space with its own lock. Threads touching
//! different shards never contend; only genuinely conflicting updates to
//! the same key range serialize.
//!
//! - [`ShardedAccumulator`] is the transient landing zone for parallel
//!   relevance accumulation: insert-or-add, erase, then a one-shot drain.
//! - [`ShardedIndex`] is the live inverted index. Ranking takes per-shard
//!   read locks; parallel removal takes the write lock of each affected
//!   word's shard, so concurrent bucket mutation is race-free.

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHasher};
use sift_types::DocId;
use std::collections::BTreeMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::ops::AddAssign;
use std::sync::Arc;

type FxBuild = BuildHasherDefault<FxHasher>;

/// Key-partitioned accumulator map for concurrent numeric aggregation.
///
/// Values accumulate with `+=`; absent keys are inserted with the default
/// value first. Draining consumes the accumulator, which statically rules
/// out drain-versus-writer races.
pub struct ShardedAccumulator<K, V> {
    shards: Box<[Mutex<FxHashMap<K, V>>]>,
    hasher: FxBuild,
}

impl<K: Hash + Eq, V> ShardedAccumulator<K, V> {
    /// Creates an accumulator with `shard_count` independently locked shards.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        let shards: Vec<_> = (0..shard_count)
            .map(|_| Mutex::new(FxHashMap::default()))
            .collect();
        Self {
            shards: shards.into_boxed_slice(),
            hasher: FxBuild::default(),
        }
    }

    #[inline]
    fn shard_of(&self, key: &K) -> usize {
        self.hasher.hash_one(key) as usize % self.shards.len()
    }

    /// Adds `delta` to the value at `key`, inserting `V::default()` first
    /// when the key is absent. Safe to call from many threads.
    pub fn add(&self, key: K, delta: V)
    where
        V: AddAssign + Default,
    {
        let mut shard = self.shards[self.shard_of(&key)].lock();
        *shard.entry(key).or_default() += delta;
    }

    /// Removes `key` from its shard, if present.
    pub fn erase(&self, key: &K) {
        self.shards[self.shard_of(key)].lock().remove(key);
    }

    /// Merges all shards into a single ordered map.
    pub fn into_map(self) -> BTreeMap<K, V>
    where
        K: Ord,
    {
        let mut merged = BTreeMap::new();
        for shard in self.shards.into_vec() {
            merged.extend(shard.into_inner());
        }
        merged
    }
}

/// One per-word posting bucket: document id, ascending, to term frequency.
pub(crate) type Bucket = BTreeMap<DocId, f64>;

type IndexShard = FxHashMap<Arc<str>, Bucket>;

/// The live inverted index, partitioned by word into lockable shards.
///
/// Mutation through `&mut self` bypasses the locks; `&self` accessors take
/// the owning shard's read or write lock, which is what makes parallel
/// ranking and parallel removal sound.
pub(crate) struct ShardedIndex {
    shards: Box<[RwLock<IndexShard>]>,
    hasher: FxBuild,
}

impl ShardedIndex {
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        let shards: Vec<_> = (0..shard_count)
            .map(|_| RwLock::new(IndexShard::default()))
            .collect();
        Self {
            shards: shards.into_boxed_slice(),
            hasher: FxBuild::default(),
        }
    }

    #[inline]
    fn shard_of(&self, word: &str) -> usize {
        self.hasher.hash_one(word) as usize % self.shards.len()
    }

    /// Adds `tf` to the (word, document) posting. Requires exclusive access.
    pub fn accumulate(&mut self, word: &Arc<str>, id: DocId, tf: f64) {
        let idx = self.shard_of(word);
        let shard = self.shards[idx].get_mut();
        *shard
            .entry(Arc::clone(word))
            .or_default()
            .entry(id)
            .or_insert(0.0) += tf;
    }

    /// Runs `f` on the bucket for `word` under the shard's read lock.
    pub fn with_bucket<R>(&self, word: &str, f: impl FnOnce(Option<&Bucket>) -> R) -> R {
        let shard = self.shards[self.shard_of(word)].read();
        f(shard.get(word))
    }

    /// True if `word`'s bucket holds a posting for `id`.
    pub fn contains(&self, word: &str, id: DocId) -> bool {
        self.with_bucket(word, |bucket| {
            bucket.is_some_and(|b| b.contains_key(&id))
        })
    }

    /// Removes the posting for `id` from `word`'s bucket, dropping the
    /// bucket when it empties. Requires exclusive access.
    pub fn remove_doc_mut(&mut self, word: &str, id: DocId) {
        let idx = self.shard_of(word);
        Self::remove_from_shard(self.shards[idx].get_mut(), word, id);
    }

    /// Locked variant of [`ShardedIndex::remove_doc_mut`]: takes the write
    /// lock of the owning shard, so it is safe from many threads at once.
    pub fn remove_doc(&self, word: &str, id: DocId) {
        let mut shard = self.shards[self.shard_of(word)].write();
        Self::remove_from_shard(&mut shard, word, id);
    }

    fn remove_from_shard(shard: &mut IndexShard, word: &str, id: DocId) {
        if let Some(bucket) = shard.get_mut(word) {
            bucket.remove(&id);
            if bucket.is_empty() {
                shard.remove(word);
            }
        }
    }

    /// Number of distinct indexed words.
    pub fn word_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// True if any bucket still holds a posting for `id`.
    #[cfg(test)]
    pub fn contains_doc_anywhere(&self, id: DocId) -> bool {
        self.shards
            .iter()
            .any(|shard| shard.read().values().any(|bucket| bucket.contains_key(&id)))
    }
}
