//! Sharded concurrent accumulator used by the parallel ranker.
//!
//! The key space is partitioned by `key.rem_euclid(shard_count)` into
//! independent `Mutex`-guarded buckets, so concurrent accumulation into
//! different shards never contends on the same lock. [`ShardRef`] hands the
//! caller a guard into exactly one shard at a time; holding two at once
//! would risk a lock-order deadlock, so the API only ever returns one.

use corpusdb_core::ids::DocId;
use std::collections::HashMap;
use std::sync::Mutex;

/// A map of `DocId -> f64` split across `S` independently-locked shards.
pub struct ShardedMap {
    shards: Vec<Mutex<HashMap<DocId, f64>>>,
}

/// A guard into one shard's entry for a key, created with `0.0` if absent.
///
/// Derefs to the accumulated value; add to it directly.
pub struct ShardRef<'a> {
    guard: std::sync::MutexGuard<'a, HashMap<DocId, f64>>,
    key: DocId,
}

impl std::ops::Deref for ShardRef<'_> {
    type Target = f64;
    fn deref(&self) -> &f64 {
        self.guard.get(&self.key).expect("entry created on acquire")
    }
}

impl std::ops::DerefMut for ShardRef<'_> {
    fn deref_mut(&mut self) -> &mut f64 {
        self.guard.get_mut(&self.key).expect("entry created on acquire")
    }
}

impl ShardedMap {
    /// Build a map with `shard_count` independent shards. `shard_count`
    /// must be at least 1.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard_count must be at least 1");
        let mut shards = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            shards.push(Mutex::new(HashMap::new()));
        }
        ShardedMap { shards }
    }

    fn shard_index(&self, key: DocId) -> usize {
        key.rem_euclid(self.shards.len() as i64) as usize
    }

    /// Acquire a guarded reference to `key`'s accumulator, creating it with
    /// `0.0` if absent. Holds that shard's lock until the guard is dropped.
    pub fn shard_ref(&self, key: DocId) -> ShardRef<'_> {
        let idx = self.shard_index(key);
        let mut guard = self.shards[idx].lock().expect("shard mutex poisoned");
        guard.entry(key).or_insert(0.0);
        ShardRef { guard, key }
    }

    /// Lock every shard in order and merge them into a plain map.
    ///
    /// Must only be called with no [`ShardRef`] outstanding — each shard's
    /// lock is acquired and released in turn, so an outstanding guard into
    /// any shard would deadlock this call.
    pub fn build_ordinary_map(&self) -> HashMap<DocId, f64> {
        let mut merged = HashMap::new();
        for shard in &self.shards {
            let guard = shard.lock().expect("shard mutex poisoned");
            merged.extend(guard.iter().map(|(&k, &v)| (k, v)));
        }
        merged
    }
}
