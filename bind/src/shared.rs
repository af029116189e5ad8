use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::metrics::Metrics;

/// Settings and counters shared by every node of one binder's trie.
#[derive(Debug)]
pub(crate) struct Shared {
  pub(crate) sweep_threshold: usize,
  pub(crate) shards: Option<usize>,
  pub(crate) metrics: Metrics,
  next_id: AtomicU64,
}

impl Shared {
  pub(crate) fn new(sweep_threshold: usize, shards: Option<usize>) -> Self {
    Self {
      sweep_threshold,
      shards,
      metrics: Metrics::new(),
      next_id: AtomicU64::new(0),
    }
  }

  pub(crate) fn new_map<K: Eq + Hash, V>(&self) -> DashMap<K, V> {
    match self.shards {
      Some(shards) => DashMap::with_shard_amount(shards),
      None => DashMap::new(),
    }
  }

  pub(crate) fn next_id(&self) -> u64 {
    self.next_id.fetch_add(1, Ordering::Relaxed)
  }
}
