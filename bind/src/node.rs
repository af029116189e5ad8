//! One level of the argument trie.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::bound::BoundCore;
use crate::key::{ArgKey, PrimitiveKey, WeakHandle, WeakKey};
use crate::shared::Shared;

/// A trie node. Children for primitive keys are held strongly; children for
/// identity keys live in a weakly keyed table and go away with their key.
pub(crate) struct Node {
  primitives: DashMap<PrimitiveKey, Arc<Node>>,
  weak: WeakTable,
  result: OnceCell<Arc<BoundCore>>,
}

impl Node {
  pub(crate) fn new(shared: &Shared) -> Self {
    Self {
      primitives: shared.new_map(),
      weak: WeakTable::new(shared),
      result: OnceCell::new(),
    }
  }

  /// Returns the child reached through `key`, creating it on first traversal.
  pub(crate) fn child(&self, key: ArgKey, shared: &Shared) -> Arc<Node> {
    match key {
      ArgKey::Primitive(key) => {
        let child = self
          .primitives
          .entry(key)
          .or_insert_with(|| Arc::new(Node::new(shared)));
        Arc::clone(child.value())
      }
      ArgKey::Weak(key) => self.weak.child(key, shared),
    }
  }

  /// Returns the memoized result, running `init` only if there is none yet.
  /// Concurrent callers racing on an empty slot all observe one result.
  pub(crate) fn result_or_init(&self, init: impl FnOnce() -> Arc<BoundCore>) -> &Arc<BoundCore> {
    self.result.get_or_init(init)
  }

  /// Prunes every dead weak edge in this subtree and returns how many were removed.
  pub(crate) fn sweep(&self) -> usize {
    // The trie is one level per argument, so walk it with an explicit stack.
    let mut reclaimed = self.weak.sweep();
    let mut pending = self.children();
    while let Some(node) = pending.pop() {
      reclaimed += node.weak.sweep();
      pending.extend(node.children());
    }
    reclaimed
  }

  fn children(&self) -> Vec<Arc<Node>> {
    let mut children: Vec<Arc<Node>> = self
      .primitives
      .iter()
      .map(|entry| Arc::clone(entry.value()))
      .collect();
    children.extend(self.weak.children());
    children
  }

  /// Empties both child tables, handing back the child nodes.
  fn drain_children(&self) -> Vec<Arc<Node>> {
    let mut children = Vec::new();
    self.primitives.retain(|_, node| {
      children.push(Arc::clone(node));
      false
    });
    self.weak.entries.retain(|_, entry| {
      children.push(Arc::clone(&entry.node));
      false
    });
    children
  }
}

impl Drop for Node {
  fn drop(&mut self) {
    // Unwind the subtree in a loop rather than through nested drops. Only
    // nodes this subtree owns outright are taken apart; a node still shared
    // with a concurrent traversal is left to whoever drops it last.
    let mut pending = self.drain_children();
    while let Some(node) = pending.pop() {
      if let Some(node) = Arc::into_inner(node) {
        pending.extend(node.drain_children());
      }
    }
  }
}

struct WeakEntry {
  handle: WeakHandle,
  node: Arc<Node>,
}

/// A table from identity keys to child nodes that does not keep its keys
/// alive. Entries whose key has died are dropped by `sweep`, which also runs
/// on insertion once the table outgrows its current sweep mark.
struct WeakTable {
  entries: DashMap<usize, WeakEntry>,
  sweep_at: AtomicUsize,
}

impl WeakTable {
  fn new(shared: &Shared) -> Self {
    Self {
      entries: shared.new_map(),
      sweep_at: AtomicUsize::new(shared.sweep_threshold),
    }
  }

  fn child(&self, key: WeakKey, shared: &Shared) -> Arc<Node> {
    // An occupied slot always belongs to the caller's key: a stored weak
    // handle reserves its address until the entry is swept.
    let (node, inserted) = match self.entries.entry(key.addr) {
      Entry::Occupied(occupied) => (Arc::clone(&occupied.get().node), false),
      Entry::Vacant(vacant) => {
        let node = Arc::new(Node::new(shared));
        vacant.insert(WeakEntry {
          handle: key.handle,
          node: Arc::clone(&node),
        });
        (node, true)
      }
    };

    if inserted && self.entries.len() >= self.sweep_at.load(Ordering::Relaxed) {
      let reclaimed = self.sweep();
      let live = self.entries.len();
      self
        .sweep_at
        .store(shared.sweep_threshold.max(live * 2), Ordering::Relaxed);
      shared.metrics.record_sweep(reclaimed);
      debug!(reclaimed, live, "lazily swept weak table");
    }
    node
  }

  fn sweep(&self) -> usize {
    let mut reclaimed = 0;
    self.entries.retain(|_, entry| {
      let alive = entry.handle.is_alive();
      if !alive {
        reclaimed += 1;
      }
      alive
    });
    reclaimed
  }

  fn children(&self) -> Vec<Arc<Node>> {
    self
      .entries
      .iter()
      .map(|entry| Arc::clone(&entry.value().node))
      .collect()
  }
}
