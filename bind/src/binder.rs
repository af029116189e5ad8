//! The main `Binder` struct and its associated methods.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::bound::{self, BoundCore, BoundFn};
use crate::builder::BinderBuilder;
use crate::error::{BindError, Result};
use crate::key::ArgKey;
use crate::metrics::MetricsSnapshot;
use crate::node::Node;
use crate::shared::Shared;
use crate::value::Value;

/// A memoizing binder.
///
/// `bind` returns the identical `BoundFn` for repeated requests with the same
/// target, receiver and partial arguments, for as long as the reference-typed
/// ones among them are alive. The cache holds those only weakly: dropping the
/// last outside handle to a key object destroys it, and its cache entries are
/// pruned on the next sweep.
///
/// `Binder` is `Send + Sync`; concurrent requests for the same key observe
/// one bound callable.
pub struct Binder {
  root: Node,
  shared: Shared,
}

impl Default for Binder {
  fn default() -> Self {
    Self::from_shared(Shared::new(BinderBuilder::DEFAULT_SWEEP_THRESHOLD, None))
  }
}

impl fmt::Debug for Binder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binder")
      .field("sweep_threshold", &self.shared.sweep_threshold)
      .field("shards", &self.shared.shards)
      .field("metrics", &self.metrics())
      .finish_non_exhaustive()
  }
}

impl Binder {
  /// Creates a new, empty `Binder` with default settings.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn builder() -> BinderBuilder {
    BinderBuilder::new()
  }

  pub(crate) fn from_shared(shared: Shared) -> Self {
    Self {
      root: Node::new(&shared),
      shared,
    }
  }

  /// Binds `target` to `receiver` with `partial` as leading arguments.
  ///
  /// Returns the memoized `BoundFn` if this exact request was seen before and
  /// all of its key objects are still alive; otherwise creates and memoizes a
  /// new one. Fails with [`BindError::InvalidArgument`] if `target` is not
  /// callable, without touching the cache.
  pub fn bind(&self, target: &Value, receiver: &Value, partial: &[Value]) -> Result<BoundFn> {
    if !target.is_callable() {
      return Err(BindError::InvalidArgument {
        found: target.type_name(),
      });
    }

    let mut node = self.root.child(ArgKey::of(target), &self.shared);
    node = node.child(ArgKey::of(receiver), &self.shared);
    for arg in partial {
      node = node.child(ArgKey::of(arg), &self.shared);
    }

    let mut created = false;
    let core = Arc::clone(node.result_or_init(|| {
      created = true;
      Arc::new(BoundCore::capture(self.shared.next_id(), receiver, partial))
    }));

    self.shared.metrics.record_lookup(!created);
    trace!(
      bound = core.id(),
      hit = !created,
      depth = partial.len() + 2,
      "bind"
    );
    Ok(BoundFn::new(core, bound::pins(target, receiver, partial)))
  }

  /// Variadic form of [`bind`](Self::bind): `args[0]` is the target, `args[1]`
  /// the receiver (`Undefined` if missing) and the rest are partial arguments.
  ///
  /// An empty `args` fails with [`BindError::InvalidArgument`].
  pub fn bind_args(&self, args: &[Value]) -> Result<BoundFn> {
    let Some((target, rest)) = args.split_first() else {
      return Err(BindError::InvalidArgument { found: "nothing" });
    };
    match rest.split_first() {
      Some((receiver, partial)) => self.bind(target, receiver, partial),
      None => self.bind(target, &Value::Undefined, &[]),
    }
  }

  /// Prunes cache edges whose key objects are gone and returns how many were
  /// removed. Entries whose keys are all alive are never touched.
  pub fn sweep(&self) -> usize {
    let reclaimed = self.root.sweep();
    self.shared.metrics.record_sweep(reclaimed);
    debug!(reclaimed, "swept binder cache");
    reclaimed
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.shared.metrics.snapshot()
  }
}
