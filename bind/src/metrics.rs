use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Lock-free counters describing how a binder's cache is used.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,
  pub(crate) sweeps: CachePadded<AtomicU64>,
  pub(crate) reclaimed: CachePadded<AtomicU64>,
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn record_lookup(&self, hit: bool) {
    let counter = if hit { &self.hits } else { &self.misses };
    counter.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn record_sweep(&self, reclaimed: usize) {
    self.sweeps.fetch_add(1, Ordering::Relaxed);
    self
      .reclaimed
      .fetch_add(reclaimed as u64, Ordering::Relaxed);
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_lookups = hits + misses;

    MetricsSnapshot {
      hits,
      misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        hits as f64 / total_lookups as f64
      },
      sweeps: self.sweeps.load(Ordering::Relaxed),
      reclaimed: self.reclaimed.load(Ordering::Relaxed),
    }
  }
}

/// A point-in-time snapshot of a binder's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
  /// Bind requests answered with a previously memoized bound callable.
  pub hits: u64,
  /// Bind requests that created a new bound callable.
  pub misses: u64,
  pub hit_ratio: f64,
  /// Sweeps run, both lazy and explicit.
  pub sweeps: u64,
  /// Weak edges pruned because their key object was gone.
  pub reclaimed: u64,
}

impl fmt::Display for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Binder Metrics:")?;
    writeln!(f, "  Hits: {}", self.hits)?;
    writeln!(f, "  Misses: {}", self.misses)?;
    writeln!(f, "  Hit Ratio: {:.2}%", self.hit_ratio * 100.0)?;
    writeln!(f, "  Sweeps: {}", self.sweeps)?;
    write!(f, "  Reclaimed Edges: {}", self.reclaimed)
  }
}
