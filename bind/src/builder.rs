use crate::binder::Binder;
use crate::error::BuildError;
use crate::shared::Shared;

/// A builder for creating `Binder` instances.
#[derive(Debug, Clone)]
pub struct BinderBuilder {
  sweep_threshold: usize,
  shards: Option<usize>,
}

impl Default for BinderBuilder {
  fn default() -> Self {
    Self {
      sweep_threshold: Self::DEFAULT_SWEEP_THRESHOLD,
      shards: None,
    }
  }
}

impl BinderBuilder {
  pub(crate) const DEFAULT_SWEEP_THRESHOLD: usize = 64;

  pub fn new() -> Self {
    Self::default()
  }

  /// Sets how many identity keys a single trie level may hold before an
  /// insertion triggers a lazy sweep of that level.
  ///
  /// After each lazy sweep the mark moves to twice the surviving size, so
  /// sweeping stays amortised constant per insertion.
  pub fn sweep_threshold(mut self, threshold: usize) -> Self {
    self.sweep_threshold = threshold;
    self
  }

  /// Sets the number of shards used by each level's concurrent tables.
  pub fn shards(mut self, shards: usize) -> Self {
    // The concurrent map requires a power of two greater than one.
    self.shards = Some(shards.max(2).next_power_of_two());
    self
  }

  pub fn build(self) -> Result<Binder, BuildError> {
    if self.sweep_threshold == 0 {
      return Err(BuildError::ZeroSweepThreshold);
    }
    Ok(Binder::from_shared(Shared::new(
      self.sweep_threshold,
      self.shards,
    )))
  }
}
