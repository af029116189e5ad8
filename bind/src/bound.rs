//! Bound callables.
//!
//! A bound callable is split in two. The [`BoundCore`] is what the cache
//! memoizes: it carries the identity of the bound callable and a template of
//! its receiver and partial arguments in which primitives are captured by value
//! and reference-typed components are captured only by position. It holds no
//! strong reference to any object, so storing it under a weak key cannot keep
//! that key alive.
//!
//! The [`BoundFn`] handed to callers pairs the shared core with "pins": strong
//! handles to the reference-typed components, in the order the template refers
//! to them. Every handle for the same core has pins that are identical to each
//! other, since a cache hit requires identical reference components in the
//! same positions.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::error::Thrown;
use crate::value::Value;

/// One bound component of the template.
pub(crate) enum Slot {
  /// A primitive, captured by value.
  Value(Value),
  /// A reference-typed component, stored at this index of the handle's pins.
  Pinned(usize),
}

impl Slot {
  fn resolve<'a>(&'a self, pins: &'a [Value]) -> &'a Value {
    match self {
      Slot::Value(value) => value,
      Slot::Pinned(index) => &pins[*index],
    }
  }
}

/// The memoized, weakly-safe part of a bound callable.
pub(crate) struct BoundCore {
  id: u64,
  receiver: Slot,
  partial: Box<[Slot]>,
}

impl BoundCore {
  /// Captures `receiver` and `partial` into a template. The target is always
  /// reference-typed and always occupies pin 0.
  pub(crate) fn capture(id: u64, receiver: &Value, partial: &[Value]) -> Self {
    let mut next_pin = 1;
    let mut slot = |value: &Value| {
      if value.is_reference() {
        next_pin += 1;
        Slot::Pinned(next_pin - 1)
      } else {
        Slot::Value(value.clone())
      }
    };
    let receiver = slot(receiver);
    let partial = partial.iter().map(&mut slot).collect();
    Self {
      id,
      receiver,
      partial,
    }
  }

  pub(crate) fn id(&self) -> u64 {
    self.id
  }
}

/// Collects the reference-typed components of a bind request, in template order.
pub(crate) fn pins(target: &Value, receiver: &Value, partial: &[Value]) -> Arc<[Value]> {
  std::iter::once(target)
    .chain(std::iter::once(receiver).filter(|v| v.is_reference()))
    .chain(partial.iter().filter(|v| v.is_reference()))
    .cloned()
    .collect()
}

/// A callable with a fixed receiver and a fixed prefix of arguments.
///
/// Two `BoundFn` values are equal exactly when they were produced for the same
/// cache key, i.e. when they share a core. Cloning is cheap.
#[derive(Clone)]
pub struct BoundFn {
  core: Arc<BoundCore>,
  pins: Arc<[Value]>,
}

impl BoundFn {
  pub(crate) fn new(core: Arc<BoundCore>, pins: Arc<[Value]>) -> Self {
    Self { core, pins }
  }

  /// Invokes the target with the bound receiver and `partial ++ args`.
  ///
  /// Whatever the target throws is returned unchanged.
  pub fn call(&self, args: &[Value]) -> Result<Value, Thrown> {
    let mut all = Vec::with_capacity(self.core.partial.len() + args.len());
    all.extend(self.partial_args().cloned());
    all.extend_from_slice(args);
    self.target().call(self.receiver(), &all)
  }

  /// The callable this was bound from.
  pub fn target(&self) -> &Value {
    &self.pins[0]
  }

  pub fn receiver(&self) -> &Value {
    self.core.receiver.resolve(&self.pins)
  }

  /// The arguments fixed at bind time, in order.
  pub fn partial_args(&self) -> impl Iterator<Item = &Value> + '_ {
    self.core.partial.iter().map(|slot| slot.resolve(&self.pins))
  }

  /// A process-unique sequence number for this bound callable's identity.
  pub fn id(&self) -> u64 {
    self.core.id
  }

  pub fn ptr_eq(a: &BoundFn, b: &BoundFn) -> bool {
    Arc::ptr_eq(&a.core, &b.core)
  }

  /// Returns a weak handle to this bound callable's identity.
  ///
  /// The identity stays alive while any handle exists or while the cache still
  /// memoizes it, i.e. while all of its key objects are alive.
  pub fn downgrade(&self) -> WeakBound {
    WeakBound(Arc::downgrade(&self.core))
  }

  pub(crate) fn addr(&self) -> usize {
    Arc::as_ptr(&self.core) as usize
  }
}

impl PartialEq for BoundFn {
  fn eq(&self, other: &Self) -> bool {
    BoundFn::ptr_eq(self, other)
  }
}

impl Eq for BoundFn {}

impl Hash for BoundFn {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.addr().hash(state);
  }
}

impl fmt::Debug for BoundFn {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BoundFn")
      .field("id", &self.core.id)
      .field("target", self.target())
      .field("receiver", self.receiver())
      .field("partial", &self.partial_args().collect::<Vec<_>>())
      .finish()
  }
}

/// A weak handle to a bound callable's identity.
#[derive(Clone)]
pub struct WeakBound(Weak<BoundCore>);

impl WeakBound {
  pub fn is_alive(&self) -> bool {
    self.0.strong_count() > 0
  }
}
