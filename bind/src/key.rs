//! Per-position cache keys.

use std::sync::Arc;

use crate::bound::WeakBound;
use crate::value::{Value, WeakFunction, WeakObject};

/// A key compared by value. Primitives have no identity to track weakly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum PrimitiveKey {
  Undefined,
  Null,
  Bool(bool),
  /// SameValueZero bits: every `NaN` maps to one key and `-0` maps to `+0`.
  Number(u64),
  String(Arc<str>),
}

impl PrimitiveKey {
  fn number(n: f64) -> Self {
    let canonical = if n.is_nan() {
      f64::NAN
    } else if n == 0.0 {
      0.0
    } else {
      n
    };
    PrimitiveKey::Number(canonical.to_bits())
  }
}

/// The weak half of an identity key.
#[derive(Clone)]
pub(crate) enum WeakHandle {
  Object(WeakObject),
  Function(WeakFunction),
  Bound(WeakBound),
}

impl WeakHandle {
  pub(crate) fn is_alive(&self) -> bool {
    match self {
      WeakHandle::Object(w) => w.is_alive(),
      WeakHandle::Function(w) => w.is_alive(),
      WeakHandle::Bound(w) => w.is_alive(),
    }
  }
}

/// A key compared by identity and held weakly.
///
/// `addr` is the address of the key's shared allocation. A weak handle keeps
/// that allocation reserved (though not the value in it), so no other object
/// can occupy the same address while the key is stored anywhere in the trie.
#[derive(Clone)]
pub(crate) struct WeakKey {
  pub(crate) addr: usize,
  pub(crate) handle: WeakHandle,
}

pub(crate) enum ArgKey {
  Primitive(PrimitiveKey),
  Weak(WeakKey),
}

impl ArgKey {
  pub(crate) fn of(value: &Value) -> Self {
    match value {
      Value::Undefined => ArgKey::Primitive(PrimitiveKey::Undefined),
      Value::Null => ArgKey::Primitive(PrimitiveKey::Null),
      Value::Bool(b) => ArgKey::Primitive(PrimitiveKey::Bool(*b)),
      Value::Number(n) => ArgKey::Primitive(PrimitiveKey::number(*n)),
      Value::String(s) => ArgKey::Primitive(PrimitiveKey::String(Arc::clone(s))),
      Value::Object(o) => ArgKey::Weak(WeakKey {
        addr: o.addr(),
        handle: WeakHandle::Object(o.downgrade()),
      }),
      Value::Function(f) => ArgKey::Weak(WeakKey {
        addr: f.addr(),
        handle: WeakHandle::Function(f.downgrade()),
      }),
      Value::Bound(b) => ArgKey::Weak(WeakKey {
        addr: b.addr(),
        handle: WeakHandle::Bound(b.downgrade()),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn primitive(value: Value) -> PrimitiveKey {
    match ArgKey::of(&value) {
      ArgKey::Primitive(key) => key,
      ArgKey::Weak(_) => panic!("expected a primitive key for {value:?}"),
    }
  }

  #[test]
  fn numbers_use_same_value_zero() {
    assert_eq!(primitive(Value::Number(f64::NAN)), primitive(Value::Number(-f64::NAN)));
    assert_eq!(primitive(Value::Number(0.0)), primitive(Value::Number(-0.0)));
    assert_ne!(primitive(Value::Number(1.0)), primitive(Value::Number(-1.0)));
  }

  #[test]
  fn strings_compare_by_content() {
    let a = Value::from(String::from("foo"));
    let b = Value::from("foo");
    assert_eq!(primitive(a), primitive(b));
  }

  #[test]
  fn distinct_primitive_types_never_collide() {
    assert_ne!(primitive(Value::Undefined), primitive(Value::Null));
    assert_ne!(primitive(Value::Bool(false)), primitive(Value::Number(0.0)));
    assert_ne!(primitive(Value::from("1")), primitive(Value::from(1)));
  }

  #[test]
  fn reference_keys_are_weak() {
    let object = crate::Object::new();
    let key = match ArgKey::of(&Value::from(&object)) {
      ArgKey::Weak(key) => key,
      ArgKey::Primitive(_) => panic!("objects must be keyed by identity"),
    };
    assert!(key.handle.is_alive());
    drop(object);
    assert!(!key.handle.is_alive());
  }
}
