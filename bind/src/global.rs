//! The global binder instance and access functions.

use crate::binder::Binder;
use crate::bound::BoundFn;
use crate::error::Result;
use crate::value::Value;
use once_cell::sync::Lazy;

// The process-wide binder, created on first access.
static GLOBAL_BINDER: Lazy<Binder> = Lazy::new(Binder::default);

/// Provides a reference to the global binder instance.
///
/// Every caller shares its cache, so two unrelated parts of a program binding
/// the same function to the same receiver get the same `BoundFn`.
///
/// # Examples
///
/// ```
/// use fibre_bind::{global, Function, Value};
///
/// let f = Value::from(Function::new(|_, _| Ok(Value::Null)));
/// let a = global().bind(&f, &Value::Null, &[]).unwrap();
/// let b = global().bind(&f, &Value::Null, &[]).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn global() -> &'static Binder {
  &GLOBAL_BINDER
}

/// Binds `target` through the global binder. See [`Binder::bind`].
pub fn bind(target: &Value, receiver: &Value, partial: &[Value]) -> Result<BoundFn> {
  global().bind(target, receiver, partial)
}
