use thiserror::Error;

use crate::value::Value;

/// The error returned when a bind request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
  /// The first argument was missing or was not callable.
  ///
  /// Raised before the cache is touched.
  #[error("invalid argument: expected a callable, found {found}")]
  InvalidArgument { found: &'static str },
}

/// Errors that can occur when building a `Binder`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// The lazy sweep threshold must allow at least one live entry per table.
  #[error("sweep threshold cannot be zero")]
  ZeroSweepThreshold,
}

/// A value thrown by a callable.
///
/// Bound callables never produce this themselves; it is whatever the
/// underlying function failed with, passed through unchanged.
#[derive(Debug, Clone, Error)]
#[error("uncaught exception: {0}")]
pub struct Thrown(pub Value);

impl Thrown {
  /// Creates a `Thrown` carrying a string message.
  pub fn message(message: impl Into<String>) -> Self {
    Thrown(Value::from(message.into()))
  }

  /// Returns the thrown value.
  pub fn value(&self) -> &Value {
    &self.0
  }
}

/// A specialized `Result` type for bind operations.
pub type Result<T, E = BindError> = std::result::Result<T, E>;
