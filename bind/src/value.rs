//! The dynamic value model that bound callables operate on.
//!
//! Primitives (`Undefined`, `Null`, `Bool`, `Number`, `String`) are plain data
//! and compare by value. `Object`, `Function` and `Bound` are shared, reference
//! counted handles that compare by identity and can be downgraded to weak
//! handles, which is what lets the binder key its cache on them without
//! keeping them alive.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::bound::BoundFn;
use crate::error::Thrown;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
  #[default]
  Undefined,
  Null,
  Bool(bool),
  Number(f64),
  String(Arc<str>),
  Object(Object),
  Function(Function),
  /// A callable produced by a `Binder`.
  Bound(BoundFn),
}

impl Value {
  /// Returns the name of this value's type, as reported in error messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Undefined => "undefined",
      Value::Null => "null",
      Value::Bool(_) => "boolean",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Object(_) => "object",
      Value::Function(_) | Value::Bound(_) => "function",
    }
  }

  /// Returns `true` if this value can be invoked.
  pub fn is_callable(&self) -> bool {
    matches!(self, Value::Function(_) | Value::Bound(_))
  }

  /// Returns `true` if this value is compared by identity rather than by value.
  pub fn is_reference(&self) -> bool {
    matches!(
      self,
      Value::Object(_) | Value::Function(_) | Value::Bound(_)
    )
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(&**s),
      _ => None,
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Value::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&Object> {
    match self {
      Value::Object(o) => Some(o),
      _ => None,
    }
  }

  /// Invokes this value with the given receiver and arguments.
  ///
  /// A `Bound` value ignores `receiver`: its receiver was fixed when it was
  /// bound. Invoking a non-callable value throws a `TypeError` message.
  pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, Thrown> {
    match self {
      Value::Function(f) => f.call(receiver, args),
      Value::Bound(b) => b.call(args),
      other => Err(Thrown::message(format!(
        "TypeError: {} is not a function",
        other.type_name()
      ))),
    }
  }
}

/// Strict equality: primitives by value (`NaN != NaN`, `+0 == -0`), reference
/// types by identity.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Object(a), Value::Object(b)) => Object::ptr_eq(a, b),
      (Value::Function(a), Value::Function(b)) => Function::ptr_eq(a, b),
      (Value::Bound(a), Value::Bound(b)) => BoundFn::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Undefined => write!(f, "undefined"),
      Value::Null => write!(f, "null"),
      Value::Bool(b) => write!(f, "{b}"),
      Value::Number(n) if n.is_infinite() => {
        write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
      }
      Value::Number(n) => write!(f, "{n}"),
      Value::String(s) => write!(f, "{s}"),
      Value::Object(_) => write!(f, "[object Object]"),
      Value::Function(func) => write!(f, "[function {}]", func.name().unwrap_or("anonymous")),
      Value::Bound(_) => write!(f, "[bound function]"),
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::String(s) => write!(f, "{s:?}"),
      Value::Object(o) => fmt::Debug::fmt(o, f),
      Value::Function(func) => fmt::Debug::fmt(func, f),
      Value::Bound(b) => fmt::Debug::fmt(b, f),
      other => write!(f, "{other}"),
    }
  }
}

impl From<()> for Value {
  fn from(_: ()) -> Self {
    Value::Undefined
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<f64> for Value {
  fn from(n: f64) -> Self {
    Value::Number(n)
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Value::Number(f64::from(n))
  }
}

impl From<u32> for Value {
  fn from(n: u32) -> Self {
    Value::Number(f64::from(n))
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(Arc::from(s))
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(Arc::from(s))
  }
}

impl From<Object> for Value {
  fn from(o: Object) -> Self {
    Value::Object(o)
  }
}

impl From<&Object> for Value {
  fn from(o: &Object) -> Self {
    Value::Object(o.clone())
  }
}

impl From<Function> for Value {
  fn from(f: Function) -> Self {
    Value::Function(f)
  }
}

impl From<&Function> for Value {
  fn from(f: &Function) -> Self {
    Value::Function(f.clone())
  }
}

impl From<BoundFn> for Value {
  fn from(b: BoundFn) -> Self {
    Value::Bound(b)
  }
}

impl From<&BoundFn> for Value {
  fn from(b: &BoundFn) -> Self {
    Value::Bound(b.clone())
  }
}

impl From<&Value> for Value {
  fn from(v: &Value) -> Self {
    v.clone()
  }
}

// --- Object ---

#[derive(Default)]
pub(crate) struct ObjectData {
  properties: RwLock<HashMap<String, Value>>,
}

/// A shared, mutable bag of named properties with identity semantics.
#[derive(Clone, Default)]
pub struct Object(Arc<ObjectData>);

impl Object {
  /// Creates a new, empty object.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an object from `(name, value)` pairs.
  pub fn with_properties<K, V, I>(properties: I) -> Self
  where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
  {
    let map = properties
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect();
    Object(Arc::new(ObjectData {
      properties: RwLock::new(map),
    }))
  }

  /// Reads a property, returning `Undefined` if it is not set.
  pub fn get(&self, name: &str) -> Value {
    self.0.properties.read().get(name).cloned().unwrap_or_default()
  }

  pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
    self.0.properties.write().insert(name.into(), value.into());
  }

  pub fn ptr_eq(a: &Object, b: &Object) -> bool {
    Arc::ptr_eq(&a.0, &b.0)
  }

  pub fn downgrade(&self) -> WeakObject {
    WeakObject(Arc::downgrade(&self.0))
  }

  pub(crate) fn addr(&self) -> usize {
    Arc::as_ptr(&self.0) as usize
  }
}

impl fmt::Debug for Object {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Property values may point back at this object, so only names are shown.
    let properties = self.0.properties.read();
    let mut names: Vec<&String> = properties.keys().collect();
    names.sort();
    write!(f, "Object{names:?}")
  }
}

/// A weak handle to an `Object`.
#[derive(Clone)]
pub struct WeakObject(Weak<ObjectData>);

impl WeakObject {
  pub fn upgrade(&self) -> Option<Object> {
    self.0.upgrade().map(Object)
  }

  /// Returns `true` while at least one strong handle to the object exists.
  pub fn is_alive(&self) -> bool {
    self.0.strong_count() > 0
  }
}

// --- Function ---

type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, Thrown> + Send + Sync;

pub(crate) struct FunctionData {
  name: Option<String>,
  body: Box<NativeFn>,
}

/// A native callable taking a receiver and a list of arguments.
#[derive(Clone)]
pub struct Function(Arc<FunctionData>);

impl Function {
  /// Wraps a closure as an anonymous function.
  pub fn new<F>(body: F) -> Self
  where
    F: Fn(&Value, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
  {
    Function(Arc::new(FunctionData {
      name: None,
      body: Box::new(body),
    }))
  }

  /// Wraps a closure as a named function.
  pub fn named<F>(name: impl Into<String>, body: F) -> Self
  where
    F: Fn(&Value, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
  {
    Function(Arc::new(FunctionData {
      name: Some(name.into()),
      body: Box::new(body),
    }))
  }

  pub fn name(&self) -> Option<&str> {
    self.0.name.as_deref()
  }

  /// Invokes the function with `receiver` as its receiver.
  ///
  /// The receiver is passed through as given; primitive receivers are not
  /// boxed and `Undefined` is not replaced by any global object.
  pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, Thrown> {
    (self.0.body)(receiver, args)
  }

  pub fn ptr_eq(a: &Function, b: &Function) -> bool {
    Arc::ptr_eq(&a.0, &b.0)
  }

  pub fn downgrade(&self) -> WeakFunction {
    WeakFunction(Arc::downgrade(&self.0))
  }

  pub(crate) fn addr(&self) -> usize {
    Arc::as_ptr(&self.0) as usize
  }
}

impl fmt::Debug for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Function({})", self.name().unwrap_or("anonymous"))
  }
}

/// A weak handle to a `Function`.
#[derive(Clone)]
pub struct WeakFunction(Weak<FunctionData>);

impl WeakFunction {
  pub fn upgrade(&self) -> Option<Function> {
    self.0.upgrade().map(Function)
  }

  /// Returns `true` while at least one strong handle to the function exists.
  pub fn is_alive(&self) -> bool {
    self.0.strong_count() > 0
  }
}
