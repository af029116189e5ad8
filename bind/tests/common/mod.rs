#![allow(dead_code)]

use fibre_bind::{Function, Object, Value};
use std::sync::{Arc, Mutex};

/// Records every invocation of a spy function.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<(Value, Vec<Value>)>>>);

impl Calls {
  pub fn count(&self) -> usize {
    self.0.lock().unwrap().len()
  }

  pub fn receiver(&self, call: usize) -> Value {
    self.0.lock().unwrap()[call].0.clone()
  }

  pub fn args(&self, call: usize) -> Vec<Value> {
    self.0.lock().unwrap()[call].1.clone()
  }
}

/// A function that records its calls and returns `"<this.name>|<args>"`.
pub fn spy_method(calls: &Calls) -> Function {
  let calls = calls.clone();
  Function::named("method", move |this, args| {
    calls.0.lock().unwrap().push((this.clone(), args.to_vec()));
    Ok(Value::from(describe(this, args)))
  })
}

/// A function that captures nothing, so dropping it really frees it.
pub fn plain_method() -> Function {
  Function::named("plain", |this, args| Ok(Value::from(describe(this, args))))
}

pub fn describe(this: &Value, args: &[Value]) -> String {
  let name = this.as_object().map(|o| o.get("name")).unwrap_or_default();
  let args: Vec<String> = args.iter().map(ToString::to_string).collect();
  format!("{}|{}", name, args.join(","))
}

pub fn named_object(name: &str) -> Object {
  Object::with_properties([("name", name)])
}

pub fn strings(values: &[&str]) -> Vec<Value> {
  values.iter().map(|s| Value::from(*s)).collect()
}
