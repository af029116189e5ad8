mod common;

use common::{named_object, plain_method};
use fibre_bind::{Binder, Function, Object, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_cache_does_not_keep_keys_alive() {
  // Arrange
  let binder = Binder::new();
  let method = plain_method();
  let context = named_object("context");
  let weak_method = method.downgrade();
  let weak_context = context.downgrade();

  let bound = binder
    .bind(&Value::from(&method), &Value::from(&context), &[])
    .unwrap();
  let weak_bound = bound.downgrade();

  // Act
  drop(bound);
  drop(method);
  drop(context);

  // Assert: both key objects are gone even before any sweep.
  assert!(!weak_method.is_alive());
  assert!(!weak_context.is_alive());
  assert!(weak_bound.is_alive());

  // The stale edge is pruned by a sweep, releasing the memoized identity.
  assert_eq!(binder.sweep(), 1);
  assert!(!weak_bound.is_alive());
  assert_eq!(binder.metrics().reclaimed, 1);
}

#[test]
fn test_bound_function_keeps_its_own_components_alive() {
  let binder = Binder::new();
  let method = plain_method();
  let context = named_object("pinned");
  let weak_method = method.downgrade();
  let weak_context = context.downgrade();

  let bound = binder
    .bind(&Value::from(&method), &Value::from(&context), &[])
    .unwrap();
  drop(method);
  drop(context);

  // A handed-out bound function behaves like a closure over its components.
  assert!(weak_method.is_alive());
  assert!(weak_context.is_alive());
  assert_eq!(bound.call(&[]).unwrap(), Value::from("pinned|"));

  drop(bound);
  assert!(!weak_method.is_alive());
  assert!(!weak_context.is_alive());
}

#[test]
fn test_identity_survives_while_keys_are_alive() {
  let binder = Binder::new();
  let method = Value::from(plain_method());
  let context = Value::from(Object::new());

  let first_id = binder.bind(&method, &context, &strings_ab()).unwrap().id();
  // No handle to the bound function survives, but its keys do.
  assert_eq!(binder.sweep(), 0);
  let second_id = binder.bind(&method, &context, &strings_ab()).unwrap().id();

  assert_eq!(first_id, second_id);
}

#[test]
fn test_new_object_after_reclamation_is_a_miss() {
  let binder = Binder::new();
  let method = Value::from(plain_method());

  let first = binder
    .bind(&method, &Value::from(named_object("same")), &[])
    .unwrap();
  let first_id = first.id();
  drop(first);
  binder.sweep();

  let second = binder
    .bind(&method, &Value::from(named_object("same")), &[])
    .unwrap();

  assert_ne!(second.id(), first_id);
  assert_eq!(binder.metrics().misses, 2);
}

#[test]
fn test_object_partial_arguments_are_held_weakly() {
  let binder = Binder::new();
  let method = Value::from(plain_method());
  let context = Value::from(Object::new());
  let argument = Object::new();
  let weak_argument = argument.downgrade();

  let bound = binder
    .bind(&method, &context, &[Value::from("x"), Value::from(&argument)])
    .unwrap();
  drop(bound);
  drop(argument);

  assert!(!weak_argument.is_alive());
  assert_eq!(binder.sweep(), 1);
}

#[test]
fn test_primitive_keys_are_never_reclaimed() {
  let binder = Binder::new();
  let method = Value::from(plain_method());

  let first_id = binder
    .bind(&method, &Value::from("receiver"), &[Value::from(7)])
    .unwrap()
    .id();
  assert_eq!(binder.sweep(), 0);
  let second_id = binder
    .bind(&method, &Value::from("receiver"), &[Value::from(7)])
    .unwrap()
    .id();

  assert_eq!(first_id, second_id);
}

#[test]
fn test_weak_tables_sweep_themselves_as_they_grow() {
  // Arrange
  let binder = Binder::builder().sweep_threshold(4).build().unwrap();
  let method = Value::from(plain_method());

  // Act: bind against a stream of short-lived receivers.
  for _ in 0..10 {
    let receiver = Object::new();
    binder.bind(&method, &Value::from(&receiver), &[]).unwrap();
  }

  // Assert
  let metrics = binder.metrics();
  assert!(metrics.sweeps >= 1);
  assert!(metrics.reclaimed >= 3);
  assert_eq!(metrics.misses, 10);
}

#[test]
fn test_lazy_sweeps_leave_live_entries_intact() {
  // Arrange: one binding whose keys stay alive.
  let binder = Binder::builder().sweep_threshold(4).build().unwrap();
  let method = Value::from(plain_method());
  let live = Value::from(named_object("live"));
  let live_id = binder.bind(&method, &live, &strings_ab()).unwrap().id();

  // Act: push the same level past its sweep mark with short-lived receivers.
  for _ in 0..10 {
    let receiver = Object::new();
    binder.bind(&method, &Value::from(&receiver), &[]).unwrap();
  }
  let before = binder.metrics();
  let rebound = binder.bind(&method, &live, &strings_ab()).unwrap();

  // Assert
  assert!(before.sweeps >= 1);
  assert!(before.reclaimed >= 3);
  assert_eq!(rebound.id(), live_id);
  assert_eq!(binder.metrics().hits, before.hits + 1);
  assert_eq!(rebound.call(&[]).unwrap(), Value::from("live|a,b"));
}

// --- Deep Tries ---

const DEEP: usize = 100_000;

fn deep_args() -> Vec<Value> {
  (0..DEEP).map(|i| Value::from(i as f64)).collect()
}

fn arg_counter() -> Function {
  Function::named("count", |_, args| Ok(Value::from(args.len() as u32)))
}

#[test]
fn test_deep_tries_sweep_and_drop_iteratively() {
  // Arrange
  let binder = Binder::builder().shards(2).build().unwrap();
  let method = Value::from(arg_counter());
  let live = Value::from(Object::new());
  let partial = deep_args();

  // Act & Assert: bind, call and re-bind at full depth.
  let bound = binder.bind(&method, &live, &partial).unwrap();
  assert_eq!(bound.call(&[Value::Null]).unwrap(), Value::from(DEEP as u32 + 1));
  assert_eq!(binder.bind(&method, &live, &partial).unwrap(), bound);

  // A sweep walks every level without touching live entries.
  assert_eq!(binder.sweep(), 0);

  // Pruning a dead receiver releases a subtree just as deep.
  let short_lived = Object::new();
  let weak_doomed = binder
    .bind(&method, &Value::from(&short_lived), &partial)
    .unwrap()
    .downgrade();
  drop(short_lived);
  assert_eq!(binder.sweep(), 1);
  assert!(!weak_doomed.is_alive());

  // Dropping the binder tears down the remaining deep subtree.
  let weak_live = bound.downgrade();
  drop(bound);
  drop(binder);
  assert!(!weak_live.is_alive());
}

#[test]
fn test_lazy_sweep_inside_bind_prunes_a_deep_subtree() {
  let binder = Binder::builder().shards(2).sweep_threshold(2).build().unwrap();
  let method = Value::from(arg_counter());

  let short_lived = Object::new();
  binder
    .bind(&method, &Value::from(&short_lived), &deep_args())
    .unwrap();
  drop(short_lived);

  // The second receiver fills the level to its mark and triggers the sweep.
  let next = Object::new();
  binder.bind(&method, &Value::from(&next), &[]).unwrap();

  let metrics = binder.metrics();
  assert_eq!(metrics.sweeps, 1);
  assert_eq!(metrics.reclaimed, 1);
}

fn strings_ab() -> Vec<Value> {
  vec![Value::from("a"), Value::from("b")]
}
