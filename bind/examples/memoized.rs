use fibre_bind::{bind, global, Function, Object, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

// Counts how often the underlying handler actually runs.
static HANDLED: AtomicUsize = AtomicUsize::new(0);

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let on_click = Function::named("on_click", |this, args| {
    HANDLED.fetch_add(1, Ordering::SeqCst);
    let label = this.as_object().map(|o| o.get("label")).unwrap_or_default();
    Ok(Value::from(format!("{label} clicked with {}", args[0])))
  });
  let button = Object::with_properties([("label", "Save")]);

  // --- Memoized Binding ---
  // Re-rendering binds the same handler again; the bound function is reused.
  println!("--- Binding twice ---");
  let first = bind!(&on_click, &button, "left").unwrap();
  let second = bind!(&on_click, &button, "left").unwrap();
  println!("First id: {}, second id: {}", first.id(), second.id());
  assert_eq!(first, second, "Same key should yield the same bound function");

  println!("{}", first.call(&[]).unwrap());
  println!("{}", second.call(&[]).unwrap());
  assert_eq!(HANDLED.load(Ordering::SeqCst), 2);

  // --- Different Keys ---
  let right = bind!(&on_click, &button, "right").unwrap();
  assert_ne!(first, right, "Different arguments should yield a new bound function");
  println!("{}\n", right.call(&[]).unwrap());

  // --- Reclamation ---
  println!("--- Dropping the button ---");
  let weak_button = button.downgrade();
  drop((first, second, right, button));
  println!("Button alive after drop: {}", weak_button.is_alive());
  assert!(!weak_button.is_alive());

  let reclaimed = global().sweep();
  println!("Sweep reclaimed {reclaimed} cache edge(s).\n");

  println!("{}", global().metrics());
}
