//! # Fibre Bind
//!
//! Memoized receiver binding and partial application.
//!
//! `bind(f, receiver, args...)` produces a callable that invokes `f` with a
//! fixed receiver and a fixed prefix of arguments. Binding the same function
//! to the same receiver with the same arguments again returns the *identical*
//! bound callable, so bound callables can be compared, hashed and used as
//! stable handles (for example as listener identities).
//!
//! ## Core Concepts
//!
//! - **Value**: the dynamic values bound callables work with. Primitives
//!   compare by value; `Object`, `Function` and `BoundFn` compare by identity.
//! - **Binder**: the memoizing cache, a trie with one level per argument.
//!   Identity keys are held weakly, so the cache never keeps a function, a
//!   receiver or an object argument alive on its own.
//! - **Global Binder**: a process-wide binder, accessible via `global()`, the
//!   `bind` function and the `bind!` macro.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_bind::{bind, Function, Object, Value};
//!
//! let greet = Function::named("greet", |this, args| {
//!   let name = this.as_object().map(|o| o.get("name")).unwrap_or_default();
//!   Ok(Value::from(format!("{} greets {}", name, args[0])))
//! });
//! let alice = Object::with_properties([("name", "alice")]);
//!
//! let greet_bob = bind!(&greet, &alice, "bob").unwrap();
//! assert_eq!(greet_bob.call(&[]).unwrap(), Value::from("alice greets bob"));
//!
//! // The same request yields the same bound callable.
//! assert_eq!(greet_bob, bind!(&greet, &alice, "bob").unwrap());
//!
//! // Binding something that is not callable is rejected.
//! assert!(bind!(&alice, &greet).is_err());
//! ```

mod binder;
mod bound;
mod builder;
mod error;
mod global;
mod key;
mod macros;
mod metrics;
mod node;
mod shared;
mod value;

pub use binder::Binder;
pub use bound::{BoundFn, WeakBound};
pub use builder::BinderBuilder;
pub use error::{BindError, BuildError, Result, Thrown};
pub use global::{bind, global};
pub use metrics::MetricsSnapshot;
pub use value::{Function, Object, Value, WeakFunction, WeakObject};
