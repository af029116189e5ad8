//! Public macros for ergonomic binding.

/// Binds a callable through the global binder, variadically.
///
/// The first argument is the callable, the second the receiver (`Undefined`
/// when omitted) and any further arguments are fixed as leading arguments.
/// Every argument is converted with `Value::from`. Evaluates to
/// `Result<BoundFn, BindError>`; `bind!()` with no arguments is an
/// `InvalidArgument` error, like binding a non-callable.
///
/// # Examples
///
/// ```
/// use fibre_bind::{bind, Function, Object, Value};
///
/// let join = Function::named("join", |this, args| {
///   let name = this.as_object().map(|o| o.get("name")).unwrap_or_default();
///   let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
///   Ok(Value::from(format!("{}:{}", name, parts.join(","))))
/// });
/// let context = Object::with_properties([("name", "ctx")]);
///
/// let bound = bind!(&join, &context, "a", "b").unwrap();
/// assert_eq!(bound.call(&[Value::from(1)]).unwrap(), Value::from("ctx:a,b,1"));
///
/// // Same key, same bound callable.
/// assert_eq!(bound, bind!(&join, &context, "a", "b").unwrap());
///
/// assert!(bind!().is_err());
/// ```
#[macro_export]
macro_rules! bind {
    () => {
        $crate::global().bind_args(&[])
    };

    ($($arg:expr),+ $(,)?) => {
        $crate::global().bind_args(&[$($crate::Value::from($arg)),+])
    };
}
