//! Functional utilities over dynamic values.
//!
//! Every operation is exported as a named, curried function value whose
//! *last* parameter is the subject it acts on; `lookup` resolves
//! operations by name. Applying fewer arguments than an operation's arity
//! yields a reusable continuation:
//!
//! ```
//! use std::sync::Arc;
//!
//! use fnkit::{Runtime, RuntimeError, Value, builtin, format_value, lookup};
//!
//! let rt = &mut Runtime::new();
//! let double = builtin("double", 1, |mut args, _| match args.pop().unwrap() {
//!     Value::Int(n) => Ok(Value::Int(n * 2)),
//!     other => Err(RuntimeError::Message(format!(
//!         "double expects Int, got {}",
//!         format_value(&other)
//!     ))),
//! });
//!
//! let map = lookup("map").unwrap();
//! let partial = rt.apply(map, double).unwrap();
//!
//! let list = Value::List(Arc::new(vec![Value::Int(1), Value::Int(2)]));
//! let out = rt.apply(partial, list).unwrap();
//! assert_eq!(format_value(&out), "[2, 4]");
//! ```

mod ops;
mod runtime;
mod values;

pub use ops::{builtin, lookup};
pub use runtime::{Runtime, RuntimeError};
pub use values::{BuiltinImpl, BuiltinValue, KeyValue, Value, format_value, values_equal};

pub type R = Result<Value, RuntimeError>;
