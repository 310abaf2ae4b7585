//! Method-style dispatch for the `fnkit` utilities.
//!
//! The utilities library exports free functions whose last parameter is
//! the subject they act on. This crate binds a curated registry of those
//! functions onto the shared value kinds ([`Target`]) so that callers can
//! write method-shaped calls — `invoke(rt, list, "append", args)` instead
//! of threading the subject into a free-function call themselves.
//!
//! # Process-wide state
//!
//! [`install`] mutates one table shared by the whole process: from the
//! moment it returns, every piece of code calling [`invoke`] sees the
//! installed methods. That is the point of the crate, not an accident —
//! but it is global state, so install once during initialization, before
//! anything dispatches. Installation is idempotent and re-entrant; code
//! that wants an explicit, non-ambient extension set can build its own
//! [`Extensions`] value instead and scope it however it likes.
//!
//! ```
//! use std::sync::Arc;
//!
//! use fnkit::{Runtime, Value, format_value};
//!
//! methodize::install(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")).unwrap();
//!
//! let rt = &mut Runtime::new();
//! let list = Value::List(Arc::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
//! let out = methodize::invoke(rt, list, "append", vec![Value::Int(4)]).unwrap();
//! assert_eq!(format_value(&out), "[1, 2, 3, 4]");
//! ```

mod extensions;
mod registry;

pub use extensions::{Extensions, InstallError, Method, Provenance, install, invoke};
pub use fnkit::{Runtime, RuntimeError, Value};
pub use registry::{REGISTRY, Target};
