mod list;
mod list_extras;
mod util;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::values::Value;

pub use util::builtin;

/// Look up an exported operation by name.
pub fn lookup(name: &str) -> Option<Value> {
    OPS.get_or_init(build_all).get(name).cloned()
}

static OPS: OnceLock<HashMap<String, Value>> = OnceLock::new();

fn build_all() -> HashMap<String, Value> {
    let mut env = HashMap::new();
    list::register(&mut env);
    list_extras::register(&mut env);
    env
}
