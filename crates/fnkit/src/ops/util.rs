use std::collections::HashMap;
use std::sync::Arc;

use crate::runtime::{Runtime, RuntimeError};
use crate::values::{BuiltinImpl, BuiltinValue, Value, format_value};

/// Wrap a native function into a curried function value of the given
/// arity. The subject-last convention applies: the final parameter is the
/// value the operation acts on.
pub fn builtin(
    name: &str,
    arity: usize,
    func: impl Fn(Vec<Value>, &mut Runtime) -> Result<Value, RuntimeError> + Send + Sync + 'static,
) -> Value {
    Value::Builtin(BuiltinValue {
        imp: Arc::new(BuiltinImpl {
            name: name.to_string(),
            arity,
            func: Arc::new(func),
        }),
        args: Vec::new(),
    })
}

pub(super) fn make_some(value: Value) -> Value {
    Value::Constructor {
        name: "Some".to_string(),
        args: vec![value],
    }
}

pub(super) fn make_none() -> Value {
    Value::Constructor {
        name: "None".to_string(),
        args: Vec::new(),
    }
}

pub(super) fn list_value(items: Vec<Value>) -> Value {
    Value::List(Arc::new(items))
}

pub(super) fn record_value(fields: HashMap<String, Value>) -> Value {
    Value::Record(Arc::new(fields))
}

pub(super) fn expect_list(value: Value, ctx: &str) -> Result<Arc<Vec<Value>>, RuntimeError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects List, got {}",
            format_value(&other)
        ))),
    }
}

pub(super) fn expect_int(value: Value, ctx: &str) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(value) => Ok(value),
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects Int, got {}",
            format_value(&other)
        ))),
    }
}

pub(super) fn expect_text(value: Value, ctx: &str) -> Result<String, RuntimeError> {
    match value {
        Value::Text(text) => Ok(text),
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects Text, got {}",
            format_value(&other)
        ))),
    }
}

pub(super) fn expect_bool(value: Value, ctx: &str) -> Result<bool, RuntimeError> {
    match value {
        Value::Bool(value) => Ok(value),
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects Bool, got {}",
            format_value(&other)
        ))),
    }
}

pub(super) fn expect_record(
    value: Value,
    ctx: &str,
) -> Result<Arc<HashMap<String, Value>>, RuntimeError> {
    match value {
        Value::Record(fields) => Ok(fields),
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects Record, got {}",
            format_value(&other)
        ))),
    }
}

pub(super) fn expect_pair(value: Value, ctx: &str) -> Result<(Value, Value), RuntimeError> {
    match value {
        Value::Tuple(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            Ok((items.next().unwrap(), items.next().unwrap()))
        }
        other => Err(RuntimeError::Message(format!(
            "{ctx} expects a pair, got {}",
            format_value(&other)
        ))),
    }
}

/// Resolve a possibly negative index against `len`. Out-of-range stays
/// out-of-range (`None`); clamping is the caller's business.
pub(super) fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Clamp a possibly negative slice bound into `0..=len`.
pub(super) fn clamp_bound(bound: i64, len: usize) -> usize {
    let len = len as i64;
    let bound = if bound < 0 { len + bound } else { bound };
    bound.clamp(0, len) as usize
}

/// Clamp a count-like argument into `0..=len`.
pub(super) fn clamp_count(count: i64, len: usize) -> usize {
    count.clamp(0, len as i64) as usize
}
