use std::collections::HashMap;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::runtime::{Runtime, RuntimeError};

pub(crate) type BuiltinFunc =
    dyn Fn(Vec<Value>, &mut Runtime) -> Result<Value, RuntimeError> + Send + Sync;

/// The dynamic value universe the operations act on.
///
/// Compound values share structure through `Arc`; cloning is cheap and
/// every operation returns fresh values instead of mutating its inputs.
#[derive(Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(String),
    List(Arc<Vec<Value>>),
    Tuple(Vec<Value>),
    Record(Arc<HashMap<String, Value>>),
    Constructor { name: String, args: Vec<Value> },
    Builtin(BuiltinValue),
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Value::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Tuple(v) => f.debug_tuple("Tuple").field(v).finish(),
            Value::Record(v) => f.debug_tuple("Record").field(v).finish(),
            Value::Constructor { name, args } => f
                .debug_struct("Constructor")
                .field("name", name)
                .field("args", args)
                .finish(),
            Value::Builtin(builtin) => write!(f, "Builtin(<{}>)", builtin.imp.name),
        }
    }
}

/// A named native function plus the arguments applied to it so far.
///
/// Applying an argument either produces another `BuiltinValue` carrying
/// one more pending argument, or, once `imp.arity` arguments are present,
/// runs the function.
#[derive(Clone)]
pub struct BuiltinValue {
    pub imp: Arc<BuiltinImpl>,
    pub args: Vec<Value>,
}

pub struct BuiltinImpl {
    pub name: String,
    pub arity: usize,
    pub(crate) func: Arc<BuiltinFunc>,
}

/// Render a value for display and for `join`-style concatenation.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Unit => "Unit".to_string(),
        Value::Bool(value) => value.to_string(),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Text(value) => value.clone(),
        Value::DateTime(value) => value.clone(),
        Value::List(items) => format!(
            "[{}]",
            items
                .iter()
                .map(format_value)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Tuple(items) => format!(
            "({})",
            items
                .iter()
                .map(format_value)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Record(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            format!(
                "{{{}}}",
                entries
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", format_value(value)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
        Value::Constructor { name, args } => {
            if args.is_empty() {
                name.clone()
            } else {
                format!(
                    "{}({})",
                    name,
                    args.iter().map(format_value).collect::<Vec<_>>().join(", ")
                )
            }
        }
        Value::Builtin(builtin) => format!("<builtin:{}>", builtin.imp.name),
    }
}

/// Structural equality. Functions never compare equal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Unit, Value::Unit) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::DateTime(a), Value::DateTime(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(left, right)| values_equal(left, right))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(left, right)| values_equal(left, right))
        }
        (Value::Record(a), Value::Record(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| {
                    b.get(key)
                        .map(|other| values_equal(value, other))
                        .unwrap_or(false)
                })
        }
        (Value::Constructor { name: a, args: aa }, Value::Constructor { name: b, args: bb }) => {
            a == b
                && aa.len() == bb.len()
                && aa.iter().zip(bb.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

/// The hashable, totally ordered projection of `Value`, used for keyed
/// dedup and key-based sorting. Floats order numerically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Unit,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    DateTime(String),
    Tuple(Vec<KeyValue>),
    Record(Vec<(String, KeyValue)>),
}

impl KeyValue {
    pub fn try_from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Unit => Some(KeyValue::Unit),
            Value::Bool(value) => Some(KeyValue::Bool(*value)),
            Value::Int(value) => Some(KeyValue::Int(*value)),
            Value::Float(value) => Some(KeyValue::Float(OrderedFloat(*value))),
            Value::Text(value) => Some(KeyValue::Text(value.clone())),
            Value::DateTime(value) => Some(KeyValue::DateTime(value.clone())),
            Value::Tuple(items) => {
                let keys: Option<Vec<KeyValue>> =
                    items.iter().map(KeyValue::try_from_value).collect();
                keys.map(KeyValue::Tuple)
            }
            Value::Record(fields) => {
                let mut pairs: Vec<(String, KeyValue)> = fields
                    .iter()
                    .map(|(k, v)| KeyValue::try_from_value(v).map(|kv| (k.clone(), kv)))
                    .collect::<Option<Vec<_>>>()?;
                pairs.sort_by(|a, b| a.0.cmp(&b.0));
                Some(KeyValue::Record(pairs))
            }
            _ => None,
        }
    }
}
