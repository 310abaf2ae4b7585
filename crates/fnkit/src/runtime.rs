use thiserror::Error;

use crate::values::{BuiltinValue, Value, format_value};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Message(String),
    #[error("`{0}` is not callable")]
    NotCallable(String),
}

/// The evaluation context function values are applied through.
///
/// It carries no state of its own today; it exists so that every native
/// function receives the same `(args, &mut Runtime)` calling convention
/// and can itself apply function-valued arguments.
#[derive(Debug, Default)]
pub struct Runtime;

impl Runtime {
    pub fn new() -> Self {
        Runtime
    }

    /// Apply one argument. Under-applied builtins curry: the result is a
    /// new function value holding the argument, runnable once its full
    /// arity has been supplied.
    pub fn apply(&mut self, func: Value, arg: Value) -> Result<Value, RuntimeError> {
        match func {
            Value::Builtin(builtin) => builtin.apply(arg, self),
            other => Err(RuntimeError::NotCallable(format_value(&other))),
        }
    }

    /// Apply arguments left to right. Calling with fewer arguments than
    /// the function's arity returns the curried continuation.
    pub fn call(&mut self, func: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut current = func;
        for arg in args {
            current = self.apply(current, arg)?;
        }
        Ok(current)
    }
}

impl BuiltinValue {
    fn apply(&self, arg: Value, runtime: &mut Runtime) -> Result<Value, RuntimeError> {
        let mut args = self.args.clone();
        args.push(arg);
        if args.len() == self.imp.arity {
            (self.imp.func)(args, runtime)
        } else {
            Ok(Value::Builtin(BuiltinValue {
                imp: self.imp.clone(),
                args,
            }))
        }
    }
}
