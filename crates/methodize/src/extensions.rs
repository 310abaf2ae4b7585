use std::sync::{OnceLock, RwLock};

use fnkit::{Runtime, RuntimeError, Value, format_value};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::registry::{REGISTRY, Target};

/// Who installed a binding, for diagnostics only. Never consulted during
/// dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provenance {
    pub source: String,
    pub version: String,
}

/// A free function adapted to the method calling convention.
///
/// The wrapped value is the collaborator's export, untouched; re-binding
/// the same name therefore never stacks adapters.
#[derive(Clone)]
pub struct Method {
    func: Value,
    provenance: Provenance,
}

impl Method {
    fn bind(func: Value, provenance: Provenance) -> Self {
        Method { func, provenance }
    }

    /// The underlying free function, exactly as the collaborator exports it.
    pub fn func(&self) -> &Value {
        &self.func
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Forward `args ++ [receiver]` to the wrapped function.
    ///
    /// No arity inspection happens here: an under-applied call yields the
    /// function's curried continuation, and shape errors surface from the
    /// function itself, unchanged.
    pub fn call(
        &self,
        runtime: &mut Runtime,
        receiver: Value,
        mut args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        args.push(receiver);
        runtime.call(self.func.clone(), args)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum InstallError {
    #[error(
        "registry names `{name}` for {target:?}, but the utilities library exports no such function"
    )]
    UnknownFunction { target: Target, name: String },
    #[error("provenance tags must be non-empty")]
    EmptyProvenance,
}

/// The installed method tables, one per extension target.
#[derive(Default)]
pub struct Extensions {
    by_target: FxHashMap<Target, FxHashMap<String, Method>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the built-in registry against the utilities library's
    /// exports. Idempotent: repeated installation re-attaches the same
    /// functions and records the latest provenance.
    pub fn install(&mut self, source: &str, version: &str) -> Result<(), InstallError> {
        self.install_from(REGISTRY, fnkit::lookup, source, version)
    }

    /// Walk `registry` in order, resolve every method name through
    /// `lookup`, and attach the bound methods under the given provenance.
    ///
    /// Fails fast on the first unresolved name: nothing after it is
    /// attached, while bindings attached before it stay in place.
    pub fn install_from(
        &mut self,
        registry: &[(Target, &[&str])],
        lookup: impl Fn(&str) -> Option<Value>,
        source: &str,
        version: &str,
    ) -> Result<(), InstallError> {
        if source.is_empty() || version.is_empty() {
            return Err(InstallError::EmptyProvenance);
        }
        for (target, names) in registry {
            for name in *names {
                let func = lookup(name).ok_or_else(|| InstallError::UnknownFunction {
                    target: *target,
                    name: (*name).to_string(),
                })?;
                self.attach(*target, name, func, source, version);
            }
        }
        Ok(())
    }

    fn attach(&mut self, target: Target, name: &str, func: Value, source: &str, version: &str) {
        let methods = self.by_target.entry(target).or_default();
        if let Some(existing) = methods.get(name) {
            if existing.provenance.source != source {
                warn!(
                    "rebinding `{name}` on {target:?}: {} -> {source}",
                    existing.provenance.source
                );
            }
        }
        debug!("bind {target:?}.{name} ({source} {version})");
        let provenance = Provenance {
            source: source.to_string(),
            version: version.to_string(),
        };
        methods.insert(name.to_string(), Method::bind(func, provenance));
    }

    /// The method installed under `name` for `target`, if any.
    pub fn method(&self, target: Target, name: &str) -> Option<&Method> {
        self.by_target.get(&target)?.get(name)
    }

    /// Method-call `name` on `subject` with `args`.
    pub fn invoke(
        &self,
        runtime: &mut Runtime,
        subject: Value,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let target = Target::of(&subject).ok_or_else(|| {
            RuntimeError::Message(format!(
                "no extension target for {}",
                format_value(&subject)
            ))
        })?;
        let method = self.method(target, name).ok_or_else(|| {
            RuntimeError::Message(format!("no method `{name}` installed for {target:?} values"))
        })?;
        method.call(runtime, subject, args)
    }
}

static INSTALLED: OnceLock<RwLock<Extensions>> = OnceLock::new();

fn installed() -> &'static RwLock<Extensions> {
    INSTALLED.get_or_init(|| RwLock::new(Extensions::new()))
}

/// Install the built-in registry into the process-wide table.
///
/// Every later `invoke` in the process sees the methods. Safe to call
/// repeatedly, including across duplicate initialization paths; the last
/// call's provenance wins.
pub fn install(source: &str, version: &str) -> Result<(), InstallError> {
    installed()
        .write()
        .expect("extension table lock poisoned")
        .install(source, version)
}

/// Method-call `name` on `subject` through the process-wide table.
pub fn invoke(
    runtime: &mut Runtime,
    subject: Value,
    name: &str,
    args: Vec<Value>,
) -> Result<Value, RuntimeError> {
    installed()
        .read()
        .expect("extension table lock poisoned")
        .invoke(runtime, subject, name, args)
}
