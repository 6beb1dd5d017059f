//! Late-binding callback dispatch.
//!
//! Native code calls compiled functions by name. Each name resolves to the
//! symbol `f_<name>` in a process-wide registry, and every entry records the
//! calling convention it was registered under. A call through a convention
//! other than the registered one, or a call to an unknown name, yields `Nil`.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use snask_core::Value;
use snask_core::object::{FastHashMap, fast_map_new};

use crate::errors::DispatchError;

pub const SYMBOL_PREFIX: &str = "f_";

pub fn symbol_name(name: &str) -> String {
    format!("{SYMBOL_PREFIX}{name}")
}

/// Fixed calling conventions used by native call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Thread entry points and simple UI callbacks.
    Single,
    /// UI callbacks carrying an opaque context string.
    Context,
    /// HTTP handlers: method, path, query, body, cookie header.
    Http,
}

impl CallKind {
    pub fn arity(self) -> usize {
        match self {
            CallKind::Single => 1,
            CallKind::Context => 2,
            CallKind::Http => 5,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-argument", self.arity())
    }
}

pub type Fn1 = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
pub type Fn2 = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;
pub type Fn5 = Arc<dyn Fn(&Value, &Value, &Value, &Value, &Value) -> Value + Send + Sync>;

#[derive(Clone)]
pub enum Callback {
    Single(Fn1),
    Context(Fn2),
    Http(Fn5),
}

impl Callback {
    pub fn single<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Callback::Single(Arc::new(f))
    }

    pub fn context<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Callback::Context(Arc::new(f))
    }

    pub fn http<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value, &Value, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        Callback::Http(Arc::new(f))
    }

    pub fn kind(&self) -> CallKind {
        match self {
            Callback::Single(_) => CallKind::Single,
            Callback::Context(_) => CallKind::Context,
            Callback::Http(_) => CallKind::Http,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.kind())
    }
}

pub struct Dispatcher {
    table: RwLock<FastHashMap<String, Callback>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(fast_map_new()),
        }
    }

    /// Binds `name` to `callback`. Re-registering under the same convention
    /// replaces the previous function; a different convention is rejected.
    pub fn register(&self, name: &str, callback: Callback) -> Result<(), DispatchError> {
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '\0') {
            return Err(DispatchError::InvalidName(name.to_string()));
        }
        let symbol = symbol_name(name);
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(&symbol) {
            if existing.kind() != callback.kind() {
                return Err(DispatchError::ArityConflict {
                    symbol,
                    registered: existing.kind(),
                    requested: callback.kind(),
                });
            }
        }
        log::debug!("registered {symbol} ({})", callback.kind());
        table.insert(symbol, callback);
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> bool {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.remove(&symbol_name(name)).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<CallKind> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.get(&symbol_name(name)).map(Callback::kind)
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<String> = table.keys().cloned().collect();
        out.sort();
        out
    }

    /// Clones the entry out so the lock is released before the call runs.
    pub fn lookup(&self, name: &str, kind: CallKind) -> Option<Callback> {
        let symbol = symbol_name(name);
        let found = {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            table.get(&symbol).cloned()
        };
        match found {
            Some(cb) if cb.kind() == kind => Some(cb),
            Some(cb) => {
                log::warn!("{symbol} is registered as {}, called as {kind}", cb.kind());
                None
            }
            None => {
                log::debug!("no callback registered for {symbol}");
                None
            }
        }
    }

    pub fn lookup_single(&self, name: &str) -> Option<Fn1> {
        match self.lookup(name, CallKind::Single)? {
            Callback::Single(f) => Some(f),
            _ => None,
        }
    }

    pub fn call1(&self, name: &str, a: &Value) -> Value {
        match self.lookup(name, CallKind::Single) {
            Some(Callback::Single(f)) => f(a),
            _ => Value::Nil,
        }
    }

    pub fn call2(&self, name: &str, a: &Value, b: &Value) -> Value {
        match self.lookup(name, CallKind::Context) {
            Some(Callback::Context(f)) => f(a, b),
            _ => Value::Nil,
        }
    }

    pub fn call5(&self, name: &str, a: &Value, b: &Value, c: &Value, d: &Value, e: &Value) -> Value {
        match self.lookup(name, CallKind::Http) {
            Some(Callback::Http(f)) => f(a, b, c, d, e),
            _ => Value::Nil,
        }
    }
}
