use std::net::TcpListener;
use std::sync::OnceLock;

use snask_core::Value;

use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::config::ServerConfig;
use crate::dispatch::{Callback, Dispatcher};
use crate::errors::{DispatchError, ServeError, messages};
use crate::http;
use crate::threads::ThreadTable;
use crate::util::capabilities::Capabilities;

/// Process state shared by native bindings: the callback registry, the
/// builtin table, spawned threads and injected system capabilities.
pub struct Runtime {
    dispatcher: Dispatcher,
    builtins: BuiltinRegistry,
    threads: ThreadTable,
    caps: Capabilities,
    config: ServerConfig,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_parts(config, Capabilities::default(), &StdBuiltinProvider)
    }

    pub fn with_parts(
        config: ServerConfig,
        caps: Capabilities,
        provider: &dyn BuiltinProvider,
    ) -> Self {
        let mut builtins = BuiltinRegistry::new();
        provider.install(&mut builtins);
        Self {
            dispatcher: Dispatcher::new(),
            builtins,
            threads: ThreadTable::new(),
            caps,
            config,
        }
    }

    /// The process-wide runtime used by the C entry points. Server settings
    /// come from the environment.
    pub fn global() -> &'static Runtime {
        static GLOBAL: OnceLock<Runtime> = OnceLock::new();
        GLOBAL.get_or_init(|| Runtime::with_config(ServerConfig::from_env()))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn threads(&self) -> &ThreadTable {
        &self.threads
    }

    pub fn caps(&self) -> &Capabilities {
        &self.caps
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn register_callback(&self, name: &str, callback: Callback) -> Result<(), DispatchError> {
        self.dispatcher.register(name, callback)
    }

    pub fn try_call_builtin(&self, name: &str, args: &[Value]) -> Result<Value, String> {
        let fun = self
            .builtins
            .get(name)
            .ok_or_else(|| format!("{}: {name}", messages::UNKNOWN_BUILTIN))?;
        fun(self, args)
    }

    /// Calls a builtin by name. Unknown names and failures yield `Nil`.
    pub fn call_builtin(&self, name: &str, args: &[Value]) -> Value {
        match self.try_call_builtin(name, args) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("{name}: {e}");
                Value::Nil
            }
        }
    }

    /// Serves `routes` with this runtime's configuration until the request
    /// limit is reached.
    pub fn serve(&self, routes: Value) -> Result<usize, ServeError> {
        http::serve(&self.config, routes, &self.dispatcher)
    }

    pub fn serve_port(&self, port: u16, routes: Value) -> Result<usize, ServeError> {
        let config = self.config.clone().with_port(port);
        http::serve(&config, routes, &self.dispatcher)
    }

    pub fn serve_listener(&self, listener: &TcpListener, routes: Value) -> Result<usize, ServeError> {
        http::serve_listener(listener, &self.config, routes, &self.dispatcher)
    }
}
