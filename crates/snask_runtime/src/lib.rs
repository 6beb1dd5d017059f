//! Native runtime services for compiled programs.
//!
//! - [`Dispatcher`]: name-based callback registry with fixed calling conventions
//! - [`http`]: sequential embedded HTTP service driven by a route table
//! - [`BuiltinRegistry`]: native library operations callable by name
//! - [`abi`]: C entry points over the `{tag, num, ptr}` value header

pub mod abi;
pub mod builtins;
pub mod builtins_registry;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod http;
pub mod runtime;
pub mod threads;
pub mod util;

pub use builtins_registry::{BuiltinFn, BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
pub use config::ServerConfig;
pub use dispatch::{CallKind, Callback, Dispatcher, symbol_name};
pub use errors::{DispatchError, ServeError};
pub use runtime::Runtime;
pub use snask_core::{Object, ObjectRef, Value};
pub use util::capabilities::{Capabilities, Clock, RandomSource};
