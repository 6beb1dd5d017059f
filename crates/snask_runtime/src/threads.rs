//! OS threads started from compiled code.
//!
//! Handles are strings of the form `thread:<n>`. A handle is consumed by
//! either `join` or `detach`; afterwards it is unknown.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use snask_core::Value;
use snask_core::object::{FastHashMap, fast_map_new};

use crate::dispatch::Fn1;

pub const HANDLE_PREFIX: &str = "thread:";

pub struct ThreadTable {
    next: AtomicU64,
    live: Mutex<FastHashMap<String, JoinHandle<Value>>>,
}

impl Default for ThreadTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadTable {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            live: Mutex::new(fast_map_new()),
        }
    }

    /// Runs `entry(arg)` on a new thread and returns its handle.
    pub fn spawn(&self, name: &str, entry: Fn1, arg: Value) -> io::Result<String> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        let mut buf = itoa::Buffer::new();
        let handle = format!("{HANDLE_PREFIX}{}", buf.format(id));
        let join = thread::Builder::new()
            .name(format!("snask-{name}"))
            .spawn(move || entry(&arg))?;
        log::debug!("spawned {handle} running {name}");
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.clone(), join);
        Ok(handle)
    }

    /// Blocks until the thread finishes and returns its result. Unknown
    /// handles and panicked threads yield `None`.
    pub fn join(&self, handle: &str) -> Option<Value> {
        let join = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle)?;
        match join.join() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("{handle} panicked");
                None
            }
        }
    }

    /// Forgets the thread; it keeps running to completion on its own.
    pub fn detach(&self, handle: &str) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle)
            .is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
