//! Tracking allocator.
//!
//! Memory handed to compiled code (C strings, scratch buffers) is owned by the
//! process rather than by any single value. Every pointer returned here is
//! recorded in a registry and released in one sweep, either when the
//! [`Tracker`] is dropped or, for the global tracker, at process exit once
//! [`install`] has run.
//!
//! Pointers from this module must never be passed to `free` directly, and
//! pointers from plain `malloc` must never be passed to [`Tracker::realloc`].

use std::ffi::{c_char, c_void};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, Once, OnceLock, PoisonError};

use ahash::RandomState;
use hashbrown::HashSet;

type Registry = HashSet<usize, RandomState>;

pub struct Tracker {
    live: Mutex<Registry>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            live: Mutex::new(HashSet::with_hasher(RandomState::new())),
        }
    }

    /// The process-wide tracker used by the C ABI.
    pub fn global() -> &'static Tracker {
        static GLOBAL: OnceLock<Tracker> = OnceLock::new();
        GLOBAL.get_or_init(Tracker::new)
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocates `n` bytes. Returns null, unregistered, when the system
    /// allocator fails.
    pub fn alloc(&self, n: usize) -> *mut u8 {
        let p = unsafe { libc::malloc(n.max(1)) } as *mut u8;
        if !p.is_null() {
            self.lock().insert(p as usize);
        }
        p
    }

    /// Resizes a tracked allocation, moving its registry entry to the new
    /// address. On failure the old pointer stays valid and registered and
    /// null is returned.
    ///
    /// # Safety
    /// `ptr` must be null or a live pointer obtained from this tracker.
    pub unsafe fn realloc(&self, ptr: *mut u8, n: usize) -> *mut u8 {
        if ptr.is_null() {
            return self.alloc(n);
        }
        let mut live = self.lock();
        let p = unsafe { libc::realloc(ptr as *mut c_void, n.max(1)) } as *mut u8;
        if p.is_null() {
            return p;
        }
        live.remove(&(ptr as usize));
        live.insert(p as usize);
        p
    }

    /// Copies `s` into a tracked NUL-terminated buffer.
    pub fn dup(&self, s: &str) -> *mut c_char {
        self.dup_bytes(s.as_bytes())
    }

    /// Copies at most `n` bytes of `s`, stopping early at an embedded NUL.
    pub fn dupn(&self, s: &[u8], n: usize) -> *mut c_char {
        let end = s
            .iter()
            .take(n)
            .position(|&b| b == 0)
            .unwrap_or(n.min(s.len()));
        self.dup_bytes(&s[..end])
    }

    fn dup_bytes(&self, bytes: &[u8]) -> *mut c_char {
        let p = self.alloc(bytes.len() + 1);
        if p.is_null() {
            return std::ptr::null_mut();
        }
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), p, bytes.len());
            *p.add(bytes.len()) = 0;
        }
        p as *mut c_char
    }

    pub fn is_tracked(&self, ptr: *const u8) -> bool {
        self.lock().contains(&(ptr as usize))
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// Frees every registered pointer exactly once and empties the registry.
    /// Returns how many allocations were released.
    pub fn release_all(&self) -> usize {
        let mut live = self.lock();
        let count = live.len();
        for addr in live.drain() {
            unsafe { libc::free(addr as *mut c_void) };
        }
        live.shrink_to_fit();
        count
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.release_all();
    }
}

extern "C" fn release_at_exit() {
    Tracker::global().release_all();
}

/// Registers the process-exit sweep for the global tracker. Idempotent;
/// returns false if the exit hook could not be registered.
pub fn install() -> bool {
    static INSTALL: Once = Once::new();
    static INSTALLED: AtomicBool = AtomicBool::new(false);
    INSTALL.call_once(|| {
        let rc = unsafe { libc::atexit(release_at_exit) };
        INSTALLED.store(rc == 0, Ordering::SeqCst);
        log::debug!("tracking allocator exit hook registered (rc={rc})");
    });
    INSTALLED.load(Ordering::SeqCst)
}

pub fn alloc(n: usize) -> *mut u8 {
    Tracker::global().alloc(n)
}

/// # Safety
/// See [`Tracker::realloc`].
pub unsafe fn realloc(ptr: *mut u8, n: usize) -> *mut u8 {
    unsafe { Tracker::global().realloc(ptr, n) }
}

pub fn dup(s: &str) -> *mut c_char {
    Tracker::global().dup(s)
}

pub fn dupn(s: &[u8], n: usize) -> *mut c_char {
    Tracker::global().dupn(s, n)
}
