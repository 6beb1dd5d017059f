//! Ordered name/value container.
//!
//! One `Object` serves both as a struct/map (string keys) and as an array
//! (keys `"0","1",...` assigned at push time). Insertion order is part of the
//! value: codecs and iteration always walk members in the order they were
//! first inserted.

use std::ffi::c_void;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::RandomState;
use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::value::Value;

pub type FastIndexMap<K, V> = IndexMap<K, V, RandomState>;
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

/// How an object was created. Only consulted for empty objects, where the
/// member keys cannot tell a map from an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Map,
    Array,
}

#[derive(Clone)]
pub struct Object {
    members: FastIndexMap<String, Value>,
    shape: Shape,
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            members: IndexMap::with_capacity_and_hasher(cap, fast_hasher()),
            shape: Shape::Map,
        }
    }

    pub fn new_array() -> Self {
        Self {
            shape: Shape::Array,
            ..Self::new()
        }
    }

    /// Allocates an object with the given member names, all set to `Nil`.
    /// A repeated name keeps its first position.
    pub fn with_keys<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut obj = Self::new();
        for name in names {
            obj.members.entry(name.into()).or_insert(Value::Nil);
        }
        obj
    }

    pub fn from_values<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let mut obj = Self::new_array();
        for v in items {
            obj.push(v);
        }
        obj
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.members.get_mut(name)
    }

    /// Member at `index` as `(name, value)`.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.members.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.members.get_index(index).map(|(_, v)| v)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.members.get_index_of(name)
    }

    /// Replaces an existing member in place, or appends a new one.
    /// Returns the previous value when the name was already present.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.members.insert(name.into(), value)
    }

    /// Replaces the value at an existing position. The key is untouched.
    pub fn replace_at(&mut self, index: usize, value: Value) -> bool {
        match self.members.get_index_mut(index) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Appends `value` under the decimal form of the current length.
    ///
    /// On a dense sequence this always adds a member. If the object already
    /// holds a member named after the current length, that member is replaced.
    pub fn push(&mut self, value: Value) {
        let mut buf = itoa::Buffer::new();
        let key = buf.format(self.members.len());
        self.members.insert(key.to_string(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(|k| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.members.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when member `i` is keyed by the decimal form of `i` for every `i`.
    pub fn is_dense_sequence(&self) -> bool {
        let mut buf = itoa::Buffer::new();
        self.members
            .keys()
            .enumerate()
            .all(|(i, k)| k.as_str() == buf.format(i))
    }

    /// Whether codecs render this object as `[...]`. Empty objects follow the
    /// way they were created.
    pub fn is_array(&self) -> bool {
        if self.members.is_empty() {
            self.shape == Shape::Array
        } else {
            self.is_dense_sequence()
        }
    }
}

/// Shared handle to a heap object.
///
/// Copies of a handle refer to the same allocation; identity is the address
/// of that allocation.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    pub fn new(obj: Object) -> Self {
        Self(Arc::new(RwLock::new(obj)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Converts the handle into an opaque pointer for foreign code. The
    /// object stays alive until the pointer is turned back with
    /// [`ObjectRef::from_raw`].
    pub fn into_raw(self) -> *const c_void {
        Arc::into_raw(self.0) as *const c_void
    }

    /// Takes a new handle for an opaque pointer without consuming the one
    /// foreign code holds.
    ///
    /// # Safety
    /// `ptr` must come from [`ObjectRef::into_raw`] and must not have been
    /// reclaimed with [`ObjectRef::from_raw`].
    pub unsafe fn clone_from_raw(ptr: *const c_void) -> Self {
        let ptr = ptr as *const RwLock<Object>;
        unsafe {
            Arc::increment_strong_count(ptr);
            Self(Arc::from_raw(ptr))
        }
    }

    /// Reclaims the handle behind an opaque pointer.
    ///
    /// # Safety
    /// `ptr` must come from [`ObjectRef::into_raw`] and is invalid afterwards.
    pub unsafe fn from_raw(ptr: *const c_void) -> Self {
        unsafe { Self(Arc::from_raw(ptr as *const RwLock<Object>)) }
    }
}

impl From<Object> for ObjectRef {
    fn from(obj: Object) -> Self {
        ObjectRef::new(obj)
    }
}
