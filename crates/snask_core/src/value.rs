//! Runtime value representation.
//!
//! Every piece of data crossing between compiled code, native bindings and the
//! codec is a [`Value`]. The variant tag is authoritative: payload accessors
//! return `None` unless the tag matches.

use std::fmt;

use crate::json::{format_number, stringify};
use crate::object::{Object, ObjectRef};

pub const TYPE_NIL: &str = "nil";
pub const TYPE_NUMBER: &str = "number";
pub const TYPE_BOOLEAN: &str = "boolean";
pub const TYPE_STRING: &str = "string";
pub const TYPE_OBJECT: &str = "object";
pub const TYPE_ARRAY: &str = "array";

/// Tagged runtime value.
///
/// Cloning a `Value::Object` clones the handle, not the object, so both
/// copies observe the same members and compare equal under strict equality.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Number(f64),
    Boolean(bool),
    String(String),
    Object(ObjectRef),
}

impl Value {
    pub const NIL: Value = Value::Nil;

    pub fn from_f64(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Moves `obj` behind a fresh handle.
    pub fn object(obj: Object) -> Self {
        Value::Object(ObjectRef::new(obj))
    }

    /// Builds an array-shaped object from `items`, keyed `"0".."n-1"`.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::object(Object::from_values(items))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Name of the runtime tag. Objects report `array` when they are a dense
    /// `0..n-1` sequence.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => TYPE_NIL,
            Value::Number(_) => TYPE_NUMBER,
            Value::Boolean(_) => TYPE_BOOLEAN,
            Value::String(_) => TYPE_STRING,
            Value::Object(o) => {
                if o.read().is_array() {
                    TYPE_ARRAY
                } else {
                    TYPE_OBJECT
                }
            }
        }
    }

    /// Member lookup by name. Nil for non-objects and missing names.
    pub fn get(&self, name: &str) -> Value {
        match self {
            Value::Object(o) => o.read().get(name).cloned().unwrap_or_default(),
            _ => Value::Nil,
        }
    }

    /// Member lookup by position. Nil for non-objects and out-of-range indexes.
    pub fn at(&self, index: usize) -> Value {
        match self {
            Value::Object(o) => o.read().value_at(index).cloned().unwrap_or_default(),
            _ => Value::Nil,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::strict_eq(self, other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::object(obj)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Object(o) => write!(f, "Object(@{:#x} {})", o.addr(), stringify(self)),
        }
    }
}

/// Plain rendering used by `print`: strings verbatim, objects as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Object(_) => f.write_str(&stringify(self)),
        }
    }
}
