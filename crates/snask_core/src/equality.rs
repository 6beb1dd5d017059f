//! The two equality contracts of the runtime, plus structural comparison.
//!
//! `strict_eq` is tag-exact and is what internal bookkeeping uses.
//! `loose_eq` backs `==` in compiled code: numbers and booleans coerce into
//! each other, nothing else does.

use crate::value::Value;

pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}

pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Number(_) | Value::Boolean(_), Value::Number(_) | Value::Boolean(_)) => {
            numeric(a) == numeric(b)
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}

#[inline]
pub fn loose_ne(a: &Value, b: &Value) -> bool {
    !loose_eq(a, b)
}

fn numeric(v: &Value) -> f64 {
    match v {
        Value::Number(n) => *n,
        Value::Boolean(true) => 1.0,
        _ => 0.0,
    }
}

/// Structural equality: objects compare member by member, in order.
///
/// Not one of the language-level contracts; codec tests and tooling use it
/// to compare trees built from different allocations.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let (x, y) = (x.read(), y.read());
            x.len() == y.len()
                && x.is_array() == y.is_array()
                && x
                    .iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && deep_eq(va, vb))
        }
        _ => strict_eq(a, b),
    }
}
