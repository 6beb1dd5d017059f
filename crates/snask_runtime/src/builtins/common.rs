use snask_core::Value;

use crate::errors::messages;

static NIL: Value = Value::Nil;

/// Argument `i`, or `Nil` when the caller passed fewer.
pub fn arg(args: &[Value], i: usize) -> &Value {
    args.get(i).unwrap_or(&NIL)
}

/// String argument `i`, or `None` when missing or not a string.
pub fn str_arg(args: &[Value], i: usize) -> Option<&str> {
    arg(args, i).as_str()
}

/// The `false` reply of a flag-returning builtin called with bad arguments.
pub fn rejected(name: &str) -> Result<Value, String> {
    log::debug!("{name}: {}", messages::BAD_ARGUMENTS);
    Ok(Value::Boolean(false))
}

pub fn expect_args(name: &str, args: &[Value], n: usize) -> Result<(), String> {
    if args.len() < n {
        return Err(format!("{name} expects {n} argument{}", if n == 1 { "" } else { "s" }));
    }
    Ok(())
}

pub fn to_str(v: &Value) -> Result<&str, String> {
    v.as_str()
        .ok_or_else(|| format!("{}, got {}", messages::NOT_A_STRING, v.type_name()))
}

pub fn to_f64(v: &Value) -> Result<f64, String> {
    v.as_f64()
        .ok_or_else(|| format!("{}, got {}", messages::NOT_A_NUMBER, v.type_name()))
}

pub fn to_f64_pair(a: &Value, b: &Value) -> Result<(f64, f64), String> {
    Ok((to_f64(a)?, to_f64(b)?))
}

/// Non-negative integral index, truncating like a C cast.
pub fn to_index(v: &Value) -> Result<usize, String> {
    let n = to_f64(v)?;
    if n.is_finite() && n >= 0.0 {
        Ok(n as usize)
    } else {
        Err(format!("invalid index {n}"))
    }
}
