use std::io::Write;

use super::super::Runtime;
use super::common::{arg, expect_args, to_str};
use snask_core::Value;

/// Writes each argument followed by a space, without a newline.
pub fn builtin_print(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let mut out = std::io::stdout().lock();
    for v in args {
        write!(out, "{v} ").map_err(|e| e.to_string())?;
    }
    Ok(Value::Nil)
}

pub fn builtin_println(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let mut out = std::io::stdout().lock();
    for (i, v) in args.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ").map_err(|e| e.to_string())?;
        }
        write!(out, "{v}").map_err(|e| e.to_string())?;
    }
    out.write_all(b"\n").map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;
    Ok(Value::Nil)
}

/// Byte length of a string, member count of an object, 0 otherwise.
pub fn builtin_len(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("len", args, 1)?;
    let n = match &args[0] {
        Value::String(s) => s.len(),
        Value::Object(o) => o.read().len(),
        _ => 0,
    };
    Ok(Value::Number(n as f64))
}

pub fn builtin_upper(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("upper", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::String(s.to_ascii_uppercase())),
        other => Ok(other.clone()),
    }
}

pub fn builtin_lower(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("lower", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::String(s.to_ascii_lowercase())),
        other => Ok(other.clone()),
    }
}

pub fn builtin_concat(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("concat", args, 2)?;
    let a = to_str(&args[0])?;
    let b = to_str(&args[1])?;
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    Ok(Value::String(s))
}

pub fn builtin_is_nil(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::Boolean(arg(args, 0).is_nil()))
}

pub fn builtin_is_str(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::Boolean(arg(args, 0).is_string()))
}

pub fn builtin_is_obj(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::Boolean(arg(args, 0).is_object()))
}
