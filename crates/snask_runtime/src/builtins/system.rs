use std::env;
use std::thread;
use std::time::Duration;

use super::super::Runtime;
use super::common::{arg, expect_args, rejected, str_arg, to_f64, to_index, to_str};
use crate::util::capabilities::random_hex;
use snask_core::Value;

/// Token length used when no byte count is given.
const DEFAULT_TOKEN_BYTES: usize = 16;
const MAX_TOKEN_BYTES: usize = 4096;

pub fn builtin_os_cwd(_rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(env::current_dir()
        .map(|p| Value::String(p.to_string_lossy().into_owned()))
        .unwrap_or(Value::Nil))
}

pub fn builtin_os_platform(_rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(Value::str(env::consts::OS))
}

pub fn builtin_os_arch(_rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(Value::str(env::consts::ARCH))
}

pub fn builtin_os_getenv(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("os_getenv", args, 1)?;
    Ok(env::var(to_str(&args[0])?)
        .map(Value::String)
        .unwrap_or(Value::Nil))
}

pub fn builtin_os_setenv(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(key), Some(value)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("os_setenv");
    };
    if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
        return Ok(Value::Boolean(false));
    }
    // SAFETY: compiled programs mutate the environment from their main
    // thread only, the same contract as setenv(3).
    unsafe { env::set_var(key, value) };
    Ok(Value::Boolean(true))
}

/// `n` random bytes as hex (default 16). `Nil` when the OS source fails.
pub fn builtin_random_hex(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let n = match arg(args, 0) {
        Value::Nil => DEFAULT_TOKEN_BYTES,
        v => to_index(v)?.min(MAX_TOKEN_BYTES),
    };
    random_hex(rt.caps().rng.as_ref(), n)
        .map(Value::String)
        .map_err(|e| format!("random source: {e}"))
}

pub fn builtin_time(rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(rt.caps().clock.unix_secs() as f64))
}

pub fn builtin_sleep(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sleep", args, 1)?;
    let ms = to_f64(&args[0])?;
    if ms.is_finite() && ms > 0.0 {
        thread::sleep(Duration::from_secs_f64(ms / 1000.0));
    }
    Ok(Value::Nil)
}

/// String comparison whose running time depends only on the lengths.
pub fn builtin_const_time_eq(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(a), Some(b)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("auth_const_time_eq");
    };
    Ok(Value::Boolean(const_time_eq(a.as_bytes(), b.as_bytes())))
}

pub fn const_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = (a.len() != b.len()) as u8;
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= x ^ y;
    }
    diff == 0
}
