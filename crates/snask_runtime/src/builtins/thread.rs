use super::super::Runtime;
use super::common::{arg, expect_args, rejected, str_arg, to_str};
use snask_core::Value;

/// Starts the 1-argument callback `name` on a new thread. `Nil` when no
/// such callback is registered.
pub fn builtin_thread_spawn(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("thread_spawn", args, 1)?;
    let name = to_str(&args[0])?;
    let Some(entry) = rt.dispatcher().lookup_single(name) else {
        return Ok(Value::Nil);
    };
    let handle = rt
        .threads()
        .spawn(name, entry, arg(args, 1).clone())
        .map_err(|e| e.to_string())?;
    Ok(Value::String(handle))
}

pub fn builtin_thread_join(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("thread_join", args, 1)?;
    Ok(rt.threads().join(to_str(&args[0])?).unwrap_or(Value::Nil))
}

pub fn builtin_thread_detach(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(handle) = str_arg(args, 0) else {
        return rejected("thread_detach");
    };
    Ok(Value::Boolean(rt.threads().detach(handle)))
}
