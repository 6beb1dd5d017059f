use super::super::Runtime;
use super::common::{arg, expect_args, rejected, to_str};
use crate::http::{cookie_get, query_get};
use snask_core::Value;

pub fn builtin_qs_get(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("blaze_qs_get", args, 2)?;
    Ok(query_get(to_str(&args[0])?, to_str(&args[1])?))
}

pub fn builtin_cookie_get(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("blaze_cookie_get", args, 2)?;
    Ok(cookie_get(to_str(&args[0])?, to_str(&args[1])?))
}

/// Serves `routes` on `port`. Returns `false` when the server cannot start,
/// `true` once the configured request limit has been served.
pub fn builtin_blaze_run(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(port) = arg(args, 0).as_f64().filter(|p| (0.0..=65535.0).contains(p)) else {
        return rejected("blaze_run");
    };
    match rt.serve_port(port as u16, arg(args, 1).clone()) {
        Ok(handled) => {
            log::info!("served {handled} connections");
            Ok(Value::Boolean(true))
        }
        Err(e) => {
            log::error!("{e}");
            Ok(Value::Boolean(false))
        }
    }
}
