use super::super::Runtime;
use super::common::{expect_args, to_f64, to_f64_pair};
use snask_core::Value;

pub fn builtin_abs(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("abs", args, 1)?;
    Ok(Value::Number(to_f64(&args[0])?.abs()))
}

pub fn builtin_max(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("max", args, 2)?;
    let (a, b) = to_f64_pair(&args[0], &args[1])?;
    Ok(Value::Number(a.max(b)))
}

pub fn builtin_min(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("min", args, 2)?;
    let (a, b) = to_f64_pair(&args[0], &args[1])?;
    Ok(Value::Number(a.min(b)))
}
