use super::super::Runtime;
use super::common::{expect_args, to_f64};
use snask_core::{Value, format_number};

/// Parses a decimal number, ignoring surrounding whitespace. `Nil` when the
/// text is not a number.
pub fn builtin_str_to_num(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("str_to_num", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or(Value::Nil)),
        Value::Number(n) => Ok(Value::Number(*n)),
        _ => Ok(Value::Nil),
    }
}

pub fn builtin_num_to_str(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("num_to_str", args, 1)?;
    let n = to_f64(&args[0])?;
    Ok(Value::String(format_number(n)))
}
