use std::path::Path;

use super::super::Runtime;
use super::common::{expect_args, to_str};
use snask_core::Value;

pub fn builtin_path_basename(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("path_basename", args, 1)?;
    let p = Path::new(to_str(&args[0])?);
    Ok(Value::str(
        p.file_name().map(|s| s.to_string_lossy()).unwrap_or_default(),
    ))
}

/// Parent directory; `"."` for a bare file name.
pub fn builtin_path_dirname(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("path_dirname", args, 1)?;
    let p = Path::new(to_str(&args[0])?);
    let dir = match p.parent() {
        Some(d) if d.as_os_str().is_empty() => ".".to_string(),
        Some(d) => d.to_string_lossy().into_owned(),
        None => p.to_string_lossy().into_owned(),
    };
    Ok(Value::String(dir))
}

/// Extension with its leading dot, or `""`.
pub fn builtin_path_extname(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("path_extname", args, 1)?;
    let p = Path::new(to_str(&args[0])?);
    Ok(Value::String(
        p.extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    ))
}

pub fn builtin_path_join(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("path_join", args, 2)?;
    let joined = Path::new(to_str(&args[0])?).join(to_str(&args[1])?);
    Ok(Value::String(joined.to_string_lossy().into_owned()))
}
