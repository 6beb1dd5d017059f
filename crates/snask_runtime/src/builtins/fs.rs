//! Filesystem bindings. Failures are reported as `false` or `Nil`; the OS
//! error is only logged.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::UNIX_EPOCH;

use super::super::Runtime;
use super::common::{expect_args, rejected, str_arg, to_str};
use snask_core::Value;

fn report<T>(op: &str, path: &str, r: std::io::Result<T>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!("{op} {path}: {e}");
            None
        }
    }
}

pub fn builtin_sfs_read(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sfs_read", args, 1)?;
    let path = to_str(&args[0])?;
    Ok(report("read", path, fs::read(path))
        .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        .unwrap_or(Value::Nil))
}

pub fn builtin_sfs_write(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(path), Some(content)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("sfs_write");
    };
    Ok(Value::Boolean(report("write", path, fs::write(path, content)).is_some()))
}

pub fn builtin_sfs_append(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(path), Some(content)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("sfs_append");
    };
    let r = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| f.write_all(content.as_bytes()));
    Ok(Value::Boolean(report("append", path, r).is_some()))
}

pub fn builtin_sfs_delete(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_delete");
    };
    Ok(Value::Boolean(report("delete", path, fs::remove_file(path)).is_some()))
}

pub fn builtin_sfs_exists(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_exists");
    };
    Ok(Value::Boolean(fs::metadata(path).is_ok()))
}

pub fn builtin_sfs_copy(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(from), Some(to)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("sfs_copy");
    };
    Ok(Value::Boolean(report("copy", from, fs::copy(from, to)).is_some()))
}

pub fn builtin_sfs_move(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(from), Some(to)) = (str_arg(args, 0), str_arg(args, 1)) else {
        return rejected("sfs_move");
    };
    Ok(Value::Boolean(report("move", from, fs::rename(from, to)).is_some()))
}

pub fn builtin_sfs_mkdir(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_mkdir");
    };
    Ok(Value::Boolean(report("mkdir", path, fs::create_dir_all(path)).is_some()))
}

/// Removes an empty directory only.
pub fn builtin_sfs_rmdir(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_rmdir");
    };
    Ok(Value::Boolean(report("rmdir", path, fs::remove_dir(path)).is_some()))
}

pub fn builtin_sfs_is_file(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_is_file");
    };
    Ok(Value::Boolean(fs::metadata(path).is_ok_and(|m| m.is_file())))
}

pub fn builtin_sfs_is_dir(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(path) = str_arg(args, 0) else {
        return rejected("sfs_is_dir");
    };
    Ok(Value::Boolean(fs::metadata(path).is_ok_and(|m| m.is_dir())))
}

/// Entry names as an array, sorted bytewise.
pub fn builtin_sfs_listdir(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sfs_listdir", args, 1)?;
    let path = to_str(&args[0])?;
    let Some(entries) = report("listdir", path, fs::read_dir(path)) else {
        return Ok(Value::Nil);
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(Value::array(names.into_iter().map(Value::String)))
}

pub fn builtin_sfs_size(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sfs_size", args, 1)?;
    let path = to_str(&args[0])?;
    Ok(report("stat", path, fs::metadata(path))
        .map(|m| Value::Number(m.len() as f64))
        .unwrap_or(Value::Nil))
}

/// Modification time in seconds since the epoch.
pub fn builtin_sfs_mtime(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sfs_mtime", args, 1)?;
    let path = to_str(&args[0])?;
    Ok(report("stat", path, fs::metadata(path))
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| Value::Number(d.as_secs() as f64))
        .unwrap_or(Value::Nil))
}
