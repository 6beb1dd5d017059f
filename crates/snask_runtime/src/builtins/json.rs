//! Bindings over the JSON codec and the object accessors.

use super::super::Runtime;
use super::common::{arg, expect_args, rejected, str_arg, to_index, to_str};
use snask_core::{
    Object, Value, parse_ex, parse_or_nil, path_get, stringify, stringify_pretty,
};

pub fn builtin_json_parse(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_parse", args, 1)?;
    Ok(parse_or_nil(to_str(&args[0])?))
}

pub fn builtin_json_parse_ex(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_parse_ex", args, 1)?;
    Ok(parse_ex(to_str(&args[0])?))
}

pub fn builtin_json_stringify(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::String(stringify(arg(args, 0))))
}

pub fn builtin_json_stringify_pretty(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::String(stringify_pretty(arg(args, 0))))
}

pub fn builtin_json_get(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_get", args, 2)?;
    Ok(args[0].get(to_str(&args[1])?))
}

pub fn builtin_json_has(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(key) = str_arg(args, 1) else {
        return rejected("json_has");
    };
    Ok(Value::Boolean(
        arg(args, 0).as_object().is_some_and(|o| o.read().contains_key(key)),
    ))
}

/// Member count of an object, byte length of a string, 0 otherwise.
pub fn builtin_json_len(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let n = match arg(args, 0) {
        Value::Object(o) => o.read().len(),
        Value::String(s) => s.len(),
        _ => 0,
    };
    Ok(Value::Number(n as f64))
}

/// Member value at a position, whatever its key.
pub fn builtin_json_index(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_index", args, 2)?;
    Ok(args[0].at(to_index(&args[1])?))
}

pub fn builtin_json_set(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::Boolean(set_named(args)))
}

fn set_named(args: &[Value]) -> bool {
    let (Some(obj), Some(name)) = (arg(args, 0).as_object(), str_arg(args, 1)) else {
        return false;
    };
    obj.write().set(name, arg(args, 2).clone());
    true
}

pub fn builtin_new_object(_rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(Value::object(Object::new()))
}

pub fn builtin_new_array(_rt: &Runtime, _args: &[Value]) -> Result<Value, String> {
    Ok(Value::object(Object::new_array()))
}

pub fn builtin_json_type(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::str(arg(args, 0).type_name()))
}

pub fn builtin_arr_len(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let n = arg(args, 0).as_object().map_or(0, |o| o.read().len());
    Ok(Value::Number(n as f64))
}

pub fn builtin_arr_get(rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    builtin_json_index(rt, args)
}

/// Replaces an existing element. Does not grow the array.
pub fn builtin_arr_set(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let (Some(obj), Ok(i)) = (arg(args, 0).as_object(), to_index(arg(args, 1))) else {
        return rejected("sjson_arr_set");
    };
    Ok(Value::Boolean(obj.write().replace_at(i, arg(args, 2).clone())))
}

pub fn builtin_arr_push(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let Some(obj) = arg(args, 0).as_object() else {
        return rejected("sjson_arr_push");
    };
    obj.write().push(arg(args, 1).clone());
    Ok(Value::Boolean(true))
}

pub fn builtin_path_get(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_path_get", args, 2)?;
    Ok(path_get(&args[0], to_str(&args[1])?))
}

pub fn builtin_get_member(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("s_get_member", args, 2)?;
    Ok(args[0].get(to_str(&args[1])?))
}

/// Replaces a member in place; an absent name is appended. `false` when the
/// target is not an object or the name is not a string.
pub fn builtin_set_member(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    Ok(Value::Boolean(set_named(args)))
}

/// Allocates an object whose members are the given names, all `Nil`.
/// Accepts either one array of names or the names as separate arguments.
pub fn builtin_alloc_obj(_rt: &Runtime, args: &[Value]) -> Result<Value, String> {
    let names: Vec<String> = match args {
        [Value::Object(list)] => list
            .read()
            .values()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => args
            .iter()
            .map(|v| to_str(v).map(str::to_string))
            .collect::<Result<_, _>>()?,
    };
    Ok(Value::object(Object::with_keys(names)))
}
