use snask_core::Value;

use super::request::Method;

pub const HANDLER_KEY: &str = "handler";

/// Route value for a request: `"METHOD path"` first, then the bare path.
pub fn resolve_route(routes: &Value, method: Method, path: &str) -> Option<Value> {
    let table = routes.as_object()?.read();
    let compound = format!("{} {}", method.as_str(), path);
    table
        .get(&compound)
        .or_else(|| table.get(path))
        .cloned()
}

/// Callback name when `value` is a handler route.
pub fn handler_name(value: &Value) -> Option<String> {
    let obj = value.as_object()?.read();
    obj.get(HANDLER_KEY)?.as_str().map(str::to_string)
}
