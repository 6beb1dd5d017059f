use snask_core::Value;

/// Value of `key` in a raw query string. A key without `=` maps to `""`;
/// an absent key is `Nil`.
pub fn query_get(query: &str, key: &str) -> Value {
    for seg in query.split('&') {
        match seg.split_once('=') {
            Some((k, v)) if k == key => return Value::str(v),
            None if seg == key => return Value::str(""),
            _ => {}
        }
    }
    Value::Nil
}

/// Value of `key` in a `Cookie` header. First match wins.
pub fn cookie_get(header: &str, key: &str) -> Value {
    for seg in header.split(';') {
        if let Some((k, v)) = seg.trim().split_once('=') {
            if k == key {
                return Value::str(v);
            }
        }
    }
    Value::Nil
}
