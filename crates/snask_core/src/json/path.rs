//! Structured lookup into nested objects.
//!
//! Paths are dot-separated names with optional `[n]` positional steps:
//! `users[0].name`, `users.0.name` (same member on a dense array).

use crate::errors::messages;
use crate::value::Value;

use super::result_object;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, String> {
    let mut segs = Vec::new();
    if path.is_empty() {
        return Ok(segs);
    }
    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if name.is_empty() && rest.is_empty() {
            return Err(format!("{}: empty segment in '{}'", messages::INVALID_PATH, path));
        }
        if !name.is_empty() {
            segs.push(PathSegment::Key(name.to_string()));
        }
        while !rest.is_empty() {
            let close = rest
                .find(']')
                .ok_or_else(|| format!("{}: unclosed '[' in '{}'", messages::INVALID_PATH, path))?;
            let idx = rest[1..close]
                .parse::<usize>()
                .map_err(|_| format!("{}: bad index in '{}'", messages::INVALID_PATH, path))?;
            segs.push(PathSegment::Index(idx));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(format!("{}: unexpected '{}' in '{}'", messages::INVALID_PATH, rest, path));
            }
        }
    }
    Ok(segs)
}

/// Walks `segs` from `root`. The error names the prefix where the walk stopped.
pub fn resolve_path(root: &Value, segs: &[PathSegment]) -> Result<Value, String> {
    let mut cur = root.clone();
    let mut walked = String::new();
    for seg in segs {
        match seg {
            PathSegment::Key(k) => {
                if !walked.is_empty() {
                    walked.push('.');
                }
                walked.push_str(k);
            }
            PathSegment::Index(i) => {
                walked.push('[');
                walked.push_str(itoa::Buffer::new().format(*i));
                walked.push(']');
            }
        }
        let Value::Object(obj) = &cur else {
            return Err(format!("{} at '{}'", messages::NOT_AN_OBJECT, walked));
        };
        let next = {
            let obj = obj.read();
            match seg {
                PathSegment::Key(k) => obj
                    .get(k)
                    .cloned()
                    .ok_or_else(|| format!("{} at '{}'", messages::KEY_NOT_FOUND, walked))?,
                PathSegment::Index(i) => obj
                    .value_at(*i)
                    .cloned()
                    .ok_or_else(|| format!("{} at '{}'", messages::INDEX_OUT_OF_BOUNDS, walked))?,
            }
        };
        cur = next;
    }
    Ok(cur)
}

/// Returns `{ok, value, error}` for `path` under `root`.
pub fn path_get(root: &Value, path: &str) -> Value {
    match parse_path(path).and_then(|segs| resolve_path(root, &segs)) {
        Ok(v) => result_object(true, v, ""),
        Err(e) => result_object(false, Value::Nil, &e),
    }
}
