//! JSON codec over the tagged value model.
//!
//! - `parse` / `parse_or_nil` / `parse_ex` - recursive-descent decoding
//! - `stringify` / `stringify_pretty` - compact and 2-space indented encoding
//! - `TypedLiteral` - reserved-key shapes (`$i64`, `$date`, ...) of the
//!   configuration dialect
//! - `path_get` - structured lookup into nested objects

mod parse;
mod path;
mod stringify;
pub mod typed;

pub use parse::{parse, parse_ex, parse_or_nil};
pub use path::{PathSegment, parse_path, path_get, resolve_path};
pub use stringify::{format_number, stringify, stringify_pretty, write_escaped};
pub use typed::TypedLiteral;

use crate::object::Object;
use crate::value::Value;

/// Builds the `{ok, value, error}` result object used by operations that
/// must tell failure apart from a valid empty answer.
pub fn result_object(ok: bool, value: Value, error: &str) -> Value {
    let mut obj = Object::with_capacity(3);
    obj.set("ok", Value::Boolean(ok));
    obj.set("value", value);
    obj.set("error", Value::str(error));
    Value::object(obj)
}
