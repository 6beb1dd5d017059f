//! Core types for the Snask native runtime.
//!
//! This crate contains the pieces every other layer builds on:
//! - `Value` - the five-variant tagged runtime value
//! - `Object` / `ObjectRef` - ordered name/value container doubling as struct and array
//! - `track` - process-lifetime tracking allocator for memory handed across the C ABI
//! - `json` - JSON codec, typed-literal shapes and structured path lookup

pub mod equality;
pub mod errors;
pub mod json;
pub mod object;
pub mod track;
pub mod value;

pub use equality::{deep_eq, loose_eq, loose_ne, strict_eq};
pub use errors::JsonError;
pub use json::{
    TypedLiteral, format_number, parse, parse_ex, parse_or_nil, path_get, result_object, stringify,
    stringify_pretty,
};
pub use object::{Object, ObjectRef};
pub use track::Tracker;
pub use value::Value;
