//! Error types and common message constants.

use thiserror::Error;

/// A JSON parse failure.
///
/// `offset` is the byte position in the source where the parser gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {offset}")]
pub struct JsonError {
    pub message: String,
    pub offset: usize,
}

impl JsonError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

pub mod messages {
    pub const UNEXPECTED_END: &str = "Unexpected end of input";
    pub const TRAILING_CHARACTERS: &str = "Trailing characters after JSON value";
    pub const EXPECTED_COLON: &str = "Expected ':' after object key";
    pub const EXPECTED_KEY: &str = "Expected string key in object";
    pub const EXPECTED_OBJECT_SEP: &str = "Expected ',' or '}' in object";
    pub const EXPECTED_ARRAY_SEP: &str = "Expected ',' or ']' in array";
    pub const INVALID_NUMBER: &str = "Invalid number";
    pub const INVALID_ESCAPE: &str = "Invalid escape sequence";
    pub const UNTERMINATED_STRING: &str = "Unterminated string";
    pub const NESTING_TOO_DEEP: &str = "Nesting too deep";
    pub const NOT_AN_OBJECT: &str = "Not an object";
    pub const KEY_NOT_FOUND: &str = "Key not found";
    pub const INDEX_OUT_OF_BOUNDS: &str = "Index out of bounds";
    pub const INVALID_PATH: &str = "Invalid path";
}
