//! Reserved-key shapes produced by the configuration dialect's typed literals.
//!
//! Each literal decodes to a small object with a single `$`-prefixed key,
//! except unknown literal tags which keep their name under `$type` and the
//! payload under `value`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::object::Object;
use crate::value::Value;

pub const KEY_I64: &str = "$i64";
pub const KEY_DATE: &str = "$date";
pub const KEY_DEC: &str = "$dec";
pub const KEY_BIN: &str = "$bin";
pub const KEY_ENUM: &str = "$enum";
pub const KEY_TYPE: &str = "$type";
pub const KEY_VALUE: &str = "value";

/// Largest magnitude at which every integer is exactly representable as f64.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedLiteral {
    I64(String),
    Date(String),
    Dec(String),
    Bin(String),
    Enum(String),
    Other { type_name: String, value: String },
}

impl TypedLiteral {
    /// Maps a literal tag (`date`, `dec`, ...) and its payload to a shape.
    pub fn from_tag(tag: &str, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        match tag {
            "i64" => TypedLiteral::I64(payload),
            "date" => TypedLiteral::Date(payload),
            "dec" => TypedLiteral::Dec(payload),
            "bin" => TypedLiteral::Bin(payload),
            "enum" => TypedLiteral::Enum(payload),
            _ => TypedLiteral::Other {
                type_name: tag.to_string(),
                value: payload,
            },
        }
    }

    /// A plain number when `i` round-trips through f64, `{"$i64": ...}`
    /// otherwise.
    pub fn integer(i: i64) -> Value {
        if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i) {
            Value::Number(i as f64)
        } else {
            TypedLiteral::I64(i.to_string()).to_value()
        }
    }

    pub fn binary(bytes: &[u8]) -> Self {
        TypedLiteral::Bin(STANDARD.encode(bytes))
    }

    /// Decoded bytes of a `Bin` payload. None for other shapes and invalid
    /// base64.
    pub fn decode_binary(&self) -> Option<Vec<u8>> {
        match self {
            TypedLiteral::Bin(b64) => STANDARD.decode(b64).ok(),
            _ => None,
        }
    }

    /// The integer of an `I64` payload.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedLiteral::I64(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Object::with_capacity(2);
        match self {
            TypedLiteral::I64(s) => obj.set(KEY_I64, Value::str(s.as_str())),
            TypedLiteral::Date(s) => obj.set(KEY_DATE, Value::str(s.as_str())),
            TypedLiteral::Dec(s) => obj.set(KEY_DEC, Value::str(s.as_str())),
            TypedLiteral::Bin(s) => obj.set(KEY_BIN, Value::str(s.as_str())),
            TypedLiteral::Enum(s) => obj.set(KEY_ENUM, Value::str(s.as_str())),
            TypedLiteral::Other { type_name, value } => {
                obj.set(KEY_TYPE, Value::str(type_name.as_str()));
                obj.set(KEY_VALUE, Value::str(value.as_str()))
            }
        };
        Value::object(obj)
    }

    /// Recognizes a reserved shape. The object must consist of exactly the
    /// reserved key(s) with string payloads; anything else is ordinary data.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?.read();
        match obj.len() {
            1 => {
                let (k, payload) = obj.get_index(0)?;
                let payload = payload.as_str()?.to_string();
                match k {
                    KEY_I64 => Some(TypedLiteral::I64(payload)),
                    KEY_DATE => Some(TypedLiteral::Date(payload)),
                    KEY_DEC => Some(TypedLiteral::Dec(payload)),
                    KEY_BIN => Some(TypedLiteral::Bin(payload)),
                    KEY_ENUM => Some(TypedLiteral::Enum(payload)),
                    _ => None,
                }
            }
            2 => {
                let type_name = obj.get(KEY_TYPE)?.as_str()?.to_string();
                let value = obj.get(KEY_VALUE)?.as_str()?.to_string();
                Some(TypedLiteral::Other { type_name, value })
            }
            _ => None,
        }
    }
}
