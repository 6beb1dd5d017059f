use crate::errors::JsonError;
use crate::errors::messages;
use crate::object::Object;
use crate::value::Value;

use super::result_object;

const MAX_DEPTH: usize = 512;

/// Code points above this decode to [`PLACEHOLDER`]; the decoder does not
/// assemble multi-byte characters from `\u` escapes.
const MAX_ESCAPED_CODE_POINT: u32 = 0x7F;
const PLACEHOLDER: char = '?';

/// Parses a complete JSON document. Anything but whitespace after the
/// top-level value is an error.
pub fn parse(src: &str) -> Result<Value, JsonError> {
    let mut p = Parser::new(src);
    p.skip_ws();
    let v = p.parse_value(0)?;
    p.skip_ws();
    if !p.eof() {
        return Err(p.err(messages::TRAILING_CHARACTERS));
    }
    Ok(v)
}

/// Like [`parse`], but any failure collapses to `Nil`.
pub fn parse_or_nil(src: &str) -> Value {
    parse(src).unwrap_or_default()
}

/// Never fails: returns `{ok, value, error}`. On failure `value` is nil and
/// `error` holds the message; on success `error` is empty.
pub fn parse_ex(src: &str) -> Value {
    match parse(src) {
        Ok(v) => result_object(true, v, ""),
        Err(e) => result_object(false, Value::Nil, &e.to_string()),
    }
}

struct Parser<'a> {
    s: &'a [u8],
    src: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            s: src.as_bytes(),
            src,
            i: 0,
        }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.i).copied()
    }

    fn err(&self, message: &str) -> JsonError {
        JsonError::new(message, self.i)
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.i += 1;
        }
    }

    fn consume(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, JsonError> {
        if depth > MAX_DEPTH {
            return Err(self.err(messages::NESTING_TOO_DEEP));
        }
        let Some(c) = self.peek() else {
            return Err(self.err(messages::UNEXPECTED_END));
        };
        match c {
            b'{' => self.parse_object(depth),
            b'[' => self.parse_array(depth),
            b'"' => Ok(Value::String(self.parse_string()?)),
            b'-' | b'0'..=b'9' => self.parse_number(),
            b't' => self.parse_literal("true", Value::Boolean(true)),
            b'f' => self.parse_literal("false", Value::Boolean(false)),
            b'n' => self.parse_literal("null", Value::Nil),
            _ => Err(self.unexpected()),
        }
    }

    fn unexpected(&self) -> JsonError {
        let ch = self.src[self.i..].chars().next().unwrap_or('\0');
        self.err(&format!("Unexpected character '{}'", ch))
    }

    fn parse_literal(&mut self, word: &str, v: Value) -> Result<Value, JsonError> {
        if self.s[self.i..].starts_with(word.as_bytes()) {
            self.i += word.len();
            Ok(v)
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, JsonError> {
        self.i += 1;
        let mut obj = Object::new();
        self.skip_ws();
        if self.consume(b'}') {
            return Ok(Value::object(obj));
        }
        loop {
            self.skip_ws();
            if self.peek() != Some(b'"') {
                return Err(if self.eof() {
                    self.err(messages::UNEXPECTED_END)
                } else {
                    self.err(messages::EXPECTED_KEY)
                });
            }
            let key = self.parse_string()?;
            self.skip_ws();
            if !self.consume(b':') {
                return Err(self.err(messages::EXPECTED_COLON));
            }
            self.skip_ws();
            let v = self.parse_value(depth + 1)?;
            obj.set(key, v);
            self.skip_ws();
            if self.consume(b',') {
                continue;
            }
            if self.consume(b'}') {
                return Ok(Value::object(obj));
            }
            return Err(self.err(messages::EXPECTED_OBJECT_SEP));
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, JsonError> {
        self.i += 1;
        let mut arr = Object::new_array();
        self.skip_ws();
        if self.consume(b']') {
            return Ok(Value::object(arr));
        }
        loop {
            self.skip_ws();
            let v = self.parse_value(depth + 1)?;
            arr.push(v);
            self.skip_ws();
            if self.consume(b',') {
                continue;
            }
            if self.consume(b']') {
                return Ok(Value::object(arr));
            }
            return Err(self.err(messages::EXPECTED_ARRAY_SEP));
        }
    }

    fn parse_number(&mut self) -> Result<Value, JsonError> {
        let start = self.i;
        self.consume(b'-');
        if !self.digits() {
            return Err(JsonError::new(messages::INVALID_NUMBER, start));
        }
        if self.consume(b'.') && !self.digits() {
            return Err(JsonError::new(messages::INVALID_NUMBER, start));
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.i += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.i += 1;
            }
            if !self.digits() {
                return Err(JsonError::new(messages::INVALID_NUMBER, start));
            }
        }
        self.src[start..self.i]
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| JsonError::new(messages::INVALID_NUMBER, start))
    }

    fn digits(&mut self) -> bool {
        let start = self.i;
        while let Some(b'0'..=b'9') = self.peek() {
            self.i += 1;
        }
        self.i > start
    }

    fn parse_string(&mut self) -> Result<String, JsonError> {
        let open = self.i;
        self.i += 1;
        let mut out = String::new();
        loop {
            // Copy the run up to the next quote or backslash in one go; both
            // are ASCII so the slice boundaries are always char boundaries.
            let run_start = self.i;
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' {
                    break;
                }
                self.i += 1;
            }
            out.push_str(&self.src[run_start..self.i]);
            match self.peek() {
                None => return Err(JsonError::new(messages::UNTERMINATED_STRING, open)),
                Some(b'"') => {
                    self.i += 1;
                    return Ok(out);
                }
                Some(_) => {
                    self.i += 1;
                    let ch = self.parse_escape()?;
                    out.push(ch);
                }
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, JsonError> {
        let Some(e) = self.peek() else {
            return Err(self.err(messages::UNTERMINATED_STRING));
        };
        self.i += 1;
        let ch = match e {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let hex = self
                    .s
                    .get(self.i..self.i + 4)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .ok_or_else(|| self.err(messages::INVALID_ESCAPE))?;
                self.i += 4;
                if hex <= MAX_ESCAPED_CODE_POINT {
                    char::from_u32(hex).unwrap_or(PLACEHOLDER)
                } else {
                    PLACEHOLDER
                }
            }
            _ => {
                self.i -= 1;
                return Err(self.err(messages::INVALID_ESCAPE));
            }
        };
        Ok(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_offsets_point_at_the_failure() {
        let e = parse("[1, 2 x]").unwrap_err();
        assert_eq!(e.message, messages::EXPECTED_ARRAY_SEP);
        assert_eq!(e.offset, 6);

        let e = parse("{\"a\" 1}").unwrap_err();
        assert_eq!(e.message, messages::EXPECTED_COLON);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let src = "[".repeat(MAX_DEPTH + 2);
        let e = parse(&src).unwrap_err();
        assert_eq!(e.message, messages::NESTING_TOO_DEEP);
    }

    #[test]
    fn unicode_escape_needs_four_hex_digits() {
        assert_eq!(parse(r#""\u0041""#).unwrap(), Value::str("A"));
        for bad in [r#""\u+041""#, r#""\u-041""#, r#""\u00 1""#, r#""\u12""#] {
            let e = parse(bad).unwrap_err();
            assert_eq!(e.message, messages::INVALID_ESCAPE, "{bad}");
        }
    }
}
