use std::fmt::Write as _;

use crate::object::Object;
use crate::value::Value;

/// Significant digits of the default decimal format.
const DEFAULT_PRECISION: i32 = 6;

/// Renders a number the way C's `%g` does: six significant digits, trailing
/// zeros dropped, exponent form outside `1e-4 <= |n| < 1e6`.
///
/// Numbers needing more than six significant digits lose precision.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", (DEFAULT_PRECISION - 1) as usize, n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= DEFAULT_PRECISION {
        let mut out = trim_fraction(mantissa).to_string();
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        let _ = write!(out, "{:02}", exp.abs());
        out
    } else {
        let decimals = (DEFAULT_PRECISION - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, n);
        trim_fraction(&fixed).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Appends `s` as a quoted JSON string.
pub fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Compact encoding: no whitespace, members in insertion order. Dense
/// sequences render as arrays.
pub fn stringify(v: &Value) -> String {
    let mut w = Writer::new(None);
    w.value(v);
    w.out
}

/// Two spaces per nesting level, one member per line. Empty objects and
/// arrays stay on one line.
pub fn stringify_pretty(v: &Value) -> String {
    let mut w = Writer::new(Some(2));
    w.value(v);
    w.out
}

struct Writer {
    out: String,
    indent: Option<usize>,
    depth: usize,
    // Addresses of the objects currently being written; a repeat is a cycle.
    open: Vec<usize>,
}

impl Writer {
    fn new(indent: Option<usize>) -> Self {
        Self {
            out: String::new(),
            indent,
            depth: 0,
            open: Vec::new(),
        }
    }

    fn value(&mut self, v: &Value) {
        match v {
            Value::Number(n) if n.is_finite() => self.out.push_str(&format_number(*n)),
            Value::String(s) => write_escaped(&mut self.out, s),
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Object(o) => {
                if self.open.contains(&o.addr()) {
                    self.out.push_str("null");
                    return;
                }
                self.open.push(o.addr());
                self.object(&o.read());
                self.open.pop();
            }
            _ => self.out.push_str("null"),
        }
    }

    fn object(&mut self, obj: &Object) {
        let array = obj.is_array();
        let (open, close) = if array { ('[', ']') } else { ('{', '}') };
        self.out.push(open);
        if obj.is_empty() {
            self.out.push(close);
            return;
        }
        self.depth += 1;
        for (i, (k, v)) in obj.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            if !array {
                write_escaped(&mut self.out, k);
                self.out.push(':');
                if self.indent.is_some() {
                    self.out.push(' ');
                }
            }
            self.value(v);
        }
        self.depth -= 1;
        self.newline();
        self.out.push(close);
    }

    fn newline(&mut self) {
        if let Some(width) = self.indent {
            self.out.push('\n');
            for _ in 0..self.depth * width {
                self.out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_matches_percent_g() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(100000.0), "100000");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(1234567.0), "1.23457e+06");
        assert_eq!(format_number(1e6), "1e+06");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(3.14159265), "3.14159");
        assert_eq!(format_number(1e100), "1e+100");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn control_characters_are_escaped() {
        let mut out = String::new();
        write_escaped(&mut out, "a\"b\\c\n\u{01}");
        assert_eq!(out, r#""a\"b\\c\n\u0001""#);
    }
}
