use snask_core::{
    Object, Value, deep_eq, parse, parse_ex, parse_or_nil, path_get, stringify, stringify_pretty,
};

#[test]
fn parses_nested_documents_in_order() {
    let v = parse(r#" { "b": 1, "a": [true, false, null], "s": "x\ty" } "#).unwrap();
    let obj = v.as_object().unwrap().read();
    assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["b", "a", "s"]);
    assert_eq!(obj.get("b"), Some(&Value::Number(1.0)));
    assert_eq!(obj.get("s"), Some(&Value::str("x\ty")));
    let arr = obj.get("a").unwrap();
    assert_eq!(arr.type_name(), "array");
    assert_eq!(arr.at(2), Value::Nil);
}

#[test]
fn compact_output() {
    let v = parse(r#"{"name":"snask","tags":["a","b"],"n":2.5,"ok":true,"none":null}"#).unwrap();
    assert_eq!(
        stringify(&v),
        r#"{"name":"snask","tags":["a","b"],"n":2.5,"ok":true,"none":null}"#
    );
}

#[test]
fn pretty_output_indents_two_spaces() {
    let v = parse(r#"{"a":1,"b":[1,2],"c":{},"d":[]}"#).unwrap();
    let expected = "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ],\n  \"c\": {},\n  \"d\": []\n}";
    assert_eq!(stringify_pretty(&v), expected);
    assert_eq!(stringify_pretty(&Value::object(Object::new())), "{}");
}

#[test]
fn output_is_valid_json() {
    let v = parse(r#"{"q":"quote\" back\\ nl\n ctl\u0001","n":[1e-7,12345678,-0.5]}"#).unwrap();
    let compact: serde_json::Value = serde_json::from_str(&stringify(&v)).unwrap();
    let pretty: serde_json::Value = serde_json::from_str(&stringify_pretty(&v)).unwrap();
    assert_eq!(compact, pretty);
    assert_eq!(compact["q"], "quote\" back\\ nl\n ctl\u{1}");
}

#[test]
fn rejects_trailing_content() {
    assert!(parse("{} x").is_err());
    assert!(parse("1 2").is_err());
    assert!(parse("  [1]  \n").is_ok());
}

#[test]
fn malformed_input() {
    for bad in ["", "{", "[1,", "{\"a\":}", "tru", "\"open", "{1:2}", "-", "1.", "[1 2]", "\"\\x\""] {
        assert!(parse(bad).is_err(), "expected failure for {bad:?}");
        assert!(parse_or_nil(bad).is_nil());
    }
}

#[test]
fn nil_front_end_conflates_null_and_failure() {
    assert!(parse_or_nil("null").is_nil());
    assert!(parse_or_nil("{oops").is_nil());
}

#[test]
fn extended_parse_reports_errors() {
    let ok = parse_ex("[1]");
    assert_eq!(ok.get("ok"), Value::Boolean(true));
    assert_eq!(ok.get("error"), Value::str(""));
    assert_eq!(ok.get("value").type_name(), "array");

    let null = parse_ex("null");
    assert_eq!(null.get("ok"), Value::Boolean(true));
    assert!(null.get("value").is_nil());

    let bad = parse_ex("[1,]");
    assert_eq!(bad.get("ok"), Value::Boolean(false));
    assert!(bad.get("value").is_nil());
    let msg = bad.get("error");
    assert!(msg.as_str().is_some_and(|m| m.contains("at byte")), "{msg:?}");
}

#[test]
fn unicode_escapes_above_ascii_decode_to_placeholder() {
    assert_eq!(parse(r#""\u0041\u00e9""#).unwrap(), Value::str("A?"));
    assert_eq!(parse(r#""caf\u00e9""#).unwrap(), Value::str("caf?"));
    // Raw UTF-8 passes through untouched.
    assert_eq!(parse("\"café\"").unwrap(), Value::str("café"));
}

#[test]
fn large_integers_lose_precision() {
    let v = Value::Number(12345678.0);
    assert_eq!(stringify(&v), "1.23457e+07");
    assert!(!deep_eq(&parse(&stringify(&v)).unwrap(), &v));
}

#[test]
fn non_finite_numbers_render_as_null() {
    assert_eq!(stringify(&Value::Number(f64::NAN)), "null");
    assert_eq!(stringify(&Value::Number(f64::INFINITY)), "null");
}

#[test]
fn cyclic_objects_terminate() {
    let v = Value::object(Object::new());
    if let Value::Object(o) = &v {
        o.write().set("self", v.clone());
    }
    assert_eq!(stringify(&v), r#"{"self":null}"#);
}

#[test]
fn path_lookup() {
    let root = parse(r#"{"users":[{"name":"ada"},{"name":"bob"}],"n":1}"#).unwrap();
    let r = path_get(&root, "users[1].name");
    assert_eq!(r.get("ok"), Value::Boolean(true));
    assert_eq!(r.get("value"), Value::str("bob"));
    assert_eq!(path_get(&root, "users.0.name").get("value"), Value::str("ada"));

    let missing = path_get(&root, "users[0].email");
    assert_eq!(missing.get("ok"), Value::Boolean(false));
    assert!(missing.get("error").as_str().is_some_and(|e| e.contains("users[0].email")));

    assert_eq!(path_get(&root, "n.x").get("ok"), Value::Boolean(false));
    assert_eq!(path_get(&root, "users[9]").get("ok"), Value::Boolean(false));
    assert_eq!(path_get(&root, "users[").get("ok"), Value::Boolean(false));
    assert!(deep_eq(&path_get(&root, "").get("value"), &root));
}
