use std::io;

use snask_core::{parse, stringify};
use snask_runtime::util::capabilities::SystemClock;
use snask_runtime::{Capabilities, RandomSource, Runtime, ServerConfig, StdBuiltinProvider, Value};

fn s(x: &str) -> Value {
    Value::str(x)
}

fn n(x: f64) -> Value {
    Value::Number(x)
}

#[test]
fn every_registered_name_is_callable() {
    let rt = Runtime::new();
    for name in rt.builtins().names() {
        assert!(rt.builtins().contains(&name));
    }
    assert!(rt.builtins().len() > 60);
    assert_eq!(rt.call_builtin("no_such_builtin", &[]), Value::Nil);
    assert!(rt.try_call_builtin("no_such_builtin", &[]).is_err());
}

#[test]
fn strings_and_numbers() {
    let rt = Runtime::new();
    assert_eq!(rt.call_builtin("len", &[s("héllo")]), n(6.0));
    assert_eq!(rt.call_builtin("len", &[n(3.0)]), n(0.0));
    assert_eq!(rt.call_builtin("upper", &[s("abc")]), s("ABC"));
    assert_eq!(rt.call_builtin("lower", &[s("ABC")]), s("abc"));
    assert_eq!(rt.call_builtin("concat", &[s("foo"), s("bar")]), s("foobar"));
    assert_eq!(rt.call_builtin("concat", &[s("foo"), n(1.0)]), Value::Nil);
    assert_eq!(rt.call_builtin("str_to_num", &[s(" 2.5 ")]), n(2.5));
    assert_eq!(rt.call_builtin("str_to_num", &[s("abc")]), Value::Nil);
    assert_eq!(rt.call_builtin("num_to_str", &[n(12345678.0)]), s("1.23457e+07"));
    assert_eq!(rt.call_builtin("num_to_str", &[n(0.5)]), s("0.5"));
    assert_eq!(rt.call_builtin("abs", &[n(-3.0)]), n(3.0));
    assert_eq!(rt.call_builtin("max", &[n(1.0), n(4.0)]), n(4.0));
    assert_eq!(rt.call_builtin("min", &[n(1.0), n(4.0)]), n(1.0));
    assert_eq!(rt.call_builtin("is_nil", &[]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("is_str", &[s("")]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("is_obj", &[s("")]), Value::Boolean(false));
}

#[test]
fn filesystem_round_trip() {
    let rt = Runtime::new();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();
    let file = format!("{root}/a.txt");

    assert_eq!(rt.call_builtin("sfs_write", &[s(&file), s("hello")]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sfs_append", &[s(&file), s(" world")]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sfs_read", &[s(&file)]), s("hello world"));
    assert_eq!(rt.call_builtin("sfs_size", &[s(&file)]), n(11.0));
    assert!(rt.call_builtin("sfs_mtime", &[s(&file)]).is_number());
    assert_eq!(rt.call_builtin("sfs_is_file", &[s(&file)]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sfs_is_dir", &[s(&root)]), Value::Boolean(true));

    let sub = format!("{root}/sub/deeper");
    assert_eq!(rt.call_builtin("sfs_mkdir", &[s(&sub)]), Value::Boolean(true));
    let copy = format!("{root}/c.txt");
    assert_eq!(rt.call_builtin("sfs_copy", &[s(&file), s(&copy)]), Value::Boolean(true));
    let moved = format!("{root}/b.txt");
    assert_eq!(rt.call_builtin("sfs_move", &[s(&copy), s(&moved)]), Value::Boolean(true));

    let listing = rt.call_builtin("sfs_listdir", &[s(&root)]);
    assert_eq!(stringify(&listing), r#"["a.txt","b.txt","sub"]"#);

    assert_eq!(rt.call_builtin("sfs_rmdir", &[s(&format!("{root}/sub"))]), Value::Boolean(false));
    assert_eq!(rt.call_builtin("sfs_rmdir", &[s(&sub)]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sfs_delete", &[s(&moved)]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sfs_exists", &[s(&moved)]), Value::Boolean(false));
    assert_eq!(rt.call_builtin("sfs_read", &[s(&moved)]), Value::Nil);
}

#[test]
fn paths() {
    let rt = Runtime::new();
    assert_eq!(rt.call_builtin("path_basename", &[s("/a/b/c.txt")]), s("c.txt"));
    assert_eq!(rt.call_builtin("path_dirname", &[s("/a/b/c.txt")]), s("/a/b"));
    assert_eq!(rt.call_builtin("path_dirname", &[s("c.txt")]), s("."));
    assert_eq!(rt.call_builtin("path_extname", &[s("c.tar.gz")]), s(".gz"));
    assert_eq!(rt.call_builtin("path_extname", &[s("Makefile")]), s(""));
    assert_eq!(rt.call_builtin("path_join", &[s("a"), s("b")]), s("a/b"));
}

#[test]
fn os_and_auth() {
    let rt = Runtime::new();
    assert_eq!(rt.call_builtin("os_platform", &[]), s(std::env::consts::OS));
    assert_eq!(
        rt.call_builtin("os_setenv", &[s("SNASK_BUILTIN_TEST"), s("1")]),
        Value::Boolean(true)
    );
    assert_eq!(rt.call_builtin("os_getenv", &[s("SNASK_BUILTIN_TEST")]), s("1"));
    assert_eq!(rt.call_builtin("os_getenv", &[s("SNASK_SURELY_UNSET_VAR")]), Value::Nil);
    assert!(rt.call_builtin("time", &[]).as_f64().unwrap() > 1.6e9);

    let token = rt.call_builtin("auth_random_hex", &[n(8.0)]);
    let token = token.as_str().unwrap();
    assert_eq!(token.len(), 16);
    assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(rt.call_builtin("os_random_hex", &[]).as_str().unwrap().len(), 32);

    let eq = |a: &str, b: &str| rt.call_builtin("auth_const_time_eq", &[s(a), s(b)]);
    assert_eq!(eq("secret", "secret"), Value::Boolean(true));
    assert_eq!(eq("secret", "secreT"), Value::Boolean(false));
    assert_eq!(eq("secret", "secret2"), Value::Boolean(false));
    assert_eq!(eq("", ""), Value::Boolean(true));
}

#[test]
fn json_accessors() {
    let rt = Runtime::new();
    let doc = rt.call_builtin("json_parse", &[s(r#"{"a":{"b":[10,20]},"k":"v"}"#)]);
    assert_eq!(rt.call_builtin("json_get", &[doc.clone(), s("k")]), s("v"));
    assert_eq!(rt.call_builtin("json_has", &[doc.clone(), s("a")]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("json_has", &[doc.clone(), s("z")]), Value::Boolean(false));
    assert_eq!(rt.call_builtin("json_len", &[doc.clone()]), n(2.0));
    assert_eq!(rt.call_builtin("json_index", &[doc.clone(), n(1.0)]), s("v"));
    assert_eq!(rt.call_builtin("json_set", &[doc.clone(), s("k"), n(1.0)]), Value::Boolean(true));
    assert_eq!(
        rt.call_builtin("json_stringify", &[doc.clone()]),
        s(r#"{"a":{"b":[10,20]},"k":1}"#)
    );

    let hit = rt.call_builtin("sjson_path_get", &[doc.clone(), s("a.b[1]")]);
    assert_eq!(hit.get("ok"), Value::Boolean(true));
    assert_eq!(hit.get("value"), n(20.0));

    assert_eq!(rt.call_builtin("json_parse", &[s("{bad")]), Value::Nil);
    let ex = rt.call_builtin("json_parse_ex", &[s("{bad")]);
    assert_eq!(ex.get("ok"), Value::Boolean(false));
    assert!(!ex.get("error").as_str().unwrap().is_empty());
}

#[test]
fn array_helpers() {
    let rt = Runtime::new();
    let arr = rt.call_builtin("sjson_new_array", &[]);
    assert_eq!(rt.call_builtin("sjson_type", &[arr.clone()]), s("array"));
    assert_eq!(rt.call_builtin("json_stringify", &[arr.clone()]), s("[]"));
    rt.call_builtin("sjson_arr_push", &[arr.clone(), n(1.0)]);
    rt.call_builtin("sjson_arr_push", &[arr.clone(), s("x")]);
    assert_eq!(rt.call_builtin("sjson_arr_len", &[arr.clone()]), n(2.0));
    assert_eq!(rt.call_builtin("sjson_arr_set", &[arr.clone(), n(0.0), n(9.0)]), Value::Boolean(true));
    assert_eq!(rt.call_builtin("sjson_arr_set", &[arr.clone(), n(5.0), n(9.0)]), Value::Boolean(false));
    assert_eq!(rt.call_builtin("sjson_arr_get", &[arr.clone(), n(0.0)]), n(9.0));
    assert_eq!(rt.call_builtin("json_stringify", &[arr.clone()]), s(r#"[9,"x"]"#));

    let obj = rt.call_builtin("sjson_new_object", &[]);
    assert_eq!(rt.call_builtin("sjson_type", &[obj.clone()]), s("object"));
    assert_eq!(rt.call_builtin("json_stringify", &[obj]), s("{}"));
}

#[test]
fn member_primitives() {
    let rt = Runtime::new();
    let obj = rt.call_builtin("s_alloc_obj", &[s("x"), s("y")]);
    assert_eq!(stringify(&obj), r#"{"x":null,"y":null}"#);
    let set = |args: &[Value]| rt.call_builtin("s_set_member", args);
    assert_eq!(set(&[obj.clone(), s("y"), n(2.0)]), Value::Boolean(true));
    assert_eq!(set(&[obj.clone(), s("z"), n(3.0)]), Value::Boolean(true));
    assert_eq!(set(&[obj.clone(), n(1.0), n(4.0)]), Value::Boolean(false));
    assert_eq!(set(&[s("not an object"), s("y"), n(4.0)]), Value::Boolean(false));
    assert_eq!(stringify(&obj), r#"{"x":null,"y":2,"z":3}"#);
    assert_eq!(rt.call_builtin("s_get_member", &[obj, s("y")]), n(2.0));

    let names = parse(r#"["a","b"]"#).unwrap();
    let from_list = rt.call_builtin("s_alloc_obj", &[names]);
    assert_eq!(stringify(&from_list), r#"{"a":null,"b":null}"#);
}

#[test]
fn http_helpers() {
    let rt = Runtime::new();
    assert_eq!(rt.call_builtin("blaze_qs_get", &[s("x=5&y"), s("x")]), s("5"));
    assert_eq!(rt.call_builtin("blaze_qs_get", &[s("x=5&y"), s("y")]), s(""));
    assert_eq!(rt.call_builtin("blaze_cookie_get", &[s("a=1; b=2"), s("b")]), s("2"));
    assert_eq!(rt.call_builtin("blaze_cookie_get", &[s("a=1"), s("missing")]), Value::Nil);
}

#[test]
fn flag_builtins_answer_false_on_bad_arguments() {
    let rt = Runtime::new();
    let f = Value::Boolean(false);
    let obj = rt.call_builtin("sjson_new_object", &[]);
    let calls: &[(&str, Vec<Value>)] = &[
        ("sfs_write", vec![n(1.0), s("x")]),
        ("sfs_write", vec![s("ignored.txt")]),
        ("sfs_append", vec![Value::Nil, s("x")]),
        ("sfs_delete", vec![Value::Nil]),
        ("sfs_delete", vec![]),
        ("sfs_exists", vec![n(3.0)]),
        ("sfs_copy", vec![s("a"), n(2.0)]),
        ("sfs_move", vec![n(1.0), s("b")]),
        ("sfs_mkdir", vec![obj.clone()]),
        ("sfs_rmdir", vec![]),
        ("sfs_is_file", vec![n(1.0)]),
        ("sfs_is_dir", vec![Value::Boolean(true)]),
        ("json_set", vec![obj.clone(), n(1.0), Value::Nil]),
        ("json_set", vec![s("x"), s("k"), Value::Nil]),
        ("json_has", vec![obj.clone(), n(1.0)]),
        ("sjson_arr_set", vec![obj.clone(), s("zero"), n(1.0)]),
        ("sjson_arr_push", vec![n(1.0), n(2.0)]),
        ("os_setenv", vec![n(1.0), s("v")]),
        ("auth_const_time_eq", vec![s("a")]),
        ("thread_detach", vec![n(1.0)]),
        ("blaze_run", vec![s("8080"), obj.clone()]),
        ("blaze_run", vec![n(70000.0), obj.clone()]),
    ];
    for (name, args) in calls {
        assert_eq!(rt.call_builtin(name, args), f, "{name}({args:?})");
    }
    assert_eq!(stringify(&obj), "{}");
}

struct BrokenRandom;

impl RandomSource for BrokenRandom {
    fn fill(&self, _buf: &mut [u8]) -> io::Result<()> {
        Err(io::Error::other("entropy unavailable"))
    }
}

#[test]
fn random_tokens_fail_closed() {
    let caps = Capabilities {
        clock: Box::new(SystemClock),
        rng: Box::new(BrokenRandom),
    };
    let rt = Runtime::with_parts(ServerConfig::default(), caps, &StdBuiltinProvider);
    assert_eq!(rt.call_builtin("auth_random_hex", &[n(16.0)]), Value::Nil);
    assert!(rt.try_call_builtin("os_random_hex", &[]).is_err());
}
