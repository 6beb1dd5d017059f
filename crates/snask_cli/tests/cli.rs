use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use assert_cmd::Command as CargoCommand;
use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn snask() -> CargoCommand {
    CargoCommand::cargo_bin("snask").unwrap()
}

#[test]
fn fmt_renders_pretty_and_compact() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", r#"{ "b": [1, 2], "a": {} }"#);
    snask()
        .args(["json", "fmt", &file])
        .assert()
        .success()
        .stdout("{\n  \"b\": [\n    1,\n    2\n  ],\n  \"a\": {}\n}\n");
    snask()
        .args(["json", "fmt", "--compact", &file])
        .assert()
        .success()
        .stdout("{\"b\":[1,2],\"a\":{}}\n");
}

#[test]
fn check_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.json", "[1, 2]");
    let bad = write(&dir, "bad.json", "[1, 2");
    snask()
        .args(["json", "check", &good])
        .assert()
        .success()
        .stdout("ok\n");
    snask()
        .args(["json", "check", &bad])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at byte"));
}

#[test]
fn get_prints_the_value_at_a_path() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "doc.json", r#"{"a":{"b":[{"c":"x"}]}}"#);
    snask()
        .args(["json", "get", &file, "a.b[0]"])
        .assert()
        .success()
        .stdout("{\"c\":\"x\"}\n");
    snask()
        .args(["json", "get", &file, "a.z"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Key not found at 'a.z'"));
}

#[test]
fn missing_files_fail_with_context() {
    snask()
        .args(["json", "fmt", "/definitely/not/here.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn serve_rejects_non_object_routes() {
    let dir = TempDir::new().unwrap();
    let port = free_port().to_string();
    for (name, doc, got) in [
        ("string.json", r#""x""#, "got string"),
        ("array.json", "[1]", "got array"),
    ] {
        let file = write(&dir, name, doc);
        snask()
            .args(["serve", &file, "--port", &port, "--max-requests", "1"])
            .timeout(Duration::from_secs(10))
            .assert()
            .code(2)
            .stderr(predicate::str::contains("route table must be an object"))
            .stderr(predicate::str::contains(got));
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn connect(port: u16) -> TcpStream {
    for _ in 0..100 {
        if let Ok(s) = TcpStream::connect(("127.0.0.1", port)) {
            return s;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("server on port {port} never came up");
}

#[test]
fn serve_answers_until_the_request_limit() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "routes.json",
        r#"{"GET /ping": "pong", "/data": {"json": {"ok": true}, "status": 201}}"#,
    );
    let port = free_port();
    let mut child = Command::new(cargo_bin("snask"))
        .args(["serve", &file, "--port", &port.to_string(), "--max-requests", "2"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stream = connect(port);
    stream.write_all(b"GET /ping HTTP/1.1\r\n\r\n").unwrap();
    let mut resp = String::new();
    stream.read_to_string(&mut resp).unwrap();
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.ends_with("\r\n\r\npong"));

    let mut stream = connect(port);
    stream.write_all(b"POST /data HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();
    let mut resp = String::new();
    stream.read_to_string(&mut resp).unwrap();
    assert!(resp.starts_with("HTTP/1.1 201 Created\r\n"), "{resp}");
    assert!(resp.contains("Content-Type: application/json\r\n"));
    assert!(resp.ends_with(r#"{"ok":true}"#));

    assert!(child.wait().unwrap().success());
}
