use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn run_semic(dir: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_semic");
    Command::new(exe)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run semic")
}

fn write_source(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write source");
    path
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn missing_source_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_semic(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("E1 [invocation]"), "{}", stderr(&out));
}

#[test]
fn invalid_output_name_exits_10() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "p.semi", "an1;");
    let out = run_semic(dir.path(), &["p.semi", "out/put"]);
    assert_eq!(out.status.code(), Some(10));
    assert!(stderr(&out).contains("got `/`"));
}

#[test]
fn unreadable_source_exits_15() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_semic(dir.path(), &["nope.semi"]);
    assert_eq!(out.status.code(), Some(15));
}

#[test]
fn compile_error_status_is_the_error_code() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "bad.semi", "an1;\nax");
    let out = run_semic(dir.path(), &["bad.semi", "--emit-c", "bad.c"]);
    assert_eq!(out.status.code(), Some(7));
    assert_eq!(
        stderr(&out).trim_end(),
        "bad.semi:2:2: E7 [semantic] Unknown command `x` for `a`"
    );
    assert!(!dir.path().join("bad.c").exists());
}

#[test]
fn emit_c_writes_source_and_skips_build() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "p.semi", "an5;a?ap.");
    let out = run_semic(dir.path(), &["p.semi", "--emit-c", "p.c"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let c = std::fs::read_to_string(dir.path().join("p.c")).unwrap();
    assert!(c.contains("if(a) {"));
    assert!(!dir.path().join("t").exists());
}

#[test]
fn non_utf8_string_payload_compiles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("raw.semi"), b"as2\xff\xfe;$p").unwrap();
    let out = run_semic(dir.path(), &["raw.semi", "--emit-c", "raw.c"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let c = std::fs::read_to_string(dir.path().join("raw.c")).unwrap();
    assert!(c.contains("semi_buf_set(a, 0, 255); semi_buf_set(a, 1, 254);"));
}

#[test]
fn dump_prints_c_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "p.semi", "an5;ap");
    let out = run_semic(dir.path(), &["p.semi", "-d", "--emit-c", "p.c"]);
    assert_eq!(out.status.code(), Some(0));
    let dumped = String::from_utf8_lossy(&out.stdout);
    let written = std::fs::read_to_string(dir.path().join("p.c")).unwrap();
    assert_eq!(dumped, written);
}

#[test]
fn json_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "bad.semi", "an1;a?");
    let out = run_semic(dir.path(), &["bad.semi", "--json", "--emit-c", "bad.c"]);
    assert_eq!(out.status.code(), Some(14));
    let v: Value = serde_json::from_slice(&out.stdout).expect("parse stdout JSON");
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], 14);
    assert_eq!(v["error"]["file"], "bad.semi");
    assert!(stderr(&out).is_empty());
}

#[test]
fn json_reports_success() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "p.semi", "an1;");
    let out = run_semic(dir.path(), &["p.semi", "--json", "--emit-c", "p.c"]);
    assert_eq!(out.status.code(), Some(0));
    let v: Value = serde_json::from_slice(&out.stdout).expect("parse stdout JSON");
    assert_eq!(v["success"], true);
    assert_eq!(v["error"], Value::Null);
    assert!(v["c_source"].as_str().unwrap().contains("int a = 1;"));
}

#[cfg(unix)]
#[test]
fn toolchain_status_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "p.semi", "an1;");
    let out = Command::new(env!("CARGO_BIN_EXE_semic"))
        .current_dir(dir.path())
        .env("SEMI_CC", "false")
        .arg("p.semi")
        .output()
        .expect("run semic");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Compilation errored with code 1. Terminating."));
}
