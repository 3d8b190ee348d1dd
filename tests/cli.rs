use std::io::Write;
use std::process::Command;

fn oos() -> Command {
    Command::new(env!("CARGO_BIN_EXE_oos"))
}

fn script(src: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(src.as_bytes()).expect("write script");
    file
}

// --- Running scripts ---

#[test]
fn bank_demo_runs() {
    let demo = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/bank.json");
    let out = oos().arg(demo).output().expect("failed to run oos");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(&lines[..6], ["150", "0", "nobody", "25", "10", "3"]);
    assert!(lines[6].starts_with("25.06"), "report was {}", lines[6]);
}

#[test]
fn printed_results_go_to_stdout() {
    let file = script(r#"{"steps": [
      {"send": {"to": {"lit": "ab"}, "message": "concat", "args": {"other": {"lit": "c"}}, "print": true}},
      {"send": {"to": {"lit": true}, "message": "not", "print": true}}
    ]}"#);
    let out = oos().arg(file.path()).output().expect("failed to run oos");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "abc\nfalse\n");
}

// --- Failures ---

#[test]
fn denied_access_reports_code_and_step() {
    let file = script(r#"{"steps": [
      {"define": {"name": "vault", "attrs": [{"name": "gold", "kind": "private", "default": 1}]}},
      {"new": {"cls": "vault", "name": "v"}},
      {"send": {"to": "v", "message": "get-gold", "print": true}}
    ]}"#);
    let out = oos().args(["--no-color"]).arg(file.path()).output().expect("failed to run oos");
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error[OOS-M002]"), "stderr: {stderr}");
    assert!(stderr.contains("--> step 3"), "stderr: {stderr}");
    assert!(!stderr.contains("\x1b["), "unexpected color: {stderr}");
}

#[test]
fn json_diagnostics() {
    let file = script(r#"{"steps": [{"new": {"cls": "ghost", "name": "g"}}]}"#);
    let out = oos().args(["--format", "json"]).arg(file.path()).output().expect("failed to run oos");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    let line = stderr.lines().last().expect("a diagnostic line");
    let v: serde_json::Value = serde_json::from_str(line).expect("valid JSON diagnostic");
    assert_eq!(v["code"], "OOS-C001");
    assert_eq!(v["step"], 1);
    assert_eq!(v["severity"], "error");
}

#[test]
fn failed_expectation_exits_nonzero() {
    let file = script(r#"{"steps": [
      {"send": {"to": {"lit": 1}, "message": "add", "args": {"other": {"lit": 1}}, "expect": 3}}
    ]}"#);
    let out = oos().arg(file.path()).output().expect("failed to run oos");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OOS-X003"));
}

#[test]
fn missing_script_file() {
    let out = oos().arg("/no/such/script.json").output().expect("failed to run oos");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OOS-X001"));
}

#[test]
fn malformed_script() {
    let file = script("{\"steps\": 3}");
    let out = oos().arg(file.path()).output().expect("failed to run oos");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OOS-X002"));
}

// --- Info flags ---

#[test]
fn explain_known_code() {
    let out = oos().args(["--explain", "OOS-M002"]).output().expect("failed to run oos");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("## OOS-M002"));
}

#[test]
fn explain_unknown_code() {
    let out = oos().args(["--explain", "OOS-Z999"]).output().expect("failed to run oos");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown error code"));
}

#[test]
fn list_classes() {
    let out = oos().arg("--list-classes").output().expect("failed to run oos");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "bool\nenv\nfloat\nint\nstr\n");
}

#[test]
fn script_is_required() {
    let out = oos().output().expect("failed to run oos");
    assert!(!out.status.success());
}
