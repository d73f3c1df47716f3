// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// INTEGRATION TESTS — platon-harness-cli
//
// Drives the `platon-harness-cli` binary as a real subprocess against a
// guest module staged in a temp file, the same way a user would invoke it.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::io::Write;
use std::process::Command;

const ECHO_INPUT_WAT: &str = r#"
(module
  (import "env" "platon_get_input_length" (func $len (result i32)))
  (import "env" "platon_get_input" (func $get (param i32)))
  (import "env" "platon_return" (func $ret (param i32 i32)))
  (memory (export "memory") 1)
  (func (export "invoke") (result i32)
    (local $n i32)
    (call $len)
    (local.set $n)
    (call $get (i32.const 0))
    (call $ret (i32.const 0) (local.get $n))
    (local.get $n)
  )
)
"#;

fn cli_bin() -> &'static str {
    env!("CARGO_BIN_EXE_platon-harness-cli")
}

#[test]
fn runs_a_guest_module_and_prints_its_completion() {
    let wasm = wat::parse_str(ECHO_INPUT_WAT).expect("valid wat");
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&wasm).expect("write wasm");

    let output = Command::new(cli_bin())
        .arg(file.path())
        .arg("--input")
        .arg(hex::encode(b"hi"))
        .output()
        .expect("spawn cli");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("completed: return_code=2"));
    assert!(stdout.contains(&hex::encode(b"hi")));
}

#[test]
fn rejects_a_missing_wasm_file() {
    let output = Command::new(cli_bin())
        .arg("/nonexistent/does-not-exist.wasm")
        .output()
        .expect("spawn cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn rejects_invalid_hex_input() {
    const EMPTY_INVOKE_WAT: &str = r#"
    (module
      (memory (export "memory") 1)
      (func (export "invoke"))
    )
    "#;
    let wasm = wat::parse_str(EMPTY_INVOKE_WAT).expect("valid wat");
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&wasm).expect("write wasm");

    let output = Command::new(cli_bin())
        .arg(file.path())
        .arg("--input")
        .arg("not-hex")
        .output()
        .expect("spawn cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not valid hex"));
}
