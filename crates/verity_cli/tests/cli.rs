use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::tempdir;

const CLEAN_INPUT: &str = r#"
{
  "units": [
    {
      "name": "src/Value.groovy",
      "module": {
        "classes": [
          {
            "name": "demo.Value",
            "methods": [
              {
                "name": "toString",
                "return_type": { "Class": { "name": "java.lang.String" } },
                "annotations": [ { "kind": "java.lang.Override" } ]
              }
            ]
          }
        ]
      }
    }
  ]
}
"#;

const MISSING_OVERRIDE_INPUT: &str = r#"
{
  "units": [
    {
      "name": "src/Value.groovy",
      "module": {
        "classes": [
          {
            "name": "demo.Value",
            "methods": [
              {
                "name": "render",
                "return_type": { "Class": { "name": "java.lang.String" } },
                "annotations": [
                  {
                    "kind": "java.lang.Override",
                    "span": { "start_line": 2, "start_column": 3, "end_line": 2, "end_column": 12 }
                  }
                ]
              }
            ]
          }
        ]
      }
    }
  ]
}
"#;

fn find_cli_binary() -> Option<PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_verity").map(PathBuf::from)
}

fn write_fixture(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempdir().expect("create temp directory for input fixture");
    let path = tmp.path().join("input.json");
    fs::write(&path, contents).expect("write input fixture");
    (tmp, path)
}

#[test]
fn check_succeeds_for_a_clean_input() {
    let Some(cli_path) = find_cli_binary() else {
        eprintln!("Skipping check test: CLI binary path not set");
        return;
    };
    let (_tmp, input) = write_fixture(CLEAN_INPUT);

    let output = Command::new(&cli_path)
        .arg("check")
        .arg(&input)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run CLI check command");

    assert!(
        output.status.success(),
        "CLI exited with status {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    assert!(stdout.contains("verified 1 classes: 0 error(s)"));
}

#[test]
fn check_fails_when_override_has_no_target() {
    let Some(cli_path) = find_cli_binary() else {
        eprintln!("Skipping check test: CLI binary path not set");
        return;
    };
    let (tmp, input) = write_fixture(MISSING_OVERRIDE_INPUT);
    let config = tmp.path().join("verity.toml");
    fs::write(&config, "[logging]\nlevel = \"error\"\n").expect("write config");

    let output = Command::new(&cli_path)
        .arg("check")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run CLI check command");

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    assert!(
        stdout.contains("src/Value.groovy:2:3: error [JVV3001]: Method 'render' from class 'demo.Value'"),
        "unexpected output: {stdout}"
    );
}

#[test]
fn explain_prints_descriptor() {
    let Some(cli_path) = find_cli_binary() else {
        eprintln!("Skipping explain test: CLI binary path not set");
        return;
    };

    let output = Command::new(&cli_path)
        .args(["explain", "JVV2003"])
        .output()
        .expect("failed to run CLI explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    assert!(stdout.starts_with("JVV2003 (error): "));
}
