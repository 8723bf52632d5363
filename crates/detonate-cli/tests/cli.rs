//! Binary-level tests: argument handling, exit statuses, report output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn detonate(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("detonate").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DETONATE_INPUT_DIR")
        .env_remove("DETONATE_WATCH_ROOT")
        .env_remove("DETONATE_OUTPUT")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_exits_zero() {
    Command::cargo_bin("detonate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn bad_arguments_exit_with_error_status() {
    Command::cargo_bin("detonate")
        .unwrap()
        .arg("explode")
        .assert()
        .code(3);
}

#[test]
fn rules_print_as_json() {
    let dir = tempfile::tempdir().unwrap();
    detonate(&dir.path().join("none.toml"))
        .args(["--format", "json", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network_transfer"))
        .stdout(predicate::str::contains("shred"));
}

#[test]
fn config_prints_effective_toml() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("detonate.toml");
    std::fs::write(&config, "timeout_secs = 7\n").unwrap();

    detonate(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 7"))
        .stdout(predicate::str::contains("settle_delay_ms = 2000"));
}

#[test]
fn invalid_config_yields_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "timeout_secs = [not toml").unwrap();
    let output = dir.path().join("out").join("report.json");

    detonate(&config)
        .arg("analyze")
        .arg("--output")
        .arg(&output)
        .assert()
        .code(3)
        .stdout(predicate::str::contains("\"verdict\": \"ERROR\""));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("config error"));
}

#[test]
fn text_target_is_analyzed_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("sandbox");
    let input = root.join("input");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("readme.txt"), "twelve chars").unwrap();
    let output = dir.path().join("report.json");

    // Other processes on the host may come and go, so any completed
    // verdict is acceptable here; the report shape is what is checked.
    detonate(&dir.path().join("none.toml"))
        .arg("analyze")
        .arg("--input-dir")
        .arg(&input)
        .arg("--watch-root")
        .arg(&root)
        .arg("--output")
        .arg(&output)
        .args(["--settle-ms", "0"])
        .assert()
        .code(predicate::in_iter([0, 1, 2]));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["execution"]["dispatch"], "text");
    assert_eq!(report["execution"]["content_length"], 12);
    assert!(report["file_events"].as_array().unwrap().is_empty());
    assert!(report["error"].is_null());
}
