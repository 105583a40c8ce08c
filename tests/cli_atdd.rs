#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("eligibility-score").expect("binary should compile");
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write_answers(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("answers.json");
    fs::write(&path, content).expect("answers should write");
    path
}

const REFERENCE_ANSWERS: &str = r#"{
    "halfOrphanUnder25": true,
    "dependentSiblings": 2,
    "supporter1Disability": "cat3",
    "livingSituation": "rent",
    "distance": 4,
    "healthCosts": 5
}"#;

#[test]
fn score_renders_markdown_by_default() {
    let dir = TempDir::new().expect("temp dir should be created");
    let answers = write_answers(dir.path(), REFERENCE_ANSWERS);

    command(dir.path())
        .arg("score")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total score: 57"))
        .stdout(predicate::str::contains("| livingSituation |"))
        .stdout(predicate::str::contains("Rubric: 2025/26"));
}

#[test]
fn score_json_outputs_total_and_breakdown() {
    let dir = TempDir::new().expect("temp dir should be created");
    let answers = write_answers(dir.path(), REFERENCE_ANSWERS);

    let output = command(dir.path())
        .arg("score")
        .arg(&answers)
        .args(["--format", "json"])
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be json");
    assert_eq!(value["totalScore"], 57);
    assert_eq!(
        value["breakdown"].as_object().map(|breakdown| breakdown.len()),
        Some(6)
    );

    // Key order is checked on the raw text: `Value` sorts object keys.
    let positions: Vec<_> = [
        "\"halfOrphanUnder25\"",
        "\"dependentSiblings\"",
        "\"supporter1Disability\"",
        "\"livingSituation\"",
        "\"distance\"",
        "\"healthCosts\"",
    ]
    .iter()
    .map(|key| stdout.find(*key).expect("breakdown key should be printed"))
    .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "breakdown keys out of engine order: {positions:?}"
    );
}

#[test]
fn score_reads_answers_from_stdin() {
    let dir = TempDir::new().expect("temp dir should be created");
    command(dir.path())
        .args(["score", "-", "--format", "json"])
        .write_stdin(r#"{"disadvantaged": true, "disabled": true, "largeFamily": true}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalScore\": 25"));
}

#[test]
fn score_returns_warning_code_when_answers_are_coerced() {
    let dir = TempDir::new().expect("temp dir should be created");
    let answers = write_answers(dir.path(), r#"{"numberOfChildren": -2, "distance": 3.5}"#);

    command(dir.path())
        .arg("score")
        .arg(&answers)
        .args(["--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"warnings\""))
        .stdout(predicate::str::contains("\"totalScore\": 3"));
}

#[test]
fn score_fails_on_unknown_selection() {
    let dir = TempDir::new().expect("temp dir should be created");
    let answers = write_answers(dir.path(), r#"{"livingSituation": "tent"}"#);

    command(dir.path())
        .arg("score")
        .arg(&answers)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown selection for livingSituation"));
}

#[test]
fn score_fails_on_missing_answers_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    command(dir.path())
        .arg("score")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn score_applies_explicit_rubric_config() {
    let dir = TempDir::new().expect("temp dir should be created");
    let answers = write_answers(dir.path(), REFERENCE_ANSWERS);
    let rubric = dir.path().join("rubric.toml");
    fs::write(
        &rubric,
        r#"
[rubric]
version = "2025/26-rev2"

[policy.caps]
living = 22
"#,
    )
    .expect("rubric should write");

    command(dir.path())
        .arg("score")
        .arg(&answers)
        .arg("--config")
        .arg(&rubric)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total score: 50"))
        .stdout(predicate::str::contains("capped from 29"))
        .stdout(predicate::str::contains("Rubric: 2025/26-rev2"));
}

#[test]
fn score_picks_up_global_config_from_home() {
    let dir = TempDir::new().expect("temp dir should be created");
    let global = dir.path().join(".config/eligibility-score");
    fs::create_dir_all(&global).expect("global config dir should create");
    fs::write(global.join("config.toml"), "[points]\nhalfOrphanUnder25 = 14\n")
        .expect("global config should write");
    let answers = write_answers(dir.path(), REFERENCE_ANSWERS);

    command(dir.path())
        .arg("score")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total score: 59"));
}

#[test]
fn rubric_prints_standard_tables() {
    let dir = TempDir::new().expect("temp dir should be created");
    command(dir.path())
        .arg("rubric")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Eligibility Rubric"))
        .stdout(predicate::str::contains("| orphanUnder25 |"));
}

#[test]
fn check_accepts_valid_rubric() {
    let dir = TempDir::new().expect("temp dir should be created");
    let rubric = dir.path().join("rubric.toml");
    fs::write(
        &rubric,
        "[policy]\nexclusivity = [[\"orphanUnder25\", \"halfOrphanUnder25\"]]\n",
    )
    .expect("rubric should write");

    command(dir.path())
        .arg("check")
        .arg(&rubric)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn check_rejects_invalid_rubric_with_code_two() {
    let dir = TempDir::new().expect("temp dir should be created");
    let rubric = dir.path().join("rubric.toml");
    fs::write(&rubric, "[policy]\nexclusivity = [[\"distance\"]]\n").expect("rubric should write");

    command(dir.path())
        .arg("check")
        .arg(&rubric)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("not a boolean flag"));
}
