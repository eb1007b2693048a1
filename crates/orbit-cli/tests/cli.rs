// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRIANGLE: &str = r#"{
  "name": "triangulum",
  "stars": [1, 2, 3, 4],
  "required": [[1, 2], [2, 3], [3, 1]],
  "completion_message": "Triangulum complete.",
  "next_level": "aries"
}"#;

const LEGACY: &str = r#"{
  "name": "legacy",
  "stars": [1, 2, 3, 4, 5],
  "required": [[1, 2]],
  "forbidden": [[1, 3]],
  "exact_match": false
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).expect("write fixture");
        path
    }

    fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn orbit(&self) -> Command {
        let mut cmd = Command::cargo_bin("orbit").expect("orbit binary");
        cmd.arg("--config-dir").arg(self.config_dir());
        cmd
    }
}

/// Stdout up to the closing notice board listing.
fn steps_section(output: &std::process::Output) -> String {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf-8");
    match stdout.split_once("notices:") {
        Some((steps, _)) => steps.to_owned(),
        None => stdout,
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn check_complete_exits_zero() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "2-1,3-2,1-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "correct-complete: All required links present, no extra links.",
        ));
}

#[test]
fn check_incomplete_names_smallest_missing_link() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "1-2"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "incomplete: Missing required link 1-3",
        ))
        .stdout(predicate::str::contains("missing:    1-3, 2-3"));
}

#[test]
fn check_without_edges_is_incomplete() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level)])
        .assert()
        .code(2);
}

#[test]
fn check_extra_link_exits_three() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "1-2,2-3,1-3,3-4"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "has-forbidden: Extra (forbidden) link 3-4",
        ));
}

#[test]
fn check_forbidden_list_tolerates_unlisted_links() {
    let fx = Fixture::new();
    let level = fx.write("legacy.json", LEGACY);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "2-1,4-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All required links present."));
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "1-2,3-1"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Forbidden link 1-3"));
}

#[test]
fn check_json_report() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let output = fx
        .orbit()
        .args(["check", path_arg(&level), "--edges", "1-2", "--json"])
        .output()
        .expect("run orbit");
    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["level"], "triangulum");
    assert_eq!(report["mode"], "exact");
    assert_eq!(report["state"], "incomplete");
    assert_eq!(report["edge"], serde_json::json!([1, 3]));
    assert_eq!(report["missing"], serde_json::json!([[1, 3], [2, 3]]));
    assert_eq!(report["disallowed"], serde_json::json!([]));
    assert_eq!(report["state_hash"].as_str().map(str::len), Some(64));
}

#[test]
fn check_rejects_malformed_edge() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "1:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected `a-b`"));
}

#[test]
fn play_reports_completion_and_rebuild() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let script = fx.write(
        "solve.txt",
        "# build the triangle\nlink 1 2\nlink 2 3\nlink 3 1\nunlink 2 1\nlink 1 2\n",
    );
    let assert = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[3] link 3 1: created, correct-complete: All required links present, no extra links.",
        ))
        .stdout(predicate::str::contains(
            "[4] unlink 2 1: removed, incomplete: Missing required link 1-2",
        ))
        .stdout(predicate::str::contains(
            "final: correct-complete with 3 links",
        ));
    let stdout = steps_section(assert.get_output());
    assert_eq!(
        stdout
            .matches(
                "    [complete] Constellation complete: triangulum - Triangulum complete. (next: aries)"
            )
            .count(),
        2
    );
}

#[test]
fn play_warns_on_extra_rope_and_rejects_self_link() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let script = fx.write("oops.txt", "link 1 2\nlink 3 4\nlink 2 2\n");
    fx.orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "    [warn] Extra rope detected - Extra (forbidden) link 3-4",
        ))
        .stdout(predicate::str::contains("[3] link 2 2: rejected"))
        .stdout(predicate::str::contains(
            "    [info] Step rejected - cannot link star 2 to itself",
        ));
}

#[test]
fn play_json_emits_one_record_per_step() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let script = fx.write("solve.txt", "link 1 2\nlink 1 2\n");
    let output = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script), "--json"])
        .output()
        .expect("run orbit");
    assert_eq!(output.status.code(), Some(2));
    let records: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .expect("utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["outcome"], "created");
    assert_eq!(records[0]["state"], "incomplete");
    assert_eq!(records[1]["outcome"], "already-linked");
    assert!(records[1]["state"].is_null());
}

#[test]
fn play_reports_bad_script_line() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let script = fx.write("bad.txt", "link 1 2\njump 3\n");
    fx.orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("script line 2"));
}

#[test]
fn install_then_use_by_name() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["install", path_arg(&level)])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed triangulum into"));
    assert!(fx.config_dir().join("level-triangulum.json").is_file());

    fx.orbit()
        .args(["check", "triangulum", "--edges", "1-2,2-3,1-3"])
        .assert()
        .success();
    fx.orbit()
        .args(["show", "triangulum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level: triangulum"))
        .stdout(predicate::str::contains("mode:  exact"))
        .stdout(predicate::str::contains("next:  aries"))
        .stdout(predicate::str::contains("required"));
}

#[test]
fn install_rejects_rule_with_undeclared_star() {
    let fx = Fixture::new();
    let level = fx.write(
        "broken.json",
        r#"{"name":"broken","stars":[1,2],"required":[[1,9]]}"#,
    );
    fx.orbit()
        .args(["install", path_arg(&level)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("undeclared star 9"));
    assert!(!fx.config_dir().join("level-broken.json").exists());
}

#[test]
fn show_marks_forbidden_links_in_forbidden_list_mode() {
    let fx = Fixture::new();
    let level = fx.write("legacy.json", LEGACY);
    fx.orbit()
        .args(["show", path_arg(&level)])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode:  forbidden-list"))
        .stdout(predicate::str::contains("1-3"))
        .stdout(predicate::str::contains("forbidden"));
}

#[test]
fn unknown_level_fails() {
    let fx = Fixture::new();
    fx.orbit()
        .args(["check", "nowhere", "--edges", "1-2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("level not found: nowhere"));
}

#[test]
fn retrigger_pref_repeats_completion() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fs::create_dir_all(fx.config_dir()).expect("config dir");
    fs::write(
        fx.config_dir().join("prefs.json"),
        r#"{"retrigger_completion": true}"#,
    )
    .expect("prefs");
    let script = fx.write("solve.txt", "link 1 2\nlink 2 3\nlink 3 1\nunlink 1 4\n");
    let assert = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .success();
    assert_eq!(
        steps_section(assert.get_output())
            .matches("[complete]")
            .count(),
        2
    );
}

#[test]
fn play_coalesces_warnings_inside_the_window() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    let script = fx.write("ropes.txt", "link 1 2\nlink 3 4\nlink 1 4\n");

    let burst = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script), "--step-ms", "0"])
        .assert()
        .code(3);
    let stdout = String::from_utf8(burst.get_output().stdout.clone()).expect("utf-8");
    assert_eq!(steps_section(burst.get_output()).matches("[warn]").count(), 1);
    assert!(stdout.contains(
        "notices:\n    [warn] Extra rope detected - Extra (forbidden) link 1-4 (x2)"
    ));

    let paced = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .code(3);
    assert_eq!(steps_section(paced.get_output()).matches("[warn]").count(), 2);
}

#[test]
fn play_board_honours_max_notices_pref() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fs::create_dir_all(fx.config_dir()).expect("config dir");
    fs::write(fx.config_dir().join("prefs.json"), r#"{"max_notices": 1}"#).expect("prefs");
    let script = fx.write("ropes.txt", "link 3 4\nlink 1 2\n");
    let assert = fx
        .orbit()
        .args(["play", path_arg(&level), path_arg(&script)])
        .assert()
        .code(3);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let board = stdout.split("notices:\n").nth(1).expect("notice board");
    assert_eq!(board.lines().count(), 1);
    assert_eq!(steps_section(assert.get_output()).matches("[warn]").count(), 2);
}

#[test]
fn check_rejects_undeclared_star() {
    let fx = Fixture::new();
    let level = fx.write("triangle.json", TRIANGLE);
    fx.orbit()
        .args(["check", path_arg(&level), "--edges", "1-2,1-9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown star 9"));
}
