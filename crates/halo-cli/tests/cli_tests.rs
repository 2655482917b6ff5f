// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used)]
use assert_cmd::Command;
use predicates::prelude::*;

fn halo() -> Command {
    let mut cmd = Command::cargo_bin("halo").expect("halo binary");
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn stats_json_describes_the_population() {
    let output = halo()
        .args(["stats", "--objects", "64", "--seed", "3", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["objects"], 64);
    assert_eq!(report["seed"], 3);
    assert_eq!(report["tree"]["leaves"], 64);
    assert_eq!(report["tree"]["internal_nodes"], 63);
    assert_eq!(report["config"]["cell_size"], 1.0);
}

#[test]
fn stats_text_names_tree_shape() {
    halo()
        .args(["stats", "--objects", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 objects in a 100x100 world"))
        .stdout(predicate::str::contains("tree: 10 leaves, 9 internal nodes"));
}

#[test]
fn soak_reports_success() {
    halo()
        .args([
            "soak",
            "--objects",
            "80",
            "--frames",
            "12",
            "--check-every",
            "4",
            "--cell-size",
            "8",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "soak ok: 12 frames, 80 objects, 3 checks",
        ));
}

#[test]
fn config_dir_is_honoured() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("collision.json"),
        r#"{ "width": 20, "height": 10, "cell_size": 4.0 }"#,
    )
    .expect("write config");
    let output = halo()
        .args(["stats", "--objects", "5", "--json", "--config"])
        .arg(dir.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["config"]["width"], 20);
    assert_eq!(report["config"]["height"], 10);
    assert_eq!(report["config"]["cell_size"], 4.0);
    assert_eq!(report["config"]["wrap"], false);
}

#[test]
fn empty_config_dir_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = halo()
        .args(["stats", "--objects", "1", "--json", "--config"])
        .arg(dir.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["config"]["width"], 100);
}

#[test]
fn invalid_cell_size_fails() {
    halo()
        .args(["stats", "--objects", "4", "--cell-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid checker config"));
}
