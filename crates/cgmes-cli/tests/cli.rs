use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, to_string_pretty};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_snapshot(dir: &Path) -> PathBuf {
    let snapshot = json!({
        "version": "cgmes_v2_4_15",
        "objects": [
            {"key": "_BV1", "class": "BaseVoltage",
             "attributes": {"mRID": "_BV1", "name": "110 kV", "nominalVoltage": 110.0}},
            {"key": "_T1", "class": "Terminal",
             "attributes": {"mRID": "_T1", "sequenceNumber": 1, "connected": true,
                            "TopologicalNode": {"ref": "_TN1"}}},
            {"key": "_TN1", "class": "TopologicalNode",
             "attributes": {"mRID": "_TN1", "BaseVoltage": {"ref": "_BV1"}}}
        ]
    });
    let path = dir.join("grid.json");
    fs::write(&path, to_string_pretty(&snapshot).unwrap()).unwrap();
    path
}

#[test]
fn profiles_lists_rank_order() {
    Command::cargo_bin("cgmes")
        .unwrap()
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Equipment"))
        .stdout(predicate::str::is_match(r"(?s)0\s+EQ.*3\s+SV.*6\s+DI").unwrap());
}

#[test]
fn schema_shows_inheritance_chain() {
    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["schema", "Terminal"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)IdentifiedObject.*ACDCTerminal.*Terminal").unwrap())
        .stdout(predicate::str::contains("sequenceNumber"))
        .stdout(predicate::str::is_match(r"(?m)^Terminal\s+EQ,SSH,TP,SV$").unwrap());
}

#[test]
fn schema_rejects_unknown_class() {
    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["schema", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown class 'Nope'"));
}

#[test]
fn export_writes_one_file_per_profile() {
    let dir = tempdir().unwrap();
    let model = write_snapshot(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--out", out.to_str().unwrap()])
        .args(["--profiles", "EQ,SSH,TP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grid_Equipment.xml"));

    assert!(out.join("grid_Equipment.xml").exists());
    assert!(out.join("grid_SteadyStateHypothesis.xml").exists());
    assert!(out.join("grid_Topology.xml").exists());
    assert!(!out.join("grid_StateVariables.xml").exists());

    let ssh = fs::read_to_string(out.join("grid_SteadyStateHypothesis.xml")).unwrap();
    assert!(ssh.contains("<cim:Terminal rdf:about=\"#_T1\">"));
    assert!(ssh.contains("<cim:ACDCTerminal.connected>true</cim:ACDCTerminal.connected>"));
}

#[test]
fn export_reads_config_and_flags_override_it() {
    let dir = tempdir().unwrap();
    let model = write_snapshot(dir.path());
    let config = dir.path().join("cgmes.toml");
    fs::write(
        &config,
        format!(
            "[export]\nprofiles = \"TP\"\nmodeling_authority = \"example.org\"\noutput_dir = \"{}\"\n",
            dir.path().join("from-config").display()
        ),
    )
    .unwrap();

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--config", config.to_str().unwrap()])
        .args(["--stem", "case"])
        .assert()
        .success();

    let tp = dir.path().join("from-config").join("case_Topology.xml");
    let contents = fs::read_to_string(&tp).unwrap();
    assert!(contents.contains("<md:Model.modelingAuthoritySet>example.org</md:Model.modelingAuthoritySet>"));
    assert!(!dir.path().join("from-config").join("case_Equipment.xml").exists());

    let out = dir.path().join("from-flags");
    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--config", config.to_str().unwrap()])
        .args(["--out", out.to_str().unwrap(), "--profiles", "EQ"])
        .assert()
        .success();
    assert!(out.join("grid_Equipment.xml").exists());
    assert!(!out.join("grid_Topology.xml").exists());
}

#[test]
fn existing_files_are_skipped() {
    let dir = tempdir().unwrap();
    let model = write_snapshot(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("grid_Equipment.xml"), "keep me").unwrap();

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--out", out.to_str().unwrap()])
        .args(["--profiles", "EQ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"))
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(out.join("grid_Equipment.xml")).unwrap(),
        "keep me"
    );
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let model = write_snapshot(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--out", out.to_str().unwrap()])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("grid_Topology.xml"));

    assert!(!out.join("grid_Topology.xml").exists());
}

#[test]
fn unknown_profile_fails() {
    let dir = tempdir().unwrap();
    let model = write_snapshot(dir.path());

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap(), "--profiles", "EQ,XYZ"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile 'XYZ'"));
}

#[test]
fn dangling_reference_in_snapshot_fails() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("broken.json");
    fs::write(
        &model,
        r#"{"objects": [{"key": "_T1", "class": "Terminal", "attributes": {"TopologicalNode": {"ref": "_missing"}}}]}"#,
    )
    .unwrap();

    Command::cargo_bin("cgmes")
        .unwrap()
        .args(["export", model.to_str().unwrap()])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dangling reference to '_missing'"));
}
