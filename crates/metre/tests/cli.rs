use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn init_config_writes_default_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sheet.json");
    Command::cargo_bin("metre")
        .expect("binary")
        .args(["--log-level", "warn", "init-config"])
        .arg(&path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&path).expect("config");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["sheet_id"], "A4-CALIB-V2.0");
    assert_eq!(json["pattern"]["kind"], "tag");
    assert_eq!(json["pattern"]["id"], 33);
}

#[test]
fn generate_writes_requested_variant_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    Command::cargo_bin("metre")
        .expect("binary")
        .args(["--log-level", "off", "generate", "--variant", "dark", "--dpi", "50"])
        .args(["--stem", "sheet", "--out-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("sheet-dark.png"))
        .stdout(predicate::str::contains("sheet-dark.pdf"));

    assert!(out.join("sheet-dark.png").is_file());
    assert!(out.join("sheet-dark.pdf").is_file());
    assert!(!out.join("sheet-light.png").exists());
}

#[test]
fn invalid_config_fails_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = dir.path().join("bad.json");
    std::fs::write(&cfg, r#"{ "pattern": { "kind": "tag", "id": 33, "size_mm": 175.0 } }"#)
        .expect("write config");
    let out = dir.path().join("out");
    Command::cargo_bin("metre")
        .expect("binary")
        .args(["--log-level", "off", "generate", "--config"])
        .arg(&cfg)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fiducial"));
    assert!(!out.exists());
}

#[test]
fn lists_builtin_dictionaries() {
    Command::cargo_bin("metre")
        .expect("binary")
        .arg("dictionaries")
        .assert()
        .success()
        .stdout(predicate::str::contains("DICT_APRILTAG_36h11"));
}

#[test]
fn log_level_is_validated() {
    Command::cargo_bin("metre")
        .expect("binary")
        .args(["--log-level", "loud", "dictionaries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loud"));
    Command::cargo_bin("metre")
        .expect("binary")
        .args(["--log-level", "debug", "dictionaries"])
        .assert()
        .success();
}
