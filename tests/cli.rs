use assert_cmd::Command;
use predicates::prelude::*;

fn monitor_hid() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("monitor-hid"));
    cmd.env_remove("MONITOR_HID_TOOLS_LOG");
    cmd
}

#[test]
fn dry_run_prints_the_packet() {
    monitor_hid()
        .args(["--property", "brightness", "--value", "50", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "0000: 00 40 c6 00 00 00 00 20 00 6e 00 80 00 00 00 00\n",
        ))
        .stdout(predicate::str::contains(
            "0040: 00 51 85 03 00 10 00 32 00 00 00 00 00 00 00 00\n",
        ))
        .stdout(predicate::str::ends_with("00c0: 00\n"));
}

#[test]
fn dry_run_kvm_switch() {
    monitor_hid()
        .args(["-p", "kvm-switch", "-v", "1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0040: 00 51 85 03 e0 69 00 01 00"));
}

#[test]
fn out_of_range_value_names_the_range() {
    monitor_hid()
        .args(["-p", "brightness", "-v", "101", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "error: 101 is not within the legal range of `brightness`, which is 0..=100",
        ));
}

#[test]
fn negative_value_is_range_checked() {
    monitor_hid()
        .args(["-p", "colour-mode", "-v", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("-1 is not within the legal range of `colour-mode`"));
}

#[test]
fn unknown_property_lists_valid_names() {
    monitor_hid()
        .args(["-p", "gamma", "-v", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gamma"))
        .stderr(predicate::str::contains("kvm-switch"))
        .stderr(predicate::str::contains("rgb-blue"));
}

#[test]
fn missing_value() {
    monitor_hid()
        .args(["-p", "brightness"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--value"));
}

#[test]
fn properties_as_jsonl() {
    let assert = monitor_hid().args(["properties", "-f", "jsonl"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let records = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(records.len(), 9);
    assert_eq!(records[0]["name"], "brightness");
    assert_eq!(records[0]["code"], 0x10);
    assert_eq!(records[4]["name"], "kvm-switch");
    assert_eq!(records[4]["code"], 0xe069);
    assert_eq!(records[4]["minimum"], 0);
    assert_eq!(records[4]["maximum"], 1);
    assert_eq!(records[8]["name"], "rgb-blue");
}

#[test]
fn properties_filtered_to_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("properties.csv");
    monitor_hid()
        .args(["properties", "rgb", "-f", "csv", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = std::fs::read_to_string(&path).unwrap();
    let lines = written.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Name,Code,Min,Max,Description");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("rgb-red,0xe004,0,100,"));
    assert!(lines[3].starts_with("rgb-blue,0xe006,0,100,"));
}

#[test]
fn properties_table() {
    monitor_hid()
        .arg("properties")
        .assert()
        .success()
        .stdout(predicate::str::contains("low-blue-light"))
        .stdout(predicate::str::contains("0xe00b"));
}
