use std::{fs, path::Path, process::Command};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

const DUMP: &str = r#"{
  "meta": { "title": "Two Notes", "ticks_per_quarter": 480 },
  "notes": [
    { "tick": 960, "key": 60 },
    { "tick": 1920, "key": 72 },
    { "tick": 1920, "key": 65 }
  ]
}"#;

const CONFIG: &str = r#"{ "lanes": [{ "id": 0, "pitch": "C" }] }"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn help_lists_subcommands() {
    let exe = env!("CARGO_BIN_EXE_rhythm_cli");
    let output = Command::new(exe).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("chart"));
    assert!(stdout.contains("simulate"));
}

#[test]
fn chart_writes_lane_timestamps() {
    let exe = env!("CARGO_BIN_EXE_rhythm_cli");
    let dir = tempfile::tempdir().unwrap();
    let dump = write(dir.path(), "song.json", DUMP);
    let config = write(dir.path(), "config.json", CONFIG);
    let out = dir.path().join("charts.json");

    let output = Command::new(exe)
        .args(["chart", &dump, "-c", &config, "-o", out.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["title"], "Two Notes");
    assert_eq!(json["total_notes"], 3);
    assert_eq!(json["lanes"][0]["lane_id"], 0);
    assert_eq!(json["lanes"][0]["timestamps"], serde_json::json!([1.0, 2.0]));
}

#[test]
fn missing_input_file_is_e1001() {
    let exe = env!("CARGO_BIN_EXE_rhythm_cli");
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "config.json", CONFIG);
    let missing = dir.path().join("missing.json");

    let output = Command::new(exe)
        .args(["chart", missing.to_str().unwrap(), "-c", &config])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to load chart: "));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E1001: chart file not found"));
}

#[test]
fn config_without_lanes_is_e2001() {
    let exe = env!("CARGO_BIN_EXE_rhythm_cli");
    let dir = tempfile::tempdir().unwrap();
    let dump = write(dir.path(), "song.json", DUMP);
    let config = write(dir.path(), "config.json", r#"{ "lanes": [] }"#);

    let output = Command::new(exe)
        .args(["chart", &dump, "-c", &config])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: invalid config: "));
    assert!(stderr.contains("E2001: at least one lane is required"));
}

#[test]
fn simulate_reports_judgments_and_summary() {
    let exe = env!("CARGO_BIN_EXE_rhythm_cli");
    let dir = tempfile::tempdir().unwrap();
    let dump = write(dir.path(), "song.json", DUMP);
    let config = write(dir.path(), "config.json", CONFIG);
    let inputs = write(
        dir.path(),
        "inputs.json",
        r#"[{ "time": 2.0, "lane": 0 }, { "time": 1.0, "lane": 0 }, { "time": 1.5, "lane": 0, "pressed": false }]"#,
    );

    let output = Command::new(exe)
        .args(["simulate", &dump, "-c", &config, "-i", &inputs])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(stdout.matches("Perfect").count(), 2);
    assert!(stdout.contains("Result: score=20 rank=F perfect=2 great=0 good=0 miss=0"));
    assert!(stdout.contains("total_notes=3"));
}
