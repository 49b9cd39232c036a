use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Run talent-list on demo data with an empty config directory
fn talent_list(args: &[&str]) -> Output {
    let temp_dir = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_talent-list"))
        .args(args)
        .env("TALENTGRID_CONFIG", temp_dir.path().join("config.toml"))
        .env("TALENTGRID_LOG_LEVEL", "warn")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run talent-list")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_loads_every_page() {
    let output = talent_list(&["jobs", "--demo", "--format", "jsonl"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 23);
}

#[test]
fn test_max_pages_caps_output() {
    let output = talent_list(&["jobs", "--demo", "--format", "jsonl", "--max-pages", "2"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 10);
}

#[test]
fn test_status_filter_json() {
    let output = talent_list(&["offers", "--demo", "--status", "declined", "--format", "json"]);
    assert!(output.status.success());

    let rows: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|r| r["status"] == "Declined"));
}

#[test]
fn test_location_filter_text() {
    let output = talent_list(&["jobs", "--demo", "--location", "lyon"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().all(|line| line.contains("France | Lyon")));
}

#[test]
fn test_sort_order() {
    let newest = talent_list(&["jobs", "--demo", "--format", "jsonl", "--max-pages", "1"]);
    let first: Value = serde_json::from_str(stdout(&newest).lines().next().unwrap()).unwrap();
    assert_eq!(first["postedAt"], "2025-10-23");

    let oldest = talent_list(&[
        "jobs",
        "--demo",
        "--format",
        "jsonl",
        "--max-pages",
        "1",
        "--sort",
        "oldest",
    ]);
    let first: Value = serde_json::from_str(stdout(&oldest).lines().next().unwrap()).unwrap();
    assert_eq!(first["postedAt"], "2025-10-01");
}

#[test]
fn test_csv_header() {
    let output = talent_list(&["applications", "--demo", "--format", "csv", "--max-pages", "1"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,jobId,jobTitle,applicantName,status,appliedAt")
    );
    assert_eq!(lines.count(), 5);
}

#[test]
fn test_empty_result_succeeds() {
    let output = talent_list(&["jobs", "--demo", "--title", "astronaut"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_unknown_view_exits_3() {
    let output = talent_list(&["assessments", "--demo"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unknown_status_exits_3() {
    let output = talent_list(&["offers", "--demo", "--status", "hired"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Valid statuses"));
}

#[test]
fn test_filter_for_other_view_exits_3() {
    let output = talent_list(&["offers", "--demo", "--title", "Engineer"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_malformed_config_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[paging]\npage_size = 0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_talent-list"))
        .args(["jobs", "--demo", "--config"])
        .arg(&config)
        .env("TALENTGRID_LOG_LEVEL", "warn")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
