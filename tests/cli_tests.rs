use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn trimmify() -> Command {
    let mut cmd = Command::cargo_bin("trimmify").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_timecode_normalizes() {
    trimmify()
        .args(["timecode", "1:02:03"])
        .assert()
        .success()
        .stdout(predicate::str::diff("01:02:03\n"));

    trimmify()
        .args(["timecode", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time format"));
}

#[test]
fn test_timecode_rejects_hours_past_23() {
    trimmify()
        .args(["timecode", "25:00:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time format"));
}

#[test]
fn test_qualities_listing() {
    trimmify()
        .arg("qualities")
        .assert()
        .success()
        .stdout(predicate::str::contains("Original"))
        .stdout(predicate::str::contains("1280x720"))
        .stdout(predicate::str::contains("800k"));
}

#[test]
fn test_qualities_json() {
    let output = trimmify().args(["qualities", "--json"]).output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let profiles = parsed.as_array().unwrap();
    assert_eq!(profiles.len(), 5);
    assert_eq!(profiles[1]["label"], "1080p");
    assert_eq!(profiles[0]["target_width"], -1);
}

#[test]
fn test_trim_rejects_non_mp4_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "not a video").unwrap();

    trimmify()
        .current_dir(dir.path())
        .args(["trim", "--start", "0", "--end", "5", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn test_trim_rejects_unknown_quality() {
    let dir = TempDir::new().unwrap();
    trimmify()
        .current_dir(dir.path())
        .args(["trim", "--input", "clip.mp4", "--start", "0", "--end", "5", "--quality", "4k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown quality"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("trimmify.toml"), "[trimmify]\nthumbnail_count = 0\n").unwrap();
    trimmify()
        .current_dir(dir.path())
        .args(["timecode", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
