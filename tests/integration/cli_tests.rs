//! Command-line behavior of the `urlsdigest` binary

use crate::common::{html_page, mount_html, mount_status, LONG_PARAGRAPH};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;
use wiremock::MockServer;

fn urlsdigest() -> Command {
    let mut cmd = Command::cargo_bin("urlsdigest").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_no_urls_fails_without_writing() {
    let dir = tempdir().unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .args(["--engine", "http", "--no-monitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No URLs specified"));

    assert!(!dir.path().join("crawled_digest.md").exists());
}

#[test]
fn test_comment_only_urls_file_counts_as_no_urls() {
    let dir = tempdir().unwrap();
    let urls_file = dir.path().join("urls.txt");
    fs::write(&urls_file, "# nothing here\n\n   # indented comment\n").unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .arg("--urls-file")
        .arg(&urls_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No URLs specified"));
}

#[test]
fn test_zero_max_concurrent_rejected() {
    let dir = tempdir().unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .args(["--max-concurrent", "0", "https://a.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max-concurrent must be >= 1"));

    assert!(!dir.path().join("crawled_digest.md").exists());
}

#[test]
fn test_negative_max_concurrent_rejected() {
    urlsdigest()
        .args(["--max-concurrent", "-2", "https://a.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max-concurrent must be >= 1, got -2"));
}

#[test]
fn test_oversized_max_concurrent_rejected() {
    let dir = tempdir().unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .args(["--max-concurrent", "9000000000000000000", "https://a.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max-concurrent must be <="))
        .stderr(predicate::str::contains("panicked").not());

    assert!(!dir.path().join("crawled_digest.md").exists());
}

#[test]
fn test_directory_output_rejected() {
    let dir = tempdir().unwrap();

    urlsdigest()
        .arg("-o")
        .arg(dir.path())
        .arg("https://a.test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("path is a directory"));
}

#[test]
fn test_invalid_config_file_rejected() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("urlsdigest.toml");
    fs::write(&config, "[crawler]\nmemory-threshold-percent = 150.0\n").unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .arg("-c")
        .arg(&config)
        .arg("https://a.test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_run_writes_digest_and_summary() {
    let server = MockServer::start().await;
    mount_html(&server, "/ok", html_page("Welcome", LONG_PARAGRAPH)).await;
    mount_status(&server, "/fail", 503).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("reports").join("digest.md");
    let urls_file = dir.path().join("urls.txt");
    fs::write(&urls_file, format!("# seeds\n{}/ok\n\n", server.uri())).unwrap();
    let failing = format!("{}/fail", server.uri());

    let assert = urlsdigest()
        .arg("--engine")
        .arg("http")
        .arg("--no-monitor")
        .arg("-q")
        .arg("-o")
        .arg(&output)
        .arg("--urls-file")
        .arg(&urls_file)
        .arg(&failing)
        .assert()
        .success();

    assert
        .stdout(predicate::str::contains(format!("[SUCCESS] Fetched: {}/ok", server.uri())))
        .stdout(predicate::str::contains(format!("[FAILED]  URL: {}", failing)))
        .stdout(predicate::str::contains("Error: HTTP 503 Service Unavailable"))
        .stdout(predicate::str::contains("Successfully created digest:"))
        .stdout(predicate::str::contains("Total URLs processed: 2"))
        .stdout(predicate::str::contains("Successful crawls: 1"))
        .stdout(predicate::str::contains("Failed crawls: 1"));

    let digest = fs::read_to_string(&output).unwrap();
    assert!(digest.contains("total: 2\nsuccess: 1\nfailed: 1\n"));

    // File URLs come before command-line URLs
    let ok = digest.find(&format!("## {}/ok", server.uri())).unwrap();
    let fail = digest.find(&format!("## {}", failing)).unwrap();
    assert!(ok < fail);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_engine_and_output() {
    let server = MockServer::start().await;
    mount_html(&server, "/short", html_page("Short", "Brief.")).await;

    let dir = tempdir().unwrap();
    let config = dir.path().join("urlsdigest.toml");
    fs::write(
        &config,
        "[crawler]\nengine = \"http\"\nword-count-threshold = 0\n\n[output]\npath = \"from-config.md\"\nmonitor = false\n",
    )
    .unwrap();

    urlsdigest()
        .current_dir(dir.path())
        .arg("-c")
        .arg(&config)
        .arg(format!("{}/short", server.uri()))
        .assert()
        .success();

    let digest = fs::read_to_string(dir.path().join("from-config.md")).unwrap();
    assert!(digest.contains("Brief."));
    assert!(digest.contains("success: 1\n"));
}
