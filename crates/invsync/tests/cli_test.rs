//! Integration tests for the `invsync` binary.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `invsync` with env isolation: no user config, no inherited token.
fn invsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("invsync");
    cmd.env("HOME", "/tmp/invsync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/invsync-cli-test-nonexistent")
        .env_remove("INVSYNC_TOKEN")
        .env_remove("INVSYNC_GRIST__HOST")
        .env_remove("INVSYNC_GRIST__API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, host: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[grist]\nhost = \"{host}\"\ndoc_id = \"doc1\"\napi_key = \"super-secret\"\n"
        ),
    )
    .unwrap();
    path
}

fn records_path(table: &str) -> String {
    format!("/api/docs/doc1/tables/{table}/records")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    invsync_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn config_path_lists_given_files() {
    invsync_cmd()
        .args(["--config", "/etc/invsync/site.toml", "config", "path"])
        .assert()
        .success()
        .stdout("/etc/invsync/site.toml\n");
}

#[test]
fn config_show_redacts_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "https://grist.example.com");

    invsync_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("********")
                .and(predicate::str::contains("super-secret").not())
                .and(predicate::str::contains("MAC_Primary")),
        );
}

// ── Ingest ──────────────────────────────────────────────────────────

#[test]
fn ingest_without_host_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");
    std::fs::write(&report, r#"{"mac_primary": "AA"}"#).unwrap();

    invsync_cmd()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .args(["ingest", "--token", "tok", "--report"])
        .arg(&report)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host"));
}

#[test]
fn ingest_rejects_non_object_report() {
    invsync_cmd()
        .args(["ingest", "--token", "tok"])
        .write_stdin("[1, 2, 3]")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON report"));
}

#[tokio::test(flavor = "multi_thread")]
async fn ingest_creates_device_and_prints_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(records_path("Accounts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{ "id": 7, "fields": { "Token": "tok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(records_path("Devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(records_path("Devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{ "id": 101 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(records_path("Notes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{ "id": 1 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), &server.uri());

    let output = invsync_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["ingest", "--token", "tok"])
        .write_stdin(r#"{"mac_primary": "AA:BB", "hostname": "h1"}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["status"], 200);
    assert_eq!(outcome["data"]["id"], 101);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_exits_with_auth_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(records_path("Accounts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": []
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), &server.uri());

    invsync_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["ingest", "--token", "nope"])
        .write_stdin(r#"{"mac_primary": "AA:BB"}"#)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn report_without_mac_prints_rejection_and_exits_with_usage_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(records_path("Accounts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{ "id": 7, "fields": { "Token": "tok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(records_path("Devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": []
        })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), &server.uri());

    let output = invsync_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["ingest", "--token", "tok"])
        .write_stdin(r#"{"hostname": "h1"}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["status"], 400);
    assert_eq!(outcome["message"], "No MAC address provided");
    assert!(outcome["data"].is_null());
}
