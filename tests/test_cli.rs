use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Commands run against a fresh database in a private temp directory, with
/// live fetching replaced by the stub fetcher.
fn linkhoard(db: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("linkhoard").unwrap();
    cmd.env("LINKHOARD_DB_URL", db.path().join("linkhoard.db"))
        .env("LINKHOARD_FETCH_STUB", "1")
        .env_remove("LINKHOARD_CONFIG");
    cmd
}

// The stub fetcher never resolves names, so tests use a public literal IP
// that passes the reachability guard without DNS.
const SAFE_URL: &str = "http://93.184.216.34/library";

#[test]
fn test_add_and_show() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["add", SAFE_URL, "--tags", "Rust, Reading", "--note", "later"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added bookmark: Stub Title (ID: 1)"));

    let output = linkhoard(&db)
        .args(["show", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["id"], 1);
    assert_eq!(record["url"], SAFE_URL);
    assert_eq!(record["url_norm"], SAFE_URL);
    assert_eq!(record["title"], "Stub Title");
    assert_eq!(record["site_name"], "Stub Site");
    assert_eq!(record["tags"], serde_json::json!(["rust", "reading"]));
    assert_eq!(record["note"], "later");
    assert_eq!(record["status"], "ok");
    assert_eq!(record["http_status"], 200);
}

#[test]
fn test_add_rejects_non_http_url() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["add", "ftp://93.184.216.34/file"])
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Error"));

    // Nothing was persisted
    linkhoard(&db)
        .args(["show", "1"])
        .assert()
        .failure()
        .code(65);
}

#[test]
fn test_blocked_url_is_persisted_with_fetch_error() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["add", "http://127.0.0.1/admin"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unsafe URL or invalid hostname"));

    let output = linkhoard(&db)
        .args(["show", "1", "--json"])
        .output()
        .unwrap();
    let record: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["status"], "fetch_error");
    assert_eq!(record["error_message"], "Unsafe URL or invalid hostname");
    assert!(record["title"].is_null());
}

#[test]
fn test_list_pagination() {
    let db = TempDir::new().unwrap();

    for path in ["one", "two", "three"] {
        linkhoard(&db)
            .args(["add", &format!("http://93.184.216.34/{}", path)])
            .assert()
            .success();
    }

    let output = linkhoard(&db)
        .args(["list", "--json", "--limit", "2", "--offset", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_list_tag_filter() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["add", "http://93.184.216.34/a", "--tags", "work,ai"])
        .assert()
        .success();
    linkhoard(&db)
        .args(["add", "http://93.184.216.34/b", "--tags", "home"])
        .assert()
        .success();

    let output = linkhoard(&db)
        .args(["list", "--json", "--tag", "work"])
        .output()
        .unwrap();
    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(
        page["items"][0]["url"],
        "http://93.184.216.34/a"
    );

    let output = linkhoard(&db)
        .args(["list", "--json", "--tag", "missing"])
        .output()
        .unwrap();
    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 0);
}

#[test]
fn test_delete_is_idempotent() {
    let db = TempDir::new().unwrap();

    linkhoard(&db).args(["add", SAFE_URL]).assert().success();

    linkhoard(&db)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted bookmark with ID 1"));

    linkhoard(&db)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmark with ID 1 not found"));
}

#[test]
fn test_tags_json() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["add", "http://93.184.216.34/a", "--tags", "ai,work"])
        .assert()
        .success();
    linkhoard(&db)
        .args(["add", "http://93.184.216.34/b", "--tags", "ai"])
        .assert()
        .success();

    let output = linkhoard(&db).args(["tags", "--json"]).output().unwrap();
    assert!(output.status.success());

    let counts: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(counts[0]["tag"], "ai");
    assert_eq!(counts[0]["count"], 2);
    assert_eq!(counts[1]["tag"], "work");
    assert_eq!(counts[1]["count"], 1);
}

#[test]
fn test_health() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db: ok"));

    let output = linkhoard(&db).args(["health", "--json"]).output().unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["db"], "ok");
    assert!(report["time"].is_string());
}

#[test]
fn test_debug_mode() {
    let db = TempDir::new().unwrap();

    linkhoard(&db)
        .args(["-d", "-d", "health"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Debug mode: debug"));
}
