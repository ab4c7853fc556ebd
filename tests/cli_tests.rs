//! CLI integration tests
//!
//! Every command runs against a throwaway `AMOSHELF_HOME`; commands that
//! need the server talk to a local mock.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const COLLECTION_PATH: &str = "/api/v4/accounts/account/mozilla/collections/favs/addons";

/// Get a command for the amoshelf binary with an isolated home
fn amoshelf(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("amoshelf").unwrap();
    cmd.env("AMOSHELF_HOME", home.path())
        .env_remove("AMOSHELF_SERVER")
        .env_remove("AMOSHELF_ACCOUNT")
        .env_remove("AMOSHELF_COLLECTION")
        .env_remove("AMOSHELF_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn page_body() -> String {
    serde_json::json!({
        "next": null,
        "results": [
            {"addon": {
                "guid": "ext1@test",
                "name": {"en-US": "First Extension"},
                "current_version": {"version": "1.0", "files": [{"id": 1, "url": "https://x/1.xpi", "permissions": ["tabs"]}]}
            }},
            {"addon": {"guid": "ext2@test", "name": {"en-US": "Second Extension"}}}
        ]
    })
    .to_string()
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Browse add-on collections"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("amoshelf"));
}

#[test]
fn test_list_help() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List the add-ons in the collection"))
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_config_help() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage configuration"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_cache_help() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["cache", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_ls_alias() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["ls", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"));
}

#[test]
fn test_invalid_command() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["-q", "-v", "cache", "status"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("amoshelf"));
}

#[test]
fn test_config_path_uses_home() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["config", "path", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(home.path().to_string_lossy().as_ref()))
        .stdout(predicate::str::contains("\"exists\": false"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["config", "set", "collection.max_cache_age_minutes", "30"])
        .assert()
        .success();

    amoshelf(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_cache_age_minutes = 30"));
}

#[test]
fn test_config_set_unknown_key_exits_with_usage_code() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["config", "set", "nope", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_output_format_from_config() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["config", "set", "output.format", "json"])
        .assert()
        .success();

    amoshelf(&home)
        .args(["collection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"account\": \"mozilla\""));
}

#[test]
fn test_collection_set_and_show() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["c", "set", "--user", "someone", "--name", "favs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("someone/favs"));

    amoshelf(&home)
        .args(["collection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/api/v4/accounts/account/someone/collections/favs/addons",
        ));
}

#[test]
fn test_account_override_is_not_saved() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["--account", "visitor", "collection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("visitor"));

    assert!(!home.path().join("config.toml").exists());
}

#[test]
fn test_cache_status_not_cached() {
    let home = TempDir::new().unwrap();
    amoshelf(&home)
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not cached"));
}

#[test]
fn test_list_from_server() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", COLLECTION_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_body())
        .expect(1)
        .create();

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add-ons (2)"))
        .stdout(predicate::str::contains("First Extension"))
        .stdout(predicate::str::contains("ext2@test"));

    mock.assert();
}

#[test]
fn test_list_uses_cache_when_enabled() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", COLLECTION_PATH)
        .with_status(200)
        .with_body(page_body())
        .expect(1)
        .create();

    amoshelf(&home)
        .args(["config", "set", "collection.max_cache_age_minutes", "60"])
        .assert()
        .success();

    for _ in 0..2 {
        amoshelf(&home)
            .args(["--server", &server.url(), "--collection", "favs", "list", "-o", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ext1@test"));
    }

    mock.assert();

    amoshelf(&home)
        .args(["--collection", "favs", "cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 2"))
        .stdout(predicate::str::contains("(fresh)"));
}

#[test]
fn test_list_filter_and_limit() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", COLLECTION_PATH)
        .with_status(200)
        .with_body(page_body())
        .create();

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "list", "-f", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add-ons (1)"))
        .stdout(predicate::str::contains("Second Extension"));

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "list", "-l", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add-ons (1)"))
        .stdout(predicate::str::contains("First Extension"));
}

#[test]
fn test_show_record() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", COLLECTION_PATH)
        .with_status(200)
        .with_body(page_body())
        .create();

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "show", "ext1@test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Download: https://x/1.xpi"))
        .stdout(predicate::str::contains("- tabs"));

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "show", "missing@test"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("missing@test"));
}

#[test]
fn test_server_error_exit_code() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", COLLECTION_PATH)
        .with_status(500)
        .create();

    amoshelf(&home)
        .args(["--server", &server.url(), "--collection", "favs", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Status code: 500"));
}
