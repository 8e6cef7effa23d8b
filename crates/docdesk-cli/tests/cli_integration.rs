//! CLI integration tests: run the actual docdesk binary.
//! Marked `#[ignore]` to skip in normal `cargo test`.

use std::path::Path;
use std::process::Command;

/// The binary with config, storage and HOME isolated under `home`, pointed
/// at a port nothing listens on.
fn docdesk(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docdesk"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("DOCDESK__STORAGE__PATH", home.join("storage.json"))
        .env("DOCDESK__API__BASE_URL", "http://127.0.0.1:9")
        .env("DOCDESK__API__TIMEOUT_SECS", "2")
        .env_remove("DOCDESK_PASSWORD");
    cmd
}

#[test]
#[ignore]
fn test_cli_whoami_requires_login() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docdesk(tmp.path())
        .arg("whoami")
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not signed in"), "stderr: {stderr}");
}

#[test]
#[ignore]
fn test_cli_logout_without_session_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docdesk(tmp.path())
        .arg("logout")
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "logout failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
#[ignore]
fn test_cli_logout_clears_stored_session() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = tmp.path().join("storage.json");
    std::fs::write(
        &storage,
        serde_json::json!({
            "authToken": "t0k",
            "currentUser": "{\"id\":1,\"full_name\":\"Ann\",\"email\":\"ann@acme.example\"}",
            "currentCompany": "{\"id\":9,\"name\":\"Acme\"}"
        })
        .to_string(),
    )
    .unwrap();

    // Server unreachable: logout still succeeds locally
    let output = docdesk(tmp.path())
        .arg("logout")
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&storage).unwrap()).unwrap();
    assert_eq!(stored, serde_json::json!({}));
}

#[test]
#[ignore]
fn test_cli_login_unreachable_server_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docdesk(tmp.path())
        .args(["login", "ann@acme.example", "--password", "pw"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(!tmp.path().join("storage.json").exists());
}

#[test]
#[ignore]
fn test_cli_tui_rejects_unknown_view() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docdesk(tmp.path())
        .args(["tui", "--view", "login"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown view"));
}

#[test]
#[ignore]
fn test_cli_init_project_creates_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".gitignore"), "target\n").unwrap();

    let output = docdesk(tmp.path())
        .args(["init", "--project"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config = std::fs::read_to_string(tmp.path().join(".docdesk/config.toml")).unwrap();
    assert!(config.contains("[api]"));
    let gitignore = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains(".docdesk/config.local.toml"));
}

#[test]
#[ignore]
fn test_cli_memory_backend_never_touches_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docdesk(tmp.path())
        .env("DOCDESK__STORAGE__BACKEND", "memory")
        .arg("whoami")
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not signed in"));

    let output = docdesk(tmp.path())
        .env("DOCDESK__STORAGE__BACKEND", "memory")
        .arg("logout")
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    assert!(!tmp.path().join("storage.json").exists());
}
