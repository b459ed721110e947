mod common;

use assert_cmd::Command;
use common::{ADMIN_TOKEN, BROKEN_TOKEN, LOGIN_CODE, MockServer, USER_TOKEN};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// A mock server plus an isolated home for the CLI
struct TestEnv {
    server: MockServer,
    temp_dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            server: MockServer::start_in_background(),
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn session_file(&self) -> PathBuf {
        self.temp_dir.path().join("session.yaml")
    }

    fn logged_in(self, token: &str, role: &str) -> Self {
        std::fs::write(
            self.session_file(),
            format!("token: {token}\nrefresh_token: refresh-{token}\nuser_id: '7'\nusername: maria\nrole: {role}\n"),
        )
        .unwrap();
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("helpdesk").unwrap();
        cmd.env("HELPDESK_API_URL", &self.server.base_url)
            .env("HELPDESK_SESSION_FILE", self.session_file())
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"))
            .env("HOME", self.temp_dir.path())
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }

    fn session(&self) -> String {
        std::fs::read_to_string(self.session_file()).unwrap_or_default()
    }
}

#[test]
fn test_help() {
    Command::cargo_bin("helpdesk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tickets"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_requires_login() {
    let env = TestEnv::new();
    env.cmd()
        .args(["tickets", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("You are not logged in."))
        .stdout(predicate::str::contains("helpdesk login"));
}

#[test]
fn test_login_with_password_stores_session() {
    let env = TestEnv::new();
    env.cmd()
        .args(["login", "--username", "maria", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Maria Lopez (maria)"));

    let session = env.session();
    assert!(session.contains(USER_TOKEN));
    assert!(session.contains("refresh-user-token"));
    assert!(session.contains("role: user"));

    env.cmd()
        .args(["login", "--username", "maria", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged in"));
}

#[test]
fn test_login_proceeds_when_profile_check_fails() {
    let env = TestEnv::new().logged_in(BROKEN_TOKEN, "user");
    env.cmd()
        .args(["login", "-u", "maria", "-p", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Maria Lopez (maria)"));

    assert!(env.server.last_request("/auth/login").is_some());
    let session = env.session();
    assert!(session.contains(USER_TOKEN));
    assert!(!session.contains(BROKEN_TOKEN));
}

#[test]
fn test_login_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .args(["login", "-u", "maria", "-p", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Login failed: invalid credentials"));
    assert!(!env.session().contains("token"));
}

#[test]
fn test_login_with_code() {
    let env = TestEnv::new();
    env.cmd()
        .args(["login", "--code", LOGIN_CODE])
        .assert()
        .success();
    assert!(env.session().contains(USER_TOKEN));
}

#[test]
fn test_list_json_sorted_newest_first() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    let output = env
        .cmd()
        .args(["--json", "tickets", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tickets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = tickets
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["ticket_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[test]
fn test_list_table_with_filters() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args(["tickets", "list", "--search", "HEATER"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken heater"))
        .stdout(predicate::str::contains("SPRINGWELL"))
        .stdout(predicate::str::contains("Staff schedule").not());

    env.cmd()
        .args(["tickets", "list", "--closed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visitor badge"))
        .stdout(predicate::str::contains("UNKNOWN"));
}

#[test]
fn test_show_marks_own_tickets_and_missing_ticket() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args(["tickets", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Lopez (You)"))
        .stdout(predicate::str::contains("Room 12 is cold"));

    env.cmd()
        .args(["tickets", "show", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ticket not found: 404"));
}

#[test]
fn test_create_uses_facility_options_from_settings() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args([
            "--yes",
            "tickets",
            "create",
            "--title",
            "Leaking tap",
            "--description",
            "Kitchen",
            "--facility",
            "north wing",
            "--category",
            "staff",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ticket HD-104 (Leaking tap)"));

    let body = env.server.last_request("/tickets/create").unwrap().body;
    assert_eq!(body["facility"], "NORTH WING");
    assert_eq!(body["category"], "STAFF");

    env.cmd()
        .args([
            "--yes", "tickets", "create", "-t", "Other", "-d", "", "--facility", "SPRINGWELL",
            "--category", "STAFF",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid facility"));
}

#[test]
fn test_reply_shows_refreshed_ticket() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args(["tickets", "reply", "2", "On my way"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reply added."))
        .stdout(predicate::str::contains("On my way"));

    env.cmd()
        .args(["tickets", "reply", "2", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reply message cannot be empty"));
}

#[test]
fn test_export_csv_to_file() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    let path = env.temp_dir.path().join("open.csv");
    env.cmd()
        .args(["tickets", "export", "--format", "csv", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 ticket(s)"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("id,number,title,status"));
    assert!(content.contains("Broken heater"));
}

#[test]
fn test_admin_commands_are_gated() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
    assert!(env.server.last_request("/auth/user/list").is_none());
}

#[test]
fn test_settings_set_validates_json() {
    let env = TestEnv::new().logged_in(ADMIN_TOKEN, "admin");
    env.cmd()
        .args(["settings", "set", "welcome", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON data."));
    assert!(env.server.last_request("/auth/settings").is_none());

    env.cmd()
        .args(["settings", "set", "welcome", r#"{"text": "Hi"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Setting updated successfully!"));

    env.cmd()
        .args(["settings", "get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Setting not found: missing"));
}

#[test]
fn test_users_create_and_generate_code() {
    let env = TestEnv::new().logged_in(ADMIN_TOKEN, "admin");
    env.cmd()
        .args([
            "--yes", "users", "create", "-u", "theo", "-n", "Theo", "-r", "user", "-p", "pw",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user theo (user)"));
    let body = env.server.last_request("/auth/user").unwrap().body;
    assert_eq!(body["role"], "user");

    env.cmd()
        .args(["users", "generate-code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("123456"));
}

#[test]
fn test_logout_clears_tokens() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .args(["--yes", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    let session = env.session();
    assert!(!session.contains(USER_TOKEN));
    assert!(session.contains("username: maria"));
}

#[test]
fn test_json_error_object() {
    let env = TestEnv::new();
    let output = env.cmd().args(["--json", "whoami"]).output().unwrap();
    assert!(!output.status.success());

    let error: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(error["status"], "error");
    assert_eq!(error["is_auth_error"], true);
}

#[test]
fn test_status_with_valid_session() {
    let env = TestEnv::new().logged_in(USER_TOKEN, "user");
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Maria Lopez!"))
        .stdout(predicate::str::contains(env.server.base_url.as_str()));
}

#[test]
fn test_status_with_rejected_token() {
    let env = TestEnv::new().logged_in("stale-token", "user");
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("no longer valid"))
        .stdout(predicate::str::contains("Welcome,").not());
}

#[test]
fn test_status_without_session() {
    let env = TestEnv::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run 'helpdesk login' to sign in."));
    assert!(env.server.last_request("/auth/me").is_none());
}
