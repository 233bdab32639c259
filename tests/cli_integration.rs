#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use taskboard::db::{connection, KeyValueStore, SqliteKv};
use taskboard::store::STORAGE_KEY;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("TASKBOARD_DIR");
        cmd.env_remove("TASKBOARD_LOG");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join(connection::DATA_DIR_NAME)
    }

    /// Overwrite the persisted snapshot with raw text.
    fn write_snapshot(&self, raw: &str) {
        let conn = connection::open_db(&self.data_dir()).expect("open db");
        SqliteKv::new(conn)
            .set(STORAGE_KEY, raw)
            .expect("write snapshot");
    }
}

fn setup() -> TestEnv {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env
}

fn add_project(env: &TestEnv, title: &str) -> String {
    let v = env.run_ok(&["project", "add", title]);
    v["data"]["id"].as_str().unwrap().to_string()
}

fn add_todo(env: &TestEnv, title: &str, project: &str) -> String {
    let v = env.run_ok(&["todo", "add", title, "--project", project]);
    v["data"]["id"].as_str().unwrap().to_string()
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".taskboard/taskboard.db"));
    assert!(PathBuf::from(path).exists());
    assert_eq!(v["data"]["projects"], 1);
}

#[test]
fn test_init_idempotent() {
    let env = setup();
    let v = env.run_ok(&["init"]);
    assert_eq!(v["data"]["projects"], 1);
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["project", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn test_dir_flag_and_subdirectory_lookup() {
    let env = TestEnv::new();
    let board = env.dir.path().join("board");
    fs::create_dir_all(board.join("nested")).unwrap();
    let board_arg = board.to_string_lossy().to_string();

    env.run_ok(&["init", "--dir", &board_arg]);
    let v = env.run_ok(&["project", "list", "--dir", &board_arg]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 1);

    let output = env
        .cmd()
        .current_dir(board.join("nested"))
        .args(["project", "list", "--json"])
        .output()
        .expect("run");
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["success"], true);
}

#[test]
fn test_config_sets_default_project() {
    let env = TestEnv::new();
    fs::create_dir_all(env.data_dir()).unwrap();
    fs::write(
        env.data_dir().join(connection::CONFIG_FILE_NAME),
        r#"{"default_project": {"title": "Inbox", "description": "Loose ends"}}"#,
    )
    .unwrap();

    env.run_ok(&["init"]);
    let v = env.run_ok(&["project", "list"]);
    let projects = v["data"]["projects"].as_array().unwrap();
    assert_eq!(projects[0]["title"], "Inbox");
    assert_eq!(projects[0]["current"], true);
}

#[test]
fn test_invalid_config_is_rejected() {
    let env = setup();
    fs::write(env.data_dir().join(connection::CONFIG_FILE_NAME), "{nope").unwrap();
    let v = env.run_err(&["project", "list"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── 2. default project & project CRUD ─────────────────────────────

#[test]
fn test_default_project_created() {
    let env = setup();
    let v = env.run_ok(&["project", "list"]);
    let projects = v["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["title"], "My Tasks");
    assert_eq!(projects[0]["lifecycle"], "planning");
    assert_eq!(v["data"]["current_project_id"], projects[0]["id"]);
}

#[test]
fn test_project_crud() {
    let env = setup();

    // add
    let v = env.run_ok(&[
        "project",
        "add",
        "Client Website",
        "--description",
        "Landing page",
        "--compensation",
        "paid",
        "--deadline",
        "2030-01-31",
    ]);
    let id = v["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(v["data"]["title"], "Client Website");
    assert_eq!(v["data"]["compensation_type"], "paid");
    assert_eq!(v["data"]["deadline"], "2030-01-31");
    assert_eq!(v["data"]["lifecycle"], "planning");
    assert!(v["data"]["color"].as_str().unwrap().starts_with('#'));

    // list
    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 2);

    // show
    let v = env.run_ok(&["project", "show", "client website"]);
    assert_eq!(v["data"]["project"]["id"], id);
    assert_eq!(v["data"]["project"]["description"], "Landing page");
    assert_eq!(v["data"]["progress"]["total"], 0);

    // edit
    let v = env.run_ok(&["project", "edit", &id, "--title", "Client Site", "--clear-deadline"]);
    assert_eq!(v["data"]["title"], "Client Site");
    assert!(v["data"]["deadline"].is_null());

    // example
    let v = env.run_ok(&["project", "example", &id, "https://example.com/inspo"]);
    assert_eq!(v["data"]["examples"][0], "https://example.com/inspo");
}

#[test]
fn test_project_add_with_lifecycle() {
    let env = setup();
    let v = env.run_ok(&["project", "add", "Shipped", "--lifecycle", "completed"]);
    assert_eq!(v["data"]["lifecycle"], "completed");
    assert!(v["data"]["completion_date"].is_string());
}

#[test]
fn test_project_empty_title_rejected() {
    let env = setup();
    let v = env.run_err(&["project", "add", "  "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 1);
}

#[test]
fn test_project_edit_requires_a_field() {
    let env = setup();
    let v = env.run_err(&["project", "edit", "My Tasks"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_project_resolve_ambiguous_and_missing() {
    let env = setup();
    add_project(&env, "Website Redesign");
    add_project(&env, "Website Audit");

    let v = env.run_err(&["project", "show", "website"]);
    assert_eq!(v["error"]["code"], "AMBIGUOUS_REF");
    let v = env.run_err(&["project", "show", "nope"]);
    assert_eq!(v["error"]["code"], "PROJECT_NOT_FOUND");
}

#[test]
fn test_project_select() {
    let env = setup();
    let id = add_project(&env, "Side Gig");
    let v = env.run_ok(&["project", "select", "side gig"]);
    assert_eq!(v["data"]["current"]["id"], id);

    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["current_project_id"], id);
}

// ─── 3. project lifecycle ──────────────────────────────────────────

#[test]
fn test_project_lifecycle_flow() {
    let env = setup();
    let id = add_project(&env, "Launch");

    let v = env.run_ok(&["project", "start", &id]);
    assert_eq!(v["data"]["lifecycle"], "inProgress");
    assert!(v["data"]["start_date"].is_string());

    let v = env.run_ok(&["project", "pause", &id]);
    assert_eq!(v["data"]["lifecycle"], "onHold");

    let v = env.run_ok(&["project", "resume", &id]);
    assert_eq!(v["data"]["lifecycle"], "inProgress");

    let v = env.run_ok(&["project", "complete", &id]);
    assert_eq!(v["data"]["lifecycle"], "completed");
    assert!(v["data"]["completion_date"].is_string());
    assert_eq!(v["data"]["overdue"], false);
}

#[test]
fn test_project_forbidden_transitions() {
    let env = setup();
    let id = add_project(&env, "Finished");
    env.run_ok(&["project", "complete", &id]);

    let v = env.run_err(&["project", "start", &id]);
    assert_eq!(v["error"]["code"], "INVALID_LIFECYCLE_TRANSITION");
    let v = env.run_err(&["project", "cancel", &id]);
    assert_eq!(v["error"]["code"], "INVALID_LIFECYCLE_TRANSITION");
    let v = env.run_err(&["project", "edit", &id, "--lifecycle", "planning"]);
    assert_eq!(v["error"]["code"], "INVALID_LIFECYCLE_TRANSITION");

    let v = env.run_ok(&["project", "show", &id]);
    assert_eq!(v["data"]["project"]["lifecycle"], "completed");
}

#[test]
fn test_overdue_project_flag() {
    let env = setup();
    let v = env.run_ok(&["project", "add", "Late", "--deadline", "2020-01-01"]);
    assert_eq!(v["data"]["overdue"], true);
    let id = v["data"]["id"].as_str().unwrap().to_string();

    let v = env.run_ok(&["project", "complete", &id]);
    assert_eq!(v["data"]["overdue"], false);
}

// ─── 4. project delete ─────────────────────────────────────────────

#[test]
fn test_project_delete_cascades() {
    let env = setup();
    let work = add_project(&env, "Work");
    let home = add_project(&env, "Home");
    add_todo(&env, "one", &work);
    add_todo(&env, "two", &work);
    let kept = add_todo(&env, "chores", &home);

    let v = env.run_ok(&["project", "delete", &work, "--yes"]);
    assert_eq!(v["data"]["deleted"]["id"], work);
    assert_eq!(v["data"]["deleted"]["todos_removed"], 2);

    let v = env.run_ok(&["todo", "list"]);
    let todos = v["data"]["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["id"], kept);
}

#[test]
fn test_project_delete_declined() {
    let env = setup();
    let id = add_project(&env, "Keep");
    add_todo(&env, "stay", &id);

    env.cmd()
        .args(["project", "delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."))
        .stderr(predicate::str::contains("Delete \"Keep\" and its 1 todo(s)?"));

    let v = env.run_ok(&["project", "show", &id]);
    assert_eq!(v["data"]["todos"].as_array().unwrap().len(), 1);
}

#[test]
fn test_project_delete_confirmed_on_stdin() {
    let env = setup();
    let id = add_project(&env, "Gone");

    env.cmd()
        .args(["project", "delete", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project: Gone"));

    let v = env.run_err(&["project", "show", &id]);
    assert_eq!(v["error"]["code"], "PROJECT_NOT_FOUND");
}

#[test]
fn test_deleting_current_project_reassigns() {
    let env = setup();
    let v = env.run_ok(&["project", "list"]);
    let default_id = v["data"]["current_project_id"].as_str().unwrap().to_string();
    let other = add_project(&env, "Other");
    env.run_ok(&["project", "select", &other]);

    let v = env.run_ok(&["project", "delete", &other, "--yes"]);
    assert_eq!(v["data"]["current_project_id"], default_id);

    let v = env.run_ok(&["project", "delete", &default_id, "--yes"]);
    assert!(v["data"]["current_project_id"].is_null());
}

// ─── 5. todos ──────────────────────────────────────────────────────

#[test]
fn test_todo_add_defaults_to_current_project() {
    let env = setup();
    let v = env.run_ok(&["project", "list"]);
    let current = v["data"]["current_project_id"].as_str().unwrap().to_string();

    let v = env.run_ok(&["todo", "add", "Buy milk"]);
    assert_eq!(v["data"]["project_id"], current);
    assert_eq!(v["data"]["status"], "todo");
    assert_eq!(v["data"]["priority"], "medium");

    let v = env.run_ok(&["todo", "add", "Loose", "--unassigned"]);
    assert!(v["data"]["project_id"].is_null());
}

#[test]
fn test_todo_check_and_uncheck() {
    let env = setup();
    let id = env.run_ok(&["todo", "add", "Write code", "--deadline", "2020-05-01"])["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let v = env.run_ok(&["todo", "show", &id]);
    assert_eq!(v["data"]["todo"]["overdue"], true);

    let v = env.run_ok(&["todo", "start", &id]);
    assert_eq!(v["data"]["status"], "in-progress");

    let v = env.run_ok(&["todo", "done", &id]);
    assert_eq!(v["data"]["status"], "done");
    assert!(v["data"]["completion_date"].is_string());
    assert_eq!(v["data"]["overdue"], false);

    let v = env.run_ok(&["todo", "undo", &id]);
    assert_eq!(v["data"]["status"], "todo");
    assert!(v["data"]["completion_date"].is_null());
    assert_eq!(v["data"]["overdue"], true);
}

#[test]
fn test_todo_edit_status_keeps_completion_date() {
    let env = setup();
    let id = env.run_ok(&["todo", "add", "Ship it"])["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    env.run_ok(&["todo", "done", &id]);

    let v = env.run_ok(&["todo", "edit", &id, "--status", "todo", "--priority", "high"]);
    assert_eq!(v["data"]["status"], "todo");
    assert_eq!(v["data"]["priority"], "high");
    assert!(v["data"]["completion_date"].is_string());
}

#[test]
fn test_todo_edit_clears_dates() {
    let env = setup();
    let id = env.run_ok(&[
        "todo",
        "add",
        "Plan",
        "--start-date",
        "2029-01-01",
        "--deadline",
        "2030-01-01",
    ])["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let v = env.run_ok(&["todo", "edit", &id, "--clear-deadline"]);
    assert!(v["data"]["deadline"].is_null());
    assert_eq!(v["data"]["start_date"], "2029-01-01");

    let v = env.run_ok(&["todo", "edit", &id, "--clear-start-date"]);
    assert!(v["data"]["start_date"].is_null());

    let v = env.run_ok(&["todo", "show", &id]);
    assert!(v["data"]["todo"]["deadline"].is_null());
    assert!(v["data"]["todo"]["start_date"].is_null());

    env.cmd()
        .args(["todo", "edit", &id, "--deadline", "2030-01-01", "--clear-deadline"])
        .assert()
        .failure();
}

#[test]
fn test_done_todo_must_be_reopened_before_start() {
    let env = setup();
    let id = env.run_ok(&["todo", "add", "Closed"])["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    env.run_ok(&["todo", "done", &id]);

    let v = env.run_err(&["todo", "start", &id]);
    assert_eq!(v["error"]["code"], "INVALID_LIFECYCLE_TRANSITION");
    let v = env.run_ok(&["todo", "show", &id]);
    assert_eq!(v["data"]["todo"]["status"], "done");

    env.run_ok(&["todo", "undo", &id]);
    let v = env.run_ok(&["todo", "start", &id]);
    assert_eq!(v["data"]["status"], "in-progress");
    assert!(v["data"]["completion_date"].is_null());
}

#[test]
fn test_todo_list_filters() {
    let env = setup();
    let work = add_project(&env, "Work");
    let a = env.run_ok(&["todo", "add", "a", "--project", &work, "--priority", "high"])["data"]
        ["id"]
        .as_str()
        .unwrap()
        .to_string();
    env.run_ok(&["todo", "add", "b", "--project", &work, "--priority", "low"]);
    let c = env.run_ok(&["todo", "add", "c", "--priority", "high", "--deadline", "2020-01-01"])
        ["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    env.run_ok(&["todo", "done", &a]);

    let ids = |v: &Value| -> Vec<String> {
        v["data"]["todos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap().to_string())
            .collect()
    };

    let v = env.run_ok(&["todo", "list", "--priority", "high"]);
    assert_eq!(ids(&v), vec![a.clone(), c.clone()]);

    let v = env.run_ok(&["todo", "list", "--project", "work"]);
    assert_eq!(ids(&v).len(), 2);

    let v = env.run_ok(&["todo", "list", "--project", "work", "--status", "done"]);
    assert_eq!(ids(&v), vec![a.clone()]);

    let v = env.run_ok(&["todo", "list", "--overdue"]);
    assert_eq!(ids(&v), vec![c]);
}

#[test]
fn test_todo_empty_title_rejected() {
    let env = setup();
    let v = env.run_err(&["todo", "add", ""]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(v["error"]["message"], "Please enter a todo title");
}

#[test]
fn test_todo_not_found() {
    let env = setup();
    let v = env.run_err(&["todo", "done", "nothing-here"]);
    assert_eq!(v["error"]["code"], "TODO_NOT_FOUND");
}

#[test]
fn test_todo_delete() {
    let env = setup();
    let id = env.run_ok(&["todo", "add", "Temporary"])["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // no stdin → declined
    let v = env.run_ok(&["todo", "delete", &id]);
    assert_eq!(v["data"]["cancelled"], true);
    env.run_ok(&["todo", "show", &id]);

    let v = env.run_ok(&["todo", "delete", &id, "-y"]);
    assert_eq!(v["data"]["deleted"]["title"], "Temporary");
    let v = env.run_err(&["todo", "show", &id]);
    assert_eq!(v["error"]["code"], "TODO_NOT_FOUND");
}

// ─── 6. board ──────────────────────────────────────────────────────

#[test]
fn test_board_json() {
    let env = setup();
    let work = add_project(&env, "Work");
    add_todo(&env, "Draft", &work);
    env.run_ok(&["todo", "add", "Floating", "--unassigned"]);

    let v = env.run_ok(&["board", "--expand", "work"]);
    let projects = v["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    let work_entry = projects
        .iter()
        .find(|p| p["project"]["id"] == work.as_str())
        .unwrap();
    assert_eq!(work_entry["expanded"], true);
    assert_eq!(work_entry["todos"][0]["title"], "Draft");
    assert_eq!(v["data"]["unassigned"][0]["title"], "Floating");
}

#[test]
fn test_board_text() {
    let env = setup();
    let work = add_project(&env, "Work");
    add_todo(&env, "Draft", &work);

    env.cmd()
        .args(["board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▸").and(predicate::str::contains("Work")))
        .stdout(predicate::str::contains("Draft").not());

    env.cmd()
        .args(["board", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Draft"))
        .stdout(predicate::str::contains("NO TODOs YET."));
}

// ─── 7. corrupt state & reset ──────────────────────────────────────

#[test]
fn test_corrupt_state_refuses_to_start() {
    let env = setup();
    env.write_snapshot("{definitely not json");

    let v = env.run_err(&["project", "list"]);
    assert_eq!(v["error"]["code"], "CORRUPT_STATE");
    assert!(v["error"]["message"]
        .as_str()
        .unwrap()
        .contains("taskboard reset --yes"));
}

#[test]
fn test_reset_recovers_corrupt_state() {
    let env = setup();
    add_project(&env, "Lost");
    env.write_snapshot(r#"{"projects": "nope"}"#);

    let v = env.run_ok(&["reset", "--yes"]);
    assert_eq!(v["data"]["reset"], true);

    let v = env.run_ok(&["project", "list"]);
    let projects = v["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["title"], "My Tasks");
}

#[test]
fn test_reset_declined() {
    let env = setup();
    add_project(&env, "Stays");

    env.cmd()
        .args(["reset"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 2);
}

// ─── 8. persistence & exit codes ───────────────────────────────────

#[test]
fn test_state_survives_between_invocations() {
    let env = setup();
    let id = add_project(&env, "Durable");
    env.run_ok(&["project", "start", &id]);
    let todo = add_todo(&env, "Remember me", &id);

    let v = env.run_ok(&["todo", "show", &todo]);
    assert_eq!(v["data"]["todo"]["project_id"], id);
    let v = env.run_ok(&["project", "show", "durable"]);
    assert_eq!(v["data"]["project"]["lifecycle"], "inProgress");
    assert_eq!(v["data"]["progress"]["total"], 1);
}

#[test]
fn test_exit_codes() {
    let env = setup();
    env.cmd().args(["project", "list"]).assert().success();
    env.cmd()
        .args(["project", "show", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Project not found"));
}

#[test]
fn test_text_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized taskboard at"));

    env.cmd()
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos found."));

    env.cmd()
        .args(["project", "add", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a project title"));
}

#[test]
fn test_not_initialized_text() {
    let env = TestEnv::new();
    env.cmd()
        .args(["board"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
