use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn dpcc_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dpcc"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    dpcc_cmd().current_dir(dir).args(args).output().unwrap()
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn init(dir: &Path) {
    let output = run(dir, &["init"]);
    assert!(output.status.success());
}

fn add_project(dir: &Path, title: &str, extra: &[&str]) -> String {
    let mut args = vec![
        "add",
        title,
        "--client",
        "Acme",
        "--start",
        "2024-01-01",
        "--end",
        "2099-12-31",
        "--json",
    ];
    args.extend_from_slice(extra);
    let project = run_json(dir, &args);
    project["id"].as_str().unwrap().to_string()
}

#[test]
fn test_init_creates_dpcc_directory() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["init"]);

    assert!(output.status.success());
    assert!(tmp.path().join(".dpcc").exists());
    assert!(tmp.path().join(".dpcc/loro.db").exists());
    assert!(tmp.path().join(".dpcc/config.yaml").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(tmp.path(), &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["add", "Logo", "--client", "Acme", "--end", "2099-01-01"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a dpcc project"));
}

#[test]
fn test_add_uses_creation_defaults() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let project = run_json(
        tmp.path(),
        &["add", "Logo", "--client", "Acme", "--end", "2099-01-01", "--price", "abc", "--json"],
    );

    assert_eq!(project["title"], "Logo");
    assert_eq!(project["clientName"], "Acme");
    assert_eq!(project["priority"], "Medium");
    assert_eq!(project["stage"], "First Stage");
    assert_eq!(project["status"], "Active");
    assert_eq!(project["price"], 0.0);
    assert!(project["deliveredAt"].is_null());
    assert_eq!(project["notes"].as_array().unwrap().len(), 0);
}

#[test]
fn test_add_rejects_bad_values() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(
        tmp.path(),
        &["add", "Logo", "--client", "Acme", "--end", "31/12/2099"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("end date"));

    let output = run(
        tmp.path(),
        &["add", "Logo", "--client", "Acme", "--end", "2099-12-31", "--priority", "urgent"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("priority"));
}

#[test]
fn test_full_project_workflow() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let id = add_project(tmp.path(), "Website Redesign", &["--price", "1500", "--priority", "high"]);
    add_project(tmp.path(), "Brand Guide", &["--price", "800"]);

    // Running tab lists both under Active
    let output = run(tmp.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Active (2 Projects)"));
    assert!(stdout.contains("Website Redesign"));
    assert!(stdout.contains("Brand Guide"));

    // Highest priority first
    let view = run_json(tmp.path(), &["list", "--sort", "priority", "--json"]);
    let groups = view["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["status"], "Active");
    assert_eq!(groups[0]["projects"][0]["title"], "Website Redesign");

    // Short id prefix resolves
    let short = &id[..7];
    let project = run_json(tmp.path(), &["get", short, "--json"]);
    assert_eq!(project["id"], id.as_str());

    // Update
    let updated = run_json(
        tmp.path(),
        &["update", short, "--stage", "final", "--description", "New site", "--json"],
    );
    assert_eq!(updated["stage"], "Final Stage");
    assert_eq!(updated["description"], "New site");

    // Touch
    let output = run(tmp.path(), &["touch", short]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Touched project"));

    // Deliver sets deliveredAt
    let delivered = run_json(tmp.path(), &["deliver", short, "--json"]);
    assert_eq!(delivered["status"], "Delivered");
    assert_eq!(delivered["stage"], "Delivered");
    assert!(delivered["deliveredAt"].is_string());

    // Delivered this month shows on the delivered tab
    let summary = run_json(tmp.path(), &["stats", "--tab", "delivered", "--json"]);
    assert_eq!(summary["running"], 1);
    assert_eq!(summary["delivered"], 1);
    assert_eq!(summary["revision"], 0);
    assert_eq!(summary["tab_total"], 1500.0);
    assert_eq!(summary["tab_total_label"], "Total Delivered Value");

    // A different year hides it
    let view = run_json(
        tmp.path(),
        &["list", "--tab", "delivered", "--year", "1999", "--json"],
    );
    assert_eq!(view["groups"].as_array().unwrap().len(), 0);

    let view = run_json(
        tmp.path(),
        &["list", "--tab", "delivered", "--month", "all", "--json"],
    );
    assert_eq!(view["groups"][0]["projects"][0]["id"], id.as_str());

    // Reopen clears deliveredAt and moves it into revision
    let reopened = run_json(tmp.path(), &["reopen", short, "--json"]);
    assert_eq!(reopened["status"], "Revision");
    assert!(reopened["deliveredAt"].is_null());

    let summary = run_json(tmp.path(), &["stats", "--json"]);
    assert_eq!(summary["running"], 2);
    assert_eq!(summary["revision"], 1);
    assert_eq!(summary["tab_total"], 2300.0);

    // Running tab shows Active before Revision
    let view = run_json(tmp.path(), &["list", "--json"]);
    let groups = view["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["status"], "Active");
    assert_eq!(groups[1]["status"], "Revision");

    // Delete
    let output = run(tmp.path(), &["delete", short, "--force"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Deleted project"));

    let output = run(tmp.path(), &["get", short]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Project not found"));
}

#[test]
fn test_revision_tab_hides_total() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    add_project(tmp.path(), "Fixes", &["--status", "revision", "--price", "300"]);

    let output = run(tmp.path(), &["stats", "--tab", "revision"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Revision Projects: 1"));
    assert!(!stdout.contains("Total"));

    let output = run(tmp.path(), &["stats"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Running Value: $300"));
}

#[test]
fn test_notes_workflow() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add_project(tmp.path(), "App", &[]);

    let note = run_json(
        tmp.path(),
        &["note", "add", &id, "Client wants dark mode", "--tag", "follow-up", "--tag", "meeting", "--json"],
    );
    assert_eq!(note["content"], "Client wants dark mode");
    assert_eq!(note["tags"].as_array().unwrap().len(), 2);

    let output = run(tmp.path(), &["note", "add", &id, "Which fonts?"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(2 notes)"));

    let notes = run_json(tmp.path(), &["note", "list", &id, "--json"]);
    let notes = notes.as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1]["tags"][0], "Clarification");

    // Blank notes are rejected
    let output = run(tmp.path(), &["note", "add", &id, "   "]);
    assert!(!output.status.success());
}

#[test]
fn test_list_overdue_only() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let late = run_json(
        tmp.path(),
        &[
            "add", "Late Site", "--client", "Acme", "--start", "1999-12-01", "--end", "2000-01-01",
            "--json",
        ],
    );
    add_project(tmp.path(), "On Track", &[]);

    let view = run_json(tmp.path(), &["list", "--overdue", "--json"]);
    let groups = view["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    let projects = groups[0]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], late["id"]);

    let view = run_json(tmp.path(), &["list", "--json"]);
    assert_eq!(view["groups"][0]["projects"].as_array().unwrap().len(), 2);
}

#[test]
fn test_update_status_sets_and_clears_delivered_at() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add_project(tmp.path(), "Landing Page", &[]);

    let delivered = run_json(tmp.path(), &["update", &id, "--status", "delivered", "--json"]);
    assert_eq!(delivered["status"], "Delivered");
    assert_eq!(delivered["stage"], "First Stage");
    assert!(delivered["deliveredAt"].is_string());

    let active = run_json(tmp.path(), &["update", &id, "--status", "active", "--json"]);
    assert_eq!(active["status"], "Active");
    assert!(active["deliveredAt"].is_null());

    let output = run(tmp.path(), &["update", &id, "--status", "done"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid value 'done' for status"));
}

#[test]
fn test_list_empty() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(tmp.path(), &["list"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No projects found."));
}

#[test]
fn test_delete_without_force_in_non_interactive_mode_fails() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add_project(tmp.path(), "Keep Me", &[]);

    let output = dpcc_cmd()
        .current_dir(tmp.path())
        .args(["delete", &id])
        .stdin(std::process::Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));

    let project = run_json(tmp.path(), &["get", &id, "--json"]);
    assert_eq!(project["title"], "Keep Me");
}
