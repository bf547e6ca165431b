use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use termfolio_core::ContentStore;

fn termfolio(workspace: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("termfolio"));
    cmd.current_dir(workspace)
        .env("HOME", workspace.join("home"))
        .env_remove("TERMFOLIO_LOG")
        .arg("--workspace")
        .arg(workspace);
    cmd
}

fn run_json(workspace: &Path, args: &[&str]) -> Value {
    let output = termfolio(workspace)
        .arg("--json")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("json output")
}

fn transcript(report: &Value) -> Vec<String> {
    report["transcript"]
        .as_array()
        .expect("transcript")
        .iter()
        .map(|line| line.as_str().expect("line").to_string())
        .collect()
}

#[test]
fn vocabulary_lists_completion_names_in_order() {
    let workspace = TempDir::new().expect("workspace");
    let names = run_json(workspace.path(), &["vocabulary"]);
    assert_eq!(
        names,
        serde_json::json!([
            "help", "about", "skills", "projects", "contact", "clear", "whoami", "ls", "theme",
            "neofetch", "exit", "date", "pwd", "cat", "echo"
        ])
    );
}

#[test]
fn run_prints_plain_transcript() {
    let workspace = TempDir::new().expect("workspace");
    let output = termfolio(workspace.path())
        .args(["--no-persist", "run", "whoami", "pwd"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    assert_eq!(
        text,
        "alex@portfolio:~$ whoami\nalexdeveloper\nalex@portfolio:~$ pwd\n/home/alex/portfolio\n"
    );
}

#[test]
fn unknown_commands_are_reported_not_fatal() {
    let workspace = TempDir::new().expect("workspace");
    let report = run_json(workspace.path(), &["--no-persist", "run", "Frobnicate now", "   "]);
    assert_eq!(
        transcript(&report),
        [
            "alex@portfolio:~$ Frobnicate now",
            "Command not found: frobnicate. Type 'help' for available commands.",
        ]
    );
    assert_eq!(report["output"][1]["kind"], "result");
    assert_eq!(report["output"][1]["text"][0]["emphasis"]["kind"], "error");
    assert_eq!(report["history"], serde_json::json!(["Frobnicate now"]));
}

#[test]
fn theme_and_history_persist_across_runs() {
    let workspace = TempDir::new().expect("workspace");
    let first = run_json(workspace.path(), &["run", "theme blue", "whoami"]);
    assert_eq!(first["theme"], "blue");
    assert!(workspace.path().join(".termfolio/prefs.sqlite").exists());

    let second = run_json(workspace.path(), &["run", "neofetch"]);
    assert_eq!(second["theme"], "blue");
    assert!(transcript(&second)[1].contains("Theme:    blue"));
    assert_eq!(
        second["history"],
        serde_json::json!(["theme blue", "whoami", "neofetch"])
    );
}

#[test]
fn no_persist_leaves_preferences_untouched() {
    let workspace = TempDir::new().expect("workspace");
    run_json(workspace.path(), &["--no-persist", "run", "theme amber"]);
    let report = run_json(workspace.path(), &["--no-persist", "run", "whoami"]);
    assert_eq!(report["theme"], "green");
    assert!(!workspace.path().join(".termfolio/prefs.sqlite").exists());
}

#[test]
fn project_settings_choose_default_theme() {
    let workspace = TempDir::new().expect("workspace");
    let runtime = workspace.path().join(".termfolio");
    fs::create_dir_all(&runtime).expect("runtime dir");
    fs::write(
        runtime.join("settings.json"),
        r#"{"default_theme":"matrix","prompt_host":"dev"}"#,
    )
    .expect("settings");
    let report = run_json(workspace.path(), &["--no-persist", "run", "ls"]);
    assert_eq!(report["theme"], "matrix");
    assert_eq!(transcript(&report)[0], "alex@dev:~$ ls");
}

#[test]
fn content_file_replaces_builtin_profile() {
    let workspace = TempDir::new().expect("workspace");
    let mut content = ContentStore::builtin();
    content.profile.name = "Sam Rivera".to_string();
    let path = workspace.path().join("portfolio.json");
    fs::write(&path, serde_json::to_string(&content).expect("serialize")).expect("content");

    let report = run_json(
        workspace.path(),
        &[
            "--no-persist",
            "--content",
            path.to_string_lossy().as_ref(),
            "run",
            "whoami",
        ],
    );
    assert_eq!(transcript(&report)[1], "samrivera");
}

#[test]
fn malformed_content_file_fails_startup() {
    let workspace = TempDir::new().expect("workspace");
    let path = workspace.path().join("broken.json");
    fs::write(&path, "{ not json").expect("content");
    termfolio(workspace.path())
        .args(["--no-persist", "--content"])
        .arg(&path)
        .args(["run", "whoami"])
        .assert()
        .failure();
}

#[test]
fn config_save_writes_project_settings() {
    let workspace = TempDir::new().expect("workspace");
    let config = run_json(workspace.path(), &["config", "--save"]);
    assert_eq!(config["history_persist_limit"], 50);
    assert_eq!(config["ui"]["boot_delay_ms"], 4500);
    let saved = workspace.path().join(".termfolio/settings.json");
    let raw = fs::read_to_string(saved).expect("saved settings");
    let parsed: Value = serde_json::from_str(&raw).expect("settings json");
    assert_eq!(parsed["default_theme"], "green");
}

#[test]
fn completions_script_names_binary() {
    let workspace = TempDir::new().expect("workspace");
    let output = termfolio(workspace.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let script = String::from_utf8(output).expect("utf8");
    assert!(script.contains("termfolio"));
    assert!(script.contains("vocabulary"));
}
