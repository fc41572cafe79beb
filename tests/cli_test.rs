use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const SCENARIO: &str = r#"{"type":"summary","summary":"Parser bug fix","leafUuid":"B"}
{"type":"user","uuid":"A","parentUuid":null,"sessionId":"s1","timestamp":"2025-01-01T10:00:00Z","cwd":"/work/proj","message":{"role":"user","content":"Fix the bug in parser"}}
{"type":"assistant","uuid":"B","parentUuid":"A","sessionId":"s1","timestamp":"2025-01-01T10:00:05Z","cwd":"/work/proj","message":{"role":"assistant","content":[{"type":"text","text":"Fixed it by adjusting regex"}]}}
"#;

struct Fixture {
    tmp: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempdir().expect("tempdir");
        let projects = tmp.path().join("projects");
        let project = projects.join("-work-proj");
        fs::create_dir_all(&project).expect("mkdir project");
        fs::write(project.join("s1.jsonl"), SCENARIO).expect("write log");
        fs::write(project.join("agent-123.jsonl"), SCENARIO.replace("s1", "agent")).expect("write agent log");

        let config = tmp.path().join("claude-finder.yaml");
        write_config(&config, &tmp.path().join("index.db"), &projects);
        Self { tmp, config }
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("claude-finder");
        cmd.current_dir(self.tmp.path())
            .env("RUST_LOG", "off")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn init(&self) {
        self.cmd().arg("init").assert().success();
    }
}

fn write_config(path: &Path, db: &Path, projects: &Path) {
    let yaml = format!(
        "database:\n  path: {}\nsource:\n  projects_dir: {}\nsummarizer:\n  enabled: false\n",
        db.display(),
        projects.display()
    );
    fs::write(path, yaml).expect("write config");
}

#[test]
fn init_indexes_and_refuses_second_run() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 1 conversations (2 messages)"));

    fx.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database already exists"));

    fx.cmd()
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 1 conversations"));
}

#[test]
fn search_finds_prefix_matches() {
    let fx = Fixture::new();
    fx.init();

    fx.cmd()
        .args(["search", "bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UUID: A"))
        .stdout(predicate::str::contains("Conversation: Parser bug fix"));

    fx.cmd()
        .args(["search", "xyzzy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found for: xyzzy"));

    let output = fx
        .cmd()
        .args(["search", "fix", "--json"])
        .output()
        .expect("run search");
    assert!(output.status.success());
    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let ids: Vec<&str> = hits
        .as_array()
        .expect("array")
        .iter()
        .map(|h| h["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["B", "A"]);
}

#[test]
fn context_and_tree() {
    let fx = Fixture::new();
    fx.init();

    fx.cmd()
        .args(["context", "B", "--children"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parent messages"))
        .stdout(predicate::str::contains("Fix the bug in parser"));

    fx.cmd()
        .args(["context", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("message not found: missing"));

    let output = fx.cmd().args(["tree", "s1", "--json"]).output().expect("run tree");
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(tree["total_messages"], 2);
    assert_eq!(tree["roots"][0]["id"], "A");
    assert_eq!(tree["roots"][0]["children"][0]["id"], "B");
}

#[test]
fn list_and_stats() {
    let fx = Fixture::new();
    fx.init();

    fx.cmd()
        .args(["list", "--days", "100000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parser bug fix"))
        .stdout(predicate::str::contains("agent").not());

    let output = fx.cmd().args(["stats", "--json"]).output().expect("run stats");
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(stats["conversations"], 1);
    assert_eq!(stats["messages"], 2);
    assert_eq!(stats["fts_rows"], 2);
}

#[test]
fn reindex_keeps_counts() {
    let fx = Fixture::new();
    fx.init();
    fx.cmd().args(["index", "--all"]).assert().success();
    fx.cmd().args(["index", "--all"]).assert().success();

    let output = fx.cmd().args(["stats", "--json"]).output().expect("run stats");
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(stats["messages"], 2);
    assert_eq!(stats["fts_rows"], 2);
}

#[test]
fn missing_projects_dir_fails() {
    let tmp = tempdir().expect("tempdir");
    let config = tmp.path().join("claude-finder.yaml");
    write_config(&config, &tmp.path().join("index.db"), &tmp.path().join("nope"));

    assert_cmd::cargo::cargo_bin_cmd!("claude-finder")
        .current_dir(tmp.path())
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(&config)
        .args(["index", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required directory does not exist"));
}

#[test]
fn read_commands_need_an_index() {
    let fx = Fixture::new();

    for args in [vec!["search", "bug"], vec!["stats"], vec!["tree", "s1"]] {
        fx.cmd()
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Database not found"));
    }
    assert!(!fx.tmp.path().join("index.db").exists());
}
