//! Tests running the compiled draftsman binary
//!
//! Each test spawns the binary with `--color never` so stderr stays plain.

use std::io::Write;
use std::process::{Command, Output, Stdio};

const PROMPT: &str = "A user sends requests to an API service which reads from a database";

const SOURCE: &str = r#"node web: "Web" icon=server x=0 y=0
node db: "DB" icon=database x=0 y=200
web -> db: "queries"
"#;

/// Spawn the CLI with the given args, feeding `stdin` as input
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_draftsman"))
        .args(["--color", "never"])
        .args(args)
        .env_remove("DRAFTSMAN_LOG_LEVEL")
        .env_remove("DRAFTSMAN_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn draftsman");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for draftsman")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_generate_emits_json_on_stdout() {
    let output = run_cli(&["generate", "--colorize"], PROMPT);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["diagram"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["analysis"]["pattern"], "client-server");
    assert!(json["diagram"]["links"][0]["style"]["color"].is_string());
}

#[test]
fn test_generate_with_forced_algorithm() {
    let output = run_cli(&["generate", "--algorithm", "organic"], PROMPT);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["config"]["algorithm"], "organic");
}

#[test]
fn test_generate_dsl_output_compiles() {
    let generated = run_cli(&["generate", "--format", "dsl"], PROMPT);
    assert!(generated.status.success());
    let source = stdout(&generated);
    assert!(source.contains("node user: \"User\" icon=user"));

    let compiled = run_cli(&["compile"], &source);
    assert!(compiled.status.success(), "stderr: {}", stderr(&compiled));
}

#[test]
fn test_compile_with_title() {
    let output = run_cli(&["compile", "--title", "Storage"], SOURCE);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["title"], "Storage");
    assert_eq!(json["links"][0]["label"], "queries");
}

#[test]
fn test_compile_failure_lists_errors_on_stderr() {
    let output = run_cli(&["compile"], "node a: \"A\" icon=teapot x=0 y=0\nwhat is this\n");

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    let errors = stderr(&output);
    assert!(errors.contains("line 1: Unknown icon type: teapot"));
    assert!(errors.contains("line 2: Unrecognized statement"));
    assert!(errors.contains("2 errors found"));
    assert!(!errors.contains("\x1b["));
}

#[test]
fn test_validate() {
    let valid = run_cli(&["validate"], SOURCE);
    assert!(valid.status.success());
    assert!(stdout(&valid).contains("✓ Valid diagram (2 nodes, 1 links, 0 containers)"));

    let invalid = run_cli(&["validate"], "web -> nowhere\n");
    assert!(!invalid.status.success());
    assert!(stdout(&invalid).contains("✗ Invalid diagram"));
}

#[test]
fn test_analyze_summary() {
    let output = run_cli(&["analyze"], PROMPT);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Pattern: Client-Server"));
}

#[test]
fn test_patterns_json() {
    let output = run_cli(&["patterns", "--json"], "");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let total = json["total"].as_u64().unwrap() as usize;
    assert_eq!(json["patterns"].as_array().unwrap().len(), total);
}

#[test]
fn test_file_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("diagram.dsl");
    let output_path = dir.path().join("diagram.json");
    std::fs::write(&input, SOURCE).unwrap();

    let output = run_cli(
        &[
            "compile",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ],
        "",
    );
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_input_file() {
    let output = run_cli(&["compile", "-i", "/nonexistent/draftsman.dsl"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read input file"));
}
