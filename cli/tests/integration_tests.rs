use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/git.yaml")
}

fn argbind(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argbind"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argbind")
}

fn with_defs(subcommand: &str, extra: &[&str]) -> Output {
    let defs = fixture();
    let mut args = vec![subcommand, "--defs", defs.to_str().unwrap()];
    args.extend_from_slice(extra);
    argbind(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// tokenize
// ---------------------------------------------------------------------------

#[test]
fn tokenize_prints_classified_tokens() {
    let output = argbind(&["tokenize", "--", "-ab", "--name=value", "--", "-x"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        json_stdout(&output),
        json!([
            { "kind": "short_option", "text": "-a", "assignment": false },
            { "kind": "short_option", "text": "-b", "assignment": false },
            { "kind": "long_option", "text": "--name", "assignment": true },
            { "kind": "value", "text": "value", "value_type": "OPTION_ASSIGNMENT" },
            { "kind": "value", "text": "-x", "value_type": "VALUE_END_OPTION" },
        ])
    );
}

#[test]
fn tokenize_yaml_output() {
    let output = argbind(&["tokenize", "--format", "yaml", "--", "file"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("kind: value"), "{out}");
    assert!(out.contains("value_type: VALUE_BEFORE_OPTION"), "{out}");
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

#[test]
fn match_tag_create() {
    let output = with_defs(
        "match",
        &["--", "tag", "-a", "release/1.0.0", "-m", "this is, a message", "-f"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        json_stdout(&output),
        json!({
            "command": "tag-create",
            "bindings": {
                "Annotate": true,
                "Force": true,
                "Message": ["this is, a message"],
                "Tag": true,
                "TagName": "release/1.0.0",
            }
        })
    );
}

#[test]
fn match_tag_list() {
    let output = with_defs(
        "match",
        &["--", "tag", "-l", "--sort=date", "--color=never", "-n", "3", "--format", "a,b"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let value = json_stdout(&output);
    assert_eq!(value["command"], "tag-list");
    assert_eq!(value["bindings"]["Sort"], json!(["date"]));
    assert_eq!(value["bindings"]["Format"], json!(["a", "b"]));
    assert_eq!(value["bindings"]["Color"], "never");
    assert_eq!(value["bindings"]["Lines"], 3);
}

#[test]
fn match_errors_exit_with_usage_code() {
    let output = with_defs("match", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no arguments were specified"));

    let output = with_defs("match", &["--", "tag", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid arguments: tag --bogus"));

    let output = with_defs("match", &["--", "tag", "-l", "-n", "many"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("expected an integer"));
}

#[test]
fn match_strict_duplicates() {
    let args = ["--", "tag", "-l", "--sort", "a", "--sort", "b"];

    let output = with_defs("match", &args);
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["bindings"]["Sort"], json!(["a", "b"]));

    let mut strict = vec!["--strict-duplicates"];
    strict.extend_from_slice(&args);
    let output = with_defs("match", &strict);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("duplicate options: --sort"));
}

// ---------------------------------------------------------------------------
// complete / usage / validate
// ---------------------------------------------------------------------------

#[test]
fn complete_prints_sorted_suggestions() {
    let output = with_defs("complete", &["--", "tag", "--l"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "--list");

    let output = with_defs("complete", &["--", "tag", "-l", "--color", "a"]);
    assert_eq!(stdout(&output).trim_end(), "always auto");

    let output = with_defs("complete", &["--", "nothing", "here"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "");
}

#[test]
fn usage_lists_every_command() {
    let output = with_defs("usage", &[]);

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "git --version|-v");
    assert_eq!(lines[1], "  Print the version of this program.");
    assert!(lines.contains(&"git tag --delete|-d <tagName>"));
    assert_eq!(out.lines().filter(|l| l.starts_with("git ")).count(), 4);
}

#[test]
fn validate_reports_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.yaml");
    std::fs::write(
        &broken,
        "program: broken\ncommands:\n  - name: gap\n    properties:\n      - { name: A, aliases: [\"1\"], mandatory: true }\n",
    )
    .unwrap();
    let good = fixture();

    let output = argbind(&["validate", good.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("ok (4 command(s))"));

    let output = argbind(&["validate", good.to_str().unwrap(), broken.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("with index 1 but expected index 0"), "{err}");
    assert!(err.contains("1 of 2 definition file(s) invalid"), "{err}");
}

#[test]
fn missing_definition_file_exits_with_definition_code() {
    let output = argbind(&["usage", "--defs", "/nonexistent/defs.yaml"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("error: I/O error"));
}
