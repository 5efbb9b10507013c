//! End-to-end tests driving the `diglot` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const GOOD_BLOCK: &str = "AdvS:: Oración avanzada.
SimS:: Oración simple.
SimE:: Simple sentence.
SimS_Segments::
S1(Oración simple.)
PHRASE_ALIGN::
S1 ~ Oración avanzada. ~ Simple sentence.
SimSL::
S1 :: oración simple
AdvSL:: oración avanzado
DIGLOT_MAP::
S1 :: Simple->simple(simple)(Y) | sentence->oración(oración)(Y)
";

const BAD_FLAG_BLOCK: &str = "AdvS:: a
SimS:: s
SimE:: e
SimS_Segments::
S1(x)
PHRASE_ALIGN::
S1 ~ a ~ b
SimSL::
S1 :: l
AdvSL:: la
DIGLOT_MAP::
S1 :: E->S(F)(X)
";

fn diglot(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diglot"))
        .args(args)
        .env_remove("DIGLOT_GRAMMAR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run diglot")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stage_file(entries: &[&str]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\nEND_SENTENCE\n", e.trim()))
        .collect()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn validate_accepts_clean_stage_file() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "book.llm.txt",
        &stage_file(&[
            "CHAPTER_MARKER_DIRECT:: Capítulo I",
            GOOD_BLOCK,
            "// --- BOOK_FULLY_PROCESSED --- //",
        ]),
    );

    let output = diglot(&["validate", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("OK (1 sentences, 1 chapter markers, 1 directives, complete)"));
}

#[test]
fn validate_rejects_bad_block_with_exit_one() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "book.llm.txt",
        &stage_file(&[GOOD_BLOCK, BAD_FLAG_BLOCK]),
    );

    let output = diglot(&["validate", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("INVALID"));
    assert!(out.contains("entry 2:"));
    assert!(out.contains("has invalid ViabilityFlag character: 'X'. Expected Y or N."));
}

#[test]
fn validate_single_block_as_json() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "good.txt", GOOD_BLOCK);
    let bad = write(dir.path(), "bad.txt", "   \n");

    let output = diglot(&[
        "validate",
        "--block",
        "--format",
        "json",
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["errors"].as_array().unwrap().len(), 0);
    assert_eq!(
        json[1]["errors"][0],
        "Block is empty or contains only whitespace."
    );
}

#[test]
fn validate_missing_file_is_an_error() {
    let output = diglot(&["validate", "/nonexistent/book.llm.txt"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn parse_emits_json() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "book.llm.txt",
        &stage_file(&["CHAPTER_MARKER_DIRECT:: Uno", GOOD_BLOCK]),
    );

    let output = diglot(&["parse", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["items"][0]["title"], "Uno");
    assert_eq!(json["items"][1]["sim_e"], "Simple sentence.");
    assert_eq!(json["items"][1]["diglot_map"][0]["entries"][1]["spa_lemma"], "oración");
    assert_eq!(json["items"][1]["diglot_map"][0]["entries"][1]["viability"], "viable");
}

#[test]
fn parse_rejects_invalid_block() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "book.llm.txt", &stage_file(&[BAD_FLAG_BLOCK]));

    let output = diglot(&["parse", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Entry 1 is not a valid block"));
}

#[test]
fn grammar_prints_standard_catalog() {
    let output = diglot(&["grammar", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["grammar_version"], "1.0");
    assert_eq!(json["required_markers"][0], "AdvS::");
    assert_eq!(json["optional_markers"][0], "LOCKED_PHRASE::");
}

#[test]
fn custom_grammar_changes_required_markers() {
    let dir = TempDir::new().unwrap();
    let grammar = write(
        dir.path(),
        "grammar.yaml",
        "grammar_version: \"1.1\"\nrequired_markers:\n  - \"ID::\"\n  - \"AdvS::\"\n",
    );
    let block = write(dir.path(), "block.txt", "ID:: 7\nAdvS:: hola\n");

    let output = diglot(&[
        "--grammar",
        grammar.to_str().unwrap(),
        "validate",
        "--block",
        block.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn check_grammar_reports_schema_violations() {
    let dir = TempDir::new().unwrap();
    let good = write(
        dir.path(),
        "good.json",
        r#"{"grammar_version": "1.0", "required_markers": ["AdvS::"]}"#,
    );
    let bad = write(
        dir.path(),
        "bad.yaml",
        "grammar_version: \"1.0\"\nrequired_markers: [\"AdvS\"]\n",
    );

    assert_eq!(diglot(&["check-grammar", good.to_str().unwrap()]).status.code(), Some(0));

    let output = diglot(&["check-grammar", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("INVALID"));
}

#[test]
fn invalid_grammar_flag_fails_before_validating() {
    let dir = TempDir::new().unwrap();
    let grammar = write(dir.path(), "grammar.yaml", "grammar_version: \"1.0\"\nrequired_markers: []\n");
    let block = write(dir.path(), "block.txt", GOOD_BLOCK);

    let output = diglot(&[
        "--grammar",
        grammar.to_str().unwrap(),
        "validate",
        "--block",
        block.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid grammar"));
}

#[test]
fn check_grammar_ignores_broken_grammar_env() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "broken.yaml", "grammar_version: \"1.0\"\nrequired_markers: []\n");
    let good = write(
        dir.path(),
        "good.yaml",
        "grammar_version: \"1.0\"\nrequired_markers: [\"AdvS::\"]\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_diglot"))
        .args(["check-grammar", good.to_str().unwrap()])
        .env("DIGLOT_GRAMMAR", &broken)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn grammar_env_applies_to_validate() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "broken.yaml", "grammar_version: \"1.0\"\nrequired_markers: []\n");
    let block = write(dir.path(), "block.txt", GOOD_BLOCK);

    let output = Command::new(env!("CARGO_BIN_EXE_diglot"))
        .args(["validate", "--block", block.to_str().unwrap()])
        .env("DIGLOT_GRAMMAR", &broken)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn check_grammar_lists_each_violation_with_its_path() {
    let dir = TempDir::new().unwrap();
    let bad = write(
        dir.path(),
        "bad.json",
        r#"{"grammar_version": "one", "required_markers": ["AdvS::", "SimS"]}"#,
    );

    let output = diglot(&["check-grammar", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("  - /grammar_version: "), "{}", out);
    assert!(out.contains("  - /required_markers/1: "), "{}", out);
}

#[test]
fn check_grammar_reports_cross_list_duplicates() {
    let dir = TempDir::new().unwrap();
    let dup = write(
        dir.path(),
        "dup.yaml",
        "grammar_version: \"1.0\"\nrequired_markers: [\"AdvS::\"]\noptional_markers: [\"AdvS::\"]\n",
    );

    let output = diglot(&["check-grammar", dup.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Duplicate marker: AdvS::"));
}
