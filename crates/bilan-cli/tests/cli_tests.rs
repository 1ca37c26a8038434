//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bilan() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("bilan").unwrap()
}

#[test]
fn validate_shipped_definition() {
    bilan()
        .arg("validate")
        .arg("--definition")
        .arg("../../definitions/maths-premiere-p2.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("maths-premiere-p2"))
        .stdout(predicate::str::contains("7 chapters"))
        .stdout(predicate::str::contains("All definitions valid"));
}

#[test]
fn validate_directory() {
    bilan()
        .arg("validate")
        .arg("--definition")
        .arg("../../definitions")
        .assert()
        .success()
        .stdout(predicate::str::contains("maths-premiere-p2"));
}

#[test]
fn validate_nonexistent_file() {
    bilan()
        .arg("validate")
        .arg("--definition")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_sample_dataset() {
    let dir = TempDir::new().unwrap();

    bilan()
        .arg("score")
        .arg("--dataset")
        .arg("../../datasets/sample-eleve.json")
        .arg("--definition")
        .arg("../../definitions/maths-premiere-p2.toml")
        .arg("--output")
        .arg(dir.path())
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stdout(predicate::str::contains("ReadinessScore"))
        .stdout(predicate::str::contains("Recommandation"));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(entries.iter().any(|name| name.starts_with("report-")));
    assert!(entries.iter().any(|name| name == "bilan-eleve.md"));
    assert!(entries.iter().any(|name| name == "bilan-parents.md"));
    assert!(entries.iter().any(|name| name == "bilan-nexus.md"));

    // Audience visibility contract: parents never see raw scores, nexus
    // always does.
    let parents = std::fs::read_to_string(dir.path().join("bilan-parents.md")).unwrap();
    assert!(!parents.contains("/100"));
    assert!(!parents.contains("ReadinessScore"));
    let nexus = std::fs::read_to_string(dir.path().join("bilan-nexus.md")).unwrap();
    assert!(nexus.contains("ReadinessScore"));
    assert!(nexus.contains("Couverture du programme"));
}

#[test]
fn queries_are_bounded() {
    let output = bilan()
        .arg("queries")
        .arg("--dataset")
        .arg("../../datasets/sample-eleve.json")
        .arg("--definition")
        .arg("../../definitions/maths-premiere-p2.toml")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert!(!lines.is_empty());
    assert!(lines.len() <= 4);
    // The sample student is weak in analysis and geometry, both reached.
    assert!(stdout.contains("derivee") || stdout.contains("vecteur"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    bilan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created definitions/example.toml"))
        .stdout(predicate::str::contains("Created datasets/example.json"));

    assert!(dir.path().join("definitions/example.toml").exists());
    assert!(dir.path().join("datasets/example.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    bilan().current_dir(dir.path()).arg("init").assert().success();

    bilan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_output_scores_cleanly() {
    let dir = TempDir::new().unwrap();

    bilan().current_dir(dir.path()).arg("init").assert().success();

    bilan()
        .current_dir(dir.path())
        .arg("score")
        .arg("--dataset")
        .arg("datasets/example.json")
        .arg("--definition")
        .arg("definitions/example.toml")
        .arg("--output")
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommandation"));
}

#[test]
fn score_nonexistent_dataset() {
    bilan()
        .arg("score")
        .arg("--dataset")
        .arg("no_such_dataset.json")
        .arg("--definition")
        .arg("../../definitions/maths-premiere-p2.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_dataset.json"));
}

#[test]
fn help_output() {
    bilan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Diagnostic scoring and bilan rendering engine",
        ));
}

#[test]
fn version_output() {
    bilan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bilan"));
}
