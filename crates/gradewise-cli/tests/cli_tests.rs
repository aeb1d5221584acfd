//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MODEL: &str = "\
Q1(10 Marks) The sky is blue because air molecules scatter blue sunlight.
Q2(5 Marks) Water boils at 100 degrees Celsius at sea level.
";

const STUDENT: &str = "\
Q1 The sky is blue because air scatters blue sunlight.
";

/// A scratch directory with a local config pointing the store inside it.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("gradewise.toml"),
        "store_dir = \"store\"\nparallelism = 2\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("model.txt"), MODEL).unwrap();
    std::fs::write(dir.path().join("student.txt"), STUDENT).unwrap();
    dir
}

fn gradewise(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradewise").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GRADEWISE_STORE_DIR")
        .env_remove("GRADEWISE_STRATEGY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = workspace();
    gradewise(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("grade"))
        .stdout(predicate::str::contains("upload-model"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn init_creates_files_and_skips_existing() {
    let dir = tempfile::tempdir().unwrap();

    gradewise(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradewise.toml"))
        .stdout(predicate::str::contains("Created samples/model-answer.txt"));

    assert!(dir.path().join("gradewise.toml").exists());
    assert!(dir.path().join("samples/student-answer.txt").exists());

    gradewise(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradewise.toml already exists, skipping."));
}

#[test]
fn init_samples_grade_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    gradewise(dir.path()).arg("init").assert().success();

    gradewise(dir.path())
        .args(["grade", "--model", "samples/model-answer.txt"])
        .args(["--student", "samples/student-answer.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:"));
}

#[test]
fn inspect_shows_sections() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["inspect", "--file", "model.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 question(s), weighted labels"))
        .stdout(predicate::str::contains("[10 marks]"))
        .stdout(predicate::str::contains("No issues found."));
}

#[test]
fn inspect_reports_warnings() {
    let dir = workspace();
    std::fs::write(dir.path().join("dup.txt"), "Q1 first\nQ1 second\nQ2").unwrap();
    gradewise(dir.path())
        .args(["inspect", "--file", "dup.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate label Q1"))
        .stdout(predicate::str::contains("answer is empty"));
}

#[test]
fn upload_then_grade_by_name() {
    let dir = workspace();

    gradewise(dir.path())
        .args(["upload-model", "--name", "physics", "--file", "model.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Stored model answer 'physics' (2 questions, 15.00 marks",
        ));
    assert!(dir.path().join("store/physics.json").exists());

    gradewise(dir.path())
        .args(["grade", "--name", "physics", "--student", "student.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1"))
        .stdout(predicate::str::contains("Total:"));
}

#[test]
fn grade_with_model_file_as_json() {
    let dir = workspace();

    let output = gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "student.txt"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_possible"], 15.0);
    assert_eq!(report["per_question"].as_array().unwrap().len(), 2);
    assert_eq!(report["per_question"][1]["answered"], false);
    assert_eq!(report["per_question"][1]["score"], 0.0);
    let q1 = report["per_question"][0]["score"].as_f64().unwrap();
    assert!(q1 > 0.0 && q1 <= 10.0);
}

#[test]
fn identical_sheets_score_full_marks() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "model.txt"])
        .args(["--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15.00 / 15.00 (100.00%)"))
        .stdout(predicate::str::contains("**Grade:** A"));
}

#[test]
fn strategy_override() {
    let dir = workspace();
    std::fs::write(dir.path().join("half.txt"), "Q1 Water boils\nQ2 Water boils").unwrap();
    std::fs::write(dir.path().join("m.txt"), "Q1 Water boils at sea\nQ2 nothing").unwrap();

    let output = gradewise(dir.path())
        .args(["grade", "--model", "m.txt", "--student", "half.txt"])
        .args(["--strategy", "word-overlap", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["per_question"][0]["score"], 5.0);
    assert_eq!(report["per_question"][1]["score"], 0.0);
}

#[test]
fn unknown_strategy_fails() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "student.txt"])
        .args(["--strategy", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn missing_model_fails() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["grade", "--name", "nothing", "--student", "student.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no model answer found for 'nothing'"));
}

#[test]
fn model_without_labels_is_rejected() {
    let dir = workspace();
    std::fs::write(dir.path().join("prose.txt"), "Just some prose without labels.").unwrap();

    gradewise(dir.path())
        .args(["upload-model", "--name", "prose", "--file", "prose.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question labels"));

    gradewise(dir.path())
        .args(["grade", "--model", "prose.txt", "--student", "student.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question labels"));
}

#[test]
fn blank_student_sheet_fails() {
    let dir = workspace();
    std::fs::write(dir.path().join("blank.txt"), "   \n\n").unwrap();

    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "blank.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extractable text"));
}

#[test]
fn corrupt_pdf_fails_as_extraction_failure() {
    let dir = workspace();
    std::fs::write(dir.path().join("broken.pdf"), "not a pdf").unwrap();

    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "broken.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extractable text"));
}

#[test]
fn grades_directory_of_sheets() {
    let dir = workspace();
    let sheets = dir.path().join("sheets");
    std::fs::create_dir(&sheets).unwrap();
    std::fs::write(sheets.join("alice.txt"), STUDENT).unwrap();
    std::fs::write(sheets.join("bob.txt"), MODEL).unwrap();
    std::fs::write(sheets.join("notes.md"), "ignored").unwrap();

    let out = dir.path().join("reports");
    let output = gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "sheets"])
        .args(["--format", "json", "--output"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());

    let graded: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let graded = graded.as_array().unwrap();
    assert_eq!(graded.len(), 2);
    assert!(graded[0]["student"].as_str().unwrap().ends_with("alice.txt"));
    assert_eq!(graded[1]["report"]["percentage"], 100.0);

    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn reports_default_to_configured_output_dir() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "student.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to"));

    let saved = std::fs::read_dir(dir.path().join("gradewise-results")).unwrap();
    assert_eq!(saved.count(), 1);
}

#[test]
fn same_stem_sheets_keep_separate_reports() {
    let dir = workspace();
    let sheets = dir.path().join("sheets");
    std::fs::create_dir(&sheets).unwrap();
    std::fs::write(sheets.join("x.txt"), STUDENT).unwrap();
    std::fs::write(sheets.join("x.TXT"), MODEL).unwrap();

    let out = dir.path().join("reports");
    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "sheets", "--output"])
        .arg(&out)
        .assert()
        .success();

    let mut reports: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    reports.sort();
    assert_eq!(reports.len(), 2);

    let percentages: Vec<f64> = reports
        .iter()
        .map(|p| {
            let json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap();
            json["percentage"].as_f64().unwrap()
        })
        .collect();
    assert!(percentages.contains(&100.0));
    assert!(percentages.iter().any(|p| *p < 100.0));
}

#[test]
fn list_models_empty_and_populated() {
    let dir = workspace();

    gradewise(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No model answers stored"));

    gradewise(dir.path())
        .args(["upload-model", "--name", "chem", "--file", "model.txt"])
        .assert()
        .success();

    gradewise(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("chem: 2 questions, 15.00 marks"));
}

#[test]
fn invalid_upload_name_fails() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["upload-model", "--name", "../escape", "--file", "model.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid assessment name"));
}

#[test]
fn unknown_format_fails() {
    let dir = workspace();
    gradewise(dir.path())
        .args(["grade", "--model", "model.txt", "--student", "student.txt"])
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}
