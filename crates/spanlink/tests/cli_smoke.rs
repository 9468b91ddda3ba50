use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const SCRIPT: &str = r#"
source:
  data:
    - text: "I can see the tourist places in "
    - text: Japan
      alias: location
      meta: "@sys.location"
assignment_id: A42
events:
  - edit: "Je peux voir les lieux touristiques au Japon"
  - select: { start: 39, end: 44 }
  - assign: { span: 1, entity: 2 }
"#;

fn spanlink() -> Command {
    let mut cmd = Command::cargo_bin("spanlink").expect("binary exists");
    cmd.env("SPANLINK_SUBMIT_TO", "https://workersandbox.mturk.com")
        .env("SPANLINK_LANGUAGE", "fr");
    cmd
}

#[test]
fn help_displays_usage() {
    spanlink()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn preview_prints_the_answer_payload() {
    spanlink()
        .args(["preview", "--language", "ru", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text":"Японии""#))
        .stdout(predicate::str::contains(r#""userDefined":true"#));
}

#[test]
fn preview_report_names_the_language() {
    spanlink()
        .arg("preview")
        .assert()
        .success()
        .stdout(predicate::str::contains("French (preview): puis-je voir"))
        .stdout(predicate::str::contains("Valid: yes"));
}

#[test]
fn replay_prints_report_and_submission() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let script = temp.path().join("task.yaml");
    fs::write(&script, SCRIPT)?;

    spanlink()
        .arg("replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. \"Japon\" location"))
        .stdout(predicate::str::contains(
            "Submit to: https://workersandbox.mturk.com/mturk/externalSubmit",
        ))
        .stdout(predicate::str::contains("assignmentId = A42"));
    Ok(())
}

#[test]
fn replay_reports_failing_events() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let script = temp.path().join("task.json");
    fs::write(
        &script,
        r#"{"source":{"data":[{"text":"x"}]},"events":[{"unassign":{"span":0}}]}"#,
    )?;

    spanlink()
        .arg("replay")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("event #1"));
    Ok(())
}

#[test]
fn review_lists_entity_links() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let answers = temp.path().join("answers.json");
    fs::write(
        &answers,
        r#"[{"count":0,"data":[{"userDefined":false,"text":"au "},{"text":"Japon","alias":"location","meta":"@sys.location","userDefined":true}]}]"#,
    )?;

    spanlink()
        .arg("review")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. \"au Japon\""))
        .stdout(predicate::str::contains("   location -> \"Japon\""));
    Ok(())
}

#[test]
fn languages_lists_every_code() {
    spanlink()
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("ko\tKorean"))
        .stdout(predicate::str::contains("pt-br\t"));
}
