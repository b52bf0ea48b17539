//! Command-line behaviour of the `carta` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn carta() -> Command {
    Command::cargo_bin("carta").unwrap()
}

#[test]
fn repair_reads_stdin() {
    carta()
        .args(["repair", "--kind", "card"])
        .write_stdin("Sure! Here is the data: {company_name: Acme Corp, email: x@acme.com}")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"company_name\": \"Acme Corp\""))
        .stdout(predicate::str::contains("\"website_url\": \"\""));
}

#[test]
fn repair_text_shows_na_for_missing_fields() {
    carta()
        .args(["repair", "-f", "text"])
        .write_stdin("I could not read the card")
        .assert()
        .success()
        .stdout(predicate::str::contains("Company Name:"))
        .stdout(predicate::str::contains("N/A"));
}

#[test]
fn repair_show_candidate_reports_fallback() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("response.txt");
    std::fs::write(&input, r#"{"email": "a@b.com", oops"#).unwrap();

    carta()
        .arg("repair")
        .arg(&input)
        .arg("--show-candidate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Fallback"))
        .stdout(predicate::str::contains("a@b.com"));
}

#[test]
fn scan_with_saved_response() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("invoice.pdf");
    let response = dir.path().join("response.txt");
    std::fs::write(&input, b"%PDF-1.4\n%stub\n").unwrap();
    std::fs::write(
        &response,
        "```json\n{\"seller\": {\"name\": \"Sharma Traders\"}, \"totals\": {\"grand_total\": \"4130\"}}\n```",
    )
    .unwrap();

    carta()
        .arg("scan")
        .arg(&input)
        .args(["--kind", "invoice", "--response-file"])
        .arg(&response)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sharma Traders"))
        .stdout(predicate::str::contains("\"grand_total\": \"4130\""));
}

#[test]
fn scan_missing_input_fails() {
    carta()
        .args(["scan", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_summary() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let response = dir.path().join("response.txt");
    std::fs::write(dir.path().join("a.pdf"), b"%PDF-1.4\n").unwrap();
    std::fs::write(dir.path().join("b.pdf"), b"%PDF-1.4\n").unwrap();
    std::fs::write(&response, r#"{"company_name": "Acme", "email": "x@acme.com"}"#).unwrap();

    let pattern = dir.path().join("*.pdf");
    carta()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("-o")
        .arg(&out)
        .arg("--summary")
        .arg("--response-file")
        .arg(&response)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,outcome,company_name"));
    assert_eq!(summary.lines().count(), 3);
    assert!(out.join("a.json").exists());
}

#[test]
fn unknown_kind_is_rejected() {
    carta()
        .args(["repair", "--kind", "receipt"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scan kind"));
}
