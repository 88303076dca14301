use predicates::prelude::*;
use std::path::PathBuf;
use assert_cmd::Command;

fn write_source(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, src).unwrap();
    path
}

#[test]
fn check_accepts_valid_file() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "ok.fpp", "data Foo = { string $a }\n");

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("check").arg(path);
    cmd.assert().success();
}

#[test]
fn check_reports_path_and_line() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "bad.fpp", "data Foo = {}\ndata Bar = { $a }\n");

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("check").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("bad.fpp:2: error"))
        .stderr(predicate::str::contains("expected identifier"));
}

#[test]
fn list_prints_one_line_per_definition() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let src = "namespace App;\ndata Person = { string $name } deriving (Equals)\nenum Color = Red | Blue\n";
    let path = write_source(&tmp_dir, "list.fpp", src);

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("list").arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r"App\Person (1 argument(s)) deriving Equals"))
        .stdout(predicate::str::contains(r"App\Color (2 argument(s))"));
}

#[test]
fn fmt_reads_stdin() {
    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("fmt").arg("-").write_stdin("data   Foo={string $a,}");
    cmd.assert()
        .success()
        .stdout(predicate::eq("data Foo = { string $a }\n"));
}

#[test]
fn lint_fails_on_duplicate_argument() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "dup.fpp", "data Foo = { int $a, int $a }\n");

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("lint").arg(path);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("[duplicate-argument]"))
        .stderr(predicate::str::contains("lint: 1 error(s), 0 warning(s)"));
}

#[test]
fn lint_warning_keeps_success() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "warn.fpp", "data Foo = {} deriving (Equals, Equals)\n");

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("lint").arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn dump_renders_aggregate_changed_events() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let src = "namespace App;\ndata Money = { int $amount }\naggregateChanged Paid = { string $id, Money $amount }\n";
    let path = write_source(&tmp_dir, "events.fpp", src);

    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("dump").arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<?php\n"))
        .stdout(predicate::str::contains(
            r"final class Paid extends \Prooph\EventSourcing\AggregateChanged",
        ))
        .stdout(predicate::str::contains(r"protected $messageName = '\App\Paid';"))
        .stdout(predicate::str::contains("class Money").not())
        .stderr(predicate::str::contains("skipping non-message definition"));
}

#[test]
fn dump_fails_on_event_without_arguments() {
    let mut cmd = Command::cargo_bin("fpp").unwrap();
    cmd.arg("dump").arg("-").write_stdin("aggregateChanged Pinged = {}");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("needs at least one argument"));
}
