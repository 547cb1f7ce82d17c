//! Job, build, pipeline and target commands against a mock server.

use std::fs;
use std::path::Path;

use mockito::ServerGuard;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use conveyor_core::targets::{self, TargetToken};
use conveyor_core::TargetName;

fn conveyor_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("conveyor"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG");
    cmd
}

fn target_home(server: &ServerGuard) -> TempDir {
    let home = TempDir::new().expect("home");
    targets::save_target_at(home.path(), TargetName::from("test"), &server.url(), None)
        .expect("save target");
    home
}

// ---------------------------------------------------------------------------
// checklist / get-pipeline
// ---------------------------------------------------------------------------

const CHECKLIST_CONFIG: &str = r#"{
  "groups": [
    {"name": "some-group", "jobs": ["job-1", "job-2"], "resources": ["resource-1", "resource-2"]},
    {"name": "some-other-group", "jobs": ["job-3", "job-4"], "resources": ["resource-6", "resource-4"]}
  ],
  "jobs": [{"name": "some-orphaned-job"}]
}"#;

#[test]
fn checklist_prints_groups_then_misc() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v1/pipelines/some-pipeline/config")
        .with_status(200)
        .with_header("X-Conveyor-Config-Version", "42")
        .with_body(CHECKLIST_CONFIG)
        .create();
    let home = target_home(&server);
    let url = server.url();

    let expected = format!(
        "#- some-group\n\
         job-1: conveyor.check {url} some-pipeline job-1\n\
         job-2: conveyor.check {url} some-pipeline job-2\n\
         \n\
         #- some-other-group\n\
         job-3: conveyor.check {url} some-pipeline job-3\n\
         job-4: conveyor.check {url} some-pipeline job-4\n\
         \n\
         #- misc\n\
         some-orphaned-job: conveyor.check {url} some-pipeline some-orphaned-job\n\
         \n"
    );

    conveyor_cmd(home.path())
        .args(["-t", "test", "checklist", "-p", "some-pipeline"])
        .assert()
        .success()
        .stdout(predicates::str::diff(expected));
}

#[test]
fn get_pipeline_prints_yaml_or_json() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v1/pipelines/some-pipeline/config")
        .with_status(200)
        .with_body(CHECKLIST_CONFIG)
        .expect(2)
        .create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "get-pipeline", "-p", "some-pipeline"])
        .assert()
        .success()
        .stdout(contains("- name: some-orphaned-job"))
        .stdout(contains("  - job-3"));

    conveyor_cmd(home.path())
        .args(["-t", "test", "get-pipeline", "-p", "some-pipeline", "--json"])
        .assert()
        .success()
        .stdout(contains(r#""name": "some-orphaned-job""#));
}

// ---------------------------------------------------------------------------
// pause / unpause
// ---------------------------------------------------------------------------

#[test]
fn unpause_job_issues_one_request() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/api/v1/pipelines/pipeline/jobs/job-name-potato/unpause")
        .with_status(200)
        .create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "unpause-job", "-j", "pipeline/job-name-potato"])
        .assert()
        .success()
        .stdout("unpaused 'job-name-potato'\n");
    mock.assert();
}

#[test]
fn unpause_job_server_error_exits_one() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/api/v1/pipelines/pipeline/jobs/job-name-potato/unpause")
        .with_status(500)
        .create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "unpause-job", "-j", "pipeline/job-name-potato"])
        .assert()
        .code(1)
        .stderr(contains("error"));
    mock.assert();
}

#[test]
fn unpause_job_without_job_flag_exits_one() {
    let home = TempDir::new().expect("home");
    conveyor_cmd(home.path())
        .args(["-t", "test", "unpause-job"])
        .assert()
        .code(1)
        .stderr(contains("error"));
}

#[test]
fn malformed_job_flag_is_rejected() {
    let home = TempDir::new().expect("home");
    conveyor_cmd(home.path())
        .args(["-t", "test", "pause-job", "-j", "no-slash"])
        .assert()
        .code(1)
        .stderr(contains("PIPELINE/JOB"));
}

#[test]
fn pause_job_and_pipeline() {
    let mut server = mockito::Server::new();
    let job = server
        .mock("PUT", "/api/v1/pipelines/main/jobs/build/pause")
        .create();
    let pause = server.mock("PUT", "/api/v1/pipelines/main/pause").create();
    let unpause = server.mock("PUT", "/api/v1/pipelines/main/unpause").create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "pause-job", "-j", "main/build"])
        .assert()
        .success()
        .stdout("paused 'build'\n");
    conveyor_cmd(home.path())
        .args(["-t", "test", "pause-pipeline", "-p", "main"])
        .assert()
        .success()
        .stdout("paused 'main'\n");
    conveyor_cmd(home.path())
        .args(["-t", "test", "unpause-pipeline", "-p", "main"])
        .assert()
        .success()
        .stdout("unpaused 'main'\n");

    job.assert();
    pause.assert();
    unpause.assert();
}

// ---------------------------------------------------------------------------
// abort-build
// ---------------------------------------------------------------------------

#[test]
fn abort_build_looks_up_then_aborts() {
    let mut server = mockito::Server::new();
    let lookup = server
        .mock("GET", "/api/v1/pipelines/main/jobs/build/builds/3")
        .with_status(200)
        .with_body(r#"{"id": 123, "name": "3", "status": "started"}"#)
        .create();
    let abort = server.mock("PUT", "/api/v1/builds/123/abort").create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "abort-build", "-j", "main/build", "-b", "3"])
        .assert()
        .success()
        .stdout("build successfully aborted\n");
    lookup.assert();
    abort.assert();
}

#[test]
fn abort_missing_build_does_not_abort() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v1/pipelines/main/jobs/build/builds/3")
        .with_status(404)
        .create();
    let abort = server
        .mock("PUT", mockito::Matcher::Regex("/abort$".into()))
        .expect(0)
        .create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "abort-build", "-j", "main/build", "-b", "3"])
        .assert()
        .code(1)
        .stderr(contains("job build does not exist"));
    abort.assert();
}

#[test]
fn abort_failure_is_reported() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v1/pipelines/main/jobs/build/builds/3")
        .with_status(200)
        .with_body(r#"{"id": 7}"#)
        .create();
    server
        .mock("PUT", "/api/v1/builds/7/abort")
        .with_status(500)
        .create();
    let home = target_home(&server);

    conveyor_cmd(home.path())
        .args(["-t", "test", "abort-build", "-j", "main/build", "-b", "3"])
        .assert()
        .code(1)
        .stderr(contains("failed to abort build"));
}

// ---------------------------------------------------------------------------
// targets
// ---------------------------------------------------------------------------

#[test]
fn save_target_then_list() {
    let home = TempDir::new().expect("home");

    conveyor_cmd(home.path())
        .args(["targets"])
        .assert()
        .success()
        .stdout(contains("No targets saved."));

    conveyor_cmd(home.path())
        .args(["-t", "prod", "save-target", "--api", "https://ci.example.com/", "--token", "s3cret"])
        .assert()
        .success()
        .stdout(contains("target 'prod' saved"));

    let props = targets::load_target_at(home.path(), &TargetName::from("prod")).expect("saved");
    assert_eq!(props.api, "https://ci.example.com");
    assert_eq!(
        props.token,
        Some(TargetToken {
            kind: "Bearer".into(),
            value: "s3cret".into(),
        })
    );

    conveyor_cmd(home.path())
        .args(["targets"])
        .assert()
        .success()
        .stdout(contains("prod"))
        .stdout(contains("https://ci.example.com"))
        .stdout(contains("s3cret").not());
}

#[test]
fn saved_token_is_sent_as_authorization() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/api/v1/pipelines/main/pause")
        .match_header("authorization", "Bearer s3cret")
        .create();
    let home = TempDir::new().expect("home");
    targets::save_target_at(
        home.path(),
        TargetName::from("test"),
        &server.url(),
        Some(TargetToken {
            kind: "Bearer".into(),
            value: "s3cret".into(),
        }),
    )
    .expect("save");

    conveyor_cmd(home.path())
        .args(["-t", "test", "pause-pipeline", "-p", "main"])
        .assert()
        .success();
    mock.assert();
}

#[test]
fn corrupt_rc_file_is_an_error() {
    let home = TempDir::new().expect("home");
    fs::write(targets::rc_path_at(home.path()), "targets: [not, a, map]\n").expect("write");

    conveyor_cmd(home.path())
        .args(["-t", "test", "pause-pipeline", "-p", "main"])
        .assert()
        .code(1)
        .stderr(contains("failed to parse targets file"));
}

#[test]
fn missing_target_flag_is_an_error() {
    let home = TempDir::new().expect("home");
    conveyor_cmd(home.path())
        .args(["pause-pipeline", "-p", "main"])
        .assert()
        .code(1)
        .stderr(contains("no target specified"));
}
