mod common;

use common::{serve, start_server, webwatch_cmd, write_config};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn status_with_no_state_prints_nothing() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "http://127.0.0.1:1/", "div.teaser");

    webwatch_cmd(temp.path())
        .arg("-v")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No stored state"));
}

#[test]
fn status_lists_stored_fingerprints() {
    let temp = TempDir::new().unwrap();
    let (rt, server) = start_server();
    serve(&rt, &server, 200, "<div class='teaser'>Hello</div>");
    write_config(temp.path(), &server.uri(), "div.teaser");

    webwatch_cmd(temp.path()).arg("check").assert().success();

    webwatch_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "example  185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969",
        ));
}

#[test]
fn status_requires_a_readable_config() {
    let temp = TempDir::new().unwrap();

    webwatch_cmd(temp.path())
        .arg("status")
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("loading configuration"));
}
