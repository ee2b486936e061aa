pub mod fixtures;

use fixtures::*;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    let ws = Workspace::new(None);
    ws.mqf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mq-create"))
        .stdout(predicate::str::contains("container-delete"))
        .stdout(predicate::str::contains("version-create"));
}

#[test]
fn create_then_delete_container() {
    let ws = Workspace::new(None);

    ws.mqf()
        .args(["mq-create", "mq1", "--group", "east", "--create-container", "c1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MQ profile mq1 ready in version 1.0"))
        .stdout(predicate::str::contains("Containers: c1"));

    ws.mqf()
        .args(["container-delete", "c1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Container c1 deleted"));
}

#[test]
fn credentials_are_prompted_from_stdin() {
    let ws = Workspace::new(Some(("admin", "secret")));

    ws.mqf()
        .args(["mq-create", "mq1", "--create-container", "c1"])
        .write_stdin("admin\nsecret\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Jmx Login for root: "))
        .stderr(predicate::str::contains("Jmx Password for root: "))
        .stdout(predicate::str::contains("Containers: c1"));
}

#[test]
fn explicit_credentials_skip_the_prompt() {
    let ws = Workspace::new(Some(("admin", "secret")));

    ws.mqf()
        .args(["mq-create", "mq1", "--create-container", "c1"])
        .args(["--jmx-user", "admin", "--jmx-password", "secret"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Jmx Login").not());
}

#[test]
fn rejected_credentials_exit_with_partial_status() {
    let ws = Workspace::new(Some(("admin", "secret")));

    ws.mqf()
        .args(["mq-create", "mq1", "--create-container", "c1"])
        .write_stdin("admin\nwrong\n")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failed: c1 [authentication-failure]"));
}

#[test]
fn closed_stdin_reports_failure_without_hanging() {
    let ws = Workspace::new(Some(("admin", "secret")));

    ws.mqf()
        .args(["mq-create", "mq1", "--create-container", "c1"])
        .write_stdin("")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failed: c1"));
}

#[test]
fn json_output_is_machine_readable() {
    let ws = Workspace::new(None);

    let output = ws
        .mqf()
        .args(["--json", "mq-create", "mq1", "--create-container", "c1,c2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["profileId"], "mq1");
    assert_eq!(value["created"], serde_json::json!(["c1", "c2"]));
    assert_eq!(value["failures"], serde_json::json!([]));
}

#[test]
fn malformed_property_fails_before_any_write() {
    let ws = Workspace::new(None);

    ws.mqf()
        .args(["mq-create", "mq1", "-D", "novalue", "--create-container", "c1"])
        .assert()
        .failure()
        .code(1);

    let output = ws.mqf().args(["--json", "container-delete", "c1"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["removedPaths"], serde_json::json!([]));
}

#[test]
fn version_create_refuses_duplicates() {
    let ws = Workspace::new(None);

    ws.mqf().args(["mq-create", "mq1"]).assert().success();
    ws.mqf()
        .args(["version-create", "1.1", "--parent", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version 1.1 created"));
    ws.mqf().args(["version-create", "1.1"]).assert().failure();

    ws.mqf()
        .args(["mq-create", "mq2", "--version", "1.1", "--create-container", "c1"])
        .assert()
        .success();
}

#[test]
fn shell_reuses_credentials_across_commands() {
    let ws = Workspace::new(Some(("admin", "secret")));

    let script = "\
mq-create mq1 --create-container c1
admin
secret
# comment lines are skipped
mq-create mq1 --create-container c2
container-delete c1
exit
";
    let output = ws.mqf().arg("shell").write_stdin(script).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("Jmx Login for root").count(), 1);
    assert!(stdout.contains("Containers: c1"));
    assert!(stdout.contains("Containers: c2"));
    assert!(stdout.contains("Container c1 deleted"));
}

#[test]
fn shell_keeps_going_after_a_bad_line() {
    let ws = Workspace::new(None);

    ws.mqf()
        .arg("shell")
        .write_stdin("mq-frobnicate\nversion-create 2.0\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("mq-frobnicate"))
        .stdout(predicate::str::contains("Version 2.0 created"));
}

#[test]
fn shell_honours_quoted_arguments() {
    let ws = Workspace::new(None);

    let script = "\
mq-create mq1 --jvm-opts \"-Xmx1g -Xms1g\" --create-container c1
mq-create mq2 --jvm-opts \"-Xmx1g
exit
";
    let output = ws.mqf().args(["--json", "shell"]).write_stdin(script).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.contains("\"profileId\": \"mq1\""));
    assert!(!stdout.contains("mq2"));
    assert!(stderr.contains("unbalanced quotes"));
}
