use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with a private log dir, notifications off and no inherited config
fn upkeep(logs: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("upkeep").unwrap();
    for var in [
        "UPKEEP_LOG_DIR",
        "UPKEEP_ROTATE_ON",
        "UPKEEP_LOG_BACKUPS",
        "UPKEEP_NO_NOTIFY",
        "UPKEEP_NO_SUDO",
        "UPKEEP_PACKAGE_MANAGER",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--log-dir").arg(logs.path()).arg("--no-notify");
    cmd
}

fn read_log(logs: &TempDir) -> String {
    std::fs::read_to_string(logs.path().join("upkeep.log")).unwrap()
}

#[test]
fn help_mentions_unattended_mode() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--auto"));
}

#[test]
fn version_is_printed() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("upkeep"));
}

#[test]
fn list_shows_every_task() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Update package lists"))
        .stdout(predicate::str::contains("sudo apt upgrade -y"))
        .stdout(predicate::str::contains("apt list --upgradable"));
}

#[test]
fn list_without_sudo() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--no-sudo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apt autoremove -y"))
        .stdout(predicate::str::contains("sudo").not());
}

#[test]
fn unknown_task_is_an_internal_error() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["run", "defragment"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown task 'defragment'"))
        .stderr(predicate::str::contains("Available tasks: update"));
}

#[test]
fn usage_errors_keep_clap_exit_code() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs).arg("--bogus-flag").assert().code(2);
}

#[test]
fn invalid_rotation_weekday_is_rejected() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--rotate-on", "someday", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a weekday"));
}

#[test]
fn self_test_classifies_commands() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .arg("self-test")
        .assert()
        .success()
        .stdout(predicate::str::contains("Returned: 0"))
        .stdout(predicate::str::contains("Returned: 1"))
        .stdout(predicate::str::contains("Returned: 127"))
        .stdout(predicate::str::contains("Tests complete!"));
}

#[test]
fn auto_runs_full_suite_and_logs() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--auto", "--no-sudo", "--package-manager", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maintenance Summary"))
        .stdout(predicate::str::contains("List available updates"));

    let log = read_log(&logs);
    assert!(log.contains("Maintenance started."));
    assert!(log.contains("Executing: true update"));
    assert!(log.contains("Executing: true list --upgradable"));
    assert!(log.contains("Maintenance finished: 5 tasks succeeded."));
}

#[test]
fn auto_reports_task_failure() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--auto", "--no-sudo", "--package-manager", "false"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Maintenance Summary"));

    let log = read_log(&logs);
    // Every task still ran
    assert_eq!(log.matches("Executing: false").count(), 5);
    assert!(log.contains("ERROR"));
    assert!(log.contains("Command failed: false update"));
}

#[test]
fn auto_reports_missing_package_manager() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args([
            "--auto",
            "--no-sudo",
            "--package-manager",
            "upkeep-test-no-such-package-manager",
        ])
        .assert()
        .code(127);

    assert!(read_log(&logs).contains("Command not found: upkeep-test-no-such-package-manager"));
}

#[test]
fn auto_conflicts_with_subcommands() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--auto", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--auto cannot be combined"));
}

#[test]
fn single_read_only_task() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .args(["--package-manager", "true", "run", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task completed successfully."));
}

#[test]
fn menu_quits_on_q() {
    let logs = TempDir::new().unwrap();
    upkeep(&logs)
        .write_stdin("nonsense\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Linux Maintenance"))
        .stdout(predicate::str::contains("Invalid selection"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn unwritable_log_dir_does_not_stop_the_run() {
    let logs = TempDir::new().unwrap();
    let blocker = logs.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let mut cmd = Command::cargo_bin("upkeep").unwrap();
    cmd.env_remove("UPKEEP_LOG_DIR")
        .env_remove("RUST_LOG")
        .arg("--log-dir")
        .arg(blocker.join("logs"))
        .args(["--no-notify", "--no-sudo", "--package-manager", "true", "--auto"])
        .assert()
        .success()
        .stderr(predicate::str::contains("file logging disabled"));
}
