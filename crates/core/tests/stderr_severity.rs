//! Runs in its own process so it owns the global subscriber.

use std::io;

use upkeep_core::execution::{CommandExecutor, CommandRunner, RawOutput};
use upkeep_core::logging;
use upkeep_core::tasks::CommandLine;
use upkeep_core::{LogConfig, TaskId};

/// Exits 0 with the given stderr
struct Stderr(&'static str);

impl CommandRunner for Stderr {
    fn run(&self, _command: &CommandLine) -> io::Result<RawOutput> {
        Ok(RawOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: self.0.to_string(),
        })
    }
}

#[test]
fn apt_cli_warning_is_info_and_other_stderr_is_warn() {
    let dir = tempfile::tempdir().unwrap();
    let guard = logging::init(&LogConfig {
        directory: dir.path().to_path_buf(),
        ..LogConfig::default()
    })
    .unwrap();

    let upgrade = CommandLine::new("apt", ["upgrade", "-y"]);
    CommandExecutor::new(Stderr(
        "WARNING: apt does not have a stable CLI interface. Use with caution in scripts.",
    ))
    .execute(TaskId::Upgrade, &upgrade);
    CommandExecutor::new(Stderr("W: some other warning")).execute(TaskId::Upgrade, &upgrade);

    guard.flush();
    let log = std::fs::read_to_string(guard.path()).unwrap();

    assert!(
        log.contains(" INFO Error Output: WARNING: apt does not have a stable CLI interface"),
        "log was:\n{}",
        log
    );
    assert!(
        log.contains(" WARN Error Output: W: some other warning"),
        "log was:\n{}",
        log
    );
    assert!(!log.contains("WARN Error Output: WARNING: apt"));
}
