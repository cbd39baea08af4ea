//! Command execution utilities
//!
//! [`CommandRunner`] is the seam between upkeep and the operating system. The
//! [`CommandExecutor`] on top of it handles timing, classification and logging
//! so every caller records commands the same way.

use std::io;
use std::process::Command;
use std::time::Instant;

use chrono::Local;
use tracing::{error, info, warn};

use crate::results::{CommandCapture, Completion, ExecutionResult};
use crate::tasks::{CommandLine, TaskId};

/// apt prints this on every scripted call; it is noise, not a problem
pub const APT_CLI_WARNING: &str = "apt does not have a stable CLI interface";

/// Output beyond this many characters is cut from the log
const LOG_OUTPUT_LIMIT: usize = 4000;

/// Raw result of a finished child process
#[derive(Debug, Clone, Default)]
pub struct RawOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an argument vector to completion
pub trait CommandRunner {
    /// Returns `Err` only when the program could not be started
    fn run(&self, command: &CommandLine) -> io::Result<RawOutput>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandLine) -> io::Result<RawOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()?;

        Ok(RawOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Unified command executor that handles timing, classification and logging
pub struct CommandExecutor<R = SystemCommandRunner> {
    runner: R,
}

impl Default for CommandExecutor<SystemCommandRunner> {
    fn default() -> Self {
        Self::new(SystemCommandRunner)
    }
}

impl<R: CommandRunner> CommandExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Execute a task's command line
    pub fn execute(&self, task: TaskId, command: &CommandLine) -> ExecutionResult {
        ExecutionResult::from_capture(task, self.capture(command))
    }

    /// Run a command and record what happened. Never fails: a program that
    /// cannot be started is reported as [`Completion::NotInvoked`].
    pub fn capture(&self, command: &CommandLine) -> CommandCapture {
        info!("Executing: {}", command);
        let started_at = Local::now();
        let clock = Instant::now();

        let capture = match self.runner.run(command) {
            Ok(raw) => CommandCapture {
                command: command.clone(),
                completion: Completion::Exited(raw.code.unwrap_or(-1)),
                stdout: raw.stdout.trim().to_string(),
                stderr: raw.stderr.trim().to_string(),
                started_at,
                duration: clock.elapsed(),
            },
            Err(e) => CommandCapture {
                command: command.clone(),
                completion: Completion::NotInvoked(invocation_reason(&command.program, &e)),
                stdout: String::new(),
                stderr: String::new(),
                started_at,
                duration: clock.elapsed(),
            },
        };

        log_capture(&capture);
        capture
    }
}

fn invocation_reason(program: &str, e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => format!("Command not found: {}", program),
        io::ErrorKind::PermissionDenied => format!("Permission denied: {}", program),
        _ => format!("Failed to execute {}: {}", program, e),
    }
}

fn log_capture(capture: &CommandCapture) {
    if let Completion::NotInvoked(reason) = &capture.completion {
        error!("{}", reason);
        return;
    }

    if !capture.stdout.is_empty() {
        info!("Output: {}", truncate_for_log(&capture.stdout));
    }
    if !capture.stderr.is_empty() {
        if capture.stderr.contains(APT_CLI_WARNING) {
            info!("Error Output: {}", truncate_for_log(&capture.stderr));
        } else {
            warn!("Error Output: {}", truncate_for_log(&capture.stderr));
        }
    }

    if capture.completion.succeeded() {
        info!(
            "Command succeeded: {} ({:.1?})",
            capture.command, capture.duration
        );
    } else {
        error!(
            "Command failed: {} (exit {}, {:.1?})",
            capture.command,
            capture.completion.exit_code(),
            capture.duration
        );
    }
}

/// Cut `text` to the log limit on a character boundary
pub fn truncate_for_log(text: &str) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(LOG_OUTPUT_LIMIT) {
        Some((cut, _)) => format!("{}… [truncated]", &text[..cut]).into(),
        None => text.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::NOT_INVOKED_EXIT_CODE;

    struct FixedRunner(io::Result<RawOutput>);

    impl CommandRunner for FixedRunner {
        fn run(&self, _command: &CommandLine) -> io::Result<RawOutput> {
            match &self.0 {
                Ok(raw) => Ok(raw.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn zero_exit_succeeds() {
        let executor = CommandExecutor::new(SystemCommandRunner);
        let result = executor.execute(TaskId::Update, &CommandLine::new("true", Vec::<String>::new()));
        assert_eq!(result.completion, Completion::Exited(0));
        assert!(result.succeeded());
    }

    #[test]
    fn non_zero_exit_is_a_result_not_an_error() {
        let executor = CommandExecutor::new(SystemCommandRunner);
        let result = executor.execute(TaskId::Update, &CommandLine::new("false", Vec::<String>::new()));
        assert_eq!(result.completion, Completion::Exited(1));
        assert!(!result.succeeded());
    }

    #[test]
    fn missing_binary_is_not_invoked() {
        let executor = CommandExecutor::new(SystemCommandRunner);
        let result = executor.execute(
            TaskId::Update,
            &CommandLine::new("upkeep-this-does-not-exist", ["update"]),
        );
        assert!(matches!(result.completion, Completion::NotInvoked(_)));
        assert_eq!(result.exit_code(), NOT_INVOKED_EXIT_CODE);
        assert!(!result.succeeded());
        assert!(result
            .error_line()
            .is_some_and(|line| line.contains("upkeep-this-does-not-exist")));
    }

    #[test]
    fn args_are_passed_without_a_shell() {
        let executor = CommandExecutor::new(SystemCommandRunner);
        let capture = executor.capture(&CommandLine::new("echo", ["a;", "$HOME", "|", "b"]));
        assert_eq!(capture.stdout, "a; $HOME | b");
    }

    #[test]
    fn output_is_trimmed_and_kept_on_failure() {
        let executor = CommandExecutor::new(FixedRunner(Ok(RawOutput {
            code: Some(100),
            stdout: "Reading package lists...\n".into(),
            stderr: "\nE: Could not get lock\n".into(),
        })));
        let result = executor.execute(TaskId::Upgrade, &CommandLine::new("apt", ["upgrade"]));
        assert_eq!(result.exit_code(), 100);
        assert_eq!(result.stdout, "Reading package lists...");
        assert_eq!(result.error_line(), Some("E: Could not get lock"));
    }

    #[test]
    fn succeeded_ignores_output_content() {
        let executor = CommandExecutor::new(FixedRunner(Ok(RawOutput {
            code: Some(1),
            stdout: "3 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.".into(),
            stderr: String::new(),
        })));
        assert!(!executor
            .execute(TaskId::Upgrade, &CommandLine::new("apt", ["upgrade"]))
            .succeeded());
    }

    #[test]
    fn signal_termination_is_a_failure() {
        let executor = CommandExecutor::new(FixedRunner(Ok(RawOutput::default())));
        let result = executor.execute(TaskId::Update, &CommandLine::new("apt", ["update"]));
        assert_eq!(result.completion, Completion::Exited(-1));
    }

    #[test]
    fn permission_denied_is_not_invoked() {
        let executor = CommandExecutor::new(FixedRunner(Err(io::Error::from(
            io::ErrorKind::PermissionDenied,
        ))));
        let result = executor.execute(TaskId::Update, &CommandLine::new("apt", ["update"]));
        assert_eq!(
            result.completion,
            Completion::NotInvoked("Permission denied: apt".to_string())
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let short = "ok";
        assert_eq!(truncate_for_log(short), "ok");

        let long = "é".repeat(LOG_OUTPUT_LIMIT + 10);
        let cut = truncate_for_log(&long);
        assert!(cut.ends_with("[truncated]"));
        assert_eq!(cut.chars().filter(|c| *c == 'é').count(), LOG_OUTPUT_LIMIT);
    }
}
