//! Result types for task execution
//!
//! This module contains the records produced by a run: one [`ExecutionResult`]
//! per command, its [`Summary`], and the [`RunReport`] that aggregates them.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::tasks::{CommandLine, TaskId};

/// Exit code reported for a command that could not be started
pub const NOT_INVOKED_EXIT_CODE: i32 = 127;

/// How a command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The process ran and exited. Signal termination is reported as -1.
    Exited(i32),
    /// The program could not be located or started at all
    NotInvoked(String),
}

impl Completion {
    pub fn exit_code(&self) -> i32 {
        match self {
            Completion::Exited(code) => *code,
            Completion::NotInvoked(_) => NOT_INVOKED_EXIT_CODE,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code() == 0
    }
}

/// Captured output of a single command invocation
#[derive(Debug, Clone)]
pub struct CommandCapture {
    pub command: CommandLine,
    pub completion: Completion,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
}

/// Outcome of running one task's command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub task: TaskId,
    pub command: CommandLine,
    pub completion: Completion,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn from_capture(task: TaskId, capture: CommandCapture) -> Self {
        Self {
            task,
            command: capture.command,
            completion: capture.completion,
            stdout: capture.stdout,
            stderr: capture.stderr,
            started_at: capture.started_at,
            duration: capture.duration,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.completion.exit_code()
    }

    /// True iff the exit code is zero, whatever the output says
    pub fn succeeded(&self) -> bool {
        self.completion.succeeded()
    }

    /// First non-empty line of stderr, or the invocation failure reason
    pub fn error_line(&self) -> Option<&str> {
        if let Completion::NotInvoked(reason) = &self.completion {
            return Some(reason.as_str());
        }
        self.stderr.lines().map(str::trim).find(|line| !line.is_empty())
    }
}

/// Short digest of a task's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub task: TaskId,
    pub digest: String,
    /// Number of packages, sources or archives affected, when recognizable
    pub count: Option<usize>,
}

/// A result paired with its summary
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub result: ExecutionResult,
    pub summary: Summary,
}

impl TaskOutcome {
    pub fn task(&self) -> TaskId {
        self.result.task
    }

    pub fn succeeded(&self) -> bool {
        self.result.succeeded()
    }
}

/// Process exit classification for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunExit {
    Success = 0,
    /// At least one task ran and exited non-zero
    TaskFailed = 1,
    /// At least one command could not be started. Same code a shell uses
    /// for a missing program, and clear of clap's usage error code 2.
    InvocationError = 127,
}

impl RunExit {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Aggregate outcome of one selection
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn push(&mut self, outcome: TaskOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    pub fn exit(&self) -> RunExit {
        self.failed()
            .map(|outcome| match outcome.result.completion {
                Completion::NotInvoked(_) => RunExit::InvocationError,
                Completion::Exited(_) => RunExit::TaskFailed,
            })
            .max()
            .unwrap_or(RunExit::Success)
    }
}
