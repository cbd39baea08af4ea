//! High-level task runner
//!
//! This module drives a [`Selection`] through the per-task pipeline
//! (execute, summarize, log, notify) and collects the outcomes into a
//! [`RunReport`]. Failures become data; nothing here aborts a run early.

use tracing::{error, info};

use crate::config::UpkeepConfig;
use crate::execution::command::{CommandExecutor, CommandRunner, SystemCommandRunner};
use crate::notify::{notify_best_effort, Notification, Notifier};
use crate::results::{RunReport, TaskOutcome};
use crate::summary::summarize;
use crate::tasks::{Privilege, Selection, TaskId, TaskSpec, TASKS};

/// Configuration for the task runner
#[derive(Debug, Clone)]
pub struct TaskRunnerConfig {
    pub package_manager: String,
    pub privilege: Privilege,
}

impl From<&UpkeepConfig> for TaskRunnerConfig {
    fn from(config: &UpkeepConfig) -> Self {
        Self {
            package_manager: config.package_manager.clone(),
            privilege: config.privilege,
        }
    }
}

/// Progress hooks for the presentation layer
pub trait Reporter {
    /// `position` is 1-based
    fn task_started(&mut self, _position: usize, _total: usize, _task: &TaskSpec) {}

    fn task_finished(&mut self, _outcome: &TaskOutcome) {}
}

/// Reporter that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Coordinates execution of one or all maintenance tasks
pub struct TaskRunner<'a, R = SystemCommandRunner> {
    executor: CommandExecutor<R>,
    notifier: &'a dyn Notifier,
    config: TaskRunnerConfig,
}

impl<'a, R: CommandRunner> TaskRunner<'a, R> {
    pub fn new(runner: R, notifier: &'a dyn Notifier, config: TaskRunnerConfig) -> Self {
        Self {
            executor: CommandExecutor::new(runner),
            notifier,
            config,
        }
    }

    /// Run whatever the caller selected
    pub fn run(&self, selection: Selection, reporter: &mut dyn Reporter) -> RunReport {
        match selection {
            Selection::Task(id) => self.run_single(id.spec(), reporter),
            Selection::All => self.run_suite(reporter),
        }
    }

    /// Run one task and notify about its result
    pub fn run_task(&self, id: TaskId, reporter: &mut dyn Reporter) -> RunReport {
        self.run(Selection::Task(id), reporter)
    }

    /// Run every task in suite order without stopping on failure
    pub fn run_all(&self, reporter: &mut dyn Reporter) -> RunReport {
        self.run(Selection::All, reporter)
    }

    fn run_single(&self, spec: &TaskSpec, reporter: &mut dyn Reporter) -> RunReport {
        let outcome = self.execute_task(spec, 1, 1, reporter);

        let command = &outcome.result.command;
        let notification = if outcome.succeeded() {
            Notification::normal(
                "Task Completed",
                format!("Command '{}' completed successfully.", command),
            )
        } else {
            Notification::critical(
                "Task Error",
                format!("Command '{}' encountered an error.", command),
            )
        };
        notify_best_effort(self.notifier, notification);

        let mut report = RunReport::default();
        report.push(outcome);
        report
    }

    fn run_suite(&self, reporter: &mut dyn Reporter) -> RunReport {
        let total = TASKS.len();
        let mut report = RunReport::default();

        notify_best_effort(
            self.notifier,
            Notification::normal("Maintenance Started", "Running all maintenance tasks."),
        );
        info!("Maintenance started.");

        for (index, spec) in TASKS.iter().enumerate() {
            let position = index + 1;
            info!("Running task {}/{}: {}", position, total, spec.label);

            let outcome = self.execute_task(spec, position, total, reporter);
            if !outcome.succeeded() {
                error!(
                    "Task '{}' failed: {}",
                    spec.label,
                    outcome.result.error_line().unwrap_or("no error output")
                );
            }
            report.push(outcome);
        }

        notify_best_effort(self.notifier, final_notification(&report));

        let failed = report.failed().count();
        if failed == 0 {
            info!("Maintenance finished: {} tasks succeeded.", total);
        } else {
            error!(
                "Maintenance finished: {} of {} tasks failed.",
                failed,
                report.outcomes.len()
            );
        }
        report
    }

    fn execute_task(
        &self,
        spec: &TaskSpec,
        position: usize,
        total: usize,
        reporter: &mut dyn Reporter,
    ) -> TaskOutcome {
        reporter.task_started(position, total, spec);

        let command = spec.command_line(&self.config.package_manager, self.config.privilege);
        let result = self.executor.execute(spec.id, &command);

        let summary = summarize(spec.id, &result.stdout);

        if result.succeeded() {
            info!("{}: {}", spec.label, summary.digest);
        } else {
            error!(
                "{}: exit {}; {}",
                spec.label,
                result.exit_code(),
                summary.digest
            );
        }

        let outcome = TaskOutcome { result, summary };
        reporter.task_finished(&outcome);
        outcome
    }
}

fn final_notification(report: &RunReport) -> Notification {
    if report.succeeded() {
        Notification::critical(
            "Maintenance Complete",
            format!("{} tasks have been processed.", report.outcomes.len()),
        )
    } else {
        let failed: Vec<&str> = report.failed().map(|outcome| outcome.task().name()).collect();
        Notification::critical(
            "Maintenance Failed",
            format!(
                "{} of {} tasks failed: {}",
                failed.len(),
                report.outcomes.len(),
                failed.join(", ")
            ),
        )
    }
}
