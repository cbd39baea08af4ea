//! upkeep core library
//!
//! This is the core library for the upkeep maintenance tool. It runs a fixed
//! set of package-manager tasks on Debian/Ubuntu-family systems, summarizes
//! their output, logs every invocation and raises desktop notifications.
//!
//! ## Architecture
//!
//! - [`tasks`] - Static task registry, command lines and selections
//! - [`execution`] - Command execution and the task runner
//! - [`summary`] - Human-readable digests of package-manager output
//! - [`results`] - Execution results, summaries and run reports
//! - [`logging`] - Process-wide weekly-rotated log file
//! - [`notify`] - Best-effort desktop notifications
//! - [`config`] - Runtime configuration
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use upkeep_core::execution::runner::NoopReporter;
//! use upkeep_core::execution::{SystemCommandRunner, TaskRunner};
//! use upkeep_core::notify::DesktopNotifier;
//! use upkeep_core::{Selection, UpkeepConfig};
//!
//! let config = UpkeepConfig::default();
//! let notifier = DesktopNotifier::default();
//! let runner = TaskRunner::new(SystemCommandRunner, &notifier, (&config).into());
//!
//! let report = runner.run(Selection::All, &mut NoopReporter);
//! std::process::exit(i32::from(report.exit().code()));
//! ```

pub mod config;
pub mod execution;
pub mod logging;
pub mod notify;
pub mod results;
pub mod summary;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use config::{LogConfig, UpkeepConfig};
pub use results::{ExecutionResult, RunExit, RunReport, Summary, TaskOutcome};
pub use tasks::{Privilege, Selection, TaskId, TaskSpec, TASKS};
pub use types::{NotifyError, UpkeepError, UpkeepResult};
