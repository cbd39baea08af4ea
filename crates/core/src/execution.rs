//! Task execution module
//!
//! This module handles running the package-manager commands, capturing their
//! output, and driving single tasks or the full suite.

pub mod command;
pub mod runner;

pub use command::{CommandExecutor, CommandRunner, RawOutput, SystemCommandRunner};
pub use runner::{NoopReporter, Reporter, TaskRunner, TaskRunnerConfig};
