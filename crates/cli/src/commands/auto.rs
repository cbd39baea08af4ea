use colored::*;
use upkeep_core::execution::{NoopReporter, SystemCommandRunner, TaskRunner};
use upkeep_core::notify::Notifier;
use upkeep_core::{RunExit, UpkeepConfig};

use crate::render;

/// Full suite with no interaction; visibility comes from the log, the final
/// notification and whatever captures stdout
pub fn execute(config: &UpkeepConfig, notifier: &dyn Notifier) -> RunExit {
    println!("{}", "Running all maintenance tasks".bold());

    let runner = TaskRunner::new(SystemCommandRunner, notifier, config.into());
    let report = runner.run_all(&mut NoopReporter);

    println!("{}", render::summary_table(&report));
    report.exit()
}
