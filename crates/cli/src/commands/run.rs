use anyhow::{anyhow, Result};
use colored::*;
use upkeep_core::execution::{NoopReporter, SystemCommandRunner, TaskRunner};
use upkeep_core::notify::Notifier;
use upkeep_core::{RunExit, TaskId, UpkeepConfig, TASKS};

use crate::render;

pub fn execute(config: &UpkeepConfig, notifier: &dyn Notifier, task: &str) -> Result<RunExit> {
    let id = task.parse::<TaskId>().map_err(|e| {
        let available: Vec<&str> = TASKS.iter().map(|spec| spec.id.name()).collect();
        anyhow!("{}. Available tasks: {}", e, available.join(", "))
    })?;

    println!(
        "{} {}",
        "Running task".bold(),
        id.spec().label.color(render::get_task_color(id))
    );

    let runner = TaskRunner::new(SystemCommandRunner, notifier, config.into());
    let report = runner.run_task(id, &mut NoopReporter);

    for outcome in &report.outcomes {
        println!("{}", render::task_panel(outcome));
    }
    Ok(report.exit())
}
