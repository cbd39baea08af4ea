use indicatif::{ProgressBar, ProgressStyle};
use upkeep_core::execution::Reporter;
use upkeep_core::{TaskOutcome, TaskSpec};

use crate::render;

/// Status line for interactive runs ("Task 2 of 5: Upgrade packages")
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for SpinnerReporter {
    fn task_started(&mut self, position: usize, total: usize, task: &TaskSpec) {
        self.bar
            .set_message(format!("Task {} of {}: {}", position, total, task.label));
        self.bar.tick();
    }

    fn task_finished(&mut self, outcome: &TaskOutcome) {
        self.bar.println(render::status_line(outcome));
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
