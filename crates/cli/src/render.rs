//! Terminal rendering: panels, tables and status marks

use colored::*;
use upkeep_core::results::Completion;
use upkeep_core::{RunReport, TaskId, TaskOutcome, UpkeepConfig, TASKS};

/// Accent for a panel's border and text
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Plain,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Success => Some(Color::Green),
            Tone::Warning => Some(Color::Yellow),
            Tone::Error => Some(Color::Red),
            Tone::Plain => None,
        }
    }

    fn paint(self, text: &str) -> String {
        match self.color() {
            Some(color) => text.color(color).to_string(),
            None => text.to_string(),
        }
    }
}

/// Label color for a task, clear of the red/yellow/green used for status
pub fn get_task_color(task: TaskId) -> Color {
    let (r, g, b) = match task {
        TaskId::Update => (64, 224, 208),
        TaskId::Upgrade => (147, 112, 219),
        TaskId::Autoremove => (255, 140, 0),
        TaskId::Autoclean => (199, 21, 133),
        TaskId::ListUpgradable => (100, 149, 237),
    };
    Color::TrueColor { r, g, b }
}

/// Boxed block of text
pub fn panel(body: &str, tone: Tone) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

    let mut out = tone.paint(&format!("╭{}╮", "─".repeat(width + 2)));
    out.push('\n');
    for line in &lines {
        let padding = " ".repeat(width - line.chars().count());
        out.push_str(&format!(
            "{} {}{} {}\n",
            tone.paint("│"),
            tone.paint(line),
            padding,
            tone.paint("│")
        ));
    }
    out.push_str(&tone.paint(&format!("╰{}╯", "─".repeat(width + 2))));
    out
}

/// Check or cross for a finished task
pub fn status_mark(succeeded: bool) -> ColoredString {
    if succeeded {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    }
}

/// One-line progress entry for a finished task
pub fn status_line(outcome: &TaskOutcome) -> String {
    let spec = outcome.task().spec();
    format!(
        "{} {}: {}",
        status_mark(outcome.succeeded()),
        spec.label.color(get_task_color(spec.id)),
        outcome.summary.digest
    )
}

/// Four left-aligned columns under a centred title. Cells are padded on
/// their text, so color escapes do not skew the layout.
fn table(title: &str, headers: [&str; 4], rows: &[[ColoredString; 4]]) -> String {
    let mut widths = headers.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let total = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);

    let format_row = |cells: &[ColoredString; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell))
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let mut lines = vec![
        format!("{:^total$}", title).as_str().bold().to_string(),
        format_row(&headers.map(|header| header.bold())),
        "─".repeat(total),
    ];
    lines.extend(rows.iter().map(format_row));
    lines.join("\n")
}

/// The task menu shown at startup and by `upkeep list`
pub fn task_table(config: &UpkeepConfig) -> String {
    let rows: Vec<[ColoredString; 4]> = TASKS
        .iter()
        .map(|spec| {
            let command = spec
                .command_line(&config.package_manager, config.privilege)
                .to_string();
            [
                spec.key.normal(),
                spec.label.color(get_task_color(spec.id)).bold(),
                spec.description.normal(),
                command.as_str().cyan(),
            ]
        })
        .collect();
    table(
        "Linux Maintenance",
        ["No.", "Task", "Description", "Command"],
        &rows,
    )
}

/// Final table for a run
pub fn summary_table(report: &RunReport) -> String {
    let rows: Vec<[ColoredString; 4]> = report
        .outcomes
        .iter()
        .map(|outcome| {
            let spec = outcome.task().spec();
            let (status, error) = if outcome.succeeded() {
                ("✓".green().bold(), "-".normal())
            } else {
                (
                    format!("✗ {}", outcome.result.exit_code()).as_str().red().bold(),
                    outcome.result.error_line().unwrap_or("-").red(),
                )
            };
            [
                spec.label.color(get_task_color(spec.id)),
                status,
                outcome.summary.digest.as_str().normal(),
                error,
            ]
        })
        .collect();
    table(
        "Maintenance Summary",
        ["Task", "Status", "Details", "Error"],
        &rows,
    )
}

/// Result panel for a single task run
pub fn task_panel(outcome: &TaskOutcome) -> String {
    if outcome.succeeded() {
        return panel(
            &format!("✓ Task completed successfully.\n{}", outcome.summary.digest),
            Tone::Success,
        );
    }

    let reason = match &outcome.result.completion {
        Completion::NotInvoked(reason) => reason.clone(),
        Completion::Exited(code) => match outcome.result.error_line() {
            Some(line) => format!("exit {}: {}", code, line),
            None => format!("exit {}", code),
        },
    };
    panel(
        &format!("✗ Task encountered an error.\n{}", reason),
        Tone::Error,
    )
}
