//! Interactive menu
//!
//! The loop is a small state machine: prompt for a choice, dispatch it, and
//! go back to the prompt until the user quits or stdin closes.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::*;
use upkeep_core::execution::{CommandRunner, NoopReporter, SystemCommandRunner, TaskRunner};
use upkeep_core::notify::Notifier;
use upkeep_core::{RunExit, Selection, UpkeepConfig};

use crate::commands::self_test;
use crate::progress::SpinnerReporter;
use crate::render::{self, Tone};

const PROMPT: &str = "Select which task to perform (1-5), 'all' to run full suite or 'q' to quit: ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuChoice {
    Run(Selection),
    SelfTest,
    Quit,
    Invalid(String),
}

#[derive(Debug)]
enum MenuState {
    Prompt,
    Dispatch(MenuChoice),
    Done,
}

fn parse_choice(input: &str) -> MenuChoice {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return MenuChoice::Quit;
    }
    if trimmed.eq_ignore_ascii_case("test") {
        return MenuChoice::SelfTest;
    }
    match trimmed.parse::<Selection>() {
        Ok(selection) => MenuChoice::Run(selection),
        Err(_) => MenuChoice::Invalid(trimmed.to_string()),
    }
}

pub fn execute(config: &UpkeepConfig, notifier: &dyn Notifier) -> Result<RunExit> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let runner = TaskRunner::new(SystemCommandRunner, notifier, config.into());
    run_menu(config, notifier, runner, &mut input)
}

/// Returns the worst exit classification seen during the session
fn run_menu<R: CommandRunner>(
    config: &UpkeepConfig,
    notifier: &dyn Notifier,
    runner: TaskRunner<'_, R>,
    input: &mut dyn BufRead,
) -> Result<RunExit> {
    println!("{}", render::task_table(config));
    println!(
        "{}",
        render::panel("Most tasks require sudo privileges.", Tone::Warning)
    );

    let mut worst = RunExit::Success;
    let mut state = MenuState::Prompt;

    loop {
        state = match state {
            MenuState::Prompt => {
                println!();
                println!("{}", "Linux Maintenance".bold());
                println!("=================");
                print!("{}", PROMPT);
                io::stdout().flush()?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    println!();
                    MenuState::Dispatch(MenuChoice::Quit)
                } else {
                    MenuState::Dispatch(parse_choice(&line))
                }
            }
            MenuState::Dispatch(MenuChoice::Run(Selection::Task(id))) => {
                println!(
                    "{} {}",
                    "Running".bold(),
                    id.spec().label.color(render::get_task_color(id))
                );
                let report = runner.run_task(id, &mut NoopReporter);
                for outcome in &report.outcomes {
                    println!("{}", render::task_panel(outcome));
                }
                worst = worst.max(report.exit());
                MenuState::Prompt
            }
            MenuState::Dispatch(MenuChoice::Run(Selection::All)) => {
                let report = {
                    let mut spinner = SpinnerReporter::new();
                    runner.run_all(&mut spinner)
                };
                println!("{}", render::summary_table(&report));
                worst = worst.max(report.exit());
                MenuState::Prompt
            }
            MenuState::Dispatch(MenuChoice::SelfTest) => {
                self_test::execute(notifier);
                MenuState::Prompt
            }
            MenuState::Dispatch(MenuChoice::Invalid(choice)) => {
                println!(
                    "{} '{}', please choose a number between 1 and 5, 'all', or 'q' to quit.",
                    "Invalid selection".yellow(),
                    choice
                );
                MenuState::Prompt
            }
            MenuState::Dispatch(MenuChoice::Quit) => {
                println!("{}", render::panel("Exiting...", Tone::Plain));
                MenuState::Done
            }
            MenuState::Done => return Ok(worst),
        };
    }
}
