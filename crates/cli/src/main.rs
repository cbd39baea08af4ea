use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Weekday;
use clap::{Parser, Subcommand};
use colored::*;
use upkeep_core::notify::{DesktopNotifier, Notifier, SilentNotifier};
use upkeep_core::{logging, LogConfig, Privilege, RunExit, UpkeepConfig};

mod commands;
mod progress;
mod render;

/// Exit code for errors outside any task (I/O on the terminal, bad flag
/// combinations, unknown task names)
const INTERNAL_ERROR: u8 = 3;

/// upkeep - routine apt maintenance for Debian/Ubuntu systems
#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Routine apt maintenance with logging and desktop notifications")]
#[command(version)]
struct Cli {
    /// Run all maintenance tasks without prompts (for cron/anacron)
    #[arg(long)]
    auto: bool,

    /// Directory for the rotating log file
    #[arg(long, env = "UPKEEP_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Weekday on which the log file is rotated
    #[arg(long, env = "UPKEEP_ROTATE_ON", default_value = "wednesday", value_parser = parse_weekday)]
    rotate_on: Weekday,

    /// Number of rotated log files to keep
    #[arg(long, env = "UPKEEP_LOG_BACKUPS", default_value_t = 4)]
    log_backups: usize,

    /// Do not send desktop notifications
    #[arg(long, env = "UPKEEP_NO_NOTIFY")]
    no_notify: bool,

    /// Run the package manager without sudo
    #[arg(long, env = "UPKEEP_NO_SUDO")]
    no_sudo: bool,

    /// Package manager executable
    #[arg(
        long,
        env = "UPKEEP_PACKAGE_MANAGER",
        default_value = "apt",
        value_name = "PROGRAM"
    )]
    package_manager: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single task by name or menu number
    Run {
        /// One of: update, upgrade, autoremove, autoclean, list-upgradable (or 1-5)
        task: String,
    },
    /// List the maintenance tasks
    List,
    /// Check that command failures are classified correctly
    SelfTest,
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    value
        .parse::<Weekday>()
        .map_err(|_| format!("'{}' is not a weekday", value))
}

impl Cli {
    fn config(&self) -> UpkeepConfig {
        let defaults = LogConfig::default();
        let privilege = if self.no_sudo {
            Privilege::Direct
        } else if self.auto {
            // Nobody is there to type a password
            Privilege::SudoNonInteractive
        } else {
            Privilege::Sudo
        };

        UpkeepConfig {
            log: LogConfig {
                directory: self.log_dir.clone().unwrap_or(defaults.directory),
                rotate_on: self.rotate_on,
                backups: self.log_backups,
                ..defaults
            },
            notifications: !self.no_notify,
            privilege,
            package_manager: self.package_manager.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = cli.config();

    // Logging is best-effort: a read-only log directory must not stop maintenance
    let _log = match logging::init(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!(
                "{} file logging disabled: {}",
                "warning:".yellow().bold(),
                e
            );
            None
        }
    };

    match dispatch(cli, &config) {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(INTERNAL_ERROR)
        }
    }
}

fn dispatch(cli: Cli, config: &UpkeepConfig) -> Result<RunExit> {
    let notifier: Box<dyn Notifier> = if config.notifications {
        Box::new(DesktopNotifier::default())
    } else {
        Box::new(SilentNotifier)
    };
    let notifier = notifier.as_ref();

    match (cli.auto, cli.command) {
        (true, Some(_)) => anyhow::bail!("--auto cannot be combined with a subcommand"),
        (true, None) => Ok(commands::auto::execute(config, notifier)),
        (false, None) => commands::menu::execute(config, notifier),
        (false, Some(Commands::Run { task })) => commands::run::execute(config, notifier, &task),
        (false, Some(Commands::List)) => {
            commands::list::execute(config);
            Ok(RunExit::Success)
        }
        (false, Some(Commands::SelfTest)) => Ok(commands::self_test::execute(notifier)),
    }
}
