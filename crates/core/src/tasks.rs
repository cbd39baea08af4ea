//! Task registry
//!
//! The set of maintenance tasks is fixed at compile time. Each entry maps a
//! [`TaskId`] to its menu key, display text and package-manager arguments.
//! Adding a task means adding an entry to [`TASKS`].

use std::fmt;
use std::str::FromStr;

use crate::types::UpkeepError;

/// Identifier of a maintenance task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    Update,
    Upgrade,
    Autoremove,
    Autoclean,
    ListUpgradable,
}

impl TaskId {
    /// All tasks in full-suite order
    pub const ALL: [TaskId; 5] = [
        TaskId::Update,
        TaskId::Upgrade,
        TaskId::Autoremove,
        TaskId::Autoclean,
        TaskId::ListUpgradable,
    ];

    /// Stable kebab-case name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            TaskId::Update => "update",
            TaskId::Upgrade => "upgrade",
            TaskId::Autoremove => "autoremove",
            TaskId::Autoclean => "autoclean",
            TaskId::ListUpgradable => "list-upgradable",
        }
    }

    /// Registry entry for this task
    pub fn spec(self) -> &'static TaskSpec {
        // TASKS is declared in the same order as ALL
        &TASKS[self as usize]
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskId {
    type Err = UpkeepError;

    /// Accepts a menu key (`"2"`) or a task name (`"upgrade"`), case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TASKS
            .iter()
            .find(|spec| spec.key == needle || spec.id.name() == needle)
            .map(|spec| spec.id)
            .ok_or_else(|| UpkeepError::UnknownTask(s.trim().to_string()))
    }
}

/// How privileged tasks are elevated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privilege {
    /// Prefix with `sudo`, which may prompt for a password
    #[default]
    Sudo,
    /// Prefix with `sudo -n` so a missing credential fails instead of prompting
    SudoNonInteractive,
    /// Run the package manager directly
    Direct,
}

/// An argument vector. Never interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Static definition of one maintenance task
#[derive(Debug)]
pub struct TaskSpec {
    pub id: TaskId,
    /// Menu key shown in the interactive table
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Arguments passed to the package manager
    pub args: &'static [&'static str],
    /// Whether the task modifies the system and must be elevated
    pub needs_privilege: bool,
}

impl TaskSpec {
    /// Build the argument vector for this task
    pub fn command_line(&self, package_manager: &str, privilege: Privilege) -> CommandLine {
        let mut argv: Vec<&str> = Vec::with_capacity(self.args.len() + 3);
        if self.needs_privilege {
            match privilege {
                Privilege::Sudo => argv.push("sudo"),
                Privilege::SudoNonInteractive => argv.extend(["sudo", "-n"]),
                Privilege::Direct => {}
            }
        }
        argv.push(package_manager);
        argv.extend_from_slice(self.args);

        let (program, args) = argv.split_first().map_or(("", &[][..]), |(p, a)| (*p, a));
        CommandLine::new(program, args.iter().copied())
    }
}

/// The registry, in full-suite order
pub static TASKS: [TaskSpec; 5] = [
    TaskSpec {
        id: TaskId::Update,
        key: "1",
        label: "Update package lists",
        description: "Fetches the latest information about available packages and updates.",
        args: &["update"],
        needs_privilege: true,
    },
    TaskSpec {
        id: TaskId::Upgrade,
        key: "2",
        label: "Upgrade packages",
        description: "Installs newer versions of all currently installed packages.",
        args: &["upgrade", "-y"],
        needs_privilege: true,
    },
    TaskSpec {
        id: TaskId::Autoremove,
        key: "3",
        label: "Remove unused packages",
        description: "Cleans up packages that were automatically installed and are no longer required.",
        args: &["autoremove", "-y"],
        needs_privilege: true,
    },
    TaskSpec {
        id: TaskId::Autoclean,
        key: "4",
        label: "Clean apt cache",
        description: "Frees up disk space by deleting obsolete cached package files.",
        args: &["autoclean", "-y"],
        needs_privilege: true,
    },
    TaskSpec {
        id: TaskId::ListUpgradable,
        key: "5",
        label: "List available updates",
        description: "Shows packages that can be updated (safe read-only check).",
        args: &["list", "--upgradable"],
        needs_privilege: false,
    },
];

/// What the caller asked to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Task(TaskId),
    All,
}

impl Selection {
    /// Resolve the selection to registry entries, in execution order
    pub fn tasks(self) -> Vec<&'static TaskSpec> {
        match self {
            Selection::Task(id) => vec![id.spec()],
            Selection::All => TASKS.iter().collect(),
        }
    }
}

impl FromStr for Selection {
    type Err = UpkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Task)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_in_suite_order() {
        let ids: Vec<TaskId> = TASKS.iter().map(|spec| spec.id).collect();
        assert_eq!(ids, TaskId::ALL.to_vec());
        for id in TaskId::ALL {
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn keys_and_names_are_unique() {
        for (i, a) in TASKS.iter().enumerate() {
            for b in TASKS.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
                assert_ne!(a.id.name(), b.id.name());
            }
        }
    }

    #[test]
    fn parses_keys_and_names() {
        assert_eq!("2".parse::<TaskId>().unwrap(), TaskId::Upgrade);
        assert_eq!(" Autoclean ".parse::<TaskId>().unwrap(), TaskId::Autoclean);
        assert_eq!(
            "list-upgradable".parse::<TaskId>().unwrap(),
            TaskId::ListUpgradable
        );
        assert!(matches!(
            "7".parse::<TaskId>(),
            Err(UpkeepError::UnknownTask(name)) if name == "7"
        ));
    }

    #[test]
    fn parses_selection() {
        assert_eq!("ALL".parse::<Selection>().unwrap(), Selection::All);
        assert_eq!(
            "3".parse::<Selection>().unwrap(),
            Selection::Task(TaskId::Autoremove)
        );
        assert_eq!(Selection::All.tasks().len(), 5);
        assert_eq!(Selection::Task(TaskId::Update).tasks()[0].id, TaskId::Update);
    }

    #[test]
    fn privileged_tasks_are_prefixed() {
        let upgrade = TaskId::Upgrade.spec();
        assert_eq!(
            upgrade.command_line("apt", Privilege::Sudo).to_string(),
            "sudo apt upgrade -y"
        );
        assert_eq!(
            upgrade
                .command_line("apt", Privilege::SudoNonInteractive)
                .to_string(),
            "sudo -n apt upgrade -y"
        );
        let direct = upgrade.command_line("apt", Privilege::Direct);
        assert_eq!(direct.program, "apt");
        assert_eq!(direct.args, vec!["upgrade", "-y"]);
    }

    #[test]
    fn listing_is_never_elevated() {
        let line = TaskId::ListUpgradable
            .spec()
            .command_line("apt", Privilege::Sudo);
        assert_eq!(line.program, "apt");
        assert_eq!(line.args, vec!["list", "--upgradable"]);
    }

    #[test]
    fn mutating_tasks_carry_assume_yes() {
        for id in [TaskId::Upgrade, TaskId::Autoremove, TaskId::Autoclean] {
            assert!(id.spec().args.contains(&"-y"), "{} should pass -y", id);
        }
    }
}
