//! Human-readable digests of package-manager output
//!
//! These are line-matching heuristics over apt's report text, not a parser.
//! Every function here is total: output that is not recognized degrades to
//! [`FALLBACK_DIGEST`].

use crate::results::Summary;
use crate::tasks::TaskId;

/// Digest used whenever nothing in the output is recognized
pub const FALLBACK_DIGEST: &str = "completed, see log for details";

/// Summarize a task's captured stdout
pub fn summarize(task: TaskId, stdout: &str) -> Summary {
    let parsed = match task {
        TaskId::Update => summarize_update(stdout),
        TaskId::Upgrade => summarize_upgrade(stdout),
        TaskId::Autoremove => summarize_autoremove(stdout),
        TaskId::Autoclean => summarize_autoclean(stdout),
        TaskId::ListUpgradable => summarize_list_upgradable(stdout),
    };

    match parsed {
        Some((digest, count)) if !digest.trim().is_empty() => Summary {
            task,
            digest,
            count,
        },
        _ => Summary {
            task,
            digest: FALLBACK_DIGEST.to_string(),
            count: None,
        },
    }
}

type Digest = Option<(String, Option<usize>)>;

fn summarize_update(stdout: &str) -> Digest {
    let sources = stdout
        .lines()
        .map(str::trim_start)
        .filter(|line| ["Hit:", "Get:", "Ign:"].iter().any(|p| line.starts_with(p)))
        .count();

    let status = stdout.lines().map(str::trim).find(|line| {
        let lower = line.to_ascii_lowercase();
        lower.contains("packages can be upgraded")
            || lower.contains("package can be upgraded")
            || lower.contains("all packages are up to date")
    });

    match (sources, status) {
        (0, None) => None,
        (0, Some(status)) => Some((status.to_string(), None)),
        (n, None) => Some((format!("{} sources refreshed", n), Some(n))),
        (n, Some(status)) => Some((format!("{} sources refreshed; {}", n, status), Some(n))),
    }
}

/// Counts from apt's `N upgraded, M newly installed, R to remove and K not upgraded.` line
#[derive(Debug, PartialEq, Eq)]
struct AptReport<'a> {
    line: &'a str,
    upgraded: usize,
    to_remove: Option<usize>,
}

fn find_apt_report(stdout: &str) -> Option<AptReport<'_>> {
    stdout.lines().map(str::trim).find_map(|line| {
        let lower = line.to_ascii_lowercase();
        if !(lower.contains("upgraded,") && lower.contains("newly installed")) {
            return None;
        }
        let upgraded = leading_number(line)?;
        let to_remove = line
            .split(',')
            .map(str::trim)
            .find(|part| part.contains("to remove"))
            .and_then(leading_number);
        Some(AptReport {
            line,
            upgraded,
            to_remove,
        })
    })
}

fn leading_number(text: &str) -> Option<usize> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn summarize_upgrade(stdout: &str) -> Digest {
    if let Some(report) = find_apt_report(stdout) {
        return Some((report.line.to_string(), Some(report.upgraded)));
    }
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.to_ascii_lowercase().contains("no packages will be upgraded"))
        .map(|line| (line.to_string(), Some(0)))
}

fn summarize_autoremove(stdout: &str) -> Digest {
    if let Some(removed) = find_apt_report(stdout).and_then(|report| report.to_remove) {
        return Some((packages_removed(removed), Some(removed)));
    }
    let removing = stdout
        .lines()
        .filter(|line| line.trim_start().starts_with("Removing "))
        .count();
    (removing > 0).then(|| (packages_removed(removing), Some(removing)))
}

fn packages_removed(n: usize) -> String {
    if n == 1 {
        "1 package removed".to_string()
    } else {
        format!("{} packages removed", n)
    }
}

fn summarize_autoclean(stdout: &str) -> Digest {
    if let Some(freed) = stdout
        .lines()
        .map(str::trim)
        .find(|line| line.to_ascii_lowercase().contains("freed"))
    {
        return Some((freed.to_string(), None));
    }
    let deleted = stdout
        .lines()
        .filter(|line| line.trim_start().starts_with("Del "))
        .count();
    (deleted > 0).then(|| (format!("{} cached archives deleted", deleted), Some(deleted)))
}

fn summarize_list_upgradable(stdout: &str) -> Digest {
    let upgradable = stdout
        .lines()
        .filter(|line| line.contains("[upgradable from:"))
        .count();
    if upgradable > 0 {
        let noun = if upgradable == 1 { "package" } else { "packages" };
        return Some((
            format!("{} {} can be upgraded", upgradable, noun),
            Some(upgradable),
        ));
    }
    stdout
        .lines()
        .any(|line| line.trim_start().starts_with("Listing..."))
        .then(|| ("All packages are up to date".to_string(), Some(0)))
}
