//! Weekly log rotation
//!
//! The active file rolls over at local midnight at the start of a configured
//! weekday. Backups are numbered `<file>.1` (newest) to `<file>.N` (oldest);
//! anything past the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Days, Local, NaiveDateTime, NaiveTime, Weekday};

/// Retention and boundary settings for a rotating file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRotation {
    pub weekday: Weekday,
    pub backups: usize,
}

impl Default for WeeklyRotation {
    fn default() -> Self {
        Self {
            weekday: Weekday::Wed,
            backups: 4,
        }
    }
}

impl WeeklyRotation {
    /// First rollover boundary strictly after `after`
    pub fn next_rollover(&self, after: NaiveDateTime) -> NaiveDateTime {
        let today = after.date();
        let mut days_ahead = (7 + self.weekday.num_days_from_monday()
            - today.weekday().num_days_from_monday())
            % 7;
        if days_ahead == 0 {
            days_ahead = 7;
        }
        today
            .checked_add_days(Days::new(u64::from(days_ahead)))
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
    }
}

/// A log file that archives itself once a week
#[derive(Debug)]
pub struct WeeklyRotatingFile {
    path: PathBuf,
    policy: WeeklyRotation,
    file: Option<File>,
    next_rollover: NaiveDateTime,
}

impl WeeklyRotatingFile {
    /// Open (or create) `path`. An existing file's boundary is computed from
    /// its modification time, so a stale file is rotated on the first write.
    pub fn open(path: impl Into<PathBuf>, policy: WeeklyRotation) -> io::Result<Self> {
        let path = path.into();
        let reference = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map(|modified| DateTime::<Local>::from(modified).naive_local())
            .unwrap_or_else(|_| Local::now().naive_local());
        Self::open_at(path, policy, reference)
    }

    /// Open with an explicit reference time for the first boundary
    pub fn open_at(
        path: impl Into<PathBuf>,
        policy: WeeklyRotation,
        reference: NaiveDateTime,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self {
            next_rollover: policy.next_rollover(reference),
            path,
            policy,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_rollover(&self) -> NaiveDateTime {
        self.next_rollover
    }

    /// Path of the `index`-th backup (1 is the newest)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Write `buf`, rotating first if `now` has reached the boundary
    pub fn write_at(&mut self, now: NaiveDateTime, buf: &[u8]) -> io::Result<usize> {
        if now >= self.next_rollover {
            self.rotate(now)?;
        }
        let file = match self.file.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        self.file.insert(file).write(buf)
    }

    /// Archive the active file and start a fresh one
    ///
    /// The next boundary is set before touching any file, so a rotation that
    /// fails is not retried until the following week. The active file is
    /// reopened by the next write.
    pub fn rotate(&mut self, now: NaiveDateTime) -> io::Result<()> {
        self.next_rollover = self.policy.next_rollover(now);
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        if self.policy.backups == 0 {
            remove_if_exists(&self.path)?;
        } else {
            remove_if_exists(&self.backup_path(self.policy.backups))?;
            for index in (1..self.policy.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            if self.path.exists() {
                fs::rename(&self.path, self.backup_path(1))?;
            }
        }

        self.file = Some(open_append(&self.path)?);
        Ok(())
    }
}

impl Write for WeeklyRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(Local::now().naive_local(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
