//! Maintenance log
//!
//! A single weekly-rotated file receives every `tracing` event of the
//! process. [`init`] installs it once; later calls hand back a guard over the
//! same writer instead of attaching another one, so no line is ever written
//! twice.

pub mod rotation;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::types::{UpkeepError, UpkeepResult};
use rotation::WeeklyRotatingFile;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

type SharedFile = Arc<Mutex<WeeklyRotatingFile>>;

static ACTIVE: OnceLock<(PathBuf, SharedFile)> = OnceLock::new();

/// Handle given to the fmt layer for each event
struct SharedWriter(SharedFile);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .flush()
    }
}

/// Keeps the log writer alive and flushes it when dropped
#[must_use = "dropping the guard flushes the log; hold it until exit"]
#[derive(Debug)]
pub struct LogGuard {
    path: PathBuf,
    file: SharedFile,
}

impl LogGuard {
    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Install the process-wide log writer
///
/// The first successful call wins. The directory is created if missing.
pub fn init(config: &LogConfig) -> UpkeepResult<LogGuard> {
    if let Some((path, file)) = ACTIVE.get() {
        return Ok(LogGuard {
            path: path.clone(),
            file: Arc::clone(file),
        });
    }

    fs::create_dir_all(&config.directory)?;
    let path = config.path();
    let file: SharedFile = Arc::new(Mutex::new(WeeklyRotatingFile::open(
        &path,
        config.rotation(),
    )?));

    let filter = match env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(&config.level).map_err(|e| UpkeepError::Logging(e.to_string()))?,
    };

    let layer_file = Arc::clone(&file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(move || SharedWriter(Arc::clone(&layer_file)))
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| UpkeepError::Logging(e.to_string()))?;

    let (path, file) = ACTIVE.get_or_init(|| (path, file));
    tracing::debug!("Logging to {}", path.display());

    Ok(LogGuard {
        path: path.clone(),
        file: Arc::clone(file),
    })
}
