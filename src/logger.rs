//! File logger behind the `log` facade.
//!
//! `main` installs it once through [`init`] and keeps the returned
//! [`LoggerGuard`] alive; dropping the guard flushes the file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Environment variable naming the log file, or `off`
pub const LOG_PATH_VAR: &str = "CHESS_CORE_LOG";
/// Environment variable holding the maximum level
pub const LOG_LEVEL_VAR: &str = "CHESS_CORE_LOG_LEVEL";

const DEFAULT_LOG_PATH: &str = "chess_core.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` disables file logging.
    pub path: Option<PathBuf>,
    pub level: LevelFilter,
}

impl LogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_PATH_VAR).ok().as_deref(),
            std::env::var(LOG_LEVEL_VAR).ok().as_deref(),
        )
    }

    /// Build a config from raw variable values. Unparsable levels fall back
    /// to `info`.
    #[must_use]
    pub fn from_vars(path: Option<&str>, level: Option<&str>) -> Self {
        let path = match path.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("off") => None,
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => Some(PathBuf::from(DEFAULT_LOG_PATH)),
        };
        let level = level
            .and_then(|l| LevelFilter::from_str(l.trim()).ok())
            .unwrap_or(LevelFilter::Info);
        LogConfig { path, level }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

#[derive(Debug)]
pub enum LoggerError {
    /// The log file could not be opened
    Io { path: PathBuf, source: io::Error },
    /// Another logger was installed first
    AlreadyInstalled,
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Io { path, source } => {
                write!(f, "Cannot open log file '{}': {source}", path.display())
            }
            LoggerError::AlreadyInstalled => write!(f, "A logger is already installed"),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::Io { source, .. } => Some(source),
            LoggerError::AlreadyInstalled => None,
        }
    }
}

/// Appends `<timestamp> <LEVEL> <target>: <message>` lines to a writer.
pub struct FileLogger<W: Write + Send = BufWriter<File>> {
    out: Mutex<W>,
    level: LevelFilter,
}

impl FileLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self, LoggerError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(FileLogger::with_writer(BufWriter::new(file), level))
    }
}

impl<W: Write + Send> FileLogger<W> {
    pub fn with_writer(out: W, level: LevelFilter) -> Self {
        FileLogger {
            out: Mutex::new(out),
            level,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> Log for FileLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let mut out = self.out.lock();
        // Write errors are dropped.
        let _ = writeln!(
            out,
            "{timestamp} {:<5} {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

/// Keeps the installed logger reachable and flushes it when dropped.
#[must_use = "dropping the guard flushes and ends the log session"]
pub struct LoggerGuard {
    logger: Option<&'static FileLogger>,
}

impl LoggerGuard {
    /// True when lines are actually being written somewhere.
    pub fn is_active(&self) -> bool {
        self.logger.is_some()
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        if let Some(logger) = self.logger {
            log::info!("session end");
            logger.flush();
        }
    }
}

/// Install the file logger described by `config` as the global `log` sink.
///
/// With file logging disabled the returned guard is inert and every `log`
/// macro stays a no-op.
pub fn init(config: &LogConfig) -> Result<LoggerGuard, LoggerError> {
    let Some(path) = &config.path else {
        return Ok(LoggerGuard { logger: None });
    };
    if config.level == LevelFilter::Off {
        return Ok(LoggerGuard { logger: None });
    }
    let logger: &'static FileLogger = Box::leak(Box::new(FileLogger::open(path, config.level)?));
    log::set_logger(logger).map_err(|_| LoggerError::AlreadyInstalled)?;
    log::set_max_level(config.level);

    let args: Vec<String> = std::env::args().collect();
    log::info!("{} session start", crate::uci::engine_info(false));
    log::info!("argc {} argv {:?}", args.len(), args);
    Ok(LoggerGuard {
        logger: Some(logger),
    })
}
