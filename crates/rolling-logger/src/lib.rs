//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to a size-rotated file in the
//! app's log directory and to stderr. `log` records are bridged, so crates
//! using the `log` macros land in the same file. The most recent lines are
//! also kept in memory for an in-app log viewer.
//!
//! On Android the `log` facade belongs to `android_logger` instead, so `log`
//! records go to logcat only. The file and `recent_logs` then hold the
//! `tracing` events, including those from [`info`], [`warn`] and [`error`].

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the active file passes this size
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 5;
/// Lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
    #[error("logger not initialized")]
    NotInitialized,
}

/// Circular buffer of the last `capacity` complete lines
#[derive(Debug)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            partial: String::new(),
        }
    }

    /// Append raw output; text after the last newline waits for the next push
    pub fn push(&mut self, text: &str) {
        self.partial.push_str(text);
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

struct FileState {
    file: Option<File>,
    written: u64,
}

struct Inner {
    dir: PathBuf,
    file_name: String,
    max_bytes: u64,
    max_files: usize,
    state: Mutex<FileState>,
    recent: Mutex<LogBuffer>,
}

impl Inner {
    fn active_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn archived_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", self.file_name, index))
    }

    fn open_active(&self) -> io::Result<(File, u64)> {
        let file = OpenOptions::new().create(true).append(true).open(self.active_path())?;
        let written = file.metadata()?.len();
        Ok((file, written))
    }

    /// app.log -> app.log.1 -> ... -> app.log.N, oldest dropped
    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        state.file = None;

        if self.max_files == 0 {
            fs::remove_file(self.active_path()).or_else(ignore_missing)?;
        } else {
            fs::remove_file(self.archived_path(self.max_files)).or_else(ignore_missing)?;
            for index in (1..self.max_files).rev() {
                let from = self.archived_path(index);
                if from.exists() {
                    fs::rename(&from, self.archived_path(index + 1))?;
                }
            }
            fs::rename(self.active_path(), self.archived_path(1)).or_else(ignore_missing)?;
        }

        let (file, written) = self.open_active()?;
        state.file = Some(file);
        state.written = written;
        Ok(())
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if state.file.is_none() {
            let (file, written) = self.open_active()?;
            state.file = Some(file);
            state.written = written;
        }
        if state.written > 0 && state.written + buf.len() as u64 > self.max_bytes {
            self.rotate(&mut state)?;
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(buf)?;
        }
        state.written += buf.len() as u64;
        drop(state);

        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(&String::from_utf8_lossy(buf));
        Ok(())
    }
}

fn ignore_missing(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

/// Size-rotated log file plus in-memory tail
#[derive(Clone)]
pub struct RollingFileAppender {
    inner: Arc<Inner>,
}

impl RollingFileAppender {
    pub fn new(dir: impl AsRef<Path>, app_name: &str) -> Result<Self, LoggerError> {
        Self::with_limits(dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES, DEFAULT_BUFFER_LINES)
    }

    pub fn with_limits(
        dir: impl AsRef<Path>,
        app_name: &str,
        max_bytes: u64,
        max_files: usize,
        buffer_lines: usize,
    ) -> Result<Self, LoggerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            inner: Arc::new(Inner {
                dir,
                file_name: format!("{}.log", app_name),
                max_bytes,
                max_files,
                state: Mutex::new(FileState { file: None, written: 0 }),
                recent: Mutex::new(LogBuffer::new(buffer_lines)),
            }),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.inner.active_path()
    }

    pub fn recent(&self) -> Vec<String> {
        self.inner.recent.lock().unwrap_or_else(|e| e.into_inner()).lines()
    }
}

pub struct AppenderWriter {
    inner: Arc<Inner>,
}

impl Write for AppenderWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingFileAppender {
    type Writer = AppenderWriter;

    fn make_writer(&'a self) -> Self::Writer {
        AppenderWriter {
            inner: self.inner.clone(),
        }
    }
}

/// Local wall-clock timestamps with milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

struct Logger {
    app_name: String,
    appender: RollingFileAppender,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the global subscriber. Call once at startup.
///
/// On Android `log` records are sent to logcat rather than the file.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized(app_name.to_string()));
    }

    let appender = RollingFileAppender::new(log_dir, app_name)?;
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::DEBUG)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime)
                .with_ansi(false)
                .with_writer(appender.clone()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime)
                .with_writer(io::stderr)
                .with_filter(LevelFilter::INFO),
        );

    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag(app_name.to_string()),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;
    }
    #[cfg(not(target_os = "android"))]
    subscriber
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    let path = appender.path();
    // A racing init already lost at try_init above
    let _ = LOGGER.set(Logger {
        app_name: app_name.to_string(),
        appender,
    });
    log::info!("Logging to {}", path.display());
    Ok(())
}

fn logger() -> Result<&'static Logger, LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    let logger = logger()?;
    tracing::info!(app = %logger.app_name, "{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    let logger = logger()?;
    tracing::warn!(app = %logger.app_name, "{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    let logger = logger()?;
    tracing::error!(app = %logger.app_name, "{}", msg);
    Ok(())
}

/// Last lines written to the log file, oldest first
pub fn recent_logs() -> Vec<String> {
    LOGGER.get().map(|l| l.appender.recent()).unwrap_or_default()
}

/// Path of the active log file, once initialized
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(|l| l.appender.path())
}
