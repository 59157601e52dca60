use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

type FileWriter = Arc<Mutex<BufWriter<File>>>;

/// Shared logger that can be used across the application.
///
/// Entries are kept in memory for the log dialog and, when file logging is
/// enabled, appended to a log file. [`Logger::install`] routes the `log`
/// facade into this logger through `fern`.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    file_writer: Option<FileWriter>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Build a logger, opening the log file when `enabled` is set
    pub fn from_config(enabled: bool) -> Result<Self> {
        let mut logger = Self::new();
        if enabled {
            let path = Self::get_log_file_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            logger.file_writer = Some(Arc::new(Mutex::new(BufWriter::new(file))));
        }
        Ok(logger)
    }

    /// Location of the log file
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("nbshare").join("nbshare.log"))
    }

    /// Route `log` records into this logger
    pub fn install(&self, level: log::LevelFilter) -> Result<()> {
        let sink = self.clone();
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("{:<5} {}: {}", record.level(), record.target(), message))
            })
            .level(level)
            .level_for("reqwest", log::LevelFilter::Warn)
            .level_for("hyper", log::LevelFilter::Warn)
            .chain(fern::Output::call(move |record| sink.log(record.args().to_string())))
            .apply()
            .context("Failed to install logger")
    }

    pub fn is_enabled(&self) -> bool {
        self.file_writer.is_some()
    }

    pub fn has_file_writer(&self) -> bool {
        self.file_writer.is_some()
    }

    pub fn file_writer(&self) -> Option<&FileWriter> {
        self.file_writer.as_ref()
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Some(writer) = &self.file_writer {
            if let Ok(mut writer) = writer.lock() {
                let _ = writeln!(writer, "{}", formatted_message);
            }
        }

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            let mut sorted_logs = logs.clone();
            sorted_logs.reverse();
            sorted_logs
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Flush buffered file output
    pub fn flush(&self) {
        if let Some(writer) = &self.file_writer {
            if let Ok(mut writer) = writer.lock() {
                let _ = writer.flush();
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
