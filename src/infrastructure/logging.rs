//! File-backed logger.
//!
//! The terminal is owned by the UI, so log records are appended to a file
//! instead of being written to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    /// Installs this logger as the global `log` backend.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {:<5} {}: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
        // A failed write has nowhere to be reported; the record is dropped.
        if let Ok(mut file) = self.file.lock() {
            file.write_all(line.as_bytes()).ok();
        }
    }

    fn flush(&self) {
        // Likewise for a failed flush.
        if let Ok(mut file) = self.file.lock() {
            file.flush().ok();
        }
    }
}

/// `<cache dir>/chatsheet/chatsheet.log`, if the platform has a cache dir.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatsheet").join("chatsheet.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_writes_enabled_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");
        let logger = FileLogger::open(&path, LevelFilter::Info).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("chatsheet::test")
                .args(format_args!("host missing"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("chatsheet::test")
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.flush();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("WARN  chatsheet::test: host missing"));
        assert!(!content.contains("too chatty"));
    }

    #[test]
    fn test_failed_write_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readonly.log");
        fs::write(&path, "").unwrap();
        let logger = FileLogger {
            level: LevelFilter::Info,
            file: Mutex::new(File::open(&path).unwrap()),
        };

        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("chatsheet::test")
                .args(format_args!("lost"))
                .build(),
        );
        logger.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
