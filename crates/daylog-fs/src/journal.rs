//! Journal management and day document storage.

use crate::config::JournalConfig;
use crate::error::{FsError, Result};
use daylog_core::{CoreError, DayKey, DayStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory name for daylog configuration.
const DAYLOG_DIR: &str = ".daylog";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";
/// Day documents directory name.
const DAYS_DIR: &str = "days";
/// Extension of a day document.
const DAY_EXT: &str = "log";

/// A journal stores one bullet log per calendar day on the filesystem.
#[derive(Debug)]
pub struct Journal {
    /// Root path of the journal.
    root: PathBuf,
    /// Journal configuration.
    config: JournalConfig,
}

impl Journal {
    /// Initialize a new journal at the given path.
    ///
    /// # Errors
    /// Returns error if a journal already exists or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let daylog_dir = root.join(DAYLOG_DIR);

        if daylog_dir.exists() {
            return Err(FsError::JournalExists(root));
        }

        fs::create_dir_all(&daylog_dir)?;
        fs::create_dir_all(root.join(DAYS_DIR))?;

        let config = JournalConfig::default();
        let config_content = serde_yaml::to_string(&config)?;
        fs::write(daylog_dir.join(CONFIG_FILE), config_content)?;

        info!(path = %root.display(), "Initialized journal");

        Ok(Self { root, config })
    }

    /// Open an existing journal at the given path.
    ///
    /// # Errors
    /// Returns error if the journal doesn't exist or config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(DAYLOG_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(FsError::JournalNotFound(root));
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: JournalConfig = serde_yaml::from_str(&config_content)?;

        debug!(path = %root.display(), "Opened journal");

        Ok(Self { root, config })
    }

    /// Get the journal root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the journal configuration.
    #[must_use]
    pub const fn config(&self) -> &JournalConfig {
        &self.config
    }

    fn days_dir(&self) -> PathBuf {
        self.root.join(DAYS_DIR)
    }

    /// Path of the document for a day.
    #[must_use]
    pub fn day_path(&self, date: DayKey) -> PathBuf {
        self.days_dir().join(format!("{date}.{DAY_EXT}"))
    }

    /// Read a day's text; a day with no file reads as empty.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn read_day(&self, date: DayKey) -> Result<String> {
        match fs::read_to_string(self.day_path(date)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a day's text.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn write_day(&self, date: DayKey, text: &str) -> Result<()> {
        fs::create_dir_all(self.days_dir())?;
        fs::write(self.day_path(date), text)?;

        debug!(date = %date, bytes = text.len(), "Wrote day");

        Ok(())
    }

    /// List every day with a stored document, oldest first.
    ///
    /// # Errors
    /// Returns error if the days directory cannot be traversed.
    pub fn list_days(&self) -> Result<Vec<DayKey>> {
        let days_dir = self.days_dir();
        if !days_dir.exists() {
            return Ok(Vec::new());
        }

        let mut days = Vec::new();

        for entry in WalkDir::new(&days_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DAY_EXT) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match stem.parse::<DayKey>() {
                Ok(day) => days.push(day),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Not a day document, skipping");
                }
            }
        }

        days.sort();

        Ok(days)
    }
}

impl DayStore for Journal {
    fn get(&self, date: DayKey) -> daylog_core::Result<String> {
        self.read_day(date).map_err(CoreError::store)
    }

    fn set(&self, date: DayKey, text: &str) -> daylog_core::Result<()> {
        self.write_day(date, text).map_err(CoreError::store)
    }
}
