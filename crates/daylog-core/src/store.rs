//! Day document storage seam.

use crate::date::DayKey;
use crate::error::{CoreError, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Key-value storage of one UTF-8 document per day.
///
/// `set` fully replaces the stored text; there is no append primitive.
pub trait DayStore {
    /// Read a day's text, or an empty string if nothing is stored.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the backend fails.
    fn get(&self, date: DayKey) -> Result<String>;

    /// Replace a day's text.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the backend fails.
    fn set(&self, date: DayKey, text: &str) -> Result<()>;
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    days: Mutex<BTreeMap<DayKey, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Days that have a stored document, ascending.
    #[must_use]
    pub fn days(&self) -> Vec<DayKey> {
        self.days
            .lock()
            .map(|days| days.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether anything was ever written for a day.
    #[must_use]
    pub fn contains(&self, date: DayKey) -> bool {
        self.days.lock().is_ok_and(|days| days.contains_key(&date))
    }
}

impl DayStore for MemoryStore {
    fn get(&self, date: DayKey) -> Result<String> {
        let days = self
            .days
            .lock()
            .map_err(|e| CoreError::store(e.to_string()))?;
        Ok(days.get(&date).cloned().unwrap_or_default())
    }

    fn set(&self, date: DayKey, text: &str) -> Result<()> {
        let mut days = self
            .days
            .lock()
            .map_err(|e| CoreError::store(e.to_string()))?;
        days.insert(date, text.to_string());
        Ok(())
    }
}
