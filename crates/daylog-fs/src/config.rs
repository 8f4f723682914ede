//! Journal configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Journal configuration stored in `.daylog/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Journal settings.
    #[serde(default)]
    pub journal: JournalSettings,

    /// Interactive editing settings.
    #[serde(default)]
    pub editor: EditorSettings,
}

fn default_version() -> u32 {
    1
}

/// Journal-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalSettings {
    /// Journal name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Settings for live editing sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Quiet period after the last edit before the buffer is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl EditorSettings {
    /// Debounce delay as a duration.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            version: 1,
            journal: JournalSettings::default(),
            editor: EditorSettings::default(),
        }
    }
}

impl JournalConfig {
    /// Create a new config with the given journal name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            journal: JournalSettings {
                name: Some(name.into()),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: JournalConfig = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(config.editor.debounce_ms, 300);
        assert!(config.journal.name.is_none());
    }

    #[test]
    fn test_debounce_override() {
        let config: JournalConfig =
            serde_yaml::from_str("editor:\n  debounce_ms: 50\njournal:\n  name: work\n").unwrap();
        assert_eq!(config.editor.debounce(), Duration::from_millis(50));
        assert_eq!(config.journal.name.as_deref(), Some("work"));
    }
}
