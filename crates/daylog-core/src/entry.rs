//! Parsed entry model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of bullet a line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Something to do.
    Task,
    /// Something that happens.
    Event,
    /// Anything else.
    Note,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Event => write!(f, "event"),
            Self::Note => write!(f, "note"),
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
    /// Carried over to a later day.
    Migrated,
    /// Pushed into a future log.
    Scheduled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Done => write!(f, "done"),
            Self::Migrated => write!(f, "migrated"),
            Self::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "done" => Ok(Self::Done),
            "migrated" => Ok(Self::Migrated),
            "scheduled" => Ok(Self::Scheduled),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// One line of a day's log, projected into structured form.
///
/// Entries are recomputed on every parse and carry no identity beyond
/// `line_index`, which is only meaningful against the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    /// Bullet kind.
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Task status; `None` for events and notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Display text with marker, priority bang and outer whitespace removed.
    pub text: String,

    /// The source line, unmodified.
    pub raw: String,

    /// Zero-based position in the document.
    pub line_index: usize,

    /// `#`/`@` tokens in order of appearance.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether the line carries a `!` priority signal.
    #[serde(default)]
    pub priority: bool,
}

impl ParsedEntry {
    /// Whether this is a task with the given status.
    #[must_use]
    pub fn is_task(&self, status: TaskStatus) -> bool {
        self.entry_type == EntryType::Task && self.status == Some(status)
    }

    /// Whether this is an open task, the only kind that migrates.
    #[must_use]
    pub fn is_open_task(&self) -> bool {
        self.is_task(TaskStatus::Open)
    }

    /// Check if the entry carries a tag, compared with its prefix.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedEntry {
        ParsedEntry {
            entry_type: EntryType::Task,
            status: Some(TaskStatus::Open),
            text: "ship it #work".to_string(),
            raw: "- ship it #work".to_string(),
            line_index: 2,
            tags: vec!["#work".to_string()],
            priority: false,
        }
    }

    #[test]
    fn test_task_predicates() {
        let entry = sample();
        assert!(entry.is_open_task());
        assert!(!entry.is_task(TaskStatus::Done));
        assert!(entry.has_tag("#work"));
        assert!(!entry.has_tag("work"));
    }

    #[test]
    fn test_serialization_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["type"], "task");
        assert_eq!(json["status"], "open");
        assert_eq!(json["lineIndex"], 2);
        assert_eq!(json["tags"][0], "#work");
    }

    #[test]
    fn test_note_omits_status() {
        let note = ParsedEntry {
            entry_type: EntryType::Note,
            status: None,
            ..sample()
        };
        let json = serde_json::to_string(&note).unwrap();
        assert!(!json.contains("status"));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("later".parse::<TaskStatus>().is_err());
    }
}
