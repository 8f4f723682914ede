//! Leading markers and line classification.
//!
//! A marker is a single character at the start of a line (after leading
//! whitespace) followed by at least one whitespace character. The table is
//! matched in order and the first hit wins.

use crate::entry::{EntryType, TaskStatus};

/// A recognized leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `x`
    Done,
    /// `-`
    Open,
    /// `>`
    Migrated,
    /// `<`
    Scheduled,
    /// `o`
    Event,
    /// `.`
    Dot,
    /// `•`
    Bullet,
}

/// Markers in match order.
pub const MARKERS: [Marker; 7] = [
    Marker::Done,
    Marker::Open,
    Marker::Migrated,
    Marker::Scheduled,
    Marker::Event,
    Marker::Dot,
    Marker::Bullet,
];

/// Quick reference for writing a log by hand.
pub const LEGEND: [(&str, &str); 8] = [
    ("-", "task"),
    ("o", "event"),
    (".", "note"),
    ("x", "done"),
    (">", "migrated"),
    ("<", "scheduled"),
    ("•", "note"),
    ("!", "priority"),
];

impl Marker {
    /// The marker character.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Done => 'x',
            Self::Open => '-',
            Self::Migrated => '>',
            Self::Scheduled => '<',
            Self::Event => 'o',
            Self::Dot => '.',
            Self::Bullet => '•',
        }
    }

    /// Entry type this marker denotes.
    #[must_use]
    pub const fn entry_type(self) -> EntryType {
        match self {
            Self::Done | Self::Open | Self::Migrated | Self::Scheduled => EntryType::Task,
            Self::Event => EntryType::Event,
            Self::Dot | Self::Bullet => EntryType::Note,
        }
    }

    /// Task status this marker denotes, if it is a task marker.
    #[must_use]
    pub const fn status(self) -> Option<TaskStatus> {
        match self {
            Self::Done => Some(TaskStatus::Done),
            Self::Open => Some(TaskStatus::Open),
            Self::Migrated => Some(TaskStatus::Migrated),
            Self::Scheduled => Some(TaskStatus::Scheduled),
            Self::Event | Self::Dot | Self::Bullet => None,
        }
    }

    /// The canonical line prefix, marker plus one space.
    #[must_use]
    pub fn prefix(self) -> String {
        format!("{} ", self.symbol())
    }
}

/// Split a marker off a line whose leading whitespace is already removed.
///
/// Returns the marker and the text after the marker's whitespace run.
#[must_use]
pub fn split_marker(line: &str) -> Option<(Marker, &str)> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    MARKERS
        .iter()
        .find(|m| m.symbol() == first)
        .map(|&m| (m, rest.trim_start()))
}

/// Result of classifying a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub entry_type: EntryType,
    pub status: Option<TaskStatus>,
    /// The matched marker, if any.
    pub marker: Option<Marker>,
    /// Line text with leading whitespace and the marker removed.
    pub text: &'a str,
}

/// Classify a raw line by its leading marker.
///
/// Total: lines without a recognized marker, including the empty line, are
/// notes whose text is the line minus leading whitespace.
#[must_use]
pub fn classify(line: &str) -> Classified<'_> {
    let line = line.trim_start();
    match split_marker(line) {
        Some((marker, text)) => Classified {
            entry_type: marker.entry_type(),
            status: marker.status(),
            marker: Some(marker),
            text,
        },
        None => Classified {
            entry_type: EntryType::Note,
            status: None,
            marker: None,
            text: line,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind(line: &str) -> (EntryType, Option<TaskStatus>, &str) {
        let c = classify(line);
        (c.entry_type, c.status, c.text)
    }

    #[test]
    fn test_task_markers() {
        assert_eq!(kind("x done thing"), (EntryType::Task, Some(TaskStatus::Done), "done thing"));
        assert_eq!(kind("- buy milk"), (EntryType::Task, Some(TaskStatus::Open), "buy milk"));
        assert_eq!(kind("> moved"), (EntryType::Task, Some(TaskStatus::Migrated), "moved"));
        assert_eq!(kind("< later"), (EntryType::Task, Some(TaskStatus::Scheduled), "later"));
    }

    #[test]
    fn test_event_and_note_markers() {
        assert_eq!(kind("o standup 9:30"), (EntryType::Event, None, "standup 9:30"));
        assert_eq!(kind(". just a note"), (EntryType::Note, None, "just a note"));
        assert_eq!(kind("• bullet note"), (EntryType::Note, None, "bullet note"));
    }

    #[test]
    fn test_leading_whitespace_and_marker_whitespace_consumed() {
        let c = classify("   -\t\t indented task  ");
        assert_eq!(c.marker, Some(Marker::Open));
        assert_eq!(c.text, "indented task  ");
    }

    #[test]
    fn test_unmarked_lines_are_notes() {
        assert_eq!(kind(""), (EntryType::Note, None, ""));
        assert_eq!(kind("   "), (EntryType::Note, None, ""));
        assert_eq!(kind("  plain text"), (EntryType::Note, None, "plain text"));
        assert_eq!(classify("plain").marker, None);
    }

    #[test]
    fn test_marker_needs_following_whitespace() {
        assert_eq!(kind("x"), (EntryType::Note, None, "x"));
        assert_eq!(kind("-dash"), (EntryType::Note, None, "-dash"));
        assert_eq!(kind("xylophone"), (EntryType::Note, None, "xylophone"));
        assert_eq!(kind("o"), (EntryType::Note, None, "o"));
    }

    #[test]
    fn test_classification_is_deterministic() {
        for line in ["- a", "x b", "", "?? c", "• d", "  > e"] {
            assert_eq!(classify(line), classify(line));
        }
    }

    #[test]
    fn test_split_marker() {
        assert_eq!(split_marker("> a b"), Some((Marker::Migrated, "a b")));
        assert_eq!(split_marker("-"), None);
        assert_eq!(split_marker(""), None);
    }
}
