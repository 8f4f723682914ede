//! Whole-document helpers: splitting, parsing and line replacement.
//!
//! A document is just text. Every helper here re-splits it, so line
//! indices are only valid against the text they were computed from.

use crate::entry::ParsedEntry;
use crate::error::{CoreError, Result};
use crate::marker::classify;
use crate::normalize::normalize;

/// Split text into lines on `\n` or `\r\n`.
///
/// Empty text is a single empty line. A `\r` not followed by `\n` is part
/// of its line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let terminated = lines.len() - 1;

    for line in &mut lines[..terminated] {
        if let Some(stripped) = line.strip_suffix('\r') {
            *line = stripped;
        }
    }

    lines
}

/// Join lines with `\n`.
#[must_use]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse one line at a given index.
#[must_use]
pub fn parse_line(line_index: usize, raw: &str) -> ParsedEntry {
    let classified = classify(raw);
    let normalized = normalize(classified.text);

    ParsedEntry {
        entry_type: classified.entry_type,
        status: classified.status,
        text: normalized.text,
        raw: raw.to_string(),
        line_index,
        tags: normalized.tags,
        priority: normalized.priority,
    }
}

/// Parse a day's text into entries, one per line, in line order.
#[must_use]
pub fn parse_log(text: &str) -> Vec<ParsedEntry> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, line)| parse_line(i, line))
        .collect()
}

/// Replace the line at `index` with `f(line)` and rejoin the text.
///
/// # Errors
/// Returns `CoreError::LineOutOfRange` if `index` is past the last line.
pub fn update_line<F>(text: &str, index: usize, f: F) -> Result<String>
where
    F: FnOnce(&str) -> String,
{
    let mut lines: Vec<String> = split_lines(text).into_iter().map(String::from).collect();
    let len = lines.len();
    let slot = lines
        .get_mut(index)
        .ok_or(CoreError::LineOutOfRange { index, len })?;
    let updated = f(slot.as_str());
    *slot = updated;
    Ok(join_lines(&lines))
}

/// Append a line to the end of the text.
#[must_use]
pub fn append_line(text: &str, line: &str) -> String {
    if text.is_empty() {
        line.to_string()
    } else {
        format!("{text}\n{line}")
    }
}
