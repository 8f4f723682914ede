//! CLI command implementations.

use crate::date_arg::DateArg;
use crate::interactive;
use crate::output::{self, DaySummary, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use daylog_core::{
    append_line, migrate_and_persist, migrate_one, parse_line, parse_log, plan_migration,
    split_lines, toggle, update_line, DayKey, ParsedEntry, TaskStatus,
};
use daylog_fs::Journal;
use std::path::Path;
use tracing::info;

/// Filter criteria for showing entries.
#[derive(Debug, Default)]
pub struct EntryFilter {
    /// Only entries carrying this tag (prefix optional, `#` assumed).
    pub tag: Option<String>,
    /// Only priority entries.
    pub priority: bool,
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
}

impl EntryFilter {
    /// Check if an entry matches this filter.
    #[must_use]
    pub fn matches(&self, entry: &ParsedEntry) -> bool {
        if let Some(tag) = &self.tag {
            let wanted = if tag.starts_with('#') || tag.starts_with('@') {
                tag.clone()
            } else {
                format!("#{tag}")
            };
            if !entry.has_tag(&wanted) {
                return false;
            }
        }

        if self.priority && !entry.priority {
            return false;
        }

        if let Some(status) = self.status {
            if !entry.is_task(status) {
                return false;
            }
        }

        true
    }
}

fn open_journal(path: &Path) -> Result<Journal> {
    Journal::open(path).context("Failed to open journal")
}

/// Initialize a new journal.
pub fn init(path: &Path, format: OutputFormat) -> Result<()> {
    Journal::init(path).context("Failed to initialize journal")?;
    output::print_success(&format!("Initialized journal at {}", path.display()), format)
}

/// Show a day's entries.
pub fn show(path: &Path, date: DateArg, filter: &EntryFilter, format: OutputFormat) -> Result<()> {
    let journal = open_journal(path)?;
    let date = date.resolve()?;
    let text = journal.read_day(date).context("Failed to read day")?;

    let entries: Vec<ParsedEntry> = parse_log(&text)
        .into_iter()
        .filter(|e| filter.matches(e))
        .collect();

    if matches!(format, OutputFormat::Human) {
        output::print_day_header(date, format);
        let visible: Vec<_> = entries
            .into_iter()
            .filter(|e| !e.raw.trim().is_empty())
            .collect();
        if visible.is_empty() {
            println!("{}", style("  (nothing logged)").dim());
            return Ok(());
        }
        return output::print_list(&visible, format);
    }

    output::print_list(&entries, format)
}

/// Append a line to a day.
pub fn add(path: &Path, date: DateArg, words: &[String], format: OutputFormat) -> Result<()> {
    let journal = open_journal(path)?;
    let date = date.resolve()?;
    let line = words.join(" ");

    let text = journal.read_day(date).context("Failed to read day")?;
    let updated = append_line(&text, &line);
    journal.write_day(date, &updated).context("Failed to write day")?;

    let index = split_lines(&updated).len() - 1;
    info!(date = %date, index, "Added line");

    output::print(&parse_line(index, &line), format)
}

/// Toggle the task status of one line.
pub fn toggle_line(path: &Path, date: DateArg, index: usize, format: OutputFormat) -> Result<()> {
    rewrite_line(path, date, index, toggle, format)
}

/// Mark one open task as migrated.
pub fn defer(path: &Path, date: DateArg, index: usize, format: OutputFormat) -> Result<()> {
    rewrite_line(path, date, index, migrate_one, format)
}

fn rewrite_line(
    path: &Path,
    date: DateArg,
    index: usize,
    f: fn(&str) -> String,
    format: OutputFormat,
) -> Result<()> {
    let journal = open_journal(path)?;
    let date = date.resolve()?;
    let text = journal.read_day(date).context("Failed to read day")?;

    let updated = update_line(&text, index, f)?;
    let line = split_lines(&updated)[index].to_string();

    if updated == text {
        return output::print_success(&format!("Line {index} unchanged: {line}"), format);
    }

    journal.write_day(date, &updated).context("Failed to write day")?;
    output::print(&parse_line(index, &line), format)
}

/// Carry every open task of a day over to the next day.
pub fn migrate(path: &Path, date: DateArg, yes: bool, format: OutputFormat) -> Result<()> {
    let journal = open_journal(path)?;
    let date = date.resolve()?;
    let text = journal.read_day(date).context("Failed to read day")?;

    let plan = plan_migration(&text);
    if plan.items.is_empty() {
        return output::print_success(&format!("No open tasks on {date}"), format);
    }

    if !yes && matches!(format, OutputFormat::Human) {
        let next = date.next()?;
        if !interactive::confirm_migration(date, next, &plan.items)? {
            println!("{}", style("  Cancelled.").dim());
            return Ok(());
        }
    }

    let outcome =
        migrate_and_persist(&journal, date, &text).context("Failed to migrate open tasks")?;
    info!(from = %date, to = %outcome.next_date, count = outcome.migrated.len(), "Migrated");

    output::print(&outcome, format)
}

/// Edit a day in `$EDITOR`.
pub fn edit(path: &Path, date: DateArg, format: OutputFormat) -> Result<()> {
    let journal = open_journal(path)?;
    let date = date.resolve()?;
    let text = journal.read_day(date).context("Failed to read day")?;

    let Some(edited) = interactive::edit_day(date, &text)? else {
        return output::print_success("Editor closed without saving", format);
    };

    if edited == text {
        return output::print_success("No changes", format);
    }

    journal.write_day(date, &edited).context("Failed to write day")?;
    output::print_day_header(date, format);
    output::print_list(&parse_log(&edited), format)
}

/// List stored days with entry counts.
pub fn days(path: &Path, format: OutputFormat) -> Result<()> {
    let journal = open_journal(path)?;
    let days = journal.list_days().context("Failed to list days")?;

    if days.is_empty() {
        return output::print_success("No days logged", format);
    }

    let summaries = days
        .into_iter()
        .map(|day| summarize(&journal, day))
        .collect::<Result<Vec<_>>>()?;

    output::print_list(&summaries, format)
}

fn summarize(journal: &Journal, day: DayKey) -> Result<DaySummary> {
    let text = journal
        .read_day(day)
        .with_context(|| format!("Failed to read {day}"))?;
    Ok(DaySummary::tally(day, &parse_log(&text)))
}

/// Print the marker legend.
pub fn legend(format: OutputFormat) -> Result<()> {
    output::print_list(&output::legend_rows(), format)
}

/// Start the HTTP server.
pub fn serve(path: &Path, host: &str, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { daylog_server::serve(path, host, port).await })
}
