//! Output formatting for the CLI.

use anyhow::Result;
use console::style;
use daylog_core::{DayKey, EntryType, MigrationOutcome, ParsedEntry, TaskStatus, LEGEND};
use serde::Serialize;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print output in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a list in the specified format.
pub fn print_list<T: Serialize + HumanDisplay>(values: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for value in values {
                println!("{}", value.human_display());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(values)?),
    }
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{message}"),
        OutputFormat::Json => {
            let body = serde_json::json!({ "status": "ok", "message": message });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Yaml => {
            println!("status: ok\nmessage: {}", serde_yaml::to_string(message)?.trim_end());
        }
    }
    Ok(())
}

/// Print a day heading (human format only).
pub fn print_day_header(date: DayKey, format: OutputFormat) {
    if matches!(format, OutputFormat::Human) {
        println!("{}", style(date).bold().cyan());
        println!("{}", style("─".repeat(10)).dim());
    }
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

/// Checkbox-style glyph for an entry.
fn glyph(entry: &ParsedEntry) -> &'static str {
    match (entry.entry_type, entry.status) {
        (EntryType::Task, Some(TaskStatus::Done)) => "[x]",
        (EntryType::Task, Some(TaskStatus::Migrated)) => "[>]",
        (EntryType::Task, Some(TaskStatus::Scheduled)) => "[<]",
        (EntryType::Task, _) => "[ ]",
        (EntryType::Event, _) => " o ",
        (EntryType::Note, _) => " · ",
    }
}

impl HumanDisplay for ParsedEntry {
    fn human_display(&self) -> String {
        let text = match self.status {
            Some(TaskStatus::Done | TaskStatus::Migrated | TaskStatus::Scheduled) => {
                style(&self.text).dim().to_string()
            }
            _ if self.priority => style(&self.text).yellow().bold().to_string(),
            _ => self.text.clone(),
        };
        let bang = if self.priority { "! " } else { "" };

        format!("{:>3}  {} {bang}{text}", self.line_index, glyph(self))
    }
}

impl HumanDisplay for MigrationOutcome {
    fn human_display(&self) -> String {
        if self.migrated.is_empty() {
            return format!("No open tasks to migrate to {}", self.next_date);
        }

        let mut out = format!(
            "Migrated {} open task(s) to {}",
            self.migrated.len(),
            self.next_date
        );
        for item in &self.migrated {
            out.push_str("\n  ");
            out.push_str(item);
        }
        out
    }
}

/// Per-day counts for the `days` listing.
#[derive(Debug, Default, Serialize)]
pub struct DaySummary {
    pub date: Option<DayKey>,
    pub open: usize,
    pub done: usize,
    pub migrated: usize,
    pub scheduled: usize,
    pub events: usize,
    pub notes: usize,
}

impl DaySummary {
    /// Count entries of one day, ignoring blank lines.
    pub fn tally(date: DayKey, entries: &[ParsedEntry]) -> Self {
        let mut summary = Self {
            date: Some(date),
            ..Self::default()
        };

        for entry in entries.iter().filter(|e| !e.raw.trim().is_empty()) {
            match (entry.entry_type, entry.status) {
                (EntryType::Task, Some(TaskStatus::Open)) => summary.open += 1,
                (EntryType::Task, Some(TaskStatus::Done)) => summary.done += 1,
                (EntryType::Task, Some(TaskStatus::Migrated)) => summary.migrated += 1,
                (EntryType::Task, _) => summary.scheduled += 1,
                (EntryType::Event, _) => summary.events += 1,
                (EntryType::Note, _) => summary.notes += 1,
            }
        }

        summary
    }
}

impl HumanDisplay for DaySummary {
    fn human_display(&self) -> String {
        let date = self.date.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "{date}  open {:<3} done {:<3} migrated {:<3} scheduled {:<3} events {:<3} notes {}",
            self.open, self.done, self.migrated, self.scheduled, self.events, self.notes
        )
    }
}

/// One row of the marker legend.
#[derive(Debug, Serialize)]
pub struct LegendRow {
    pub marker: &'static str,
    pub meaning: &'static str,
}

/// The legend as printable rows.
pub fn legend_rows() -> Vec<LegendRow> {
    LEGEND
        .iter()
        .map(|&(marker, meaning)| LegendRow { marker, meaning })
        .collect()
}

impl HumanDisplay for LegendRow {
    fn human_display(&self) -> String {
        format!("  {}  {}", style(self.marker).bold(), self.meaning)
    }
}
