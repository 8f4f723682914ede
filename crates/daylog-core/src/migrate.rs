//! End-of-day migration of open tasks.
//!
//! Migration touches two store keys with no transaction between them. A
//! failure after the first write leaves the days partially migrated and is
//! reported to the caller as-is; nothing here retries or rolls back.

use crate::date::DayKey;
use crate::document::{join_lines, split_lines};
use crate::entry::TaskStatus;
use crate::error::Result;
use crate::marker::{classify, Marker};
use crate::store::DayStore;
use crate::toggle::migrate_one;
use serde::{Deserialize, Serialize};

/// The text-only half of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// Current day's text with every open task marked migrated.
    pub updated_text: String,
    /// Open-task lines to carry forward, in source order.
    pub items: Vec<String>,
}

/// Result of migrating a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOutcome {
    /// Current day's text after migration.
    pub updated_text: String,
    /// The day the tasks were carried to.
    pub next_date: DayKey,
    /// Lines appended to the next day.
    pub migrated: Vec<String>,
}

/// Mark every open task in `text` as migrated and collect its carry-over line.
///
/// Line count is preserved and non-open lines are untouched.
#[must_use]
pub fn plan_migration(text: &str) -> MigrationPlan {
    let mut items = Vec::new();

    let lines: Vec<String> = split_lines(text)
        .into_iter()
        .map(|line| {
            let classified = classify(line);
            if classified.status == Some(TaskStatus::Open) {
                items.push(format!("{}{}", Marker::Open.prefix(), classified.text.trim()));
                migrate_one(line)
            } else {
                line.to_string()
            }
        })
        .collect();

    MigrationPlan {
        updated_text: join_lines(&lines),
        items,
    }
}

/// Append lines to the end of a stored day.
///
/// Nothing is read or written when `items` is empty.
///
/// # Errors
/// Returns the store's error if reading or writing fails.
pub fn append_to_day<S: DayStore + ?Sized>(
    store: &S,
    date: DayKey,
    items: &[String],
) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }

    let existing = store.get(date)?;
    let appended = items.join("\n");
    let combined = if existing.is_empty() {
        appended
    } else {
        format!("{existing}\n{appended}")
    };

    store.set(date, &combined)
}

/// Carry every open task of `text` over to the day after `date`.
///
/// Writes only the next day; the returned `updated_text` is for the caller
/// to apply to the current day.
///
/// # Errors
/// Returns an error if the next date is out of range or the store fails.
pub fn migrate_all_open<S: DayStore + ?Sized>(
    store: &S,
    date: DayKey,
    text: &str,
) -> Result<MigrationOutcome> {
    let plan = plan_migration(text);
    let next_date = date.next()?;
    append_to_day(store, next_date, &plan.items)?;

    Ok(MigrationOutcome {
        updated_text: plan.updated_text,
        next_date,
        migrated: plan.items,
    })
}

/// Like [`migrate_all_open`], but also writes the current day first.
///
/// The current day is written before the next day is touched.
///
/// # Errors
/// Returns an error if the next date is out of range or either write fails.
pub fn migrate_and_persist<S: DayStore + ?Sized>(
    store: &S,
    date: DayKey,
    text: &str,
) -> Result<MigrationOutcome> {
    let plan = plan_migration(text);
    let next_date = date.next()?;

    store.set(date, &plan.updated_text)?;
    append_to_day(store, next_date, &plan.items)?;

    Ok(MigrationOutcome {
        updated_text: plan.updated_text,
        next_date,
        migrated: plan.items,
    })
}
