//! daylog-core: Bullet log parsing and task lifecycle.
//!
//! This crate provides:
//! - `classify` / `normalize`: line classification, priority and tag extraction
//! - `toggle` / `migrate_one`: single-line task transitions
//! - `parse_log` and friends: whole-document helpers keyed by line index
//! - `migrate_all_open`: carrying open tasks over to the next day
//! - `DayStore` / `DayKey`: the storage seam and calendar date keys

pub mod date;
pub mod document;
pub mod entry;
pub mod error;
pub mod marker;
pub mod migrate;
pub mod normalize;
pub mod store;
pub mod toggle;

pub use date::DayKey;
pub use document::{append_line, join_lines, parse_line, parse_log, split_lines, update_line};
pub use entry::{EntryType, ParsedEntry, TaskStatus};
pub use error::{CoreError, Result};
pub use marker::{classify, split_marker, Classified, Marker, LEGEND, MARKERS};
pub use migrate::{
    append_to_day, migrate_all_open, migrate_and_persist, plan_migration, MigrationOutcome,
    MigrationPlan,
};
pub use normalize::{extract_tags, normalize, Normalized};
pub use store::{DayStore, MemoryStore};
pub use toggle::{migrate_one, toggle};
