//! Line-level task transitions.
//!
//! Toggling is deliberately lossy: migrated and scheduled tasks collapse to
//! open, and open goes to done, never back to where it came from.

use crate::marker::{split_marker, Marker};

/// Toggle the task status of a line.
///
/// | marker | result |
/// |---|---|
/// | `x` | `- ` |
/// | `-` | `x ` |
/// | `>` / `<` | `- ` |
/// | `o`, `.`, `•` | unchanged |
/// | none | `- ` prepended |
///
/// Leading whitespace is dropped from the result in every case.
#[must_use]
pub fn toggle(line: &str) -> String {
    let line = line.trim_start();
    match split_marker(line) {
        Some((Marker::Open, rest)) => format!("{}{rest}", Marker::Done.prefix()),
        Some((Marker::Done | Marker::Migrated | Marker::Scheduled, rest)) => {
            format!("{}{rest}", Marker::Open.prefix())
        }
        Some((Marker::Event | Marker::Dot | Marker::Bullet, _)) => line.to_string(),
        None => format!("{}{line}", Marker::Open.prefix()),
    }
}

/// Mark an open task as migrated.
///
/// Any line that is not an open task is returned unchanged.
#[must_use]
pub fn migrate_one(line: &str) -> String {
    match split_marker(line.trim_start()) {
        Some((Marker::Open, rest)) => format!("{}{rest}", Marker::Migrated.prefix()),
        _ => line.to_string(),
    }
}
