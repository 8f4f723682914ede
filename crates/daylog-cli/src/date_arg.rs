//! Date arguments accepted on the command line.

use daylog_core::DayKey;
use std::str::FromStr;

/// A day named relative to today or by its ISO date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateArg {
    Today,
    Yesterday,
    Tomorrow,
    On(DayKey),
}

impl DateArg {
    /// Resolve against the local clock.
    pub fn resolve(self) -> daylog_core::Result<DayKey> {
        match self {
            Self::Today => Ok(DayKey::today()),
            Self::Yesterday => DayKey::today().prev(),
            Self::Tomorrow => DayKey::today().next(),
            Self::On(day) => Ok(day),
        }
    }
}

impl FromStr for DateArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "tomorrow" => Ok(Self::Tomorrow),
            other => other
                .parse()
                .map(Self::On)
                .map_err(|_| format!("expected today, yesterday, tomorrow or YYYY-MM-DD, got '{s}'")),
        }
    }
}
