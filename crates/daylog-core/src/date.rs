//! Calendar date keys for day documents.

use crate::error::{CoreError, Result};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An ISO-8601 calendar date (`YYYY-MM-DD`) identifying one day's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date on the local clock.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The following calendar day.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDate` past the end of the supported range.
    pub fn next(self) -> Result<Self> {
        self.offset(1)
    }

    /// The preceding calendar day.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDate` before the start of the supported range.
    pub fn prev(self) -> Result<Self> {
        self.offset(-1)
    }

    /// Shift by a signed number of days.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn offset(self, days: i64) -> Result<Self> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Self)
            .ok_or_else(|| CoreError::InvalidDate(format!("{self} {days:+} days")))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        // chrono accepts unpadded fields and signed years; keys are always 10 chars.
        let well_formed = s.len() == 10
            && s.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(CoreError::InvalidDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::InvalidDate(s.to_string()))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
