//! Local calendar days.
//!
//! Every "same day" comparison in the logs goes through [`LocalDay`]: a day
//! runs from local midnight to local midnight in the device's time zone.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A calendar day in the local time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalDay(NaiveDate);

impl LocalDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Local::now().into()
    }

    /// The day `instant` falls on in the local time zone.
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Local).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        Self::of(instant) == *self
    }

    /// Parses `YYYY-MM-DD` as a local day, or an RFC 3339 timestamp as the
    /// local day it falls on.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use fitness_log_core::calendar::LocalDay;
    ///
    /// let day = LocalDay::parse("2024-01-01").unwrap();
    /// assert_eq!(day.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    /// assert!(LocalDay::parse("yesterday").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        let input = input.trim();
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(input)
            .map(|instant| Self::of(&instant))
            .map_err(|_| StoreError::InvalidDate(input.to_string()))
    }
}

impl From<NaiveDate> for LocalDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DateTime<Local>> for LocalDay {
    fn from(instant: DateTime<Local>) -> Self {
        Self::of(&instant)
    }
}

impl From<&DateTime<Local>> for LocalDay {
    fn from(instant: &DateTime<Local>) -> Self {
        Self::of(instant)
    }
}

impl From<DateTime<Utc>> for LocalDay {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::of(&instant)
    }
}

impl From<DateTime<FixedOffset>> for LocalDay {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::of(&instant)
    }
}

impl fmt::Display for LocalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
