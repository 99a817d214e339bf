use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{ISO_DATE_FORMAT, RANGE_SEPARATOR, prelude::*};

/// The AD days an issue is open for subscription (inclusive).
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}{}{}", "start.format(ISO_DATE_FORMAT)", RANGE_SEPARATOR, "end.format(ISO_DATE_FORMAT)")]
pub struct IssueWindow {
    start: NaiveDate,
    end:   NaiveDate,
}

/// Error type for issue window operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Error parsing a date component.
    #[error(transparent)]
    Date(#[from] chrono::ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

/// Notification due for a window on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The issue opens on that day.
    #[display(fmt = "opens today")]
    OpensToday,
    /// The issue opens the following day.
    #[display(fmt = "opens tomorrow")]
    OpensTomorrow,
}

impl IssueWindow {
    /// Creates a new window with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the opening day
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the closing day
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns both days as a tuple
    pub const fn dates(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Number of days the issue is open, counting both ends.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Checks if the window contains a given day
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Checks if this window overlaps with another window
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Checks if this window is completely contained within another window
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Not yet closed as of `today`.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.end >= today
    }

    /// The notification due on `today`, if any.
    pub fn trigger_on(&self, today: NaiveDate) -> Option<Trigger> {
        if self.start == today {
            Some(Trigger::OpensToday)
        } else if today.checked_add_days(Days::new(1)) == Some(self.start) {
            Some(Trigger::OpensTomorrow)
        } else {
            None
        }
    }
}

impl FromStr for IssueWindow {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!(
                        "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                    ))
                })?;

                let start = NaiveDate::parse_from_str(start_str.trim(), ISO_DATE_FORMAT)?;
                let end = NaiveDate::parse_from_str(end_str.trim(), ISO_DATE_FORMAT)?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for IssueWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IssueWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
