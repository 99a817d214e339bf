//! Bikram Sambat (BS) date conversion and IPO announcement extraction.
//!
//! Announcement text such as `"ABC Hydropower Ltd IPO opens from 1st Chaitra
//! to 5th Chaitra, 2082"` is reduced to a company name and a pair of BS dates,
//! which are then converted to Gregorian (AD) dates.

mod config;
mod consts;
mod convert;
mod extract;
mod parse;
mod pipeline;
mod prelude;
mod range;
mod table;
mod types;

pub use config::{ConfigError, ExtractorConfig};
pub use consts::*;
pub use convert::{AdDate, ConversionError, to_ad};
pub use extract::{ExtractError, Extraction, RangeExtractor};
pub use parse::{month_from_name, normalize_month, parse, parse_exact, parse_phrase};
pub use pipeline::{
    AnnouncementBlock, Diagnostic, ExtractedRecord, ExtractionPipeline, IpoRow, PipelineReport,
    Stage, StageError, StructureHint,
};
pub use range::{IssueWindow, RangeError, Trigger};
pub use table::{ANCHOR, CalendarAnchor, MonthLengths, lengths_for, tabulated_years, year_length};
pub use types::{Day, Month, Year};

use crate::prelude::*;
use std::str::FromStr;

/// A date in the Bikram Sambat calendar.
///
/// Ordering is chronological. The day is only checked against the month
/// length when the date is converted, since month lengths are tabulated per
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{} {} {}", "day.get()", "month.name()", "year.get()")]
pub struct BsDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Unrecognized month name: {_0}")]
    UnrecognizedMonth(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {_0}")]
    InvalidDay(u8),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl BsDate {
    /// Creates a date from already validated components
    pub const fn new(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Creates a date from raw components
    ///
    /// # Errors
    /// Returns the first component that fails validation.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
            day:   Day::new(day)?,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Converts to database columns: (year, month, day)
    pub const fn to_columns(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }
}

impl FromStr for BsDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_exact(s)
    }
}

impl TryFrom<(u16, u8, u8)> for BsDate {
    type Error = ParseError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::from_ymd(value.0, value.1, value.2)
    }
}

impl serde::Serialize for BsDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for BsDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
