//! BS to AD conversion.
//!
//! Tabulated years are converted exactly by counting days from [`ANCHOR`].
//! Other years fall back to a linear estimate that can be off by a day or two,
//! and the result says so through [`AdDate::is_exact`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    APPROX_DAY_CLAMP, APPROX_MONTH_SHIFT, APPROX_YEAR_OFFSET, FALLBACK_YEAR_DAYS, ISO_DATE_FORMAT,
    MAGH, MIN_DAY,
};
use crate::prelude::*;
use crate::table::{ANCHOR, MonthLengths, lengths_for};
use crate::BsDate;

/// A Gregorian date produced by conversion, tagged with its precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", "date.format(ISO_DATE_FORMAT)")]
pub struct AdDate {
    date:  NaiveDate,
    exact: bool,
}

impl AdDate {
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// `false` when the BS year had no table entry and the date is an estimate
    pub const fn is_exact(&self) -> bool {
        self.exact
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Day past the end of the month in a tabulated year.
    #[error("{date} is out of range: month {month} of {year} has {max} days")]
    OutOfRange {
        date:  BsDate,
        year:  u16,
        month: u8,
        max:   u8,
    },

    /// The day offset from the anchor leaves chrono's date range.
    #[error("{date} is {offset} days from the anchor, beyond the AD calendar")]
    DateOverflow { date: BsDate, offset: i64 },

    /// Approximate conversion could not build any valid AD date.
    #[error("no approximate AD date for {date} (estimated {year}-{month:02}-{day:02})")]
    InvalidApproximation {
        date:  BsDate,
        year:  i32,
        month: u32,
        day:   u32,
    },
}

/// Converts a BS date to AD.
///
/// # Errors
/// `OutOfRange` when the day exceeds the tabulated month length,
/// `InvalidApproximation` when an untabulated year yields no valid AD date,
/// and `DateOverflow` if the exact result falls outside chrono's range.
pub fn to_ad(date: BsDate) -> Result<AdDate, ConversionError> {
    let Some(lengths) = lengths_for(date.year()) else {
        return approximate(date);
    };

    let max = lengths[date.month_typed().index()];
    if date.day() > max {
        return Err(ConversionError::OutOfRange {
            date,
            year: date.year(),
            month: date.month(),
            max,
        });
    }

    shift_anchor(date, offset_from(ANCHOR.bs, date, lengths_for))
}

fn shift_anchor(date: BsDate, offset: i64) -> Result<AdDate, ConversionError> {
    let anchor = ANCHOR.ad;
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        anchor.checked_add_days(days)
    } else {
        anchor.checked_sub_days(days)
    };

    shifted
        .map(|ad| AdDate { date: ad, exact: true })
        .ok_or(ConversionError::DateOverflow { date, offset })
}

type LengthLookup = fn(u16) -> Option<&'static MonthLengths>;

/// Signed number of days from `origin` to `target`.
///
/// Both dates must be valid in tabulated years; years strictly between them
/// that are missing from the table count as `FALLBACK_YEAR_DAYS`.
fn offset_from(origin: BsDate, target: BsDate, lookup: LengthLookup) -> i64 {
    let (earlier, later, sign) = if target >= origin {
        (origin, target, 1)
    } else {
        (target, origin, -1)
    };

    let whole_years: i64 = (earlier.year()..later.year())
        .map(|year| {
            lookup(year).map_or(FALLBACK_YEAR_DAYS, |lengths| {
                lengths.iter().map(|&d| i64::from(d)).sum()
            })
        })
        .sum();

    sign * (whole_years + day_of_year(later, lookup) - day_of_year(earlier, lookup))
}

/// Zero-based index of the date within its BS year.
fn day_of_year(date: BsDate, lookup: LengthLookup) -> i64 {
    let lengths: &MonthLengths = lookup(date.year()).unwrap_or(&[0; 12]);
    let before: i64 = lengths[..date.month_typed().index()]
        .iter()
        .map(|&d| i64::from(d))
        .sum();
    before + i64::from(date.day() - MIN_DAY)
}

fn approximate(date: BsDate) -> Result<AdDate, ConversionError> {
    let mut year = i32::from(date.year()) - APPROX_YEAR_OFFSET;
    let month = if date.month() >= MAGH {
        year += 1;
        date.month() - (MAGH - 1)
    } else {
        date.month() + APPROX_MONTH_SHIFT
    };
    let month = u32::from(month);
    let day = u32::from(date.day().min(APPROX_DAY_CLAMP));

    let estimate = NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, u32::from(MIN_DAY)))
        .ok_or(ConversionError::InvalidApproximation {
            date,
            year,
            month,
            day,
        })?;

    debug!(bs = %date, ad = %estimate, "approximate conversion, year not tabulated");
    Ok(AdDate {
        date:  estimate,
        exact: false,
    })
}
