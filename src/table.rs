//! Per-year BS month lengths and the anchor date used for exact conversion.
//!
//! BS month lengths are fixed by almanac, not by rule, so exact conversion is
//! only possible for the years listed here.

use std::sync::LazyLock;

use chrono::NaiveDate;

use crate::BsDate;
use crate::consts::MAX_MONTH;

/// Month lengths indexed by month number minus one.
pub type MonthLengths = [u8; MAX_MONTH as usize];

static MONTH_DAYS: &[(u16, MonthLengths)] = &[
    (2080, [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2081, [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2082, [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]),
    (2083, [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2084, [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2085, [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]),
    (2086, [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30]),
];

/// Month lengths for `year`, or `None` when the year is not tabulated and
/// only an approximate conversion is possible.
pub fn lengths_for(year: u16) -> Option<&'static MonthLengths> {
    MONTH_DAYS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, lengths)| lengths)
}

/// Total days in a tabulated year.
pub fn year_length(year: u16) -> Option<u16> {
    lengths_for(year).map(|lengths| lengths.iter().map(|&d| u16::from(d)).sum())
}

/// Every tabulated year, ascending.
pub fn tabulated_years() -> impl Iterator<Item = u16> {
    MONTH_DAYS.iter().map(|(y, _)| *y)
}

/// A known BS/AD correspondence used as day zero for offset arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAnchor {
    pub bs: BsDate,
    pub ad: NaiveDate,
}

/// 1 Baisakh 2080 is 14 April 2023.
pub static ANCHOR: LazyLock<CalendarAnchor> = LazyLock::new(|| CalendarAnchor {
    bs: BsDate::from_ymd(2080, 1, 1).expect("anchor BS date is valid"),
    ad: NaiveDate::from_ymd_opt(2023, 4, 14).expect("anchor AD date is valid"),
});
