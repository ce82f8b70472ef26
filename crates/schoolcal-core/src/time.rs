//! Calendar date handling.
//!
//! Source tables store their dates in several shapes: plain `YYYY-MM-DD`
//! columns, full timestamps (`2024-04-15T08:30:00Z`) and, for older rows,
//! `2024-04-15 08:30:00`. Everything that ends up on the calendar is reduced
//! to a [`NaiveDate`] by taking the leading `YYYY-MM-DD` slice, with no
//! timezone conversion.
//!
//! [`DateRange`] is the inclusive day range used by the weekly views.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// `strftime` pattern for calendar dates.
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything that can be placed on a calendar day.
///
/// Returns `None` when the underlying date is missing or unparseable; such
/// items are left out of date-bucketed views.
pub trait Dated {
    /// Returns the calendar date of this item, if it has a valid one.
    fn calendar_date(&self) -> Option<NaiveDate>;
}

/// Parses the leading `YYYY-MM-DD` portion of a date or timestamp string.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, CALENDAR_DATE_FORMAT).ok()
}

/// Normalizes a date or timestamp string to `YYYY-MM-DD`.
pub fn normalize_date_key(value: &str) -> Option<String> {
    parse_calendar_date(value).map(|d| d.format(CALENDAR_DATE_FORMAT).to_string())
}

/// Projects the month/day of `date` onto `year`.
///
/// Feb 29 has no counterpart in a common year; it rolls over to Mar 1, the
/// same way a calendar widget normalizes day 29 of a 28-day February.
pub fn project_onto_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering both dates, whichever order they come in.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Creates the range `[start, start + days]`.
    pub fn from_days(start: NaiveDate, days: i64) -> Self {
        Self::new(start, start + Duration::days(days))
    }

    /// The seven-day lookahead window `[today, today + 7]`.
    pub fn week_ahead(today: NaiveDate) -> Self {
        Self::from_days(today, 7)
    }

    /// Checks if a date falls within this range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
