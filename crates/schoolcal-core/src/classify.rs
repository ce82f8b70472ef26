//! Temporal classification of calendar items relative to "now".
//!
//! Everything here is a pure function of its inputs and an explicit `now`;
//! nothing reads the wall clock. [`Classifier`] bundles `now` with the
//! per-item predicates and the bucketing operations:
//!
//! - [`Classifier::classify`] splits items into today / this week / this
//!   month / upcoming / overdue views
//! - [`Classifier::group_by_month`] buckets items by calendar month, starting
//!   with next month
//! - [`Classifier::due_status`] computes days remaining and the [`DueTier`]
//!
//! "This week" and "this month" are recurrence checks: the item's month/day
//! is projected onto the current year (see [`is_this_week`]). This is what the
//! birthday views need; for one-off dated entries it is an approximation that
//! ignores the year.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::time::{DateRange, Dated, parse_calendar_date, project_onto_year};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns true if `date` is `today`.
pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

/// Returns true if the month/day of `date`, projected onto `today`'s year,
/// lands in `[today, today + 7]`.
///
/// The projection never rolls into the next year: with `today = Dec 28`, a
/// Jan 2 anniversary projects to Jan 2 of the current year and is not
/// "this week".
pub fn is_this_week(date: NaiveDate, today: NaiveDate) -> bool {
    project_onto_year(date, today.year())
        .is_some_and(|projected| DateRange::week_ahead(today).contains(projected))
}

/// Returns true if `date` falls in the same month as `today`, any year.
pub fn is_this_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.month() == today.month()
}

/// Whole years between `birth_date` and `today`.
pub fn age_from_birth_date(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Day count from `today` to `target`; negative once the target has passed.
pub fn days_remaining(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Returns the events whose date matches `date` after normalizing it to
/// `YYYY-MM-DD`. A malformed `date` matches nothing.
pub fn events_on_date<'a>(events: &'a [CalendarEvent], date: &str) -> Vec<&'a CalendarEvent> {
    match parse_calendar_date(date) {
        Some(day) => events.iter().filter(|e| e.is_on(day)).collect(),
        None => Vec::new(),
    }
}

/// Display band for an item with a due date.
///
/// Variants are ordered from most to least urgent; exactly one applies to a
/// given `(target, now)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tier")]
pub enum DueTier {
    /// The due date has passed.
    Overdue,
    /// Due today; `hours_left` counts down to the end of the day.
    DueToday { hours_left: i64 },
    /// Due in 1 to 3 days.
    Imminent,
    /// Due in 4 to 7 days.
    Approaching,
    /// Due in more than 7 days.
    Comfortable,
}

impl DueTier {
    /// Picks the tier for a target date as seen from `now`.
    pub fn for_date(target: NaiveDate, now: NaiveDateTime) -> Self {
        match days_remaining(target, now.date()) {
            d if d < 0 => Self::Overdue,
            0 => {
                let end_of_day = (target + Duration::days(1)).and_time(chrono::NaiveTime::MIN);
                // Partial hours round up so the last hour reads "1 hour left".
                let minutes_left = (end_of_day - now).num_minutes().max(0);
                Self::DueToday {
                    hours_left: (minutes_left + 59) / 60,
                }
            }
            1..=3 => Self::Imminent,
            4..=7 => Self::Approaching,
            _ => Self::Comfortable,
        }
    }

    /// Returns the CSS class name for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday { .. } => "due_today",
            Self::Imminent => "imminent",
            Self::Approaching => "approaching",
            Self::Comfortable => "comfortable",
        }
    }

    /// Returns the band label shown next to an item.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueToday { .. } => "Due today",
            Self::Imminent => "1-3 days",
            Self::Approaching => "4-7 days",
            Self::Comfortable => "More than 7 days",
        }
    }
}

/// Days remaining for a due item together with its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueStatus {
    /// `target - today` in days.
    pub days_remaining: i64,
    /// The display band.
    pub tier: DueTier,
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            DueTier::Overdue => f.write_str("Overdue"),
            DueTier::DueToday { hours_left: 1 } => f.write_str("1 hour left"),
            DueTier::DueToday { hours_left } => write!(f, "{} hours left", hours_left),
            _ if self.days_remaining == 1 => f.write_str("1 day left"),
            _ => write!(f, "{} days left", self.days_remaining),
        }
    }
}

/// Items of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket<T> {
    /// Zero-based month (0 = January).
    pub month: u32,
    /// Items in their original relative order.
    pub items: Vec<T>,
}

impl<T> MonthBucket<T> {
    /// Returns the English month name.
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month % 12) as usize]
    }
}

/// The date-bucketed views over a batch of items.
///
/// Views overlap (an item due today is also in `this_week` and
/// `this_month`). `total` counts every input item, `unscheduled` the ones
/// left out of every view because their date was missing or malformed.
///
/// `this_week` and `this_month` compare month and day only, ignoring the
/// year, so they suit recurring dates like birthdays. A one-off item from a
/// past year can land in them and in `overdue` at the same time.
/// `today`, `upcoming` and `overdue` compare full dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarViews<T> {
    pub today: Vec<T>,
    pub this_week: Vec<T>,
    pub this_month: Vec<T>,
    pub upcoming: Vec<T>,
    pub overdue: Vec<T>,
    pub total: usize,
    pub unscheduled: usize,
}

impl<T> Default for CalendarViews<T> {
    fn default() -> Self {
        Self {
            today: Vec::new(),
            this_week: Vec::new(),
            this_month: Vec::new(),
            upcoming: Vec::new(),
            overdue: Vec::new(),
            total: 0,
            unscheduled: 0,
        }
    }
}

/// Classifies items against a fixed point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    now: NaiveDateTime,
}

impl Classifier {
    /// Creates a classifier for the given local wall-clock time.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Creates a classifier for midnight at the start of `today`.
    pub fn at_date(today: NaiveDate) -> Self {
        Self::new(today.and_time(chrono::NaiveTime::MIN))
    }

    /// Returns the reference time.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Returns the reference calendar date.
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        is_today(date, self.today())
    }

    pub fn is_this_week(&self, date: NaiveDate) -> bool {
        is_this_week(date, self.today())
    }

    pub fn is_this_month(&self, date: NaiveDate) -> bool {
        is_this_month(date, self.today())
    }

    pub fn age_from_birth_date(&self, birth_date: NaiveDate) -> i32 {
        age_from_birth_date(birth_date, self.today())
    }

    pub fn days_remaining(&self, target: NaiveDate) -> i64 {
        days_remaining(target, self.today())
    }

    /// Computes days remaining and the display tier for a due date.
    pub fn due_status(&self, target: NaiveDate) -> DueStatus {
        DueStatus {
            days_remaining: self.days_remaining(target),
            tier: DueTier::for_date(target, self.now),
        }
    }

    /// Splits `items` into the date-bucketed views.
    pub fn classify<T: Dated + Clone>(&self, items: &[T]) -> CalendarViews<T> {
        let today = self.today();
        let mut views = CalendarViews {
            total: items.len(),
            ..CalendarViews::default()
        };

        for item in items {
            let Some(date) = item.calendar_date() else {
                views.unscheduled += 1;
                continue;
            };

            if self.is_today(date) {
                views.today.push(item.clone());
            }
            if self.is_this_week(date) {
                views.this_week.push(item.clone());
            }
            if self.is_this_month(date) {
                views.this_month.push(item.clone());
            }
            if date > today {
                views.upcoming.push(item.clone());
            } else if date < today {
                views.overdue.push(item.clone());
            }
        }

        views
    }

    /// Buckets `items` by calendar month.
    ///
    /// Buckets are ordered starting with the month after the current one and
    /// wrapping around, so the current month comes last. Empty months are
    /// omitted and items without a valid date are skipped.
    pub fn group_by_month<T: Dated + Clone>(&self, items: &[T]) -> Vec<MonthBucket<T>> {
        let mut months: Vec<Vec<T>> = vec![Vec::new(); 12];
        for item in items {
            if let Some(date) = item.calendar_date() {
                months[date.month0() as usize].push(item.clone());
            }
        }

        let current = self.today().month0();
        (1..=12)
            .map(|offset| (current + offset) % 12)
            .filter_map(|month| {
                let items = std::mem::take(&mut months[month as usize]);
                (!items.is_empty()).then_some(MonthBucket { month, items })
            })
            .collect()
    }
}
