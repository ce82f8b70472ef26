//! Birthday board.
//!
//! Birthdays recur every year, so they are classified on their projection
//! onto the current year rather than on the stored birth date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, MonthBucket};
use crate::time::{Dated, parse_calendar_date, project_onto_year};

/// A birthday as read from the store, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayEntry {
    /// Namespaced identifier (`birthday-<id>`).
    pub id: String,
    /// Person's display name.
    pub name: String,
    /// Raw birth date as stored; may be malformed.
    pub birth_date: String,
    /// Class or group the person belongs to, if recorded.
    pub class_name: Option<String>,
}

impl BirthdayEntry {
    /// Creates a new entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, birth_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date: birth_date.into(),
            class_name: None,
        }
    }

    /// Builder method to set the class name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

impl Dated for BirthdayEntry {
    fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.birth_date)
    }
}

/// A classified birthday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayView {
    pub id: String,
    pub name: String,
    pub class_name: Option<String>,
    pub birth_date: NaiveDate,
    /// The birthday in the current year.
    pub this_year: NaiveDate,
    /// Current age as of `now`.
    pub age: i32,
    /// Age reached on this year's birthday.
    pub turning: i32,
    pub is_today: bool,
    pub is_this_week: bool,
    pub is_this_month: bool,
}

impl BirthdayView {
    /// Classifies an entry; returns `None` if its birth date is malformed.
    pub fn from_entry(entry: &BirthdayEntry, classifier: &Classifier) -> Option<Self> {
        let birth_date = entry.calendar_date()?;
        let this_year = project_onto_year(birth_date, classifier.today().year())?;

        Some(Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            class_name: entry.class_name.clone(),
            birth_date,
            this_year,
            age: classifier.age_from_birth_date(birth_date),
            turning: this_year.year() - birth_date.year(),
            is_today: classifier.is_today(this_year),
            is_this_week: classifier.is_this_week(birth_date),
            is_this_month: classifier.is_this_month(birth_date),
        })
    }
}

impl Dated for BirthdayView {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.birth_date)
    }
}

/// The birthday views shown on the dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayBoard {
    /// Birthdays falling today.
    pub today: Vec<BirthdayView>,
    /// Birthdays in the next seven days, soonest first.
    pub this_week: Vec<BirthdayView>,
    /// Birthdays this month, in day order.
    pub this_month: Vec<BirthdayView>,
    /// All valid birthdays by month, starting with next month.
    pub by_month: Vec<MonthBucket<BirthdayView>>,
    /// Every entry read from the store, valid or not.
    pub total: usize,
    /// Entries whose birth date could not be parsed.
    pub unscheduled: usize,
}

impl BirthdayBoard {
    /// Classifies `entries` as seen from the classifier's `now`.
    pub fn build(entries: &[BirthdayEntry], classifier: &Classifier) -> Self {
        let views: Vec<BirthdayView> = entries
            .iter()
            .filter_map(|e| BirthdayView::from_entry(e, classifier))
            .collect();

        let mut this_week: Vec<_> = views.iter().filter(|v| v.is_this_week).cloned().collect();
        this_week.sort_by_key(|v| v.this_year);

        let mut this_month: Vec<_> = views.iter().filter(|v| v.is_this_month).cloned().collect();
        this_month.sort_by_key(|v| v.this_year);

        Self {
            today: views.iter().filter(|v| v.is_today).cloned().collect(),
            this_week,
            this_month,
            by_month: classifier.group_by_month(&views),
            total: entries.len(),
            unscheduled: entries.len() - views.len(),
        }
    }

    /// Returns true if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.by_month.is_empty()
    }
}
