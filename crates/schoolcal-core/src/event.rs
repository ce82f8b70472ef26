//! Calendar event types.
//!
//! This module provides the normalized representation every school record is
//! mapped into before it reaches a calendar view:
//! - [`CalendarEvent`]: a source-agnostic, date-indexed entry
//! - [`EventKind`]: the closed set of kinds a calendar entry can have
//! - [`ColorTag`]: the fixed visual tag attached to each kind

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{CALENDAR_DATE_FORMAT, Dated};

/// The kind of a calendar entry.
///
/// Several origin tables can map onto the same kind (class records and
/// standalone deadlines both become [`EventKind::Deadline`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A school event (sports day, assembly, trip).
    Event,
    /// An exam or test.
    Test,
    /// A homework or assignment due date.
    Assignment,
    /// A seminar or guest lecture.
    Seminar,
    /// A record or deadline entry.
    Deadline,
}

impl EventKind {
    /// All kinds, in display order.
    pub const ALL: [EventKind; 5] = [
        Self::Event,
        Self::Test,
        Self::Assignment,
        Self::Seminar,
        Self::Deadline,
    ];

    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Test => "test",
            Self::Assignment => "assignment",
            Self::Seminar => "seminar",
            Self::Deadline => "deadline",
        }
    }

    /// Returns a human-readable name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Test => "Test",
            Self::Assignment => "Assignment",
            Self::Seminar => "Seminar",
            Self::Deadline => "Deadline",
        }
    }

    /// Returns the color tag used when rendering entries of this kind.
    pub fn color_tag(&self) -> ColorTag {
        match self {
            Self::Event => ColorTag::Blue,
            Self::Test => ColorTag::Red,
            Self::Assignment => ColorTag::Green,
            Self::Seminar => ColorTag::Purple,
            Self::Deadline => ColorTag::Orange,
        }
    }

    /// Returns true if entries of this kind carry a due date students work towards.
    pub fn is_due_item(&self) -> bool {
        matches!(self, Self::Assignment | Self::Deadline | Self::Test)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual tag attached to a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Blue,
    Red,
    Green,
    Purple,
    Orange,
}

impl ColorTag {
    /// Returns the CSS class name for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

/// A normalized calendar entry built from one source row.
///
/// Entries are built fresh for every aggregation pass and never mutated once
/// the pass hands them out. The `id` carries a per-source prefix so it stays
/// unique across the merged timeline even though row ids are only unique
/// within their own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Namespaced identifier (e.g. `event-<uuid>`).
    pub id: String,
    /// Display title, never empty.
    pub title: String,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// The kind of entry.
    pub kind: EventKind,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional status passed through from the source row.
    pub status: Option<String>,
    /// Optional priority passed through from the source row.
    pub priority: Option<String>,
    /// Visual tag, derived from `kind`.
    pub color_tag: ColorTag,
}

impl CalendarEvent {
    /// Creates a new CalendarEvent with required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        kind: EventKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date,
            kind,
            description: None,
            status: None,
            priority: None,
            color_tag: kind.color_tag(),
        }
    }

    /// Returns the date as a `YYYY-MM-DD` string.
    pub fn date_key(&self) -> String {
        self.date.format(CALENDAR_DATE_FORMAT).to_string()
    }

    /// Returns true if the entry falls on the given date.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Builder method to set an optional description.
    pub fn with_description_opt(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }

    /// Builder method to set an optional status.
    pub fn with_status_opt(mut self, status: Option<impl Into<String>>) -> Self {
        self.status = status.map(Into::into);
        self
    }

    /// Builder method to set an optional priority.
    pub fn with_priority_opt(mut self, priority: Option<impl Into<String>>) -> Self {
        self.priority = priority.map(Into::into);
        self
    }
}

impl Dated for CalendarEvent {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_kind {
        use super::*;

        #[test]
        fn color_tags_are_distinct() {
            let tags: std::collections::HashSet<_> =
                EventKind::ALL.iter().map(|k| k.color_tag()).collect();
            assert_eq!(tags.len(), EventKind::ALL.len());
        }

        #[test]
        fn color_tag_lookup() {
            assert_eq!(EventKind::Event.color_tag(), ColorTag::Blue);
            assert_eq!(EventKind::Test.color_tag(), ColorTag::Red);
            assert_eq!(EventKind::Deadline.color_tag().as_str(), "orange");
        }

        #[test]
        fn due_items() {
            assert!(EventKind::Assignment.is_due_item());
            assert!(EventKind::Deadline.is_due_item());
            assert!(!EventKind::Seminar.is_due_item());
        }

        #[test]
        fn serializes_snake_case() {
            let json = serde_json::to_string(&EventKind::Assignment).unwrap();
            assert_eq!(json, "\"assignment\"");
            assert_eq!(EventKind::Test.to_string(), "test");
        }
    }

    mod calendar_event {
        use super::*;

        #[test]
        fn basic_creation() {
            let event = CalendarEvent::new("event-1", "Sports Day", date(2024, 5, 1), EventKind::Event);
            assert_eq!(event.id, "event-1");
            assert_eq!(event.color_tag, ColorTag::Blue);
            assert!(event.description.is_none());
            assert_eq!(event.date_key(), "2024-05-01");
            assert!(event.is_on(date(2024, 5, 1)));
        }

        #[test]
        fn builder_pattern() {
            let event = CalendarEvent::new("deadline-7", "Fees", date(2024, 6, 1), EventKind::Deadline)
                .with_description("Term fees")
                .with_priority("high")
                .with_status_opt(None::<String>);

            assert_eq!(event.description.as_deref(), Some("Term fees"));
            assert_eq!(event.priority.as_deref(), Some("high"));
            assert!(event.status.is_none());
        }

        #[test]
        fn date_serializes_as_iso_day() {
            let event = CalendarEvent::new("exam-1", "Algebra", date(2024, 4, 15), EventKind::Test);
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["date"], "2024-04-15");
            assert_eq!(value["kind"], "test");
            assert_eq!(value["color_tag"], "red");
        }
    }
}
