//! Output formatting for calendar pages.
//!
//! This module renders an aggregated timeline and the birthday board in two
//! shapes:
//! - **Text**: a day-by-day listing for terminals
//! - **JSON**: a machine-readable document for the presentation layer
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schoolcal_core::{CalendarEvent, Classifier, EventKind, OutputFormatter};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
//! let events = vec![CalendarEvent::new("exam-1", "Algebra", day, EventKind::Test)];
//! let formatter = OutputFormatter::with_defaults();
//! let text = formatter.format_text(&events, true, &Classifier::at_date(day));
//! assert!(text.contains("Algebra"));
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::birthday::{BirthdayBoard, BirthdayView};
use crate::classify::{CalendarViews, Classifier, DueStatus};
use crate::event::{CalendarEvent, ColorTag, EventKind};

#[cfg(test)]
mod golden_tests;

/// Shown instead of an empty calendar when the backing tables do not exist.
pub const NOT_PROVISIONED_TEXT: &str =
    "The calendar is not set up yet: none of the school record tables exist.";

/// The output format for calendar display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// `strftime` pattern for day headings.
    pub date_format: String,
    /// Text to show when there are no events.
    pub no_events_text: String,
    /// Maximum length for titles (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Whether to append the days-remaining text to due items.
    pub show_due_status: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            date_format: "%a %d %b %Y".to_string(),
            no_events_text: "No events".to_string(),
            max_title_length: None,
            show_due_status: true,
        }
    }
}

/// JSON output document for a calendar page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Whether the backing tables exist.
    pub provisioned: bool,
    /// Number of events returned.
    pub count: usize,
    /// Events in timeline order.
    pub events: Vec<JsonEvent>,
    /// Size of each date-bucketed view.
    pub views: JsonViewCounts,
}

/// A single calendar event in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEvent {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub kind: EventKind,
    pub color_tag: ColorTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Days remaining and tier, for due items only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DueStatus>,
}

/// View sizes in JSON format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonViewCounts {
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    pub upcoming: usize,
    pub overdue: usize,
    pub total: usize,
}

impl<T> From<&CalendarViews<T>> for JsonViewCounts {
    fn from(views: &CalendarViews<T>) -> Self {
        Self {
            today: views.today.len(),
            this_week: views.this_week.len(),
            this_month: views.this_month.len(),
            upcoming: views.upcoming.len(),
            overdue: views.overdue.len(),
            total: views.total,
        }
    }
}

/// Output formatter for calendar pages.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Creates a new OutputFormatter with default options.
    pub fn with_defaults() -> Self {
        Self::new(FormatOptions::default())
    }

    /// Returns the formatter options.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Formats a timeline as a day-by-day listing.
    ///
    /// `events` must already be in timeline order; a heading is printed each
    /// time the date changes.
    pub fn format_text(
        &self,
        events: &[CalendarEvent],
        provisioned: bool,
        classifier: &Classifier,
    ) -> String {
        if !provisioned {
            return NOT_PROVISIONED_TEXT.to_string();
        }
        if events.is_empty() {
            return self.options.no_events_text.clone();
        }

        let mut out = String::new();
        let mut current = None;
        for event in events {
            if current != Some(event.date) {
                current = Some(event.date);
                let _ = writeln!(out, "{}", event.date.format(&self.options.date_format));
            }
            let _ = writeln!(out, "  {}", self.format_event_line(event, classifier));
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Formats a timeline as a JSON document, classifying `events` for the
    /// view counts.
    pub fn format_json(
        &self,
        events: &[CalendarEvent],
        provisioned: bool,
        classifier: &Classifier,
    ) -> JsonOutput {
        self.format_json_with_views(events, provisioned, &classifier.classify(events), classifier)
    }

    /// Formats a timeline as a JSON document with views built by the caller.
    ///
    /// Use this when the views were trimmed after classification, as a
    /// calendar page does with its upcoming limit.
    pub fn format_json_with_views<T>(
        &self,
        events: &[CalendarEvent],
        provisioned: bool,
        views: &CalendarViews<T>,
        classifier: &Classifier,
    ) -> JsonOutput {
        let events: Vec<JsonEvent> = events
            .iter()
            .map(|e| self.to_json_event(e, classifier))
            .collect();

        JsonOutput {
            provisioned,
            count: events.len(),
            events,
            views: JsonViewCounts::from(views),
        }
    }

    /// Formats the birthday board.
    pub fn format_birthdays(&self, board: &BirthdayBoard) -> String {
        if board.is_empty() {
            return "No birthdays".to_string();
        }

        let mut out = String::new();
        if !board.today.is_empty() {
            let names: Vec<_> = board.today.iter().map(|b| self.birthday_label(b)).collect();
            let _ = writeln!(out, "Today: {}", names.join(", "));
        }
        if !board.this_week.is_empty() {
            let _ = writeln!(out, "This week:");
            for b in &board.this_week {
                let _ = writeln!(
                    out,
                    "  {}  {}",
                    b.this_year.format("%a %d %b"),
                    self.birthday_label(b)
                );
            }
        }
        for bucket in &board.by_month {
            let _ = writeln!(out, "{}:", bucket.name());
            for b in &bucket.items {
                let _ = writeln!(out, "  {}  {}", b.this_year.format("%d %b"), self.birthday_label(b));
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn format_event_line(&self, event: &CalendarEvent, classifier: &Classifier) -> String {
        let title = self.truncate_title(&event.title);
        let mut line = format!("[{}] {}", event.kind, title);
        if self.options.show_due_status && event.kind.is_due_item() {
            let _ = write!(line, " ({})", classifier.due_status(event.date));
        }
        line
    }

    fn to_json_event(&self, event: &CalendarEvent, classifier: &Classifier) -> JsonEvent {
        JsonEvent {
            id: event.id.clone(),
            title: self.truncate_title(&event.title).into_owned(),
            date: event.date_key(),
            kind: event.kind,
            color_tag: event.color_tag,
            description: event.description.clone(),
            status: event.status.clone(),
            priority: event.priority.clone(),
            due: event
                .kind
                .is_due_item()
                .then(|| classifier.due_status(event.date)),
        }
    }

    fn birthday_label(&self, birthday: &BirthdayView) -> String {
        let name = self.truncate_title(&birthday.name);
        match birthday.class_name {
            Some(ref class) => format!("{} ({}), turning {}", name, class, birthday.turning),
            None => format!("{}, turning {}", name, birthday.turning),
        }
    }

    fn truncate_title<'a>(&self, title: &'a str) -> Cow<'a, str> {
        match self.options.max_title_length {
            Some(max) => ellipsis(title, max),
            None => Cow::Borrowed(title),
        }
    }
}

/// Truncates a string with ellipsis if it exceeds the given length.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod ellipsis_tests {
        use super::*;

        #[test]
        fn short_string_unchanged() {
            assert_eq!(ellipsis("hello", 10), "hello");
        }

        #[test]
        fn exact_length_unchanged() {
            assert_eq!(ellipsis("hello", 5), "hello");
        }

        #[test]
        fn long_string_truncated() {
            assert_eq!(ellipsis("hello world", 8), "hello...");
        }

        #[test]
        fn zero_length() {
            assert_eq!(ellipsis("hello", 0), "");
        }
    }

    mod json {
        use super::*;

        #[test]
        fn due_status_only_on_due_items() {
            let events = vec![
                CalendarEvent::new("event-1", "Assembly", date(2024, 3, 12), EventKind::Event),
                CalendarEvent::new("assignment-1", "Essay", date(2024, 3, 20), EventKind::Assignment),
            ];
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let output = OutputFormatter::with_defaults().format_json(&events, true, &classifier);

            assert!(output.provisioned);
            assert_eq!(output.count, 2);
            assert!(output.events[0].due.is_none());
            assert_eq!(output.events[1].due.unwrap().days_remaining, 10);
            assert_eq!(output.views.upcoming, 2);
            assert_eq!(output.views.this_week, 1);
        }

        #[test]
        fn skips_empty_optional_fields() {
            let events = vec![CalendarEvent::new(
                "event-1",
                "Assembly",
                date(2024, 3, 12),
                EventKind::Event,
            )];
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let output = OutputFormatter::with_defaults().format_json(&events, true, &classifier);
            let value = serde_json::to_value(&output).unwrap();

            let event = &value["events"][0];
            assert_eq!(event["date"], "2024-03-12");
            assert!(event.get("description").is_none());
            assert!(event.get("due").is_none());
        }

        #[test]
        fn caller_views_are_kept() {
            let events = vec![
                CalendarEvent::new("event-1", "Assembly", date(2024, 3, 12), EventKind::Event),
                CalendarEvent::new("event-2", "Concert", date(2024, 3, 22), EventKind::Event),
            ];
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let mut views = classifier.classify(&events);
            views.upcoming.truncate(1);

            let output = OutputFormatter::with_defaults()
                .format_json_with_views(&events, true, &views, &classifier);
            assert_eq!(output.count, 2);
            assert_eq!(output.views.upcoming, 1);
            assert_eq!(output.views.total, 2);
        }
    }

    mod text {
        use super::*;

        #[test]
        fn not_provisioned_message() {
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let text = OutputFormatter::with_defaults().format_text(&[], false, &classifier);
            assert_eq!(text, NOT_PROVISIONED_TEXT);
        }

        #[test]
        fn empty_calendar() {
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let formatter = OutputFormatter::new(FormatOptions {
                no_events_text: "Nothing scheduled".to_string(),
                ..FormatOptions::default()
            });
            assert_eq!(formatter.format_text(&[], true, &classifier), "Nothing scheduled");
        }

        #[test]
        fn truncates_titles() {
            let classifier = Classifier::at_date(date(2024, 3, 10));
            let formatter = OutputFormatter::new(FormatOptions {
                max_title_length: Some(8),
                show_due_status: false,
                ..FormatOptions::default()
            });
            let events = vec![CalendarEvent::new(
                "event-1",
                "Annual Sports Day",
                date(2024, 3, 12),
                EventKind::Event,
            )];
            let text = formatter.format_text(&events, true, &classifier);
            assert!(text.ends_with("[event] Annua..."));
        }
    }
}
