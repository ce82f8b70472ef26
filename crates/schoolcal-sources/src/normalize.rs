//! Source row to [`CalendarEvent`] conversion.
//!
//! Every table has its own title and date columns; the mapping for each one
//! lives in [`SourceRecord::into_event`]. A row that lacks a usable title or
//! date after fallbacks is reported as a [`MalformedRecord`] and dropped by
//! [`normalize_rows`] without affecting the rest of the batch.

use serde_json::Value;
use tracing::warn;

use schoolcal_core::{BirthdayEntry, CalendarEvent, parse_calendar_date};

use crate::error::MalformedRecord;
use crate::rows::{SourceKind, SourceRecord};

/// Events produced from one table, plus the rows that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub events: Vec<CalendarEvent>,
    pub dropped: Vec<MalformedRecord>,
}

/// Converts a single raw row from `kind`'s table into a calendar event.
pub fn normalize_row(kind: SourceKind, row: &Value) -> Result<CalendarEvent, MalformedRecord> {
    SourceRecord::from_row(kind, row)?.into_event()
}

/// Converts every row of one table, in fetch order.
///
/// Malformed rows are logged and collected in [`Normalized::dropped`].
pub fn normalize_rows(kind: SourceKind, rows: &[Value]) -> Normalized {
    let mut out = Normalized::default();
    for row in rows {
        match normalize_row(kind, row) {
            Ok(event) => out.events.push(event),
            Err(e) => {
                warn!(source = %kind, error = %e, "dropping malformed row");
                out.dropped.push(e);
            }
        }
    }
    out
}

/// Converts a raw `birthdays` row into a board entry.
///
/// The birth date is kept as stored; an unparseable one is counted by the
/// board as unscheduled rather than rejected here.
pub fn normalize_birthday(row: &Value) -> Result<BirthdayEntry, MalformedRecord> {
    let kind = SourceKind::Birthday;
    let row = match SourceRecord::from_row(kind, row)? {
        SourceRecord::Birthday(row) => row,
        other => return Err(wrong_table(other.kind())),
    };
    let id = row.id.to_string();
    let name = required(kind, &id, "name", row.name.as_deref())?;
    let birth_date = required(kind, &id, "birth_date", row.birth_date.as_deref())?;

    let mut entry = BirthdayEntry::new(kind.calendar_id(&row.id), name, birth_date);
    if let Some(class_name) = non_blank(row.class_name.as_deref()) {
        entry = entry.with_class_name(class_name);
    }
    Ok(entry)
}

/// Converts every `birthdays` row, dropping malformed ones.
pub fn normalize_birthdays(rows: &[Value]) -> (Vec<BirthdayEntry>, Vec<MalformedRecord>) {
    let mut entries = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();
    for row in rows {
        match normalize_birthday(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(source = %SourceKind::Birthday, error = %e, "dropping malformed row");
                dropped.push(e);
            }
        }
    }
    (entries, dropped)
}

impl SourceRecord {
    /// Maps this row onto the calendar.
    ///
    /// Birthday rows are not calendar entries and are rejected as a shape
    /// error; use [`normalize_birthday`] for them.
    pub fn into_event(self) -> Result<CalendarEvent, MalformedRecord> {
        let kind = self.kind();
        let Some(event_kind) = kind.event_kind() else {
            return Err(wrong_table(kind));
        };
        let id = self.id().to_string();
        let calendar_id = kind.calendar_id(self.id());

        let event = match self {
            Self::Event(r) => {
                let title = required(kind, &id, "event_name", r.event_name.as_deref())?;
                let date = required_date(kind, &id, "event_date", r.event_date.as_deref())?;
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description_opt(non_blank(r.description.as_deref()))
                    .with_status_opt(non_blank(r.status.as_deref()))
            }
            // Exams carry no scheduled date; the creation date stands in.
            Self::Exam(r) => {
                let title = required(kind, &id, "exam_name", r.exam_name.as_deref())?;
                let date = required_date(kind, &id, "created_at", r.created_at.as_deref())?;
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description_opt(non_blank(r.status.as_deref()))
            }
            Self::Assignment(r) => {
                let title = required(kind, &id, "title", r.title.as_deref())?;
                let date = required_date(kind, &id, "due_date", r.due_date.as_deref())?;
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description_opt(non_blank(r.description.as_deref()))
                    .with_status_opt(non_blank(r.status.as_deref()))
            }
            Self::Seminar(r) => {
                let title = required(kind, &id, "title", r.title.as_deref())?;
                let date = required_date(kind, &id, "seminar_date", r.seminar_date.as_deref())?;
                let speaker = non_blank(r.speaker.as_deref()).unwrap_or("TBA");
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description(format!("Speaker: {}", speaker))
            }
            Self::Record(r) => {
                let date = required_date(kind, &id, "record_date", r.record_date.as_deref())?;
                let title = match non_blank(r.subject.as_deref()) {
                    Some(subject) => format!("{} Record", subject),
                    None => "Record".to_string(),
                };
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description_opt(non_blank(r.description.as_deref()))
            }
            Self::Deadline(r) => {
                let title = required(kind, &id, "title", r.title.as_deref())?;
                let date = required_date(kind, &id, "deadline_date", r.deadline_date.as_deref())?;
                CalendarEvent::new(calendar_id, title, date, event_kind)
                    .with_description_opt(non_blank(r.description.as_deref()))
                    .with_priority_opt(non_blank(r.priority.as_deref()))
            }
            Self::Birthday(_) => return Err(wrong_table(kind)),
        };
        Ok(event)
    }
}

fn wrong_table(kind: SourceKind) -> MalformedRecord {
    MalformedRecord::Shape {
        kind,
        message: "row does not belong on this page".to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(
    kind: SourceKind,
    id: &str,
    column: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, MalformedRecord> {
    non_blank(value).ok_or_else(|| MalformedRecord::MissingField {
        kind,
        id: id.to_string(),
        column,
    })
}

fn required_date(
    kind: SourceKind,
    id: &str,
    column: &'static str,
    value: Option<&str>,
) -> Result<chrono::NaiveDate, MalformedRecord> {
    let value = required(kind, id, column, value)?;
    parse_calendar_date(value).ok_or_else(|| MalformedRecord::InvalidDate {
        kind,
        id: id.to_string(),
        column,
        value: value.to_string(),
    })
}
