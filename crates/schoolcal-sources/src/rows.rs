//! Source tables and their row shapes.
//!
//! Each origin table has its own schema; nothing about them is polymorphic
//! in storage. [`SourceKind`] names a table together with the columns the
//! calendar reads from it, and [`SourceRecord`] is the closed set of typed
//! rows, one variant per table.
//!
//! Rows arrive from the store as JSON objects and are decoded here. Unknown
//! columns are ignored; every column the calendar reads is optional at the
//! decoding stage so that a missing value is reported as a
//! [`MalformedRecord`] naming the column rather than a generic shape error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use schoolcal_core::EventKind;

use crate::error::MalformedRecord;

/// An origin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Event,
    Exam,
    Assignment,
    Seminar,
    Record,
    Deadline,
    Birthday,
}

impl SourceKind {
    /// The calendar sources, in merge order.
    pub const CALENDAR: [SourceKind; 6] = [
        Self::Event,
        Self::Exam,
        Self::Assignment,
        Self::Seminar,
        Self::Record,
        Self::Deadline,
    ];

    /// Returns the table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Exam => "exams",
            Self::Assignment => "assignments",
            Self::Seminar => "seminars",
            Self::Record => "records",
            Self::Deadline => "deadlines",
            Self::Birthday => "birthdays",
        }
    }

    /// Returns the prefix that namespaces row ids on the calendar.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Event => "event-",
            Self::Exam => "exam-",
            Self::Assignment => "assignment-",
            Self::Seminar => "seminar-",
            Self::Record => "record-",
            Self::Deadline => "deadline-",
            Self::Birthday => "birthday-",
        }
    }

    /// Returns the column the store orders this table by.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Event => "event_date",
            Self::Exam => "created_at",
            Self::Assignment => "due_date",
            Self::Seminar => "seminar_date",
            Self::Record => "record_date",
            Self::Deadline => "deadline_date",
            Self::Birthday => "birth_date",
        }
    }

    /// Returns the calendar kind rows of this table map to.
    ///
    /// Birthdays are not calendar entries; they feed the birthday board.
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Self::Event => Some(EventKind::Event),
            Self::Exam => Some(EventKind::Test),
            Self::Assignment => Some(EventKind::Assignment),
            Self::Seminar => Some(EventKind::Seminar),
            Self::Record | Self::Deadline => Some(EventKind::Deadline),
            Self::Birthday => None,
        }
    }

    /// Looks a source up by table name.
    pub fn from_table(table: &str) -> Option<Self> {
        Self::CALENDAR
            .into_iter()
            .chain([Self::Birthday])
            .find(|k| k.table() == table)
    }

    /// Namespaces a row id for the calendar.
    pub fn calendar_id(&self, row_id: &RowId) -> String {
        format!("{}{}", self.id_prefix(), row_id)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A row identifier: a UUID string or, in older tables, an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: RowId,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A row of the `exams` table. Exams have no date column of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRow {
    pub id: RowId,
    #[serde(default)]
    pub exam_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A row of the `assignments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub id: RowId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A row of the `seminars` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeminarRow {
    pub id: RowId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub seminar_date: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
}

/// A row of the `records` table (per-subject record submissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: RowId,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub record_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A row of the `deadlines` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRow {
    pub id: RowId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// A row of the `birthdays` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRow {
    pub id: RowId,
    #[serde(default, alias = "student_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default, alias = "class")]
    pub class_name: Option<String>,
}

/// A typed row from one of the origin tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Event(EventRow),
    Exam(ExamRow),
    Assignment(AssignmentRow),
    Seminar(SeminarRow),
    Record(RecordRow),
    Deadline(DeadlineRow),
    Birthday(BirthdayRow),
}

impl SourceRecord {
    /// Decodes a raw row fetched from `kind`'s table.
    pub fn from_row(kind: SourceKind, row: &Value) -> Result<Self, MalformedRecord> {
        let shape = |e: serde_json::Error| MalformedRecord::Shape {
            kind,
            message: e.to_string(),
        };

        Ok(match kind {
            SourceKind::Event => Self::Event(EventRow::deserialize(row).map_err(shape)?),
            SourceKind::Exam => Self::Exam(ExamRow::deserialize(row).map_err(shape)?),
            SourceKind::Assignment => {
                Self::Assignment(AssignmentRow::deserialize(row).map_err(shape)?)
            }
            SourceKind::Seminar => Self::Seminar(SeminarRow::deserialize(row).map_err(shape)?),
            SourceKind::Record => Self::Record(RecordRow::deserialize(row).map_err(shape)?),
            SourceKind::Deadline => Self::Deadline(DeadlineRow::deserialize(row).map_err(shape)?),
            SourceKind::Birthday => Self::Birthday(BirthdayRow::deserialize(row).map_err(shape)?),
        })
    }

    /// Returns the table this row came from.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Event(_) => SourceKind::Event,
            Self::Exam(_) => SourceKind::Exam,
            Self::Assignment(_) => SourceKind::Assignment,
            Self::Seminar(_) => SourceKind::Seminar,
            Self::Record(_) => SourceKind::Record,
            Self::Deadline(_) => SourceKind::Deadline,
            Self::Birthday(_) => SourceKind::Birthday,
        }
    }

    /// Returns the row id.
    pub fn id(&self) -> &RowId {
        match self {
            Self::Event(r) => &r.id,
            Self::Exam(r) => &r.id,
            Self::Assignment(r) => &r.id,
            Self::Seminar(r) => &r.id,
            Self::Record(r) => &r.id,
            Self::Deadline(r) => &r.id,
            Self::Birthday(r) => &r.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod source_kind {
        use super::*;

        #[test]
        fn calendar_order() {
            let tables: Vec<_> = SourceKind::CALENDAR.iter().map(|k| k.table()).collect();
            assert_eq!(
                tables,
                ["events", "exams", "assignments", "seminars", "records", "deadlines"]
            );
        }

        #[test]
        fn event_kinds() {
            assert_eq!(SourceKind::Exam.event_kind(), Some(EventKind::Test));
            assert_eq!(SourceKind::Record.event_kind(), Some(EventKind::Deadline));
            assert_eq!(SourceKind::Deadline.event_kind(), Some(EventKind::Deadline));
            assert_eq!(SourceKind::Birthday.event_kind(), None);
        }

        #[test]
        fn prefixes_are_distinct() {
            let prefixes: std::collections::HashSet<_> =
                SourceKind::CALENDAR.iter().map(|k| k.id_prefix()).collect();
            assert_eq!(prefixes.len(), SourceKind::CALENDAR.len());
        }

        #[test]
        fn from_table() {
            assert_eq!(SourceKind::from_table("seminars"), Some(SourceKind::Seminar));
            assert_eq!(SourceKind::from_table("birthdays"), Some(SourceKind::Birthday));
            assert_eq!(SourceKind::from_table("syllabus"), None);
        }

        #[test]
        fn calendar_id() {
            let id = RowId::Text("3f2a".to_string());
            assert_eq!(SourceKind::Event.calendar_id(&id), "event-3f2a");
            assert_eq!(SourceKind::Record.calendar_id(&RowId::Number(12)), "record-12");
        }
    }

    mod decoding {
        use super::*;

        #[test]
        fn decodes_event_row() {
            let row = json!({
                "id": "a1",
                "event_name": "Sports Day",
                "event_date": "2024-05-01",
                "created_at": "2024-01-01T00:00:00Z",
                "venue": "Field"
            });
            let record = SourceRecord::from_row(SourceKind::Event, &row).unwrap();
            assert_eq!(record.kind(), SourceKind::Event);
            assert_eq!(record.id(), &RowId::Text("a1".to_string()));
            match record {
                SourceRecord::Event(r) => {
                    assert_eq!(r.event_name.as_deref(), Some("Sports Day"));
                    assert!(r.description.is_none());
                }
                other => panic!("unexpected record: {:?}", other),
            }
        }

        #[test]
        fn integer_ids() {
            let row = json!({ "id": 42, "subject": "Physics", "record_date": "2024-02-01" });
            let record = SourceRecord::from_row(SourceKind::Record, &row).unwrap();
            assert_eq!(record.id().to_string(), "42");
        }

        #[test]
        fn birthday_column_aliases() {
            let row = json!({ "id": "b1", "student_name": "Asha", "birth_date": "2010-12-30", "class": "8B" });
            match SourceRecord::from_row(SourceKind::Birthday, &row).unwrap() {
                SourceRecord::Birthday(r) => {
                    assert_eq!(r.name.as_deref(), Some("Asha"));
                    assert_eq!(r.class_name.as_deref(), Some("8B"));
                }
                other => panic!("unexpected record: {:?}", other),
            }
        }

        #[test]
        fn missing_id_is_a_shape_error() {
            let row = json!({ "title": "Essay", "due_date": "2024-04-20" });
            let err = SourceRecord::from_row(SourceKind::Assignment, &row).unwrap_err();
            assert!(matches!(err, MalformedRecord::Shape { kind: SourceKind::Assignment, .. }));
        }

        #[test]
        fn non_object_is_a_shape_error() {
            let err = SourceRecord::from_row(SourceKind::Seminar, &json!("row")).unwrap_err();
            assert_eq!(err.kind(), SourceKind::Seminar);
        }

        #[test]
        fn null_columns_decode_as_none() {
            let row = json!({ "id": "d1", "title": null, "deadline_date": null });
            match SourceRecord::from_row(SourceKind::Deadline, &row).unwrap() {
                SourceRecord::Deadline(r) => {
                    assert!(r.title.is_none());
                    assert!(r.deadline_date.is_none());
                }
                other => panic!("unexpected record: {:?}", other),
            }
        }
    }
}
