//! Golden tests for output formatting.
//!
//! These tests use insta inline snapshots to keep the rendered layout stable.
//! Run `cargo insta review` after intentional changes.

use chrono::NaiveDate;

use crate::birthday::{BirthdayBoard, BirthdayEntry};
use crate::classify::Classifier;
use crate::event::{CalendarEvent, EventKind};
use crate::format::{FormatOptions, OutputFormatter};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn timeline() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new("exam-9", "Algebra Midterm", date(2024, 4, 15), EventKind::Test)
            .with_description("scheduled"),
        CalendarEvent::new("record-3", "Physics Record", date(2024, 4, 15), EventKind::Deadline),
        CalendarEvent::new("assignment-2", "Essay", date(2024, 4, 20), EventKind::Assignment),
        CalendarEvent::new("seminar-4", "Careers Talk", date(2024, 4, 22), EventKind::Seminar)
            .with_description("Speaker: TBA"),
        CalendarEvent::new("event-1", "Sports Day", date(2024, 5, 1), EventKind::Event),
    ]
}

#[test]
fn text_timeline() {
    let classifier = Classifier::at_date(date(2024, 4, 15));
    let output = OutputFormatter::with_defaults().format_text(&timeline(), true, &classifier);

    insta::assert_snapshot!(output, @r"
Mon 15 Apr 2024
  [test] Algebra Midterm (24 hours left)
  [deadline] Physics Record (24 hours left)
Sat 20 Apr 2024
  [assignment] Essay (5 days left)
Mon 22 Apr 2024
  [seminar] Careers Talk
Wed 01 May 2024
  [event] Sports Day
");
}

#[test]
fn text_timeline_with_overdue_items() {
    let classifier = Classifier::at_date(date(2024, 4, 21));
    let formatter = OutputFormatter::new(FormatOptions {
        date_format: "%Y-%m-%d".to_string(),
        ..FormatOptions::default()
    });
    let output = formatter.format_text(&timeline()[2..], true, &classifier);

    insta::assert_snapshot!(output, @r"
2024-04-20
  [assignment] Essay (Overdue)
2024-04-22
  [seminar] Careers Talk
2024-05-01
  [event] Sports Day
");
}

#[test]
fn birthday_board() {
    let entries = vec![
        BirthdayEntry::new("birthday-1", "Asha", "2010-12-30").with_class_name("8B"),
        BirthdayEntry::new("birthday-2", "Ben", "2011-01-02"),
        BirthdayEntry::new("birthday-3", "Chen", "2010-12-28"),
    ];
    let board = BirthdayBoard::build(&entries, &Classifier::at_date(date(2024, 12, 28)));
    let output = OutputFormatter::with_defaults().format_birthdays(&board);

    insta::assert_snapshot!(output, @r"
Today: Chen, turning 14
This week:
  Sat 28 Dec  Chen, turning 14
  Mon 30 Dec  Asha (8B), turning 14
January:
  02 Jan  Ben, turning 13
December:
  30 Dec  Asha (8B), turning 14
  28 Dec  Chen, turning 14
");
}

#[test]
fn json_document() {
    let classifier = Classifier::at_date(date(2024, 4, 15));
    let output = OutputFormatter::with_defaults().format_json(&timeline()[..3], true, &classifier);

    insta::assert_json_snapshot!(output, @r#"
{
  "provisioned": true,
  "count": 3,
  "events": [
    {
      "id": "exam-9",
      "title": "Algebra Midterm",
      "date": "2024-04-15",
      "kind": "test",
      "color_tag": "red",
      "description": "scheduled",
      "due": {
        "days_remaining": 0,
        "tier": {
          "tier": "due_today",
          "hours_left": 24
        }
      }
    },
    {
      "id": "record-3",
      "title": "Physics Record",
      "date": "2024-04-15",
      "kind": "deadline",
      "color_tag": "orange",
      "due": {
        "days_remaining": 0,
        "tier": {
          "tier": "due_today",
          "hours_left": 24
        }
      }
    },
    {
      "id": "assignment-2",
      "title": "Essay",
      "date": "2024-04-20",
      "kind": "assignment",
      "color_tag": "green",
      "due": {
        "days_remaining": 5,
        "tier": {
          "tier": "approaching"
        }
      }
    }
  ],
  "views": {
    "today": 2,
    "this_week": 3,
    "this_month": 3,
    "upcoming": 1,
    "overdue": 0,
    "total": 3
  }
}
"#);
}
