//! Core types: calendar events, dates, temporal classification, formatting

pub mod birthday;
pub mod classify;
pub mod event;
pub mod format;
pub mod time;
pub mod tracing;

pub use birthday::{BirthdayBoard, BirthdayEntry, BirthdayView};
pub use classify::{
    CalendarViews, Classifier, DueStatus, DueTier, MonthBucket, age_from_birth_date,
    days_remaining, events_on_date, is_this_month, is_this_week, is_today,
};
pub use event::{CalendarEvent, ColorTag, EventKind};
pub use format::{
    FormatOptions, JsonEvent, JsonOutput, JsonViewCounts, NOT_PROVISIONED_TEXT, OutputFormat,
    OutputFormatter, ellipsis,
};
pub use time::{
    CALENDAR_DATE_FORMAT, DateRange, Dated, normalize_date_key, parse_calendar_date,
    project_onto_year,
};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
