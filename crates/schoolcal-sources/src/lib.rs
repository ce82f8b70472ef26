//! Data stores and source-row normalization.
//!
//! This crate is the boundary between the school records database and the
//! calendar:
//!
//! - [`DataStore`] - The trait every backing store implements
//! - [`SourceKind`] / [`SourceRecord`] - The origin tables and their typed rows
//! - [`normalize_row`] - Per-table mapping of a row onto a [`CalendarEvent`]
//! - [`SourceError`] / [`MalformedRecord`] - Table-level and row-level failures
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  MemoryStore    │    │  JsonDirStore   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │      DataStore       │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │  raw rows   │
//!              └──────┬──────┘
//!                     │
//!                     ▼ normalize_rows()
//!              ┌──────────────────┐
//!              │  CalendarEvent   │
//!              └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use schoolcal_sources::{DataStore, FetchRequest, SourceKind, normalize_rows};
//!
//! async fn assignments(store: &dyn DataStore) -> Vec<CalendarEvent> {
//!     let rows = store.fetch_all(FetchRequest::for_kind(SourceKind::Assignment)).await?;
//!     normalize_rows(SourceKind::Assignment, &rows).events
//! }
//! ```
//!
//! [`CalendarEvent`]: schoolcal_core::CalendarEvent

pub mod error;
pub mod json_dir;
pub mod normalize;
pub mod rows;
pub mod store;

// Re-export main types at crate root
pub use error::{MalformedRecord, SourceError, SourceErrorCode, SourceResult};
pub use json_dir::JsonDirStore;
pub use normalize::{Normalized, normalize_birthday, normalize_birthdays, normalize_row, normalize_rows};
pub use rows::{
    AssignmentRow, BirthdayRow, DeadlineRow, EventRow, ExamRow, RecordRow, RowId, SeminarRow,
    SourceKind, SourceRecord,
};
pub use store::{BoxFuture, DataStore, ErrorStore, FetchRequest, MemoryStore, order_rows};
