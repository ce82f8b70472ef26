//! DataStore trait definition.
//!
//! A [`DataStore`] is the read side of the school records database: it
//! returns the raw rows of one table, ordered by that table's natural date
//! column. Stores know nothing about the calendar; mapping rows onto it is
//! the job of [`crate::normalize`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{SourceError, SourceErrorCode, SourceResult};
use crate::rows::SourceKind;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters for fetching one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The table to read.
    pub kind: SourceKind,
    /// Column to order rows by.
    pub order_by: &'static str,
    /// Whether to order newest first.
    pub descending: bool,
}

impl FetchRequest {
    /// Creates a request for `kind` ordered ascending by its natural date column.
    pub fn for_kind(kind: SourceKind) -> Self {
        Self {
            kind,
            order_by: kind.order_by(),
            descending: false,
        }
    }

    /// Builder method to reverse the order.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
}

/// The read interface every data store implements.
///
/// # Example
///
/// ```ignore
/// use schoolcal_sources::{BoxFuture, DataStore, FetchRequest, SourceResult};
/// use serde_json::Value;
///
/// struct PostgresStore { /* ... */ }
///
/// impl DataStore for PostgresStore {
///     fn name(&self) -> &str { "postgres" }
///
///     fn fetch_all(&self, request: FetchRequest) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
///         Box::pin(async move {
///             // SELECT * FROM {table} ORDER BY {order_by} NULLS LAST
///             todo!()
///         })
///     }
/// }
/// ```
pub trait DataStore: Send + Sync {
    /// Returns a short name for this store, used in logs.
    fn name(&self) -> &str;

    /// Returns every row of the requested table.
    ///
    /// A table that does not exist must fail with
    /// [`SourceErrorCode::NotProvisioned`], not return an empty list.
    fn fetch_all(&self, request: FetchRequest) -> BoxFuture<'_, SourceResult<Vec<Value>>>;
}

/// Sorts rows by `column`, keeping rows without a value for it at the end.
///
/// The sort is stable, so rows with equal keys keep their stored order.
pub fn order_rows(rows: &mut [Value], column: &str, descending: bool) {
    rows.sort_by(|a, b| match (sort_key(a, column), sort_key(b, column)) {
        (Some(a), Some(b)) => {
            let ord = compare_keys(a, b);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn sort_key<'a>(row: &'a Value, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

fn compare_keys(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Returns the current time formatted the way stores write `created_at`.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone)]
struct Failure {
    code: SourceErrorCode,
    message: String,
}

/// An in-memory store, for tests and demos.
///
/// Tables that were never added are reported as not provisioned.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<SourceKind, Vec<Value>>>,
    failures: HashMap<SourceKind, Failure>,
    delays: HashMap<SourceKind, Duration>,
}

impl MemoryStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with every table present and empty.
    pub fn provisioned() -> Self {
        SourceKind::CALENDAR
            .into_iter()
            .chain([SourceKind::Birthday])
            .fold(Self::new(), |store, kind| store.with_table(kind))
    }

    /// Builder method to create an empty table.
    pub fn with_table(mut self, kind: SourceKind) -> Self {
        self.tables.get_mut().entry(kind).or_default();
        self
    }

    /// Builder method to add rows to a table, creating it if needed.
    pub fn with_rows(mut self, kind: SourceKind, rows: impl IntoIterator<Item = Value>) -> Self {
        self.tables.get_mut().entry(kind).or_default().extend(rows);
        self
    }

    /// Builder method to make every fetch of `kind` fail.
    pub fn with_failure(
        mut self,
        kind: SourceKind,
        code: SourceErrorCode,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert(
            kind,
            Failure {
                code,
                message: message.into(),
            },
        );
        self
    }

    /// Builder method to delay every fetch of `kind`.
    pub fn with_delay(mut self, kind: SourceKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Inserts a row, assigning a fresh `id` and `created_at`.
    ///
    /// Returns the stored row.
    pub async fn insert(&self, kind: SourceKind, row: Value) -> SourceResult<Value> {
        let Value::Object(mut fields) = row else {
            return Err(SourceError::invalid_request("row must be a JSON object")
                .with_source_kind(kind));
        };
        fields.insert("id".to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
        fields.insert("created_at".to_string(), Value::String(timestamp_now()));
        let row = Value::Object(fields);

        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(&kind) else {
            return Err(not_provisioned(kind));
        };
        table.push(row.clone());
        debug!(source = %kind, rows = table.len(), "inserted row");
        Ok(row)
    }

    /// Returns the number of rows in a table, if it exists.
    pub async fn len(&self, kind: SourceKind) -> Option<usize> {
        self.tables.read().await.get(&kind).map(Vec::len)
    }
}

fn not_provisioned(kind: SourceKind) -> SourceError {
    SourceError::not_provisioned(format!("relation \"{}\" does not exist", kind.table()))
        .with_source_kind(kind)
}

impl DataStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_all(&self, request: FetchRequest) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
        Box::pin(async move {
            let kind = request.kind;
            if let Some(delay) = self.delays.get(&kind) {
                tokio::time::sleep(*delay).await;
            }
            if let Some(failure) = self.failures.get(&kind) {
                return Err(
                    SourceError::new(failure.code, failure.message.clone()).with_source_kind(kind)
                );
            }

            let mut rows = self
                .tables
                .read()
                .await
                .get(&kind)
                .cloned()
                .ok_or_else(|| not_provisioned(kind))?;
            order_rows(&mut rows, request.order_by, request.descending);
            Ok(rows)
        })
    }
}

/// A store that always fails with the same error.
#[derive(Debug, Clone)]
pub struct ErrorStore {
    code: SourceErrorCode,
    message: String,
}

impl ErrorStore {
    /// Creates a new error store.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A store whose database has none of the tables.
    pub fn unprovisioned() -> Self {
        Self::new(SourceErrorCode::NotProvisioned, "schema not found")
    }
}

impl DataStore for ErrorStore {
    fn name(&self) -> &str {
        "error"
    }

    fn fetch_all(&self, request: FetchRequest) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
        let error = SourceError::new(self.code, self.message.clone()).with_source_kind(request.kind);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(rows: &[Value]) -> Vec<String> {
        rows.iter().map(|r| r["id"].to_string()).collect()
    }

    mod ordering {
        use super::*;

        #[test]
        fn nulls_last() {
            let mut rows = vec![
                json!({ "id": 1, "due_date": null }),
                json!({ "id": 2, "due_date": "2024-04-20" }),
                json!({ "id": 3 }),
                json!({ "id": 4, "due_date": "2024-04-18" }),
            ];
            order_rows(&mut rows, "due_date", false);
            assert_eq!(ids(&rows), ["4", "2", "1", "3"]);
        }

        #[test]
        fn descending_keeps_nulls_last() {
            let mut rows = vec![
                json!({ "id": 1 }),
                json!({ "id": 2, "due_date": "2024-04-18" }),
                json!({ "id": 3, "due_date": "2024-04-20" }),
            ];
            order_rows(&mut rows, "due_date", true);
            assert_eq!(ids(&rows), ["3", "2", "1"]);
        }

        #[test]
        fn stable_for_equal_keys() {
            let mut rows = vec![
                json!({ "id": "b", "event_date": "2024-05-01" }),
                json!({ "id": "a", "event_date": "2024-05-01" }),
            ];
            order_rows(&mut rows, "event_date", false);
            assert_eq!(ids(&rows), ["\"b\"", "\"a\""]);
        }

        #[test]
        fn request_uses_natural_column() {
            let request = FetchRequest::for_kind(SourceKind::Exam);
            assert_eq!(request.order_by, "created_at");
            assert!(!request.descending);
            assert!(request.descending().descending);
        }
    }

    mod memory_store {
        use super::*;

        #[tokio::test]
        async fn missing_table_is_not_provisioned() {
            let store = MemoryStore::new();
            let err = store
                .fetch_all(FetchRequest::for_kind(SourceKind::Seminar))
                .await
                .unwrap_err();
            assert!(err.is_not_provisioned());
            assert_eq!(err.source_kind(), Some(SourceKind::Seminar));
        }

        #[tokio::test]
        async fn empty_table_is_not_an_error() {
            let store = MemoryStore::new().with_table(SourceKind::Seminar);
            let rows = store
                .fetch_all(FetchRequest::for_kind(SourceKind::Seminar))
                .await
                .unwrap();
            assert!(rows.is_empty());
        }

        #[tokio::test]
        async fn fetch_orders_rows() {
            let store = MemoryStore::new().with_rows(
                SourceKind::Event,
                [
                    json!({ "id": 1, "event_date": "2024-05-03" }),
                    json!({ "id": 2, "event_date": "2024-05-01" }),
                ],
            );
            let rows = store
                .fetch_all(FetchRequest::for_kind(SourceKind::Event))
                .await
                .unwrap();
            assert_eq!(ids(&rows), ["2", "1"]);
        }

        #[tokio::test]
        async fn insert_assigns_id_and_created_at() {
            let store = MemoryStore::provisioned();
            let stored = store
                .insert(SourceKind::Exam, json!({ "exam_name": "Algebra" }))
                .await
                .unwrap();

            let id = stored["id"].as_str().unwrap();
            assert!(uuid::Uuid::parse_str(id).is_ok());
            assert!(stored["created_at"].as_str().unwrap().ends_with('Z'));
            assert_eq!(store.len(SourceKind::Exam).await, Some(1));
        }

        #[tokio::test]
        async fn insert_rejects_non_objects() {
            let store = MemoryStore::provisioned();
            let err = store.insert(SourceKind::Exam, json!([1, 2])).await.unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::InvalidRequest);
        }

        #[tokio::test]
        async fn insert_into_missing_table() {
            let store = MemoryStore::new();
            let err = store
                .insert(SourceKind::Record, json!({ "subject": "Physics" }))
                .await
                .unwrap_err();
            assert!(err.is_not_provisioned());
        }

        #[tokio::test]
        async fn configured_failure() {
            let store = MemoryStore::provisioned().with_failure(
                SourceKind::Deadline,
                SourceErrorCode::Unavailable,
                "connection reset",
            );
            let err = store
                .fetch_all(FetchRequest::for_kind(SourceKind::Deadline))
                .await
                .unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::Unavailable);
            assert_eq!(err.message(), "connection reset");
        }

        #[tokio::test(start_paused = true)]
        async fn configured_delay() {
            let store = MemoryStore::provisioned()
                .with_delay(SourceKind::Event, Duration::from_secs(5));
            let started = tokio::time::Instant::now();
            store
                .fetch_all(FetchRequest::for_kind(SourceKind::Event))
                .await
                .unwrap();
            assert!(started.elapsed() >= Duration::from_secs(5));
        }
    }

    mod error_store {
        use super::*;

        #[tokio::test]
        async fn always_fails() {
            let store = ErrorStore::unprovisioned();
            for kind in SourceKind::CALENDAR {
                let err = store.fetch_all(FetchRequest::for_kind(kind)).await.unwrap_err();
                assert!(err.is_not_provisioned());
                assert_eq!(err.source_kind(), Some(kind));
            }
        }
    }
}
