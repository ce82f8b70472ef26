//! A data store backed by a directory of JSON files.
//!
//! Each table lives in `<dir>/<table>.json` as an array of row objects,
//! e.g. `events.json`, `exams.json`. A missing file means the table has not
//! been provisioned.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::rows::SourceKind;
use crate::store::{BoxFuture, DataStore, FetchRequest, order_rows};

/// Reads tables from JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Creates a store reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing a table.
    pub fn table_path(&self, kind: SourceKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.table()))
    }

    async fn read_table(&self, kind: SourceKind) -> SourceResult<Vec<Value>> {
        let path = self.table_path(kind);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::not_provisioned(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(
                    SourceError::unavailable(format!("failed to read {}", path.display()))
                        .with_source(e),
                );
            }
        };

        match serde_json::from_str(&contents) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(other) => Err(SourceError::invalid_response(format!(
                "{} holds {} instead of an array of rows",
                path.display(),
                json_type(&other)
            ))),
            Err(e) => Err(SourceError::invalid_response(format!(
                "{} is not valid JSON",
                path.display()
            ))
            .with_source(e)),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl DataStore for JsonDirStore {
    fn name(&self) -> &str {
        "json-dir"
    }

    fn fetch_all(&self, request: FetchRequest) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
        Box::pin(async move {
            let kind = request.kind;
            let mut rows = self
                .read_table(kind)
                .await
                .map_err(|e| e.with_source_kind(kind))?;
            order_rows(&mut rows, request.order_by, request.descending);
            debug!(source = %kind, rows = rows.len(), "read table");
            Ok(rows)
        })
    }
}
