//! Error types for data-store operations.
//!
//! [`SourceError`] covers failures fetching a whole source table;
//! [`MalformedRecord`] covers a single row that cannot be placed on the
//! calendar. Neither is fatal to an aggregation pass.

use std::fmt;
use thiserror::Error;

use crate::rows::SourceKind;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// The backing table does not exist.
    NotProvisioned,
    /// The store could not be reached or refused the query.
    Unavailable,
    /// The fetch did not complete within its time budget.
    Timeout,
    /// The store answered with something that is not a list of rows.
    InvalidResponse,
    /// The request itself was invalid (e.g. inserting a non-object row).
    InvalidRequest,
    /// Unexpected internal failure.
    Internal,
}

impl SourceErrorCode {
    /// Returns true if a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable | Self::Timeout)
    }

    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotProvisioned => "not_provisioned",
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching a source table.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// The source being fetched, once known.
    source_kind: Option<SourceKind>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_kind: None,
            source: None,
        }
    }

    /// Creates a not-provisioned error (missing table).
    pub fn not_provisioned(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NotProvisioned, message)
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Unavailable, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Internal, message)
    }

    /// Sets the source kind for this error.
    pub fn with_source_kind(mut self, kind: SourceKind) -> Self {
        self.source_kind = Some(kind);
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source kind, if set.
    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source_kind
    }

    /// Returns true if the backing table is missing.
    pub fn is_not_provisioned(&self) -> bool {
        self.code == SourceErrorCode::NotProvisioned
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kind) = self.source_kind {
            write!(f, "[{}] ", kind)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for data-store operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// A row that cannot be turned into a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// The row does not have the table's shape (not an object, no id, wrong types).
    #[error("{kind} row has an unexpected shape: {message}")]
    Shape { kind: SourceKind, message: String },

    /// A required column is null or blank.
    #[error("{kind} row {id} has no {column}")]
    MissingField {
        kind: SourceKind,
        id: String,
        column: &'static str,
    },

    /// A date column could not be parsed.
    #[error("{kind} row {id} has an invalid {column}: {value:?}")]
    InvalidDate {
        kind: SourceKind,
        id: String,
        column: &'static str,
        value: String,
    },
}

impl MalformedRecord {
    /// Returns the source the row came from.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Shape { kind, .. }
            | Self::MissingField { kind, .. }
            | Self::InvalidDate { kind, .. } => *kind,
        }
    }
}
