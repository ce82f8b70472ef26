//! Concurrent, fail-soft aggregation of the source tables.
//!
//! One pass fetches the six calendar tables concurrently, each under its own
//! timeout, then merges them in the fixed source order and sorts the result
//! by date. A source that fails contributes nothing; the pass still returns
//! whatever the other sources produced.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};

use schoolcal_core::{BirthdayEntry, CalendarEvent};
use schoolcal_sources::{
    DataStore, FetchRequest, MalformedRecord, SourceError, SourceKind, SourceResult,
    normalize_birthdays, normalize_rows,
};

use crate::config::AggregatorConfig;

/// A source that could not be fetched during a pass.
#[derive(Debug)]
pub struct SourceFailure {
    pub kind: SourceKind,
    pub error: SourceError,
}

/// The result of one aggregation pass.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Events sorted by date; ties keep source order.
    pub events: Vec<CalendarEvent>,
    /// False only when every source failed because its table is missing.
    pub provisioned: bool,
    /// Sources that contributed no events because their fetch failed.
    pub failures: Vec<SourceFailure>,
    /// Rows that were fetched but could not be placed on the calendar.
    pub dropped: Vec<MalformedRecord>,
}

impl Aggregation {
    /// Returns true if at least one source failed.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns the sources that failed, in source order.
    pub fn failed_sources(&self) -> Vec<SourceKind> {
        self.failures.iter().map(|f| f.kind).collect()
    }
}

/// The birthdays read during a pass.
#[derive(Debug, Default)]
pub struct BirthdayFetch {
    pub entries: Vec<BirthdayEntry>,
    /// False when the `birthdays` table is missing.
    pub provisioned: bool,
    pub failure: Option<SourceError>,
    pub dropped: Vec<MalformedRecord>,
}

/// Merges fetched tables into one timeline.
///
/// `results` must be in source order; rows within a table keep their fetch
/// order, and the final sort is stable.
pub fn merge_sources(
    results: impl IntoIterator<Item = (SourceKind, SourceResult<Vec<Value>>)>,
) -> Aggregation {
    let mut aggregation = Aggregation::default();
    let mut source_count = 0;

    for (kind, result) in results {
        source_count += 1;
        match result {
            Ok(rows) => {
                let normalized = normalize_rows(kind, &rows);
                debug!(
                    source = %kind,
                    rows = rows.len(),
                    event_count = normalized.events.len(),
                    dropped = normalized.dropped.len(),
                    "normalized source"
                );
                aggregation.events.extend(normalized.events);
                aggregation.dropped.extend(normalized.dropped);
            }
            Err(error) => {
                warn!(source = %kind, error = %error, "source failed, continuing without it");
                aggregation.failures.push(SourceFailure { kind, error });
            }
        }
    }

    let all_missing = source_count > 0
        && aggregation.failures.len() == source_count
        && aggregation.failures.iter().all(|f| f.error.is_not_provisioned());
    aggregation.provisioned = !all_missing;

    aggregation.events.sort_by_key(|e| e.date);
    aggregation
}

/// Runs aggregation passes against one store.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn DataStore>,
    config: AggregatorConfig,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("store", &self.store.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Aggregator {
    /// Creates an aggregator over `store`.
    pub fn new(store: Arc<dyn DataStore>, config: AggregatorConfig) -> Self {
        Self { store, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetches every calendar source and merges the results.
    pub async fn aggregate(&self) -> Aggregation {
        let span = info_span!("aggregate", store = self.store.name());
        async {
            let fetches = SourceKind::CALENDAR
                .into_iter()
                .map(|kind| self.fetch_source(kind, self.config.source_timeout));
            let results = join_all(fetches).await;

            let aggregation = merge_sources(SourceKind::CALENDAR.into_iter().zip(results));
            info!(
                event_count = aggregation.events.len(),
                failed = aggregation.failures.len(),
                dropped = aggregation.dropped.len(),
                provisioned = aggregation.provisioned,
                "aggregation finished"
            );
            aggregation
        }
        .instrument(span)
        .await
    }

    /// Fetches the birthday table.
    pub async fn fetch_birthdays(&self) -> BirthdayFetch {
        let kind = SourceKind::Birthday;
        match self.fetch_source(kind, self.config.birthday_timeout()).await {
            Ok(rows) => {
                let (entries, dropped) = normalize_birthdays(&rows);
                debug!(source = %kind, count = entries.len(), "fetched birthdays");
                BirthdayFetch {
                    entries,
                    provisioned: true,
                    failure: None,
                    dropped,
                }
            }
            Err(error) => {
                warn!(source = %kind, error = %error, "birthdays unavailable");
                BirthdayFetch {
                    provisioned: !error.is_not_provisioned(),
                    failure: Some(error),
                    ..BirthdayFetch::default()
                }
            }
        }
    }

    async fn fetch_source(&self, kind: SourceKind, budget: Duration) -> SourceResult<Vec<Value>> {
        let request = FetchRequest::for_kind(kind);
        let fetch = tokio::time::timeout(budget, self.store.fetch_all(request))
            .instrument(info_span!("fetch", source = %kind));
        match fetch.await {
            Ok(result) => result.map_err(|e| match e.source_kind() {
                Some(_) => e,
                None => e.with_source_kind(kind),
            }),
            Err(_) => Err(SourceError::timeout(format!(
                "no response within {}ms",
                budget.as_millis()
            ))
            .with_source_kind(kind)),
        }
    }
}
