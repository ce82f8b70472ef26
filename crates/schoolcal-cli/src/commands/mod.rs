//! Command implementations.
//!
//! Each command renders its output to a `String`; `main` prints it.

pub mod birthdays;
pub mod calendar;
pub mod config;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use schoolcal_aggregator::{
    Aggregator, CalendarService, Principal, RequestContext, Role, StaticAuthorizer,
};
use schoolcal_core::OutputFormatter;
use schoolcal_sources::JsonDirStore;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// A local session against the calendar service.
///
/// The CLI runs as the operator of the data directory, so it opens a
/// one-off session for whichever role the page needs.
#[derive(Debug)]
pub struct Session {
    pub service: CalendarService,
    pub request: RequestContext,
    pub formatter: OutputFormatter,
}

impl Session {
    /// Opens a session over the JSON tables in `data_dir`.
    pub fn open(config: &ClientConfig, data_dir: PathBuf, role: Role) -> ClientResult<Self> {
        let aggregator_config = config.aggregator_config();
        aggregator_config.validate()?;

        debug!(data_dir = %data_dir.display(), %role, "opening local session");
        let aggregator = Aggregator::new(Arc::new(JsonDirStore::new(data_dir)), aggregator_config);

        let token = format!("local-{}", Uuid::new_v4());
        let authorizer =
            StaticAuthorizer::new().with_session(token.clone(), Principal::new("local", role));

        Ok(Self {
            service: CalendarService::new(aggregator, Arc::new(authorizer)),
            request: RequestContext::with_token(token),
            formatter: OutputFormatter::new(config.format_options()),
        })
    }
}

/// Returns the instant to classify against.
///
/// An explicit date is taken at the start of that day.
pub fn resolve_now(date: Option<NaiveDate>) -> NaiveDateTime {
    match date {
        Some(date) => date.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}
