//! Calendar aggregation service.
//!
//! This crate turns the raw school tables into calendar pages:
//! - Concurrent, fail-soft fetching of the six calendar sources
//! - Merging into one date-sorted timeline
//! - Authorization of admin and student pages
//! - Classification into today / this week / this month / upcoming / overdue views
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chrono::Local;
//! use schoolcal_aggregator::{
//!     Aggregator, AggregatorConfig, CalendarService, Principal, RequestContext, Role,
//!     StaticAuthorizer,
//! };
//! use schoolcal_sources::JsonDirStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::new(
//!         Arc::new(JsonDirStore::new("/var/lib/schoolcal")),
//!         AggregatorConfig::default(),
//!     );
//!     let authorizer = StaticAuthorizer::new()
//!         .with_session("token", Principal::new("u-1", Role::Student));
//!     let service = CalendarService::new(aggregator, Arc::new(authorizer));
//!
//!     let request = RequestContext::with_token("token");
//!     let page = service.student_calendar(&request, Local::now().naive_local()).await?;
//!     println!("{} events", page.events.len());
//!     Ok(())
//! }
//! ```

mod aggregate;
mod auth;
mod config;
mod error;
mod service;

pub use aggregate::{Aggregation, Aggregator, BirthdayFetch, SourceFailure, merge_sources};
pub use auth::{Authorizer, Principal, RequestContext, Role, StaticAuthorizer};
pub use config::{AggregatorConfig, DEFAULT_SOURCE_TIMEOUT};
pub use error::{AggregatorError, AggregatorResult};
pub use service::{BirthdayPage, CalendarPage, CalendarService, PageDiagnostics};
