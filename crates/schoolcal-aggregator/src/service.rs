//! Calendar pages.
//!
//! [`CalendarService`] ties the authorization gate, the aggregator and the
//! classifier together. Each page checks the caller first; the store is
//! never read for a refused request.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use schoolcal_core::{
    BirthdayBoard, CalendarEvent, CalendarViews, Classifier, MonthBucket, events_on_date,
};
use schoolcal_sources::SourceKind;

use crate::aggregate::{Aggregation, Aggregator};
use crate::auth::{Authorizer, Principal, RequestContext};
use crate::error::AggregatorResult;

/// Source health for one pass, shown to admins only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDiagnostics {
    pub failed_sources: Vec<SourceKind>,
    pub dropped_rows: usize,
}

/// A classified calendar page.
#[derive(Debug, Clone)]
pub struct CalendarPage {
    pub principal: Principal,
    pub provisioned: bool,
    /// The full timeline, sorted by date.
    pub events: Vec<CalendarEvent>,
    pub views: CalendarViews<CalendarEvent>,
    pub by_month: Vec<MonthBucket<CalendarEvent>>,
    pub diagnostics: Option<PageDiagnostics>,
}

impl CalendarPage {
    /// Returns the events on `date` (`YYYY-MM-DD`, or any string starting with one).
    pub fn events_on(&self, date: &str) -> Vec<&CalendarEvent> {
        events_on_date(&self.events, date)
    }
}

/// The birthday board page.
#[derive(Debug, Clone)]
pub struct BirthdayPage {
    pub principal: Principal,
    pub provisioned: bool,
    pub board: BirthdayBoard,
}

/// Serves calendar pages.
#[derive(Clone)]
pub struct CalendarService {
    aggregator: Aggregator,
    authorizer: Arc<dyn Authorizer>,
}

impl std::fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarService")
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}

impl CalendarService {
    /// Creates a service.
    pub fn new(aggregator: Aggregator, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            aggregator,
            authorizer,
        }
    }

    /// Returns the aggregator.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// The admin calendar: every source, with source diagnostics.
    pub async fn admin_calendar(
        &self,
        request: &RequestContext,
        now: NaiveDateTime,
    ) -> AggregatorResult<CalendarPage> {
        let principal = self.authorizer.require_admin(request)?;
        info!(user = %principal.user_id, "serving admin calendar");
        let aggregation = self.aggregator.aggregate().await;
        let diagnostics = PageDiagnostics {
            failed_sources: aggregation.failed_sources(),
            dropped_rows: aggregation.dropped.len(),
        };
        Ok(self.build_page(principal, aggregation, now, Some(diagnostics)))
    }

    /// The student calendar: the same timeline, without diagnostics.
    pub async fn student_calendar(
        &self,
        request: &RequestContext,
        now: NaiveDateTime,
    ) -> AggregatorResult<CalendarPage> {
        let principal = self.authorizer.require_student(request)?;
        info!(user = %principal.user_id, "serving student calendar");
        let aggregation = self.aggregator.aggregate().await;
        Ok(self.build_page(principal, aggregation, now, None))
    }

    /// The birthday board. Open to students and admins.
    pub async fn birthdays(
        &self,
        request: &RequestContext,
        now: NaiveDateTime,
    ) -> AggregatorResult<BirthdayPage> {
        let principal = self.authorizer.require_student(request)?;
        let fetch = self.aggregator.fetch_birthdays().await;
        let board = BirthdayBoard::build(&fetch.entries, &Classifier::new(now));
        debug!(total = board.total, today = board.today.len(), "built birthday board");
        Ok(BirthdayPage {
            principal,
            provisioned: fetch.provisioned,
            board,
        })
    }

    fn build_page(
        &self,
        principal: Principal,
        aggregation: Aggregation,
        now: NaiveDateTime,
        diagnostics: Option<PageDiagnostics>,
    ) -> CalendarPage {
        let classifier = Classifier::new(now);
        let mut views = classifier.classify(&aggregation.events);
        if let Some(limit) = self.aggregator.config().upcoming_limit {
            views.upcoming.truncate(limit);
        }
        let by_month = classifier.group_by_month(&aggregation.events);

        CalendarPage {
            principal,
            provisioned: aggregation.provisioned,
            events: aggregation.events,
            views,
            by_month,
            diagnostics,
        }
    }
}
