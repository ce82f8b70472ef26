//! Calendar command.

use serde::Serialize;
use tracing::warn;

use schoolcal_aggregator::{CalendarPage, PageDiagnostics, Role};
use schoolcal_core::{CalendarEvent, Classifier, FormatOptions, JsonOutput, OutputFormatter};

use super::{Session, resolve_now};
use crate::cli::CalendarArgs;
use crate::error::{ClientError, ClientResult};

/// JSON document for the calendar command.
#[derive(Debug, Serialize)]
struct CalendarDocument {
    #[serde(flatten)]
    output: JsonOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<PageDiagnostics>,
}

/// Renders the calendar page for `args.role`.
pub async fn run(session: &Session, args: &CalendarArgs) -> ClientResult<String> {
    let now = resolve_now(args.now);
    let page = match args.role {
        Role::Admin => session.service.admin_calendar(&session.request, now).await?,
        Role::Student => session.service.student_calendar(&session.request, now).await?,
    };

    if let Some(ref diagnostics) = page.diagnostics {
        for kind in &diagnostics.failed_sources {
            warn!(source = %kind, "source unavailable, calendar is incomplete");
        }
    }

    let formatter = formatter_for(&session.formatter, args)?;
    let classifier = Classifier::new(now);

    if args.json {
        // The page views already carry the upcoming limit; a date filter
        // needs views over the filtered events instead.
        let output = match args.on {
            Some(_) => {
                let events = selected_events(&page, args);
                formatter.format_json(&events, page.provisioned, &classifier)
            }
            None => formatter.format_json_with_views(
                &page.events,
                page.provisioned,
                &page.views,
                &classifier,
            ),
        };
        let document = CalendarDocument {
            output,
            diagnostics: page.diagnostics,
        };
        return Ok(serde_json::to_string_pretty(&document)?);
    }

    let events = selected_events(&page, args);
    let mut text = formatter.format_text(&events, page.provisioned, &classifier);
    if let Some(footer) = page.diagnostics.as_ref().and_then(diagnostics_footer) {
        text.push_str("\n\n");
        text.push_str(&footer);
    }
    Ok(text)
}

fn formatter_for(base: &OutputFormatter, args: &CalendarArgs) -> ClientResult<OutputFormatter> {
    match args.max_title_length {
        Some(0) => Err(ClientError::InvalidArgument(
            "--max-title-length must be at least 1".to_string(),
        )),
        Some(max) => Ok(OutputFormatter::new(FormatOptions {
            max_title_length: Some(max),
            ..base.options().clone()
        })),
        None => Ok(base.clone()),
    }
}

fn selected_events(page: &CalendarPage, args: &CalendarArgs) -> Vec<CalendarEvent> {
    match args.on {
        Some(date) => page
            .events_on(&date.format("%Y-%m-%d").to_string())
            .into_iter()
            .cloned()
            .collect(),
        None => page.events.clone(),
    }
}

fn diagnostics_footer(diagnostics: &PageDiagnostics) -> Option<String> {
    let mut lines = Vec::new();
    if !diagnostics.failed_sources.is_empty() {
        let names: Vec<_> = diagnostics
            .failed_sources
            .iter()
            .map(|k| k.table())
            .collect();
        lines.push(format!("Unavailable sources: {}", names.join(", ")));
    }
    if diagnostics.dropped_rows > 0 {
        lines.push(format!("Skipped rows: {}", diagnostics.dropped_rows));
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}
