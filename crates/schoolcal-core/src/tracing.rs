//! Log output for the schoolcal crates.
//!
//! Library code only emits `tracing` events; the binary picks a preset and
//! calls [`init_tracing`] once:
//!
//! ```ignore
//! use schoolcal_core::tracing::{init_tracing, TracingConfig};
//!
//! let config = if debug { TracingConfig::cli_debug() } else { TracingConfig::default() };
//! init_tracing(config)?;
//! ```
//!
//! Behind a web service use [`TracingConfig::service`], which writes one JSON
//! object per line and records the span of every aggregation pass.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Crates whose events the default filter lets through.
pub const SCHOOLCAL_TARGETS: [&str; 4] = [
    "schoolcal_core",
    "schoolcal_sources",
    "schoolcal_aggregator",
    "schoolcal_cli",
];

/// Level for everything outside [`SCHOOLCAL_TARGETS`].
const DEPENDENCY_LEVEL: Level = Level::WARN;

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("tracing is already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, for reading a single run.
    Pretty,
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the schoolcal crates when `RUST_LOG` is unset.
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Print `file:line` for each event.
    pub show_location: bool,
    /// Print the module path for each event.
    pub show_target: bool,
    pub show_timestamp: bool,
    /// Log when the `aggregate` span and its per-source `fetch` spans open and close.
    pub span_events: bool,
    /// A filter directive that replaces both `RUST_LOG` and `level`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingOutputFormat::Compact,
            show_location: false,
            show_target: false,
            show_timestamp: false,
            span_events: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// `schoolcal --debug`: per-source counts and dropped rows, with locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            show_location: true,
            show_target: true,
            ..Self::default()
        }
    }

    /// Structured logs for a long-running service.
    #[must_use]
    pub fn service() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Json,
            show_location: true,
            show_target: true,
            show_timestamp: true,
            span_events: true,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The directive used when neither `filter` nor `RUST_LOG` is set.
    ///
    /// Dependencies stay at `warn`; only the schoolcal crates follow `level`.
    pub fn default_directive(&self) -> String {
        let level = self.level.as_str().to_ascii_lowercase();
        let mut directive = DEPENDENCY_LEVEL.as_str().to_ascii_lowercase();
        for target in SCHOOLCAL_TARGETS {
            directive.push_str(&format!(",{}={}", target, level));
        }
        directive
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref filter) = self.filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.default_directive())?),
        }
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let layer = fmt::layer()
        .with_file(config.show_location)
        .with_line_number(config.show_location)
        .with_target(config.show_target)
        .with_span_events(config.fmt_span());

    let layer = match (config.format, config.show_timestamp) {
        (TracingOutputFormat::Pretty, _) => layer.pretty().boxed(),
        (TracingOutputFormat::Json, _) => layer.json().boxed(),
        (TracingOutputFormat::Compact, true) => layer.compact().boxed(),
        (TracingOutputFormat::Compact, false) => layer.compact().without_time().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
