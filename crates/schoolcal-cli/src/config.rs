//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/schoolcal/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [store]
//! data_dir = "/srv/school/tables"
//!
//! [aggregator]
//! timeout_secs = 10
//! upcoming_limit = 50
//!
//! [display]
//! date_format = "%a %d %b %Y"
//! no_events_text = "Nothing scheduled"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use schoolcal_aggregator::AggregatorConfig;
use schoolcal_core::FormatOptions;

/// Configuration for the schoolcal client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Data store settings.
    pub store: StoreSettings,

    /// Aggregation settings.
    pub aggregator: AggregatorSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// Where the source tables are read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory holding `<table>.json` files.
    pub data_dir: Option<PathBuf>,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    /// Per-source fetch timeout in seconds.
    pub timeout_secs: u64,

    /// Birthday fetch timeout in seconds. Defaults to `timeout_secs`.
    pub birthday_timeout_secs: Option<u64>,

    /// Maximum number of upcoming items per page.
    pub upcoming_limit: Option<usize>,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            timeout_secs: schoolcal_aggregator::DEFAULT_SOURCE_TIMEOUT.as_secs(),
            birthday_timeout_secs: None,
            upcoming_limit: None,
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// `strftime` pattern for day headings.
    pub date_format: String,

    /// Text to show when there are no events.
    pub no_events_text: String,

    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,

    /// Append days remaining to assignments, tests and deadlines.
    pub show_due_status: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let defaults = FormatOptions::default();
        Self {
            date_format: defaults.date_format,
            no_events_text: defaults.no_events_text,
            max_title_length: defaults.max_title_length,
            show_due_status: defaults.show_due_status,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolcal")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolcal")
    }

    /// Returns the configured data directory, or the default one.
    pub fn data_dir(&self) -> PathBuf {
        self.store
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Builds the aggregator configuration.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        let settings = &self.aggregator;
        let mut config =
            AggregatorConfig::new().with_source_timeout(Duration::from_secs(settings.timeout_secs));
        if let Some(secs) = settings.birthday_timeout_secs {
            config = config.with_birthday_timeout(Duration::from_secs(secs));
        }
        if let Some(limit) = settings.upcoming_limit {
            config = config.with_upcoming_limit(limit);
        }
        config
    }

    /// Builds the formatter options.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            date_format: self.display.date_format.clone(),
            no_events_text: self.display.no_events_text.clone(),
            max_title_length: self.display.max_title_length,
            show_due_status: self.display.show_due_status,
        }
    }

    /// Checks the configuration for values that would fail at run time.
    pub fn validate(&self) -> Result<(), String> {
        self.aggregator_config()
            .validate()
            .map_err(|e| e.to_string())?;

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!(
                "display.date_format is not a valid strftime pattern: {:?}",
                self.display.date_format
            ));
        }

        if let Some(ref dir) = self.store.data_dir {
            if !dir.is_dir() {
                return Err(format!("store.data_dir is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }
}
