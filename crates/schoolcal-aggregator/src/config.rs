//! Aggregator configuration.

use std::time::Duration;

use crate::error::{AggregatorError, AggregatorResult};

/// Default time budget for fetching one source table.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Time budget for each calendar source fetch.
    pub source_timeout: Duration,

    /// Time budget for the birthday fetch. Falls back to `source_timeout`.
    pub birthday_timeout: Option<Duration>,

    /// Maximum number of upcoming items on a calendar page.
    pub upcoming_limit: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            birthday_timeout: None,
            upcoming_limit: None,
        }
    }
}

impl AggregatorConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the per-source timeout.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Builder: set the birthday fetch timeout.
    pub fn with_birthday_timeout(mut self, timeout: Duration) -> Self {
        self.birthday_timeout = Some(timeout);
        self
    }

    /// Builder: cap the upcoming list.
    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = Some(limit);
        self
    }

    /// Returns the effective birthday fetch timeout.
    pub fn birthday_timeout(&self) -> Duration {
        self.birthday_timeout.unwrap_or(self.source_timeout)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> AggregatorResult<()> {
        if self.source_timeout.is_zero() {
            return Err(AggregatorError::config("source timeout must be greater than zero"));
        }
        if self.birthday_timeout.is_some_and(|t| t.is_zero()) {
            return Err(AggregatorError::config("birthday timeout must be greater than zero"));
        }
        if self.upcoming_limit == Some(0) {
            return Err(AggregatorError::config("upcoming limit must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.source_timeout, Duration::from_secs(10));
        assert_eq!(config.birthday_timeout(), Duration::from_secs(10));
        assert!(config.upcoming_limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = AggregatorConfig::new()
            .with_source_timeout(Duration::from_secs(3))
            .with_birthday_timeout(Duration::from_secs(1))
            .with_upcoming_limit(20);

        assert_eq!(config.source_timeout, Duration::from_secs(3));
        assert_eq!(config.birthday_timeout(), Duration::from_secs(1));
        assert_eq!(config.upcoming_limit, Some(20));
    }

    #[test]
    fn birthday_timeout_follows_source_timeout() {
        let config = AggregatorConfig::new().with_source_timeout(Duration::from_secs(4));
        assert_eq!(config.birthday_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn rejects_zero_values() {
        let zero_timeout = AggregatorConfig::new().with_source_timeout(Duration::ZERO);
        assert!(matches!(zero_timeout.validate(), Err(AggregatorError::Config { .. })));

        let zero_limit = AggregatorConfig::new().with_upcoming_limit(0);
        assert!(zero_limit.validate().is_err());
    }
}
