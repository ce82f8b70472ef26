//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the effective configuration as TOML.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", path.display(), toml_str))
}

/// Validates the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<String> {
    config.validate().map_err(ClientError::Config)?;

    let data_dir = config.data_dir();
    if !data_dir.is_dir() {
        return Ok(format!(
            "Configuration is valid.\nNote: data directory {} does not exist yet; \
             the calendar will show as not set up.",
            data_dir.display()
        ));
    }
    Ok("Configuration is valid.".to_string())
}

/// Shows the configuration and data paths.
pub fn path(config_path: &Path, config: &ClientConfig) -> ClientResult<String> {
    Ok(format!(
        "config: {}\ndata: {}",
        config_path.display(),
        config.data_dir().display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn dump_round_trips() {
        let mut config = ClientConfig::default();
        config.store.data_dir = Some(PathBuf::from("/srv/school"));
        config.aggregator.upcoming_limit = Some(25);

        let output = dump(&config, Path::new("/etc/schoolcal.toml")).unwrap();
        assert!(output.starts_with("# config.toml (/etc/schoolcal.toml)\n"));

        let body = output.split_once('\n').unwrap().1;
        let parsed: ClientConfig = toml::from_str(body).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validate_reports_errors() {
        let mut config = ClientConfig::default();
        config.aggregator.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ClientError::Config(_))));
    }

    #[test]
    fn validate_with_existing_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ClientConfig::default();
        config.store.data_dir = Some(dir.path().to_path_buf());
        assert_eq!(validate(&config).unwrap(), "Configuration is valid.");
    }

    #[test]
    fn paths() {
        let mut config = ClientConfig::default();
        config.store.data_dir = Some(PathBuf::from("/srv/school"));
        let output = path(Path::new("/etc/schoolcal.toml"), &config).unwrap();
        assert_eq!(output, "config: /etc/schoolcal.toml\ndata: /srv/school");
    }
}
