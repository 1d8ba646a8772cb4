//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: file (or defaults), then process environment, then validate.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply the deployment environment variables on top of `config`.
///
/// | Variable        | Field                              |
/// |-----------------|------------------------------------|
/// | `DATABASE_URI`  | `database.url`                     |
/// | `PORT`          | port of `listener.bind_address`    |
/// | `LOG_LEVEL`     | `observability.log_level`          |
/// | `RETRY_COUNT`   | `database.connect_retries`         |
/// | `RETRY_DELAY`   | `database.retry_base_delay_ms` (given in seconds) |
/// | `RETRY_BACKOFF` | `database.retry_backoff_factor`    |
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URI") {
        config.database.url = url;
    }

    if let Some(port) = lookup("PORT") {
        let port: u16 = parse_env("PORT", &port)?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    if let Some(count) = lookup("RETRY_COUNT") {
        config.database.connect_retries = parse_env("RETRY_COUNT", &count)?;
    }

    if let Some(delay) = lookup("RETRY_DELAY") {
        let secs: u64 = parse_env("RETRY_DELAY", &delay)?;
        let base_ms = secs.saturating_mul(1_000);
        config.database.retry_base_delay_ms = base_ms;
        // The cap must never undercut the base delay.
        config.database.retry_max_delay_ms = config.database.retry_max_delay_ms.max(base_ms);
    }

    if let Some(factor) = lookup("RETRY_BACKOFF") {
        config.database.retry_backoff_factor = parse_env("RETRY_BACKOFF", &factor)?;
    }

    Ok(())
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        name,
        value: value.to_string(),
    })
}
