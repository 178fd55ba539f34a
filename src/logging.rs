//! Process-wide `tracing` subscriber: an `EnvFilter` and a `fmt` layer, plus a
//! Loki exporter when built with the `loki` feature and `LOKI_ENABLED=true`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::config::{parse_or, ConfigError};

const DEFAULT_FILTER: &str = "info,sisu_price=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `RUST_LOG` directives, checked when the config is built.
    pub filter: String,
    pub service_name: String,
    pub environment: String,
    /// Loki push endpoint. `None` keeps logs on stdout only.
    pub loki_url: Option<Url>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            service_name: "sisu-price".to_string(),
            environment: "development".to_string(),
            loki_url: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads `RUST_LOG`, `SERVICE_NAME`, `ENVIRONMENT`, `LOKI_ENABLED` and
    /// `LOKI_URL`. `LOKI_ENABLED` must be `true` or `false`; when it is `true`
    /// `LOKI_URL` must be set and parse as a URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let filter = lookup("RUST_LOG").unwrap_or(defaults.filter);
        if EnvFilter::try_new(&filter).is_err() {
            return Err(ConfigError::Invalid { name: "RUST_LOG", value: filter });
        }

        let loki_url = if parse_or(&lookup, "LOKI_ENABLED", false)? {
            let raw = lookup("LOKI_URL")
                .filter(|s| !s.trim().is_empty())
                .ok_or(ConfigError::Missing("LOKI_URL"))?;
            let url = Url::parse(raw.trim())
                .map_err(|_| ConfigError::Invalid { name: "LOKI_URL", value: raw.clone() })?;
            Some(url)
        } else {
            None
        };

        Ok(Self {
            filter,
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            loki_url,
        })
    }
}

/// Installs the global subscriber. Fails if one is already installed.
///
/// With a Loki endpoint this spawns the exporter task, so it must run inside
/// the tokio runtime.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.filter)?)
        .with(fmt::layer());

    match &config.loki_url {
        #[cfg(feature = "loki")]
        Some(url) => {
            let (loki_layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url.clone())?;
            registry.with(loki_layer).try_init()?;
            tokio::spawn(task);
            tracing::info!("📊 Logging to stdout and Loki at {} (filter: {})", url, config.filter);
        }
        #[cfg(not(feature = "loki"))]
        Some(url) => {
            registry.try_init()?;
            tracing::warn!("LOKI_URL {} ignored: built without the `loki` feature", url);
        }
        None => {
            registry.try_init()?;
            tracing::info!("📊 Console logging initialized (filter: {})", config.filter);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<LoggingConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoggingConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_log_to_console() {
        assert_eq!(config(&[]).unwrap(), LoggingConfig::default());
    }

    #[test]
    fn test_loki_enabled_must_be_a_bool() {
        assert_eq!(
            config(&[("LOKI_ENABLED", "yes"), ("LOKI_URL", "http://localhost:3100")]).unwrap_err(),
            ConfigError::Invalid { name: "LOKI_ENABLED", value: "yes".to_string() }
        );
    }

    #[test]
    fn test_loki_requires_a_valid_url() {
        assert_eq!(
            config(&[("LOKI_ENABLED", "true")]).unwrap_err(),
            ConfigError::Missing("LOKI_URL")
        );
        assert_eq!(
            config(&[("LOKI_ENABLED", "true"), ("LOKI_URL", "not a url")]).unwrap_err(),
            ConfigError::Invalid { name: "LOKI_URL", value: "not a url".to_string() }
        );

        let cfg = config(&[("LOKI_ENABLED", "true"), ("LOKI_URL", "http://localhost:3100")]).unwrap();
        assert_eq!(cfg.loki_url.unwrap().as_str(), "http://localhost:3100/");
    }

    #[test]
    fn test_loki_url_ignored_when_disabled() {
        let cfg = config(&[("LOKI_ENABLED", "false"), ("LOKI_URL", "http://localhost:3100")]).unwrap();
        assert!(cfg.loki_url.is_none());
    }

    #[test]
    fn test_unparseable_filter_is_rejected() {
        let err = config(&[("RUST_LOG", "sisu_price=loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "RUST_LOG", .. }));
    }
}
