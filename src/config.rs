use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::price_query_service::PriceCacheConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub cache: PriceCacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any `name -> value` source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PriceCacheConfig::default();

        let config = Self {
            store: parse_or(&lookup, "PRICE_STORE", StoreKind::Postgres)?,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            cache: PriceCacheConfig {
                max_capacity: parse_or(&lookup, "PRICE_CACHE_MAX_CAPACITY", defaults.max_capacity)?,
                ttl: Duration::from_secs(parse_or(
                    &lookup,
                    "PRICE_CACHE_TTL_SECS",
                    defaults.ttl.as_secs(),
                )?),
                store_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "PRICE_STORE_TIMEOUT_MS",
                    defaults.store_timeout.as_millis() as u64,
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store == StoreKind::Postgres && self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Zero("DATABASE_MAX_CONNECTIONS"));
        }
        if self.cache.max_capacity == 0 {
            return Err(ConfigError::Zero("PRICE_CACHE_MAX_CAPACITY"));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::Zero("PRICE_CACHE_TTL_SECS"));
        }
        if self.cache.store_timeout.is_zero() {
            return Err(ConfigError::Zero("PRICE_STORE_TIMEOUT_MS"));
        }
        Ok(())
    }
}

/// Parses `name` with `FromStr`, or returns `default` when it is unset.
pub(crate) fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_with_memory_store() {
        let cfg = config(&[("PRICE_STORE", "memory")]).unwrap();

        assert_eq!(cfg.store, StoreKind::Memory);
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.cache, PriceCacheConfig::default());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));

        let cfg = config(&[("DATABASE_URL", "postgres://localhost/prices")]).unwrap();
        assert_eq!(cfg.store, StoreKind::Postgres);
        assert_eq!(cfg.max_connections, 10);
    }

    #[test]
    fn test_cache_settings_are_read() {
        let cfg = config(&[
            ("PRICE_STORE", "Memory"),
            ("PRICE_CACHE_MAX_CAPACITY", "50"),
            ("PRICE_CACHE_TTL_SECS", "30"),
            ("PRICE_STORE_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(cfg.cache.max_capacity, 50);
        assert_eq!(cfg.cache.ttl, Duration::from_secs(30));
        assert_eq!(cfg.cache.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config(&[("PRICE_STORE", "redis")]),
            Err(ConfigError::Invalid { name: "PRICE_STORE", .. })
        ));
        assert_eq!(
            config(&[("PRICE_STORE", "memory"), ("PRICE_CACHE_TTL_SECS", "0")]).unwrap_err(),
            ConfigError::Zero("PRICE_CACHE_TTL_SECS")
        );
        assert!(matches!(
            config(&[("PRICE_STORE", "memory"), ("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { name: "BIND_ADDR", .. })
        ));
    }
}
