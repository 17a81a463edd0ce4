//! Configuración de base de datos
//!
//! Este módulo maneja la configuración de la conexión a CouchDB.

use std::env;
use std::time::Duration;

use crate::utils::errors::{invalid_config, ConfigError};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub request_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5984".to_string(),
            name: "parking-system".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    /// Leer la configuración de CouchDB desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let request_timeout = match lookup("COUCHDB_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| invalid_config("COUCHDB_TIMEOUT_SECS", e.to_string()))?,
            ),
            None => defaults.request_timeout,
        };

        Ok(Self {
            url: lookup("COUCHDB_URL").unwrap_or(defaults.url),
            name: lookup("COUCHDB_DATABASE").unwrap_or(defaults.name),
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.url, "http://127.0.0.1:5984");
        assert_eq!(config.name, "parking-system");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_database_config_timeout() {
        let config = DatabaseConfig::from_lookup(|name| match name {
            "COUCHDB_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        assert!(DatabaseConfig::from_lookup(|name| match name {
            "COUCHDB_TIMEOUT_SECS" => Some("pronto".to_string()),
            _ => None,
        })
        .is_err());
    }
}
