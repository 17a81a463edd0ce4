//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y los parámetros del parqueo.

use std::env;
use std::str::FromStr;

use crate::utils::errors::{invalid_config, ConfigError};

/// Puerta de entrada por defecto
pub const DEFAULT_GATE: &str = "manless_in_1";

/// Tarifa por hora (o fracción) por defecto
pub const DEFAULT_RATE_PER_HOUR: i64 = 2000;

/// Backend del almacén de documentos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    CouchDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "couchdb" => Ok(StoreBackend::CouchDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(invalid_config(
                "STORE_BACKEND",
                format!("'{}' no es 'couchdb' ni 'memory'", other),
            )),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub log_level: String,
    pub store_backend: StoreBackend,
    pub gate: String,
    pub rate_per_hour: i64,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::CouchDb,
        };

        let rate_per_hour = match lookup("PARKING_RATE_PER_HOUR") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| invalid_config("PARKING_RATE_PER_HOUR", e.to_string()))?,
            None => DEFAULT_RATE_PER_HOUR,
        };
        if rate_per_hour < 0 {
            return Err(invalid_config(
                "PARKING_RATE_PER_HOUR",
                "la tarifa no puede ser negativa",
            ));
        }

        let gate = lookup("PARKING_GATE")
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| DEFAULT_GATE.to_string());

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
            store_backend,
            gate,
            rate_per_hour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.gate, DEFAULT_GATE);
        assert_eq!(config.rate_per_hour, 2000);
        assert_eq!(config.store_backend, StoreBackend::CouchDb);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "Memory"),
            ("PARKING_RATE_PER_HOUR", " 3500 "),
            ("PARKING_GATE", "manless_in_2"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.rate_per_hour, 3500);
        assert_eq!(config.gate, "manless_in_2");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_values() {
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("PARKING_RATE_PER_HOUR", "dos mil")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("PARKING_RATE_PER_HOUR", "-1")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "redis")])).is_err());
    }
}
