//! Utilidades de validación
//!
//! Funciones helper para validar entradas del operador y convertir
//! las marcas de tiempo guardadas en los documentos.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::utils::errors::{validation_error, LedgerError};

/// Validar que un string no esté vacío y devolverlo sin espacios
pub fn validate_not_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(&format!("{} es requerido", field)));
    }
    Ok(trimmed)
}

/// Validar y convertir string RFC3339 a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<FixedOffset>, LedgerError> {
    DateTime::parse_from_rfc3339(value).map_err(|e| {
        validation_error(&format!("marca de tiempo '{}' no es RFC3339: {}", value, e))
    })
}

/// Formatear un datetime como RFC3339 con precisión de segundos
pub fn format_datetime(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
