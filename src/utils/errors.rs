//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema:
//! errores del almacén de documentos, del libro de parqueo y de configuración.

use thiserror::Error;

/// Errores del almacén de documentos (CouchDB o memoria)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Documento no encontrado: {0}")]
    NotFound(String),

    #[error("Conflicto de revisión para el documento '{0}'")]
    Conflict(String),

    #[error("Error HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Documento inválido: {0}")]
    InvalidDocument(String),

    #[error("URL de CouchDB inválida: {0}")]
    InvalidUrl(String),

    #[error("Respuesta inesperada de CouchDB ({status}): {reason}")]
    Unexpected { status: u16, reason: String },
}

/// Errores del libro de entradas y salidas
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Vehículo con ID '{0}' no encontrado")]
    NotFound(String),

    #[error("El vehículo con placa {0} ya entró y todavía no ha salido")]
    Duplicate(String),

    #[error("El vehículo con ID '{0}' ya salió anteriormente")]
    AlreadyOut(String),

    #[error("Error del almacén: {0}")]
    Store(StoreError),

    #[error("Error de validación: {0}")]
    Validation(String),
}

impl From<StoreError> for LedgerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => LedgerError::NotFound(id),
            other => LedgerError::Store(other),
        }
    }
}

/// Errores de configuración del entorno
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Variable de entorno {name} inválida: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Resultado tipado para operaciones del libro de parqueo
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Función helper para crear errores de configuración
pub fn invalid_config(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Función helper para crear errores de validación
pub fn validation_error(message: &str) -> LedgerError {
    LedgerError::Validation(message.to_string())
}
