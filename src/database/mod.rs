//! Módulo de base de datos
//!
//! Define el contrato del almacén de documentos con revisiones
//! (concurrencia optimista) y sus implementaciones: CouchDB y memoria.

pub mod connection;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::utils::errors::StoreError;

pub use connection::CouchDbConnection;
pub use memory::InMemoryStore;

/// Documento leído del almacén, con su ID y revisión actual
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub rev: String,
    /// Cuerpo completo, incluyendo `_id` y `_rev`
    pub body: Value,
}

/// Operaciones del almacén de documentos
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Crear la base de datos; si ya existe no es un error
    async fn create_database(&self) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<StoredDocument, StoreError>;

    /// `rev = None` crea el documento; `Some` lo actualiza y falla si la revisión no coincide.
    /// Devuelve la nueva revisión.
    async fn put(&self, id: &str, document: &Value, rev: Option<&str>) -> Result<String, StoreError>;

    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError>;

    /// Todos los documentos (sin design docs), en el orden nativo del almacén
    async fn list_all(&self) -> Result<Vec<StoredDocument>, StoreError>;
}

/// Prefijo de los design documents de CouchDB
pub(crate) const DESIGN_DOC_PREFIX: &str = "_design/";
