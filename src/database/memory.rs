//! Almacén de documentos en memoria
//!
//! Reproduce la semántica de revisiones de CouchDB (`<generación>-<md5>`)
//! sin servidor. Se usa en los tests y con `STORE_BACKEND=memory`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocumentStore, StoredDocument, DESIGN_DOC_PREFIX};
use crate::utils::errors::StoreError;

#[derive(Debug, Clone)]
struct Entry {
    generation: u64,
    rev: String,
    fields: Map<String, Value>,
}

/// Almacén en memoria, ordenado por ID como `_all_docs`
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    docs: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de documentos guardados
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn to_stored(id: &str, entry: &Entry) -> StoredDocument {
        let mut body = Map::with_capacity(entry.fields.len() + 2);
        body.insert("_id".to_string(), Value::String(id.to_string()));
        body.insert("_rev".to_string(), Value::String(entry.rev.clone()));
        for (key, value) in &entry.fields {
            body.insert(key.clone(), value.clone());
        }

        StoredDocument {
            id: id.to_string(),
            rev: entry.rev.clone(),
            body: Value::Object(body),
        }
    }
}

/// Quitar las claves reservadas del documento
fn strip_reserved(document: &Value) -> Result<Map<String, Value>, StoreError> {
    let Value::Object(fields) = document else {
        return Err(StoreError::InvalidDocument(
            "el documento debe ser un objeto JSON".to_string(),
        ));
    };

    Ok(fields
        .iter()
        .filter(|(key, _)| key.as_str() != "_id" && key.as_str() != "_rev")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect())
}

fn revision(generation: u64, fields: &Map<String, Value>) -> Result<String, StoreError> {
    let serialized = serde_json::to_vec(fields)?;
    Ok(format!("{}-{:x}", generation, md5::compute(serialized)))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_database(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<StoredDocument, StoreError> {
        let docs = self.docs.read().await;
        docs.get(id)
            .map(|entry| Self::to_stored(id, entry))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn put(&self, id: &str, document: &Value, rev: Option<&str>) -> Result<String, StoreError> {
        let fields = strip_reserved(document)?;
        let mut docs = self.docs.write().await;

        let generation = match (docs.get(id), rev) {
            (None, None) => 1,
            (Some(current), Some(rev)) if current.rev == rev => current.generation + 1,
            _ => return Err(StoreError::Conflict(id.to_string())),
        };

        let new_rev = revision(generation, &fields)?;
        debug!("💾 Documento {} guardado en memoria (rev {})", id, new_rev);
        docs.insert(
            id.to_string(),
            Entry {
                generation,
                rev: new_rev.clone(),
                fields,
            },
        );

        Ok(new_rev)
    }

    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        match docs.get(id) {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(current) if current.rev != rev => Err(StoreError::Conflict(id.to_string())),
            Some(_) => {
                docs.remove(id);
                debug!("🗑️ Documento {} eliminado de memoria", id);
                Ok(())
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|(id, _)| !id.starts_with(DESIGN_DOC_PREFIX))
            .map(|(id, entry)| Self::to_stored(id, entry))
            .collect())
    }
}
