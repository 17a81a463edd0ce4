//! Conexión a CouchDB
//!
//! Cliente HTTP (reqwest) sobre la API REST de CouchDB. Las credenciales
//! incluidas en la URL se envían como basic auth y nunca aparecen en los logs.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use urlencoding::{decode, encode};

use super::{DocumentStore, StoredDocument, DESIGN_DOC_PREFIX};
use crate::config::DatabaseConfig;
use crate::utils::errors::StoreError;

/// Cliente de una base de datos CouchDB
#[derive(Debug, Clone)]
pub struct CouchDbConnection {
    client: Client,
    base_url: String,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

/// Cuerpo de error de CouchDB (`{"error": "...", "reason": "..."}`)
#[derive(Debug, Deserialize)]
struct CouchErrorBody {
    error: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    rev: String,
}

#[derive(Debug, Deserialize)]
struct AllDocsResponse {
    rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
struct AllDocsRow {
    id: String,
    doc: Option<Value>,
}

impl CouchDbConnection {
    /// Crear un cliente para la base de datos configurada
    pub fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut url = Url::parse(&config.url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", mask_database_url(&config.url), e)))?;

        let username = match url.username() {
            "" => None,
            raw => Some(decode_userinfo(raw)),
        };
        let password = url.password().map(decode_userinfo);

        url.set_username("")
            .and_then(|_| url.set_password(None))
            .map_err(|_| StoreError::InvalidUrl(mask_database_url(&config.url)))?;

        let client = Client::builder().timeout(config.request_timeout).build()?;

        let base_url = url.as_str().trim_end_matches('/').to_string();
        info!("🔗 Cliente CouchDB listo: {}/{}", base_url, config.name);

        Ok(Self {
            client,
            base_url,
            database: config.name.clone(),
            username,
            password,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, encode(&self.database))
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.database_url(), encode(id))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");

        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_deref()),
            None => builder,
        }
    }
}

fn decode_userinfo(raw: &str) -> String {
    decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Convertir una respuesta no esperada en error, con el `reason` de CouchDB si existe
async fn unexpected(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let reason = match response.json::<CouchErrorBody>().await {
        Ok(body) => body
            .reason
            .or(body.error)
            .unwrap_or_else(|| "sin detalle".to_string()),
        Err(_) => "respuesta sin cuerpo JSON".to_string(),
    };

    StoreError::Unexpected { status, reason }
}

fn stored_from_body(id: &str, body: Value) -> Result<StoredDocument, StoreError> {
    let rev = body
        .get("_rev")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidDocument(format!("documento '{}' sin _rev", id)))?
        .to_string();

    Ok(StoredDocument {
        id: id.to_string(),
        rev,
        body,
    })
}

/// Preparar el cuerpo para PUT: `_id` del path y `_rev` solo si se actualiza
fn prepare_body(id: &str, document: &Value, rev: Option<&str>) -> Result<Value, StoreError> {
    let Value::Object(fields) = document else {
        return Err(StoreError::InvalidDocument(
            "el documento debe ser un objeto JSON".to_string(),
        ));
    };

    let mut fields = fields.clone();
    fields.insert("_id".to_string(), Value::String(id.to_string()));
    match rev {
        Some(rev) => fields.insert("_rev".to_string(), Value::String(rev.to_string())),
        None => fields.remove("_rev"),
    };

    Ok(Value::Object(fields))
}

#[async_trait]
impl DocumentStore for CouchDbConnection {
    async fn create_database(&self) -> Result<(), StoreError> {
        let response = self.request(Method::PUT, &self.database_url()).send().await?;

        match response.status() {
            status if status.is_success() => {
                info!("✅ Base de datos '{}' creada", self.database);
                Ok(())
            }
            StatusCode::PRECONDITION_FAILED => {
                debug!("Base de datos '{}' ya existe", self.database);
                Ok(())
            }
            _ => Err(unexpected(response).await),
        }
    }

    async fn get(&self, id: &str) -> Result<StoredDocument, StoreError> {
        let response = self.request(Method::GET, &self.document_url(id)).send().await?;

        match response.status() {
            status if status.is_success() => {
                let body: Value = response.json().await?;
                stored_from_body(id, body)
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id.to_string())),
            _ => Err(unexpected(response).await),
        }
    }

    async fn put(&self, id: &str, document: &Value, rev: Option<&str>) -> Result<String, StoreError> {
        let body = prepare_body(id, document, rev)?;
        let response = self
            .request(Method::PUT, &self.document_url(id))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let saved: PutResponse = response.json().await?;
                debug!("💾 Documento {} guardado (rev {})", id, saved.rev);
                Ok(saved.rev)
            }
            StatusCode::CONFLICT => Err(StoreError::Conflict(id.to_string())),
            _ => Err(unexpected(response).await),
        }
    }

    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, &self.document_url(id))
            .query(&[("rev", rev)])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                debug!("🗑️ Documento {} eliminado", id);
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id.to_string())),
            StatusCode::CONFLICT => Err(StoreError::Conflict(id.to_string())),
            _ => Err(unexpected(response).await),
        }
    }

    async fn list_all(&self) -> Result<Vec<StoredDocument>, StoreError> {
        let url = format!("{}/_all_docs", self.database_url());
        let response = self
            .request(Method::GET, &url)
            .query(&[("include_docs", "true")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected(response).await);
        }

        let all_docs: AllDocsResponse = response.json().await?;
        all_docs
            .rows
            .into_iter()
            .filter(|row| !row.id.starts_with(DESIGN_DOC_PREFIX))
            .filter_map(|row| row.doc.map(|doc| (row.id, doc)))
            .map(|(id, doc)| stored_from_body(&id, doc))
            .collect()
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;

    match url[authority_start..].rfind('@') {
        Some(at_offset) => {
            let host = &url[authority_start + at_offset + 1..];
            format!("{}***:***@{}", &url[..authority_start], host)
        }
        None => url.to_string(),
    }
}
