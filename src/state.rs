//! Estado compartido de la aplicación
//!
//! La conexión al almacén se abre una sola vez al iniciar y se mantiene
//! durante toda la vida del proceso.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use crate::database::connection::mask_database_url;
use crate::database::{CouchDbConnection, DocumentStore, InMemoryStore};
use crate::services::{ParkingService, ParkingSettings};

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub parking_service: ParkingService,
}

impl AppState {
    /// Abrir el almacén configurado y asegurar que la base de datos existe
    pub async fn connect(config: &EnvironmentConfig, database: &DatabaseConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::CouchDb => {
                info!("🔗 Conectando a CouchDB: {}", mask_database_url(&database.url));
                Arc::new(CouchDbConnection::new(database)?)
            }
            StoreBackend::Memory => {
                warn!("⚠️ Almacén en memoria: los registros se pierden al salir");
                Arc::new(InMemoryStore::new())
            }
        };

        store
            .create_database()
            .await
            .with_context(|| format!("No se pudo preparar la base de datos '{}'", database.name))?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: &EnvironmentConfig, store: Arc<dyn DocumentStore>) -> Self {
        let parking_service = ParkingService::new(store.clone(), ParkingSettings::from(config));
        Self {
            store,
            parking_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = EnvironmentConfig::from_lookup(|name| match name {
            "STORE_BACKEND" => Some("memory".to_string()),
            "PARKING_RATE_PER_HOUR" => Some("1500".to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::connect(&config, &DatabaseConfig::default()).await.unwrap();
        assert_eq!(state.parking_service.settings().rate_per_hour, 1500);
        assert_eq!(state.parking_service.settings().gate, "manless_in_1");

        let vehicle = state.parking_service.check_in("B1234XY").await.unwrap();
        assert!(state.store.get(&vehicle.id).await.is_ok());
    }
}
