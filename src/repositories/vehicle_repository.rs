//! Repository de vehículos
//!
//! CRUD tipado sobre el almacén de documentos. Cada documento guarda un
//! `Vehicle`; los que no decodifican se ignoran al listar.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::database::{DocumentStore, StoredDocument};
use crate::models::Vehicle;
use crate::utils::errors::StoreError;

#[derive(Clone)]
pub struct VehicleRepository {
    store: Arc<dyn DocumentStore>,
}

fn decode(document: StoredDocument) -> Result<Vehicle, StoreError> {
    let mut vehicle: Vehicle = serde_json::from_value(document.body)?;
    vehicle.rev = Some(document.rev);
    Ok(vehicle)
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Vehicle, StoreError> {
        let document = self.store.get(id).await?;
        decode(document)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, StoreError> {
        let documents = self.store.list_all().await?;

        let vehicles = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id.clone();
                match decode(document) {
                    Ok(vehicle) => Some(vehicle),
                    Err(e) => {
                        warn!("⚠️ Documento {} ignorado, no es un vehículo: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        Ok(vehicles)
    }

    /// Primer documento con esa placa que sigue dentro (escaneo completo).
    ///
    /// Compara los campos crudos `car_number` y `status`, así que también
    /// cuenta un registro al que le faltan otros campos del vehículo.
    pub async fn find_active_by_plate(&self, car_number: &str) -> Result<Option<StoredDocument>, StoreError> {
        let documents = self.store.list_all().await?;
        Ok(documents.into_iter().find(|document| {
            document.body.get("car_number").and_then(Value::as_str) == Some(car_number)
                && document.body.get("status").and_then(Value::as_str) == Some("in")
        }))
    }

    pub async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, StoreError> {
        let document = serde_json::to_value(vehicle)?;
        let rev = self.store.put(&vehicle.id, &document, None).await?;

        let mut created = vehicle.clone();
        created.rev = Some(rev);
        Ok(created)
    }

    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, StoreError> {
        let rev = vehicle
            .rev
            .as_deref()
            .ok_or_else(|| StoreError::InvalidDocument(format!("vehículo '{}' sin revisión", vehicle.id)))?;

        let document = serde_json::to_value(vehicle)?;
        let new_rev = self.store.put(&vehicle.id, &document, Some(rev)).await?;

        let mut updated = vehicle.clone();
        updated.rev = Some(new_rev);
        Ok(updated)
    }

    pub async fn delete(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        let rev = vehicle
            .rev
            .as_deref()
            .ok_or_else(|| StoreError::InvalidDocument(format!("vehículo '{}' sin revisión", vehicle.id)))?;

        self.store.delete(&vehicle.id, rev).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use serde_json::json;

    fn vehicle(id: &str, plate: &str) -> Vehicle {
        Vehicle::checked_in(
            id.to_string(),
            plate.to_string(),
            "2024-03-01T08:00:00+07:00".to_string(),
            "manless_in_1".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = VehicleRepository::new(Arc::new(InMemoryStore::new()));
        let created = repository.create(&vehicle("07B1", "B1")).await.unwrap();
        assert!(created.rev.is_some());

        let found = repository.find_by_id("07B1").await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_update_with_stale_revision_conflicts() {
        let repository = VehicleRepository::new(Arc::new(InMemoryStore::new()));
        let created = repository.create(&vehicle("07B1", "B1")).await.unwrap();

        let mut fresh = created.clone();
        fresh.gate_in = "manless_in_2".to_string();
        repository.update(&fresh).await.unwrap();

        let result = repository.update(&created).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(repository.find_by_id("07B1").await.unwrap().gate_in, "manless_in_2");
    }

    #[tokio::test]
    async fn test_find_all_skips_foreign_documents() {
        let store = Arc::new(InMemoryStore::new());
        store.put("config", &json!({"theme": "dark"}), None).await.unwrap();

        let repository = VehicleRepository::new(store);
        repository.create(&vehicle("07B1", "B1")).await.unwrap();

        let all = repository.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].car_number, "B1");
    }

    #[tokio::test]
    async fn test_find_active_by_plate() {
        let repository = VehicleRepository::new(Arc::new(InMemoryStore::new()));
        repository.create(&vehicle("07B1", "B1")).await.unwrap();

        assert_eq!(repository.find_active_by_plate("B1").await.unwrap().unwrap().id, "07B1");
        assert!(repository.find_active_by_plate("B2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_plate_counts_incomplete_records() {
        let store = Arc::new(InMemoryStore::new());
        store
            .put("11B1", &json!({"car_number": "B1", "status": "in"}), None)
            .await
            .unwrap();
        store
            .put("12B2", &json!({"car_number": "B2", "status": "out"}), None)
            .await
            .unwrap();

        let repository = VehicleRepository::new(store);
        assert!(repository.find_all().await.unwrap().is_empty());
        assert_eq!(repository.find_active_by_plate("B1").await.unwrap().unwrap().id, "11B1");
        assert!(repository.find_active_by_plate("B2").await.unwrap().is_none());
    }
}
