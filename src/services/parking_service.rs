//! Servicio del parqueo
//!
//! Libro de entradas y salidas: registra la entrada de un vehículo (con
//! control de placa duplicada), su salida con duración y tarifa, y permite
//! consultar, listar y eliminar registros.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use rand::Rng;
use tracing::{info, warn};

use crate::config::EnvironmentConfig;
use crate::database::DocumentStore;
use crate::models::{CheckOut, Vehicle};
use crate::repositories::VehicleRepository;
use crate::services::billing::ParkingCharge;
use crate::utils::errors::{LedgerError, LedgerResult};
use crate::utils::validation::{format_datetime, validate_datetime, validate_not_empty};

/// Fuente del prefijo de dos dígitos de los IDs
pub type PrefixSource = Arc<dyn Fn() -> u8 + Send + Sync>;

/// Parámetros fijos de esta puerta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSettings {
    pub gate: String,
    pub rate_per_hour: i64,
}

impl From<&EnvironmentConfig> for ParkingSettings {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            gate: config.gate.clone(),
            rate_per_hour: config.rate_per_hour,
        }
    }
}

/// ID del registro: prefijo aleatorio `00`..`99` seguido de la placa.
/// No se verifica que sea único.
pub fn vehicle_id(prefix: u8, car_number: &str) -> String {
    format!("{:02}{}", prefix % 100, car_number)
}

fn random_prefix() -> u8 {
    rand::thread_rng().gen_range(0..100)
}

fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

pub struct ParkingService {
    repository: VehicleRepository,
    settings: ParkingSettings,
    prefix_source: PrefixSource,
}

impl ParkingService {
    pub fn new(store: Arc<dyn DocumentStore>, settings: ParkingSettings) -> Self {
        Self {
            repository: VehicleRepository::new(store),
            settings,
            prefix_source: Arc::new(random_prefix),
        }
    }

    /// Reemplazar la fuente de prefijos (IDs deterministas en tests)
    pub fn with_prefix_source(mut self, prefix_source: PrefixSource) -> Self {
        self.prefix_source = prefix_source;
        self
    }

    pub fn settings(&self) -> &ParkingSettings {
        &self.settings
    }

    /// Todos los registros, en el orden del almacén
    pub async fn list_all(&self) -> LedgerResult<Vec<Vehicle>> {
        let vehicles = self.repository.find_all().await?;
        info!("📋 {} registros en el libro", vehicles.len());
        Ok(vehicles)
    }

    pub async fn get(&self, id: &str) -> LedgerResult<Vehicle> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Registrar la entrada con la hora actual
    pub async fn check_in(&self, car_number: &str) -> LedgerResult<Vehicle> {
        self.check_in_at(car_number, now()).await
    }

    /// Registrar la entrada en un instante dado.
    ///
    /// El escaneo de duplicados y la inserción no son atómicos: dos entradas
    /// simultáneas de la misma placa pueden pasar ambas.
    pub async fn check_in_at(&self, car_number: &str, now: DateTime<FixedOffset>) -> LedgerResult<Vehicle> {
        let car_number = validate_not_empty("El número de placa", car_number)?;

        if let Some(existing) = self.repository.find_active_by_plate(car_number).await? {
            warn!("🚫 Placa {} ya está dentro (registro {})", car_number, existing.id);
            return Err(LedgerError::Duplicate(car_number.to_string()));
        }

        let id = vehicle_id((self.prefix_source)(), car_number);
        let vehicle = Vehicle::checked_in(
            id,
            car_number.to_string(),
            format_datetime(&now),
            self.settings.gate.clone(),
        );

        let created = self.repository.create(&vehicle).await?;
        info!("🚗 Entrada {} por {} (ID {})", created.car_number, created.gate_in, created.id);
        Ok(created)
    }

    /// Registrar la salida con la hora actual
    pub async fn check_out(&self, id: &str) -> LedgerResult<Vehicle> {
        self.check_out_at(id, now()).await
    }

    /// Registrar la salida en un instante dado, con duración y tarifa.
    ///
    /// Se guarda con la revisión leída; si otro proceso modificó el
    /// documento entretanto, falla con un conflicto y no se reintenta.
    pub async fn check_out_at(&self, id: &str, now: DateTime<FixedOffset>) -> LedgerResult<Vehicle> {
        let mut vehicle = self.repository.find_by_id(id).await?;

        if !vehicle.is_inside() {
            return Err(LedgerError::AlreadyOut(id.to_string()));
        }

        let in_time = validate_datetime(&vehicle.in_time)?;
        let charge = ParkingCharge::compute(&in_time, &now, self.settings.rate_per_hour)?;

        vehicle.check_out(CheckOut {
            out_time: format_datetime(&now),
            gate_out: self.settings.gate.clone(),
            parking_duration: charge.duration_minutes,
            parking_rates: charge.fee,
        });

        let updated = self.repository.update(&vehicle).await?;
        info!(
            "🏁 Salida {} por {}: {} min, {} h, tarifa {}",
            updated.id, self.settings.gate, charge.duration_minutes, charge.hours_billed, charge.fee
        );
        Ok(updated)
    }

    /// Eliminar un registro sin importar su estado; devuelve el registro eliminado
    pub async fn delete(&self, id: &str) -> LedgerResult<Vehicle> {
        let vehicle = self.repository.find_by_id(id).await?;
        self.repository.delete(&vehicle).await?;
        info!("🗑️ Registro {} ({}) eliminado", vehicle.id, vehicle.car_number);
        Ok(vehicle)
    }
}
