//! Modelo de Vehicle
//!
//! Un documento por cada entrada física al parqueo. Se serializa tal cual
//! a CouchDB: `_id`/`_rev` reservados y el resto de campos en snake_case.

use serde::{Deserialize, Serialize};

/// Estado del vehículo dentro del parqueo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    In,
    Out,
}

/// Registro de entrada/salida de un vehículo
///
/// Con `status = in` los cuatro campos de salida están vacíos; con
/// `status = out` están todos presentes. Los vacíos se escriben como `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub car_number: String,
    pub in_time: String,
    #[serde(default)]
    pub out_time: Option<String>,
    pub status: VehicleStatus,
    pub gate_in: String,
    #[serde(default)]
    pub gate_out: Option<String>,
    #[serde(default)]
    pub parking_duration: Option<i64>,
    #[serde(default)]
    pub parking_rates: Option<i64>,
}

/// Datos calculados al registrar la salida
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOut {
    pub out_time: String,
    pub gate_out: String,
    pub parking_duration: i64,
    pub parking_rates: i64,
}

impl Vehicle {
    /// Nuevo registro de entrada, sin datos de salida
    pub fn checked_in(id: String, car_number: String, in_time: String, gate_in: String) -> Self {
        Self {
            id,
            rev: None,
            car_number,
            in_time,
            out_time: None,
            status: VehicleStatus::In,
            gate_in,
            gate_out: None,
            parking_duration: None,
            parking_rates: None,
        }
    }

    pub fn is_inside(&self) -> bool {
        self.status == VehicleStatus::In
    }

    /// Registrar la salida; es la única transición del registro
    pub fn check_out(&mut self, check_out: CheckOut) {
        self.status = VehicleStatus::Out;
        self.out_time = Some(check_out.out_time);
        self.gate_out = Some(check_out.gate_out);
        self.parking_duration = Some(check_out.parking_duration);
        self.parking_rates = Some(check_out.parking_rates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vehicle {
        Vehicle::checked_in(
            "07B1234XY".to_string(),
            "B1234XY".to_string(),
            "2024-03-01T08:00:00+07:00".to_string(),
            "manless_in_1".to_string(),
        )
    }

    #[test]
    fn test_checked_in_serializes_nulls() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "07B1234XY",
                "car_number": "B1234XY",
                "in_time": "2024-03-01T08:00:00+07:00",
                "out_time": null,
                "status": "in",
                "gate_in": "manless_in_1",
                "gate_out": null,
                "parking_duration": null,
                "parking_rates": null
            })
        );
    }

    #[test]
    fn test_missing_optional_keys_deserialize_as_none() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "_id": "07B1234XY",
            "_rev": "1-abc",
            "car_number": "B1234XY",
            "in_time": "2024-03-01T08:00:00+07:00",
            "status": "in",
            "gate_in": "manless_in_1"
        }))
        .unwrap();

        assert_eq!(vehicle.rev.as_deref(), Some("1-abc"));
        assert!(vehicle.is_inside());
        assert!(vehicle.out_time.is_none());
        assert!(vehicle.parking_rates.is_none());
    }

    #[test]
    fn test_check_out_fills_all_fields() {
        let mut vehicle = sample();
        vehicle.check_out(CheckOut {
            out_time: "2024-03-01T08:45:00+07:00".to_string(),
            gate_out: "manless_in_1".to_string(),
            parking_duration: 45,
            parking_rates: 2000,
        });

        assert_eq!(vehicle.status, VehicleStatus::Out);
        assert!(!vehicle.is_inside());
        assert_eq!(vehicle.out_time.as_deref(), Some("2024-03-01T08:45:00+07:00"));
        assert_eq!(vehicle.gate_out.as_deref(), Some("manless_in_1"));
        assert_eq!(vehicle.parking_duration, Some(45));
        assert_eq!(vehicle.parking_rates, Some(2000));

        let value = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(value["status"], "out");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<Vehicle, _> = serde_json::from_value(json!({
            "_id": "x",
            "car_number": "B1",
            "in_time": "2024-03-01T08:00:00+07:00",
            "status": "parked",
            "gate_in": "manless_in_1"
        }));
        assert!(result.is_err());
    }
}
