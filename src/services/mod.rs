//! Services module
//!
//! Este módulo contiene la lógica de negocio del parqueo: el libro de
//! entradas y salidas y el cálculo de tarifas.

pub mod billing;
pub mod parking_service;

pub use billing::ParkingCharge;
pub use parking_service::{ParkingService, ParkingSettings, PrefixSource};
