//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que se guardan como documentos
//! en CouchDB.

pub mod vehicle;

pub use vehicle::{CheckOut, Vehicle, VehicleStatus};
