//! Libro de entradas y salidas de un parqueo sobre CouchDB
//!
//! Registra entradas y salidas de vehículos, calcula duración y tarifa,
//! y permite listar, consultar y eliminar registros desde un menú de terminal.

pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
