//! Interfaz de terminal

pub mod menu;

pub use menu::Menu;
