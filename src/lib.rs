//! Núcleo del cliente para conductores de transporte escolar
//!
//! Gateway REST del backend, sesión local clave-valor, reconciliación de
//! asistencia y los servicios de cada pantalla. El binario
//! `driver-console` es una consola interactiva sobre esta librería.

pub mod cache;
pub mod clients;
pub mod config;
pub mod dto;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
