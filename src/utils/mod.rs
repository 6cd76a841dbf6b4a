//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y lectura tolerante de los campos que envía el backend.

pub mod errors;
pub mod validation;
pub mod wire;

pub use errors::{AppError, AppResult, ErrorKind};
