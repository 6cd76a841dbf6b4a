//! Configuración del proyecto
//!
//! Este módulo contiene la lectura de variables de entorno del cliente.

pub mod environment;

pub use environment::*;
