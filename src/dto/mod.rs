//! DTOs
//!
//! Cuerpos de petición y respuesta del backend, y los formularios que se
//! validan antes de enviarse.

pub mod attendance_dto;
pub mod auth_dto;
pub mod driver_dto;
pub mod student_dto;

use serde::{Deserialize, Serialize};

/// Cuerpo genérico `{ message }` / `{ error }` de las respuestas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiMessage {
    /// Mensaje para el conductor: `message`, luego `error`, luego genérico
    pub fn notice(&self) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("Something went wrong")
            .to_string()
    }
}

/// Cuerpo de `PUT /api/students/update-payment-status/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: String,
}
