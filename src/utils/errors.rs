//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente y su
//! conversión a avisos visibles para el conductor.

use thiserror::Error;

use crate::models::student::StudentId;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("An update for student {0} is already in progress")]
    MutationInFlight(StudentId),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Clasificación de un error según su origen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// La petición nunca llegó al backend o no volvió
    Transport,
    /// El backend respondió con un estado distinto de éxito
    Backend,
    /// Acción rechazada localmente, sin contactar al backend
    Precondition,
    /// Fallo local (almacenamiento, configuración, decodificación)
    Local,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Transport(_) => ErrorKind::Transport,
            AppError::Backend { .. } => ErrorKind::Backend,
            AppError::Precondition(_)
            | AppError::MutationInFlight(_)
            | AppError::Validation(_)
            | AppError::Session(_) => ErrorKind::Precondition,
            AppError::Decode(_)
            | AppError::NotFound(_)
            | AppError::Store(_)
            | AppError::Io(_)
            | AppError::Config(_) => ErrorKind::Local,
        }
    }

    /// Texto que se muestra al conductor
    pub fn user_notice(&self) -> String {
        match self {
            AppError::Transport(_) => "Network error. Please check your connection".to_string(),
            AppError::Backend { message, .. } => message.clone(),
            AppError::Decode(_) => "Unexpected response from server".to_string(),
            AppError::Precondition(msg) => msg.clone(),
            AppError::MutationInFlight(_) => "Please wait for the current update to finish".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Session(_) => "Session expired. Please login again".to_string(),
            AppError::Validation(_) => "Please fill all the fields correctly".to_string(),
            AppError::Store(_) | AppError::Io(_) => "Unable to access local storage".to_string(),
            AppError::Config(msg) => msg.clone(),
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de precondición
pub fn precondition_error(message: &str) -> AppError {
    AppError::Precondition(message.to_string())
}

/// Función helper para errores de sesión
pub fn session_error(missing_key: &str) -> AppError {
    AppError::Session(format!("'{}' not found in session store", missing_key))
}
