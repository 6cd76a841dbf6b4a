//! Configuración del almacenamiento de sesión
//!
//! Este módulo contiene la configuración del almacén clave-valor local y
//! las claves que se leen y escriben en él.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppResult;

use super::file_store::FileStore;
use super::memory_store::MemoryStore;
use super::KeyValueStore;

/// Dónde vive la sesión
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Sólo en memoria; se pierde al cerrar
    Memory,
    /// Objeto JSON en un fichero
    File(PathBuf),
}

/// Configuración del almacén
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File(PathBuf::from(crate::config::DEFAULT_STORE_PATH)),
        }
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
        }
    }

    pub fn from_environment(config: &EnvironmentConfig) -> Self {
        Self {
            backend: StoreBackend::File(PathBuf::from(&config.session_store_path)),
        }
    }

    /// Abre el almacén configurado
    pub async fn open(&self) -> AppResult<Arc<dyn KeyValueStore>> {
        match &self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::File(path) => Ok(Arc::new(FileStore::open(path.clone()).await?)),
        }
    }
}

/// Claves documentadas del almacén de sesión
pub mod keys {
    /// Id del conductor. Escribe: inicio de sesión. Leen: todas las pantallas.
    pub const USER_ID: &str = "userId";
    /// Estado de verificación. Escriben: inicio de sesión, refresco, envío del formulario.
    pub const VERIFICATION_STATUS: &str = "verification_status";
    /// `"true"` tras iniciar sesión. Escribe: inicio de sesión.
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    /// Lista de estudiantes en JSON. Escribe: cada carga correcta de la lista.
    pub const STUDENTS: &str = "students";
    /// Perfil del conductor en JSON. Escribe: carga del perfil.
    pub const DRIVER: &str = "driver";
}
