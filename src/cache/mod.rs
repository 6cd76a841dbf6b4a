//! Cache
//!
//! Este módulo contiene el almacén clave-valor local de la sesión: el
//! trait, sus implementaciones en memoria y en fichero, y la fachada
//! tipada que usan los servicios.

pub mod cache_config;
pub mod file_store;
pub mod memory_store;
pub mod session_store;

use async_trait::async_trait;

use crate::utils::errors::AppResult;

pub use cache_config::{keys, StoreBackend, StoreConfig};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use session_store::SessionStore;

/// Operaciones del almacén clave-valor (claves y valores string)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
    /// Borra todas las claves
    async fn clear(&self) -> AppResult<()>;
}
