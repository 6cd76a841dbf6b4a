use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::cache_config::keys;
use super::KeyValueStore;
use crate::models::auth::VerificationStatus;
use crate::models::driver::DriverProfile;
use crate::models::student::{DriverId, Student};
use crate::utils::errors::{session_error, AppResult};

/// Fachada tipada sobre el almacén clave-valor
///
/// Todos los accesos al estado persistido pasan por aquí; ver
/// [`keys`] para quién escribe cada clave.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Id del conductor con sesión abierta
    pub async fn driver_id(&self) -> AppResult<DriverId> {
        let raw = self
            .store
            .get(keys::USER_ID)
            .await?
            .ok_or_else(|| session_error(keys::USER_ID))?;
        raw.trim().parse::<DriverId>().map_err(|_| session_error(keys::USER_ID))
    }

    pub async fn is_logged_in(&self) -> AppResult<bool> {
        Ok(self.store.get(keys::IS_LOGGED_IN).await?.as_deref() == Some("true"))
    }

    /// Guarda el resultado de un inicio de sesión correcto
    pub async fn record_sign_in(&self, user_id: DriverId, status: &VerificationStatus) -> AppResult<()> {
        self.store.set(keys::USER_ID, &user_id.to_string()).await?;
        self.store.set(keys::VERIFICATION_STATUS, status.as_str()).await?;
        self.store.set(keys::IS_LOGGED_IN, "true").await?;
        info!("💾 Sesión guardada para el conductor {}", user_id);
        Ok(())
    }

    pub async fn verification_status(&self) -> AppResult<Option<VerificationStatus>> {
        Ok(self
            .store
            .get(keys::VERIFICATION_STATUS)
            .await?
            .map(|raw| VerificationStatus::parse(&raw)))
    }

    pub async fn set_verification_status(&self, status: &VerificationStatus) -> AppResult<()> {
        self.store.set(keys::VERIFICATION_STATUS, status.as_str()).await
    }

    /// Lista de estudiantes cacheada; vacía si no hay o no se puede leer
    pub async fn cached_students(&self) -> AppResult<Vec<Student>> {
        Ok(self.get_json(keys::STUDENTS).await?.unwrap_or_default())
    }

    pub async fn cache_students(&self, students: &[Student]) -> AppResult<()> {
        self.set_json(keys::STUDENTS, students).await
    }

    pub async fn cached_driver(&self) -> AppResult<Option<DriverProfile>> {
        self.get_json(keys::DRIVER).await
    }

    pub async fn cache_driver(&self, profile: &DriverProfile) -> AppResult<()> {
        self.set_json(keys::DRIVER, profile).await
    }

    /// Cierra la sesión: borra todas las claves
    pub async fn clear(&self) -> AppResult<()> {
        self.store.clear().await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            debug!("❌ Sin valor cacheado para {}", key);
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("⚠️ Valor cacheado ilegible para {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let serialized = serde_json::to_string(value)?;
        self.store.set(key, &serialized).await
    }
}
