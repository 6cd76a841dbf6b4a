//! Servicio de verificación del conductor

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::cache::SessionStore;
use crate::clients::AccountGateway;
use crate::dto::driver_dto::DriverVerificationForm;
use crate::models::auth::VerificationStatus;
use crate::models::driver::DriverProfile;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct VerificationService {
    accounts: Arc<dyn AccountGateway>,
    session: SessionStore,
}

impl VerificationService {
    pub fn new(accounts: Arc<dyn AccountGateway>, session: SessionStore) -> Self {
        Self { accounts, session }
    }

    /// Envía los documentos; la cuenta queda pendiente de revisión
    pub async fn submit(&self, form: &DriverVerificationForm) -> AppResult<String> {
        form.validate()?;
        let user_id = self.session.driver_id().await?;

        let message = self.accounts.submit_driver(user_id, form).await?;
        self.session
            .set_verification_status(&VerificationStatus::Pending)
            .await?;
        info!("📤 Documentos enviados para el conductor {}", user_id);
        Ok(message)
    }

    /// Perfil del conductor desde el backend; queda cacheado
    pub async fn driver_details(&self) -> AppResult<DriverProfile> {
        let user_id = self.session.driver_id().await?;
        let profile = self.accounts.driver_details(user_id).await?;
        if let Err(e) = self.session.cache_driver(&profile).await {
            warn!("⚠️ No se pudo cachear el perfil del conductor: {}", e);
        }
        Ok(profile)
    }

    pub async fn cached_driver(&self) -> AppResult<Option<DriverProfile>> {
        self.session.cached_driver().await
    }
}
