//! Servicio de autenticación
//!
//! Registro, inicio y cierre de sesión, y la decisión de a qué pantalla
//! lleva la sesión guardada al arrancar.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::cache::SessionStore;
use crate::clients::AccountGateway;
use crate::dto::auth_dto::{RegisterRequest, SignInRequest};
use crate::models::auth::{Destination, VerificationStatus};
use crate::utils::errors::AppResult;

/// Servicio de autenticación del conductor
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountGateway>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountGateway>, session: SessionStore) -> Self {
        Self { accounts, session }
    }

    /// Crea una cuenta de conductor
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<String> {
        let request = RegisterRequest::driver(name, email, password);
        request.validate()?;

        let message = self.accounts.register(&request).await?;
        info!("✅ Cuenta creada para {}", request.email);
        Ok(message)
    }

    /// Inicia sesión, guarda la sesión y devuelve la pantalla siguiente
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Destination> {
        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.accounts.sign_in(&request).await?;
        self.session
            .record_sign_in(response.user_id, &response.verification_status)
            .await?;

        let destination = Destination::for_status(&response.verification_status);
        info!(
            "🔐 Conductor {} autenticado ({}) -> {:?}",
            response.user_id,
            response.verification_status.as_str(),
            destination
        );
        Ok(destination)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.session.clear().await?;
        info!("👋 Sesión cerrada");
        Ok(())
    }

    /// Pide el estado de verificación al backend y lo guarda
    pub async fn refresh_verification_status(&self) -> AppResult<VerificationStatus> {
        let user_id = self.session.driver_id().await?;
        let status = self.accounts.verification_status(user_id).await?;
        self.session.set_verification_status(&status).await?;
        info!("🔄 Estado de verificación de {}: {}", user_id, status.as_str());
        Ok(status)
    }

    /// Pantalla inicial según la sesión guardada
    ///
    /// Si el refresco falla se decide con el último estado guardado.
    pub async fn resolve_launch_destination(&self) -> AppResult<Destination> {
        if !self.session.is_logged_in().await? {
            return Ok(Destination::SignIn);
        }
        if self.session.driver_id().await.is_err() {
            warn!("⚠️ Sesión marcada como abierta pero sin userId");
            return Ok(Destination::SignIn);
        }

        let status = match self.refresh_verification_status().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("⚠️ No se pudo refrescar la verificación, se usa la guardada: {}", e);
                self.session.verification_status().await?
            }
        };

        Ok(status
            .map(|status| Destination::for_status(&status))
            .unwrap_or(Destination::SignIn))
    }
}
