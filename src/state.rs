//! Shared application state
//!
//! Este módulo arma el cliente del backend, la sesión y los servicios de
//! cada pantalla a partir de la configuración.

use std::sync::Arc;

use crate::cache::{KeyValueStore, SessionStore, StoreConfig};
use crate::clients::BackendClient;
use crate::config::environment::EnvironmentConfig;
use crate::services::{
    AttendanceBoard, AuthService, PaymentService, StudentService, TripService, VerificationService,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub backend: Arc<BackendClient>,
    pub session: SessionStore,
}

impl AppState {
    /// Abre el almacén de sesión configurado y crea el cliente HTTP
    pub async fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let store = StoreConfig::from_environment(&config).open().await?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: EnvironmentConfig, store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let backend = Arc::new(BackendClient::new(&config)?);
        Ok(Self {
            config,
            backend,
            session: SessionStore::new(store),
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.backend.clone(), self.session.clone())
    }

    pub fn verification(&self) -> VerificationService {
        VerificationService::new(self.backend.clone(), self.session.clone())
    }

    pub fn students(&self) -> StudentService {
        StudentService::new(self.backend.clone(), self.session.clone())
    }

    pub fn attendance_board(&self) -> AttendanceBoard {
        AttendanceBoard::new(self.backend.clone(), self.session.clone())
    }

    pub fn trips(&self) -> TripService {
        TripService::new(self.backend.clone(), self.session.clone())
    }

    pub fn payments(&self) -> PaymentService {
        PaymentService::new(self.backend.clone(), self.session.clone())
    }
}
