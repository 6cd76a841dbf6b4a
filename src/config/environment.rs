//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: a qué backend se
//! conecta el cliente, cuánto espera cada petición y dónde guarda la
//! sesión local.

use std::env;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORE_PATH: &str = ".driver-session.json";

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub session_store_path: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_store_path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración del proceso (llamar después de `dotenvy::dotenv()`)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "API_BASE_URL must start with http:// or https://, got '{}'",
                api_base_url
            )));
        }

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("REQUEST_TIMEOUT_SECS must be a valid number, got '{}'", raw))
                })?;
                if secs == 0 {
                    return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be greater than 0".to_string()));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url,
            request_timeout,
            session_store_path: lookup("SESSION_STORE_PATH").unwrap_or(defaults.session_store_path),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
