use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{UserRole, VerificationStatus};
use crate::utils::validation::validate_not_empty;
use crate::utils::wire::flexible_i64;

// Register request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "validate_not_empty")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_not_empty")]
    pub password: String,
    pub google_id: Option<String>,
    pub role: UserRole,
}

impl RegisterRequest {
    pub fn driver(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            google_id: None,
            role: UserRole::Driver,
        }
    }
}

// Sign-in request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_not_empty")]
    pub password: String,
}

// Sign-in response
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(rename = "userId", deserialize_with = "flexible_i64")]
    pub user_id: i64,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationStatusResponse {
    pub verification_status: VerificationStatus,
}
