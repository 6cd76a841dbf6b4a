use serde::{Deserialize, Serialize};

/// Estado de verificación del conductor tal como lo guarda el backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    NotVerified,
    Pending,
    AutoApproved,
    AutoDisapproved,
    Verified,
    Other(String),
}

impl VerificationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::NotVerified => "not_verified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::AutoApproved => "auto_approved",
            VerificationStatus::AutoDisapproved => "auto_disapproved",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "not_verified" => VerificationStatus::NotVerified,
            "pending" => VerificationStatus::Pending,
            "auto_approved" => VerificationStatus::AutoApproved,
            "auto_disapproved" => VerificationStatus::AutoDisapproved,
            "verified" => VerificationStatus::Verified,
            other => VerificationStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for VerificationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VerificationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(VerificationStatus::parse(&raw))
    }
}

/// Pantalla a la que lleva el estado de la sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SignIn,
    Verification,
    PendingVerification,
    Home,
}

impl Destination {
    /// Sesión abierta: decide según el estado de verificación
    pub fn for_status(status: &VerificationStatus) -> Self {
        match status {
            VerificationStatus::NotVerified => Destination::Verification,
            VerificationStatus::Pending
            | VerificationStatus::AutoApproved
            | VerificationStatus::AutoDisapproved => Destination::PendingVerification,
            VerificationStatus::Verified => Destination::Home,
            VerificationStatus::Other(_) => Destination::SignIn,
        }
    }
}

/// Rol con el que se registra la cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Driver,
}
