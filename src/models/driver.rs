use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::wire::{flag_bool, flexible_i64, lenient_date_opt, string_or_empty};

/// Perfil del conductor devuelto por `get-driver-details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(deserialize_with = "flexible_i64")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub nic_number: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub license_number: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone_num: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie_url: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_date_opt")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flag_bool")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "flag_bool")]
    pub is_pending: bool,
}

impl DriverProfile {
    /// URL absoluta del selfie, relativa al host del backend
    pub fn selfie_link(&self, base_url: &str) -> Option<String> {
        self.selfie_url
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/')))
    }

    pub fn badge(&self) -> &'static str {
        if self.is_verified {
            "Verified Driver"
        } else {
            "Pending Verification"
        }
    }
}
