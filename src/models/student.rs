use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::wire::{flexible_f64, flexible_i64, string_or_empty};

/// Identificador opaco de un estudiante (asignado por el backend)
pub type StudentId = i64;

/// Identificador del conductor (el `userId` de la sesión)
pub type DriverId = i64;

/// Par de coordenadas geográficas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Estudiante de la lista del conductor, tal como lo devuelve el backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: StudentId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub grade: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub school: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<Decimal>,
    #[serde(deserialize_with = "flexible_f64")]
    pub pickup_location_latitude: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub pickup_location_longitude: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub dropoff_location_latitude: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub dropoff_location_longitude: f64,
}

impl Student {
    pub fn pickup(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.pickup_location_latitude,
            longitude: self.pickup_location_longitude,
        }
    }

    pub fn dropoff(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.dropoff_location_latitude,
            longitude: self.dropoff_location_longitude,
        }
    }

    /// Búsqueda sin distinguir mayúsculas por nombre, colegio o curso
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.full_name, &self.school, &self.grade]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
