use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attendance::{lenient_status, AttendanceStatus, Period};
use crate::utils::wire::{lenient_date, string_or_empty};

/// Resumen diario de viajes del conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,
    #[serde(rename = "morningCount", default)]
    pub morning_count: u32,
    #[serde(rename = "afternoonCount", default)]
    pub afternoon_count: u32,
}

impl TripSummary {
    /// Fecha como se muestra en la lista, p. ej. `Jan 5, 2025`
    pub fn formatted_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    pub fn total(&self) -> u32 {
        self.morning_count + self.afternoon_count
    }
}

/// Detalle de un estudiante en un día de viaje
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetail {
    #[serde(rename = "studentName", default, deserialize_with = "string_or_empty")]
    pub student_name: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub morning_attendance_status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub afternoon_attendance_status: Option<AttendanceStatus>,
}

impl TripDetail {
    pub fn status(&self, period: Period) -> Option<AttendanceStatus> {
        match period {
            Period::Morning => self.morning_attendance_status,
            Period::Afternoon => self.afternoon_attendance_status,
        }
    }
}
