//! Modelos de asistencia
//!
//! Cada registro diario tiene cuatro estados independientes: asistencia y
//! viaje, por la mañana y por la tarde. El backend puede mandar `null`,
//! `""` o el valor en minúsculas; todo lo que no se reconoce se trata
//! como "sin marcar".

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use super::student::{Student, StudentId};
use crate::utils::wire::flexible_i64;

/// Tramo del día
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "MORNING",
            Period::Afternoon => "AFTERNOON",
        }
    }

    pub fn other(&self) -> Period {
        match self {
            Period::Morning => Period::Afternoon,
            Period::Afternoon => Period::Morning,
        }
    }
}

/// Estados que el backend envía como texto
pub trait WireStatus: Sized {
    fn as_str(&self) -> &'static str;
    fn parse(raw: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl WireStatus for AttendanceStatus {
    fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PRESENT" => Some(AttendanceStatus::Present),
            "ABSENT" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    PickedUp,
    Dropped,
}

impl WireStatus for RideStatus {
    fn as_str(&self) -> &'static str {
        match self {
            RideStatus::PickedUp => "PICKED_UP",
            RideStatus::Dropped => "DROPPED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PICKED_UP" => Some(RideStatus::PickedUp),
            "DROPPED" => Some(RideStatus::Dropped),
            _ => None,
        }
    }
}

/// Estado opcional tolerante: `null`, `""` y valores desconocidos son `None`
pub fn lenient_status<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireStatus,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => {
            let parsed = T::parse(value);
            if parsed.is_none() {
                tracing::warn!("⚠️ Estado desconocido recibido del backend: '{}'", value);
            }
            parsed
        }
    })
}

/// Registro de asistencia de un estudiante para una fecha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(deserialize_with = "flexible_i64")]
    pub student_id: StudentId,
    #[serde(default, deserialize_with = "lenient_status")]
    pub morning_attendance_status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub morning_ride_status: Option<RideStatus>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub afternoon_attendance_status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub afternoon_ride_status: Option<RideStatus>,
}

impl AttendanceRecord {
    pub fn empty(student_id: StudentId) -> Self {
        Self {
            student_id,
            morning_attendance_status: None,
            morning_ride_status: None,
            afternoon_attendance_status: None,
            afternoon_ride_status: None,
        }
    }

    /// Estados crudos del tramo pedido
    pub fn slot(&self, period: Period) -> (Option<AttendanceStatus>, Option<RideStatus>) {
        match period {
            Period::Morning => (self.morning_attendance_status, self.morning_ride_status),
            Period::Afternoon => (self.afternoon_attendance_status, self.afternoon_ride_status),
        }
    }

    pub fn set_slot(
        &mut self,
        period: Period,
        attendance: Option<AttendanceStatus>,
        ride: Option<RideStatus>,
    ) {
        match period {
            Period::Morning => {
                self.morning_attendance_status = attendance;
                self.morning_ride_status = ride;
            }
            Period::Afternoon => {
                self.afternoon_attendance_status = attendance;
                self.afternoon_ride_status = ride;
            }
        }
    }
}

/// Estudiante con el estado resuelto para el tramo activo
///
/// Efímero: se recalcula cada vez que cambia la lista, los registros o el
/// tramo. Nunca se persiste.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentViewModel {
    pub student: Student,
    pub attendance_status: Option<AttendanceStatus>,
    pub ride_status: Option<RideStatus>,
}

impl StudentViewModel {
    /// El estado de viaje sólo sobrevive si el estudiante está presente
    pub fn new(
        student: Student,
        attendance_status: Option<AttendanceStatus>,
        ride_status: Option<RideStatus>,
    ) -> Self {
        let ride_status = match attendance_status {
            Some(AttendanceStatus::Present) => ride_status,
            _ => None,
        };
        Self {
            student,
            attendance_status,
            ride_status,
        }
    }

    pub fn id(&self) -> StudentId {
        self.student.id
    }

    /// Acciones habilitadas para este estudiante
    pub fn allowed_actions(&self, in_flight: bool) -> AttendanceActions {
        let present = self.attendance_status == Some(AttendanceStatus::Present);
        AttendanceActions {
            in_flight,
            mark_present: !in_flight
                && matches!(self.attendance_status, None | Some(AttendanceStatus::Present)),
            mark_absent: !in_flight
                && matches!(self.attendance_status, None | Some(AttendanceStatus::Absent)),
            pick_up: !in_flight && present && self.ride_status != Some(RideStatus::Dropped),
            drop_off: !in_flight && present,
        }
    }
}

/// Qué botones tiene activos un estudiante en la pantalla de asistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceActions {
    pub in_flight: bool,
    pub mark_present: bool,
    pub mark_absent: bool,
    pub pick_up: bool,
    pub drop_off: bool,
}
