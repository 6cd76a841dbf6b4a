//! Mutaciones de asistencia
//!
//! Valida un cambio contra el estado visible del estudiante, lo envía al
//! backend y sólo después lo aplica. Desde la validación hasta que el
//! cambio queda aplicado el estudiante está bloqueado: otra acción sobre
//! él se rechaza sin contactar al backend.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::clients::StudentGateway;
use crate::dto::attendance_dto::MarkAttendanceRequest;
use crate::models::attendance::{AttendanceStatus, Period, RideStatus, StudentViewModel};
use crate::models::student::{DriverId, StudentId};
use crate::utils::errors::{precondition_error, AppError, AppResult};

use super::attendance_reconciler::patch_view;

/// Conjunto de claves con una petición en curso
///
/// Comprobar e insertar ocurre bajo el mismo lock, así dos intentos
/// simultáneos sobre la misma clave nunca pasan los dos.
pub struct InFlightGuard<K> {
    locked: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for InFlightGuard<K> {
    fn clone(&self) -> Self {
        Self {
            locked: Arc::clone(&self.locked),
        }
    }
}

impl<K> Default for InFlightGuard<K> {
    fn default() -> Self {
        Self {
            locked: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> InFlightGuard<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bloquea `key`; `None` si ya estaba bloqueada
    pub fn try_acquire(&self, key: K) -> Option<InFlightPermit<K>> {
        let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
        if !locked.insert(key.clone()) {
            return None;
        }
        debug!("🔒 {:?} bloqueado", key);
        Some(InFlightPermit {
            key,
            locked: Arc::clone(&self.locked),
        })
    }

    pub fn is_locked(&self, key: &K) -> bool {
        self.locked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

}

/// Bloqueo de una clave; se libera al soltarse, haya ido bien o mal
#[derive(Debug)]
pub struct InFlightPermit<K: Eq + Hash> {
    key: K,
    locked: Arc<Mutex<HashSet<K>>>,
}

impl<K: Eq + Hash> InFlightPermit<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for InFlightPermit<K> {
    fn drop(&mut self) {
        self.locked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Lo que el conductor pulsa sobre un estudiante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    Attendance(AttendanceStatus),
    Ride(RideStatus),
}

/// Cambio listo para enviarse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceChange {
    pub student_id: StudentId,
    pub period: Period,
    pub attendance_status: AttendanceStatus,
    pub ride_status: Option<RideStatus>,
}

impl AttendanceChange {
    /// Cambio explícito
    ///
    /// PRESENT sin viaje pasa a PICKED_UP. ABSENT no admite viaje.
    pub fn new(
        student_id: StudentId,
        period: Period,
        attendance_status: AttendanceStatus,
        ride_status: Option<RideStatus>,
    ) -> AppResult<Self> {
        let ride_status = match (attendance_status, ride_status) {
            (AttendanceStatus::Present, None) => Some(RideStatus::PickedUp),
            (AttendanceStatus::Present, ride) => ride,
            (AttendanceStatus::Absent, None) => None,
            (AttendanceStatus::Absent, Some(_)) => {
                return Err(precondition_error("Ride status requires the student to be present"))
            }
        };
        Ok(Self {
            student_id,
            period,
            attendance_status,
            ride_status,
        })
    }

    /// Traduce una acción sobre el estado visible del estudiante
    ///
    /// Reglas locales, sin tocar el backend:
    /// - una asistencia ya marcada sólo puede reenviarse con el mismo valor
    /// - el viaje exige PRESENT
    /// - DROPPED es final dentro del tramo
    pub fn resolve(view: &StudentViewModel, period: Period, action: AttendanceAction) -> AppResult<Self> {
        match action {
            AttendanceAction::Attendance(status) => {
                if let Some(current) = view.attendance_status.filter(|current| *current != status) {
                    return Err(AppError::Precondition(format!(
                        "Attendance already marked as {:?} for {}",
                        current,
                        period.as_str()
                    )));
                }
                // Reenviar PRESENT conserva el viaje ya registrado
                let ride = match status {
                    AttendanceStatus::Present => view.ride_status,
                    AttendanceStatus::Absent => None,
                };
                Self::new(view.id(), period, status, ride)
            }
            AttendanceAction::Ride(ride) => {
                if view.attendance_status != Some(AttendanceStatus::Present) {
                    return Err(precondition_error("Ride status requires the student to be present"));
                }
                if ride == RideStatus::PickedUp && view.ride_status == Some(RideStatus::Dropped) {
                    return Err(precondition_error("Student was already dropped off"));
                }
                Self::new(view.id(), period, AttendanceStatus::Present, Some(ride))
            }
        }
    }
}

/// Envía cambios de asistencia de a uno por estudiante
#[derive(Clone)]
pub struct AttendanceMutator {
    gateway: Arc<dyn StudentGateway>,
    guard: InFlightGuard<StudentId>,
}

impl AttendanceMutator {
    pub fn new(gateway: Arc<dyn StudentGateway>) -> Self {
        Self {
            gateway,
            guard: InFlightGuard::new(),
        }
    }

    pub fn is_in_flight(&self, student_id: StudentId) -> bool {
        self.guard.is_locked(&student_id)
    }

    /// Bloquea al estudiante hasta que se suelte el permiso
    ///
    /// Falla con `MutationInFlight` si ya hay un cambio en curso para él.
    /// Quien llama mantiene el permiso mientras valida, envía y aplica el
    /// cambio, así nada se valida contra una vista ya superada.
    pub fn try_lock(&self, student_id: StudentId) -> AppResult<InFlightPermit<StudentId>> {
        self.guard.try_acquire(student_id).ok_or_else(|| {
            warn!("⏳ Estudiante {} con un cambio en curso, se ignora", student_id);
            AppError::MutationInFlight(student_id)
        })
    }

    /// Persiste el cambio en el backend bajo el permiso del estudiante
    pub async fn submit(
        &self,
        permit: &InFlightPermit<StudentId>,
        driver_id: DriverId,
        date: NaiveDate,
        change: &AttendanceChange,
    ) -> AppResult<Option<String>> {
        if *permit.key() != change.student_id {
            return Err(AppError::Precondition(format!(
                "Lock held for student {}, not {}",
                permit.key(),
                change.student_id
            )));
        }

        let request = MarkAttendanceRequest::new(
            driver_id,
            change.student_id,
            date,
            change.period,
            change.attendance_status,
            change.ride_status,
        );

        match self.gateway.mark_attendance(&request).await {
            Ok(message) => {
                info!(
                    "✅ Estudiante {} -> {:?}/{:?} ({} {})",
                    change.student_id,
                    change.attendance_status,
                    change.ride_status,
                    change.period.as_str(),
                    date
                );
                Ok(message)
            }
            Err(e) => {
                error!("❌ No se pudo marcar al estudiante {}: {}", change.student_id, e);
                Err(e)
            }
        }
    }
}

/// Aplica un cambio confirmado a la lista de vista
pub fn apply_change(views: &mut [StudentViewModel], change: &AttendanceChange) -> bool {
    patch_view(views, change.student_id, change.attendance_status, change.ride_status)
}
