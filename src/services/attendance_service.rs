//! Servicio de asistencia
//!
//! Estado de la pantalla de asistencia: tramo y fecha activos, lista de
//! estudiantes y registros crudos, y los modelos de vista reconciliados.
//! El estado vive tras un `Mutex` que nunca se mantiene durante una
//! petición, así varios estudiantes distintos pueden marcarse a la vez.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::cache::SessionStore;
use crate::clients::StudentGateway;
use crate::models::attendance::{
    AttendanceActions, AttendanceRecord, AttendanceStatus, Period, RideStatus, StudentViewModel,
};
use crate::models::student::{Student, StudentId};
use crate::utils::errors::{not_found_error, AppResult};

use super::attendance_mutator::{apply_change, AttendanceAction, AttendanceChange, AttendanceMutator};
use super::attendance_reconciler::{patch_records, reconcile};

/// Resultado de una carga de la pantalla
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub students: usize,
    pub records: usize,
    /// `false` si la fecha cambió durante la carga y el resultado se descartó
    pub applied: bool,
    /// Aviso para el conductor si la asistencia no pudo cargarse
    pub attendance_notice: Option<String>,
}

#[derive(Debug)]
struct BoardState {
    period: Period,
    date: NaiveDate,
    roster: Vec<Student>,
    records: Vec<AttendanceRecord>,
    views: Vec<StudentViewModel>,
}

impl BoardState {
    fn rebuild(&mut self) {
        self.views = reconcile(&self.roster, &self.records, self.period);
    }
}

/// Pantalla de asistencia
pub struct AttendanceBoard {
    students: Arc<dyn StudentGateway>,
    session: SessionStore,
    mutator: AttendanceMutator,
    state: Mutex<BoardState>,
}

impl AttendanceBoard {
    /// Tablero vacío para hoy, tramo de mañana
    pub fn new(students: Arc<dyn StudentGateway>, session: SessionStore) -> Self {
        Self {
            mutator: AttendanceMutator::new(Arc::clone(&students)),
            students,
            session,
            state: Mutex::new(BoardState {
                period: Period::Morning,
                date: Local::now().date_naive(),
                roster: Vec::new(),
                records: Vec::new(),
                views: Vec::new(),
            }),
        }
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        self.state().date = date;
        self
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn period(&self) -> Period {
        self.state().period
    }

    pub fn date(&self) -> NaiveDate {
        self.state().date
    }

    /// Cambia la fecha; los registros del día anterior se descartan hasta el próximo `load`
    pub fn set_date(&self, date: NaiveDate) {
        let mut state = self.state();
        if state.date != date {
            state.date = date;
            state.records.clear();
            state.rebuild();
        }
    }

    /// Carga lista y asistencia en paralelo y reconcilia
    ///
    /// Si falla la lista el estado no cambia. Si sólo falla la asistencia
    /// se reconcilia sin registros y el aviso viaja en el `LoadReport`.
    pub async fn load(&self) -> AppResult<LoadReport> {
        let driver_id = self.session.driver_id().await?;
        let date = self.date();

        let (roster, records) = tokio::join!(
            self.students.fetch_students(driver_id),
            self.students.fetch_attendance(driver_id, date)
        );

        let roster = roster?;
        if let Err(e) = self.session.cache_students(&roster).await {
            warn!("⚠️ No se pudo cachear la lista de estudiantes: {}", e);
        }

        let (records, attendance_notice) = match records {
            Ok(records) => (records, None),
            Err(e) => {
                warn!("⚠️ Asistencia no disponible para {}, se muestra sin marcar: {}", date, e);
                (Vec::new(), Some(e.user_notice()))
            }
        };

        let mut report = LoadReport {
            students: roster.len(),
            records: records.len(),
            applied: false,
            attendance_notice,
        };

        let mut state = self.state();
        if state.date != date {
            warn!("⚠️ La fecha cambió durante la carga, se descarta el resultado de {}", date);
            return Ok(report);
        }
        report.applied = true;
        state.roster = roster;
        state.records = records;
        state.rebuild();
        info!(
            "📋 Asistencia {} {}: {} estudiantes, {} registros",
            date,
            state.period.as_str(),
            report.students,
            report.records
        );
        Ok(report)
    }

    /// Cambia el tramo activo y reconcilia desde cero; `false` si no cambió
    pub fn set_period(&self, period: Period) -> bool {
        let mut state = self.state();
        if state.period == period {
            return false;
        }
        state.period = period;
        state.rebuild();
        true
    }

    pub fn students(&self) -> Vec<StudentViewModel> {
        self.state().views.clone()
    }

    pub fn student(&self, student_id: StudentId) -> Option<StudentViewModel> {
        self.state().views.iter().find(|v| v.id() == student_id).cloned()
    }

    /// Estudiantes cuyo nombre, colegio o curso contiene `query`
    pub fn filtered(&self, query: &str) -> Vec<StudentViewModel> {
        self.state()
            .views
            .iter()
            .filter(|v| v.student.matches(query))
            .cloned()
            .collect()
    }

    /// Acciones habilitadas para un estudiante, teniendo en cuenta el bloqueo
    pub fn action_state(&self, student_id: StudentId) -> Option<AttendanceActions> {
        let in_flight = self.mutator.is_in_flight(student_id);
        self.state()
            .views
            .iter()
            .find(|v| v.id() == student_id)
            .map(|v| v.allowed_actions(in_flight))
    }

    pub async fn mark_attendance(&self, student_id: StudentId, status: AttendanceStatus) -> AppResult<Option<String>> {
        self.apply(student_id, AttendanceAction::Attendance(status)).await
    }

    pub async fn mark_ride(&self, student_id: StudentId, ride: RideStatus) -> AppResult<Option<String>> {
        self.apply(student_id, AttendanceAction::Ride(ride)).await
    }

    /// Valida, envía y aplica un cambio con el estudiante bloqueado
    ///
    /// El permiso se toma antes de leer la vista y se suelta después de
    /// parchearla: una segunda acción sobre el mismo estudiante nunca se
    /// valida contra el estado previo a un cambio confirmado.
    async fn apply(&self, student_id: StudentId, action: AttendanceAction) -> AppResult<Option<String>> {
        let driver_id = self.session.driver_id().await?;
        let permit = self.mutator.try_lock(student_id)?;

        let (change, date) = {
            let state = self.state();
            let view = state
                .views
                .iter()
                .find(|v| v.id() == student_id)
                .ok_or_else(|| not_found_error("Student", &student_id.to_string()))?;
            (AttendanceChange::resolve(view, state.period, action)?, state.date)
        };

        let message = self.mutator.submit(&permit, driver_id, date, &change).await?;

        let mut state = self.state();
        if state.date != date {
            return Ok(message);
        }
        patch_records(
            &mut state.records,
            change.student_id,
            change.period,
            change.attendance_status,
            change.ride_status,
        );
        if state.period == change.period {
            apply_change(&mut state.views, &change);
        }
        drop(state);
        drop(permit);
        Ok(message)
    }
}
