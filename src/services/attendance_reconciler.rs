//! Reconciliación de asistencia
//!
//! Cruza la lista de estudiantes con los registros del día y resuelve, para
//! el tramo activo, el par (asistencia, viaje) de cada estudiante. Son
//! funciones puras: sin red, sin almacén y sin estado propio.

use std::collections::HashMap;

use tracing::warn;

use crate::models::attendance::{AttendanceRecord, AttendanceStatus, Period, RideStatus, StudentViewModel};
use crate::models::student::{Student, StudentId};

/// Un modelo de vista por estudiante, en el orden de `roster`
///
/// Sin registro, o con el tramo vacío, el estudiante queda sin marcar. Si
/// el backend devuelve varios registros para el mismo estudiante gana el
/// último.
pub fn reconcile(roster: &[Student], records: &[AttendanceRecord], period: Period) -> Vec<StudentViewModel> {
    let by_student = index_records(records);

    roster
        .iter()
        .map(|student| resolve(student, by_student.get(&student.id).copied(), period))
        .collect()
}

/// Resuelve un estudiante contra su registro (si lo hay)
pub fn resolve(student: &Student, record: Option<&AttendanceRecord>, period: Period) -> StudentViewModel {
    let (attendance, ride) = record.map(|r| r.slot(period)).unwrap_or((None, None));
    StudentViewModel::new(student.clone(), attendance, ride)
}

fn index_records(records: &[AttendanceRecord]) -> HashMap<StudentId, &AttendanceRecord> {
    let mut by_student = HashMap::with_capacity(records.len());
    for record in records {
        if by_student.insert(record.student_id, record).is_some() {
            warn!(
                "⚠️ Registro de asistencia duplicado para el estudiante {}, se usa el último",
                record.student_id
            );
        }
    }
    by_student
}

/// Sustituye el estado de un único estudiante en la lista de vista
///
/// Devuelve `false` si el estudiante no está en la lista.
pub fn patch_view(
    views: &mut [StudentViewModel],
    student_id: StudentId,
    attendance: AttendanceStatus,
    ride: Option<RideStatus>,
) -> bool {
    match views.iter_mut().find(|view| view.id() == student_id) {
        Some(view) => {
            *view = StudentViewModel::new(view.student.clone(), Some(attendance), ride);
            true
        }
        None => false,
    }
}

/// Escribe el cambio en los registros crudos del día
///
/// Así un cambio de tramo posterior (que vuelve a reconciliar todo) no lo
/// pierde. Si el estudiante no tenía registro se crea uno.
pub fn patch_records(
    records: &mut Vec<AttendanceRecord>,
    student_id: StudentId,
    period: Period,
    attendance: AttendanceStatus,
    ride: Option<RideStatus>,
) {
    let mut found = false;
    for record in records.iter_mut().filter(|r| r.student_id == student_id) {
        record.set_slot(period, Some(attendance), ride);
        found = true;
    }
    if !found {
        let mut record = AttendanceRecord::empty(student_id);
        record.set_slot(period, Some(attendance), ride);
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: StudentId) -> Student {
        Student {
            id,
            full_name: format!("Student {}", id),
            grade: "5".into(),
            school: "Royal College".into(),
            address: String::new(),
            phone: String::new(),
            parent_name: None,
            monthly_fee: None,
            pickup_location_latitude: 6.9,
            pickup_location_longitude: 79.8,
            dropoff_location_latitude: 6.8,
            dropoff_location_longitude: 79.9,
        }
    }

    fn record(
        id: StudentId,
        morning: (Option<AttendanceStatus>, Option<RideStatus>),
        afternoon: (Option<AttendanceStatus>, Option<RideStatus>),
    ) -> AttendanceRecord {
        AttendanceRecord {
            student_id: id,
            morning_attendance_status: morning.0,
            morning_ride_status: morning.1,
            afternoon_attendance_status: afternoon.0,
            afternoon_ride_status: afternoon.1,
        }
    }

    fn statuses(views: &[StudentViewModel]) -> Vec<(StudentId, Option<AttendanceStatus>, Option<RideStatus>)> {
        views
            .iter()
            .map(|v| (v.id(), v.attendance_status, v.ride_status))
            .collect()
    }

    #[test]
    fn test_keeps_roster_length_and_order() {
        let roster = vec![student(3), student(1), student(2)];
        let records = vec![
            record(2, (Some(AttendanceStatus::Absent), None), (None, None)),
            record(9, (Some(AttendanceStatus::Present), None), (None, None)),
        ];

        for period in [Period::Morning, Period::Afternoon] {
            let views = reconcile(&roster, &records, period);
            let ids: Vec<StudentId> = views.iter().map(StudentViewModel::id).collect();
            assert_eq!(ids, vec![3, 1, 2]);
        }
    }

    #[test]
    fn test_empty_roster_gives_empty_result() {
        let records = vec![record(1, (Some(AttendanceStatus::Present), None), (None, None))];
        assert!(reconcile(&[], &records, Period::Morning).is_empty());
    }

    #[test]
    fn test_missing_record_is_unset_for_both_periods() {
        let roster = vec![student(1)];
        for period in [Period::Morning, Period::Afternoon] {
            assert_eq!(statuses(&reconcile(&roster, &[], period)), vec![(1, None, None)]);
        }
    }

    #[test]
    fn test_ride_is_dropped_unless_present() {
        let roster = vec![student(1), student(2)];
        let records = vec![
            record(1, (Some(AttendanceStatus::Absent), Some(RideStatus::PickedUp)), (None, None)),
            record(2, (None, Some(RideStatus::Dropped)), (None, Some(RideStatus::PickedUp))),
        ];

        for period in [Period::Morning, Period::Afternoon] {
            for view in reconcile(&roster, &records, period) {
                if view.attendance_status != Some(AttendanceStatus::Present) {
                    assert_eq!(view.ride_status, None);
                }
            }
        }
    }

    #[test]
    fn test_period_round_trip_reproduces_morning() {
        let roster = vec![student(1), student(2)];
        let records = vec![
            record(
                1,
                (Some(AttendanceStatus::Present), Some(RideStatus::Dropped)),
                (Some(AttendanceStatus::Absent), None),
            ),
            record(2, (None, None), (Some(AttendanceStatus::Present), Some(RideStatus::PickedUp))),
        ];

        let morning = reconcile(&roster, &records, Period::Morning);
        let afternoon = reconcile(&roster, &records, Period::Afternoon);
        let back = reconcile(&roster, &records, Period::Morning);

        assert_ne!(morning, afternoon);
        assert_eq!(morning, back);
    }

    #[test]
    fn test_morning_present_picked_up_scenario() {
        let roster = vec![student(1)];
        let records = vec![record(
            1,
            (Some(AttendanceStatus::Present), Some(RideStatus::PickedUp)),
            (None, None),
        )];

        assert_eq!(
            statuses(&reconcile(&roster, &records, Period::Morning)),
            vec![(1, Some(AttendanceStatus::Present), Some(RideStatus::PickedUp))]
        );
        assert_eq!(
            statuses(&reconcile(&roster, &records, Period::Afternoon)),
            vec![(1, None, None)]
        );
    }

    #[test]
    fn test_duplicate_records_last_one_wins() {
        let roster = vec![student(1)];
        let records = vec![
            record(1, (Some(AttendanceStatus::Absent), None), (None, None)),
            record(1, (Some(AttendanceStatus::Present), Some(RideStatus::Dropped)), (None, None)),
        ];

        assert_eq!(
            statuses(&reconcile(&roster, &records, Period::Morning)),
            vec![(1, Some(AttendanceStatus::Present), Some(RideStatus::Dropped))]
        );
    }

    #[test]
    fn test_patch_view_touches_only_one_student() {
        let roster = vec![student(1), student(2)];
        let records = vec![
            record(1, (Some(AttendanceStatus::Present), Some(RideStatus::PickedUp)), (None, None)),
            record(2, (Some(AttendanceStatus::Present), Some(RideStatus::PickedUp)), (None, None)),
        ];
        let mut views = reconcile(&roster, &records, Period::Morning);
        let before = views.clone();

        assert!(patch_view(&mut views, 1, AttendanceStatus::Absent, Some(RideStatus::PickedUp)));
        assert_eq!(views[0].attendance_status, Some(AttendanceStatus::Absent));
        assert_eq!(views[0].ride_status, None);
        assert_eq!(views[1], before[1]);

        assert!(!patch_view(&mut views, 42, AttendanceStatus::Present, None));
    }

    #[test]
    fn test_patch_records_creates_missing_record() {
        let mut records = vec![record(1, (Some(AttendanceStatus::Absent), None), (None, None))];

        patch_records(&mut records, 2, Period::Afternoon, AttendanceStatus::Present, Some(RideStatus::PickedUp));
        patch_records(&mut records, 1, Period::Afternoon, AttendanceStatus::Present, None);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].slot(Period::Morning), (Some(AttendanceStatus::Absent), None));
        assert_eq!(records[0].slot(Period::Afternoon), (Some(AttendanceStatus::Present), None));
        assert_eq!(
            records[1].slot(Period::Afternoon),
            (Some(AttendanceStatus::Present), Some(RideStatus::PickedUp))
        );
        assert_eq!(records[1].slot(Period::Morning), (None, None));
    }
}
