use chrono::NaiveDate;
use serde::Serialize;

use crate::models::attendance::{AttendanceStatus, Period, RideStatus};
use crate::models::student::{DriverId, StudentId};

/// Cuerpo de `POST /api/students/get-attendance`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceQuery {
    pub driver_id: String,
    pub date: NaiveDate,
}

impl AttendanceQuery {
    pub fn new(driver_id: DriverId, date: NaiveDate) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            date,
        }
    }
}

/// Cuerpo de `POST /api/students/mark-attendance`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkAttendanceRequest {
    pub driver_id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub period: Period,
    pub attendance_status: AttendanceStatus,
    pub ride_status: Option<RideStatus>,
}

impl MarkAttendanceRequest {
    pub fn new(
        driver_id: DriverId,
        student_id: StudentId,
        date: NaiveDate,
        period: Period,
        attendance_status: AttendanceStatus,
        ride_status: Option<RideStatus>,
    ) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            student_id: student_id.to_string(),
            date,
            period,
            attendance_status,
            ride_status,
        }
    }
}
