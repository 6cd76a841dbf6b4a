//! Clients - acceso al backend REST
//!
//! Los servicios dependen de estos traits, no del cliente HTTP concreto,
//! para poder probarse con implementaciones en memoria.

pub mod backend_client;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dto::attendance_dto::MarkAttendanceRequest;
use crate::dto::auth_dto::{RegisterRequest, SignInRequest, SignInResponse};
use crate::dto::driver_dto::DriverVerificationForm;
use crate::dto::student_dto::AddStudentRequest;
use crate::models::attendance::AttendanceRecord;
use crate::models::auth::VerificationStatus;
use crate::models::driver::DriverProfile;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::student::{DriverId, Student};
use crate::models::trip::{TripDetail, TripSummary};
use crate::utils::errors::AppResult;

pub use backend_client::BackendClient;

/// Cuenta del conductor y verificación de identidad
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Devuelve el mensaje de confirmación del backend
    async fn register(&self, request: &RegisterRequest) -> AppResult<String>;
    async fn sign_in(&self, request: &SignInRequest) -> AppResult<SignInResponse>;
    async fn verification_status(&self, user_id: DriverId) -> AppResult<VerificationStatus>;
    async fn submit_driver(&self, user_id: DriverId, form: &DriverVerificationForm) -> AppResult<String>;
    async fn driver_details(&self, user_id: DriverId) -> AppResult<DriverProfile>;
}

/// Lista de estudiantes y asistencia
#[async_trait]
pub trait StudentGateway: Send + Sync {
    async fn add_student(&self, request: &AddStudentRequest) -> AppResult<String>;
    async fn fetch_students(&self, driver_id: DriverId) -> AppResult<Vec<Student>>;
    async fn fetch_attendance(&self, driver_id: DriverId, date: NaiveDate) -> AppResult<Vec<AttendanceRecord>>;
    /// Persiste un cambio; el mensaje es opcional
    async fn mark_attendance(&self, request: &MarkAttendanceRequest) -> AppResult<Option<String>>;
}

#[async_trait]
pub trait TripGateway: Send + Sync {
    async fn trip_summaries(&self, driver_id: DriverId) -> AppResult<Vec<TripSummary>>;
    async fn trip_details(&self, driver_id: DriverId, date: NaiveDate) -> AppResult<Vec<TripDetail>>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn payments(&self, driver_id: DriverId) -> AppResult<Vec<Payment>>;
    async fn notify_all_due(&self, driver_id: DriverId) -> AppResult<String>;
    async fn notify_due(&self, driver_id: DriverId, student_id: &str) -> AppResult<String>;
    async fn update_payment_status(&self, student_id: &str, status: &PaymentStatus) -> AppResult<()>;
}
