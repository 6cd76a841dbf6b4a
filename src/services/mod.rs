//! Services module
//!
//! Este módulo contiene la lógica de cada pantalla del conductor. Los
//! servicios reciben los gateways como traits y la sesión como almacén
//! inyectado, así se prueban sin red ni disco.

pub mod attendance_mutator;
pub mod attendance_reconciler;
pub mod attendance_service;
pub mod auth_service;
pub mod payment_service;
pub mod student_service;
pub mod trip_service;
pub mod verification_service;

pub use attendance_mutator::{
    apply_change, AttendanceAction, AttendanceChange, AttendanceMutator, InFlightGuard, InFlightPermit,
};
pub use attendance_reconciler::reconcile;
pub use attendance_service::{AttendanceBoard, LoadReport};
pub use auth_service::AuthService;
pub use payment_service::PaymentService;
pub use student_service::StudentService;
pub use trip_service::TripService;
pub use verification_service::VerificationService;
