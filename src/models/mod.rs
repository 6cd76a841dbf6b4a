//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos tal como los devuelve el
//! backend, más los modelos de vista que arma el cliente.

pub mod attendance;
pub mod auth;
pub mod driver;
pub mod payment;
pub mod student;
pub mod trip;

pub use attendance::{
    AttendanceActions, AttendanceRecord, AttendanceStatus, Period, RideStatus, StudentViewModel,
    WireStatus,
};
pub use auth::{Destination, UserRole, VerificationStatus};
pub use driver::DriverProfile;
pub use payment::{Payment, PaymentStatus, PaymentSummary};
pub use student::{DriverId, GeoPoint, Student, StudentId};
pub use trip::{TripDetail, TripSummary};
