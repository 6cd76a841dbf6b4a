use rust_decimal::Decimal;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::models::student::{DriverId, GeoPoint};
use crate::utils::validation::{
    collect_errors, finish, validate_location, validate_not_empty, validate_phone,
    validate_positive_amount,
};

/// Datos del padre o tutor
#[derive(Debug, Clone, Validate)]
pub struct ParentDetails {
    #[validate(custom = "validate_not_empty")]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(custom = "validate_not_empty")]
    pub address: String,
}

/// Datos del estudiante para el alta
#[derive(Debug, Clone, Validate)]
pub struct StudentDetails {
    #[validate(custom = "validate_not_empty")]
    pub full_name: String,
    #[validate(custom = "validate_not_empty")]
    pub grade: String,
    #[validate(custom = "validate_not_empty")]
    pub school: String,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub monthly_fee: Decimal,
}

/// Formulario completo de alta de estudiante
#[derive(Debug, Clone)]
pub struct NewStudentForm {
    pub parent: ParentDetails,
    pub student: StudentDetails,
}

impl NewStudentForm {
    /// Valida los dos bloques más los puntos del mapa y la cuota
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = collect_errors(self.parent.validate());
        let student_errors = collect_errors(self.student.validate());
        for (field, field_errors) in student_errors.field_errors() {
            for error in field_errors {
                errors.add(field, error.clone());
            }
        }

        if let Err(e) = validate_location(&self.student.pickup) {
            errors.add("pickup", e);
        }
        if let Err(e) = validate_location(&self.student.dropoff) {
            errors.add("dropoff", e);
        }
        if let Err(e) = validate_positive_amount(&self.student.monthly_fee) {
            errors.add("monthly_fee", e);
        }

        finish(errors)
    }

    pub fn to_request(&self, driver_id: DriverId) -> AddStudentRequest {
        AddStudentRequest {
            driver_id: driver_id.to_string(),
            full_name: self.parent.full_name.trim().to_string(),
            email: self.parent.email.trim().to_string(),
            phone_num: self.parent.phone.trim().to_string(),
            address: self.parent.address.trim().to_string(),
            monthly_fee: self.student.monthly_fee.to_string(),
            student_name: self.student.full_name.trim().to_string(),
            student_grade: self.student.grade.trim().to_string(),
            student_school: self.student.school.trim().to_string(),
            student_pickup_location_longitude: self.student.pickup.longitude.to_string(),
            student_pickup_location_latitude: self.student.pickup.latitude.to_string(),
            student_drop_location_longitude: self.student.dropoff.longitude.to_string(),
            student_drop_location_latitude: self.student.dropoff.latitude.to_string(),
        }
    }
}

/// Cuerpo de `POST /api/students/add-student`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddStudentRequest {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_num: String,
    pub address: String,
    pub monthly_fee: String,
    pub student_name: String,
    pub student_grade: String,
    pub student_school: String,
    pub student_pickup_location_longitude: String,
    pub student_pickup_location_latitude: String,
    pub student_drop_location_longitude: String,
    pub student_drop_location_latitude: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn form() -> NewStudentForm {
        NewStudentForm {
            parent: ParentDetails {
                full_name: "Kumari Fernando".into(),
                email: "kumari@example.com".into(),
                phone: "0779876543".into(),
                address: "45 Lake Rd, Colombo".into(),
            },
            student: StudentDetails {
                full_name: "Tharindu Fernando".into(),
                grade: "6".into(),
                school: "St. Joseph's".into(),
                pickup: GeoPoint { latitude: 6.927079, longitude: 79.861244 },
                dropoff: GeoPoint { latitude: 6.9108, longitude: 79.8528 },
                monthly_fee: Decimal::from_str("4500").unwrap(),
            },
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().check().is_ok());
    }

    #[test]
    fn test_missing_pickup_and_fee() {
        let mut bad = form();
        bad.student.pickup = GeoPoint { latitude: 0.0, longitude: 0.0 };
        bad.student.monthly_fee = Decimal::ZERO;
        bad.parent.email = "kumari".into();

        let errors = bad.check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("pickup"));
        assert!(fields.contains_key("monthly_fee"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("dropoff"));
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(form().to_request(9)).unwrap();
        assert_eq!(body["driverId"], "9");
        assert_eq!(body["student_name"], "Tharindu Fernando");
        assert_eq!(body["monthly_fee"], "4500");
        assert_eq!(body["student_pickup_location_latitude"], "6.927079");
    }
}
