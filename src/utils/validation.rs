//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar los formularios
//! antes de enviarlos al backend.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use crate::models::student::GeoPoint;

/// Validar y convertir string ISO a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar fecha de nacimiento en formato DD/MM/YYYY
///
/// Los separadores tienen que estar en su sitio y la fecha tiene que
/// existir en el calendario (31/02 no pasa).
pub fn validate_birth_date(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());

    if !shape_ok || NaiveDate::parse_from_str(value, "%d/%m/%Y").is_err() {
        let mut error = ValidationError::new("birth_date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"DD/MM/YYYY".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 9 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un punto de recogida o entrega
///
/// Una coordenada a cero significa que no se eligió el punto en el mapa.
pub fn validate_location(point: &GeoPoint) -> Result<(), ValidationError> {
    if point.latitude == 0.0 || point.longitude == 0.0 {
        let mut error = ValidationError::new("location_unset");
        error.add_param("latitude".into(), &point.latitude);
        error.add_param("longitude".into(), &point.longitude);
        return Err(error);
    }

    if !(-90.0..=90.0).contains(&point.latitude) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &point.latitude);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&point.longitude) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &point.longitude);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un importe sea positivo
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Convierte el resultado de `Validate::validate` en un acumulador
pub fn collect_errors(result: Result<(), ValidationErrors>) -> ValidationErrors {
    result.err().unwrap_or_else(ValidationErrors::new)
}

/// Cierra un acumulador: sin errores, todo bien
pub fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
