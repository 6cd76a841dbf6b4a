use std::path::Path;

use validator::Validate;

use crate::utils::errors::AppResult;
use crate::utils::validation::{validate_birth_date, validate_not_empty, validate_phone};

/// Imagen adjunta al formulario de verificación
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn jpeg(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes,
        }
    }

    /// Lee la imagen del disco; el nombre del parte lo fija el formulario
    pub async fn read_jpeg(path: impl AsRef<Path>, file_name: &str) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::jpeg(file_name, bytes))
    }
}

/// Formulario de verificación de identidad del conductor
#[derive(Debug, Clone, Validate)]
pub struct DriverVerificationForm {
    #[validate(custom = "validate_not_empty")]
    pub full_name: String,
    #[validate(custom = "validate_not_empty")]
    pub nic_number: String,
    #[validate(custom = "validate_not_empty")]
    pub license_number: String,
    #[validate(custom = "validate_phone")]
    pub phone_num: String,
    #[validate(custom = "validate_not_empty")]
    pub address: String,
    /// DD/MM/YYYY
    #[validate(custom = "validate_birth_date")]
    pub dob: String,
    pub selfie: DocumentUpload,
    pub nic: DocumentUpload,
    pub license: DocumentUpload,
}

impl DriverVerificationForm {
    /// Campos de texto del multipart, en el orden que espera el backend
    pub fn text_fields(&self, user_id: i64) -> Vec<(&'static str, String)> {
        vec![
            ("userId", user_id.to_string()),
            ("full_name", self.full_name.trim().to_string()),
            ("nic_number", self.nic_number.trim().to_string()),
            ("license_num", self.license_number.trim().to_string()),
            ("phone_num", self.phone_num.trim().to_string()),
            ("address", self.address.trim().to_string()),
            ("dob", self.dob.clone()),
            ("is_verified", "0".to_string()),
            ("is_pending", "1".to_string()),
        ]
    }

    /// Partes de imagen: (campo, documento)
    pub fn documents(&self) -> [(&'static str, &DocumentUpload); 3] {
        [("selfie", &self.selfie), ("nic", &self.nic), ("license", &self.license)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> DriverVerificationForm {
        DriverVerificationForm {
            full_name: "Sunil Silva".into(),
            nic_number: "901234567V".into(),
            license_number: "B1234567".into(),
            phone_num: "0711234567".into(),
            address: "Kandy".into(),
            dob: "04/03/1990".into(),
            selfie: DocumentUpload::jpeg("selfie.jpg", vec![0xFF, 0xD8]),
            nic: DocumentUpload::jpeg("nic.jpg", vec![0xFF, 0xD8]),
            license: DocumentUpload::jpeg("license.jpg", vec![0xFF, 0xD8]),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_invalid_birth_date() {
        let mut bad = form();
        bad.dob = "1990-03-04".into();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("dob"));
    }

    #[test]
    fn test_blank_fields() {
        let mut bad = form();
        bad.nic_number = "  ".into();
        bad.address = String::new();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("nic_number"));
        assert!(errors.field_errors().contains_key("address"));
    }

    #[test]
    fn test_multipart_fields() {
        let fields = form().text_fields(11);
        assert_eq!(fields[0], ("userId", "11".to_string()));
        assert!(fields.contains(&("license_num", "B1234567".to_string())));
        assert!(fields.contains(&("is_pending", "1".to_string())));
        assert_eq!(form().documents()[1].0, "nic");
    }
}
