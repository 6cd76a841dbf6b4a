//! Servicio de estudiantes
//!
//! Alta, listado y detalle. La lista cacheada en la sesión se refresca
//! tras cada lectura correcta del backend.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::SessionStore;
use crate::clients::StudentGateway;
use crate::dto::student_dto::NewStudentForm;
use crate::models::student::{Student, StudentId};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct StudentService {
    students: Arc<dyn StudentGateway>,
    session: SessionStore,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentGateway>, session: SessionStore) -> Self {
        Self { students, session }
    }

    /// Da de alta un estudiante y vuelve a cargar la lista
    pub async fn add(&self, form: &NewStudentForm) -> AppResult<String> {
        form.check()?;
        let driver_id = self.session.driver_id().await?;

        let message = self.students.add_student(&form.to_request(driver_id)).await?;
        info!("✅ Estudiante '{}' añadido", form.student.full_name.trim());

        if let Err(e) = self.list().await {
            warn!("⚠️ Alta correcta pero no se pudo recargar la lista: {}", e);
        }
        Ok(message)
    }

    /// Lista del backend; refresca la caché
    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let driver_id = self.session.driver_id().await?;
        let students = self.students.fetch_students(driver_id).await?;
        self.session.cache_students(&students).await?;
        Ok(students)
    }

    /// Detalle de un estudiante, primero desde la caché
    pub async fn details(&self, student_id: StudentId) -> AppResult<Student> {
        if let Some(student) = find(self.session.cached_students().await?, student_id) {
            debug!("🎯 Estudiante {} servido desde la caché", student_id);
            return Ok(student);
        }

        find(self.list().await?, student_id)
            .ok_or_else(|| not_found_error("Student", &student_id.to_string()))
    }
}

fn find(students: Vec<Student>, student_id: StudentId) -> Option<Student> {
    students.into_iter().find(|s| s.id == student_id)
}
