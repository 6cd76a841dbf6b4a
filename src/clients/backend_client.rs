//! Cliente HTTP del backend de transporte escolar
//!
//! Un único `reqwest::Client` con el timeout configurado atiende todos los
//! endpoints. Cada petición lleva un `X-Request-Id` (uuid v4) que también
//! aparece en los logs, para poder cruzarlos con los del servidor.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{AccountGateway, PaymentGateway, StudentGateway, TripGateway};
use crate::config::environment::EnvironmentConfig;
use crate::dto::attendance_dto::{AttendanceQuery, MarkAttendanceRequest};
use crate::dto::auth_dto::{RegisterRequest, SignInRequest, SignInResponse, VerificationStatusResponse};
use crate::dto::driver_dto::DriverVerificationForm;
use crate::dto::student_dto::AddStudentRequest;
use crate::dto::{ApiMessage, UpdatePaymentStatusRequest};
use crate::models::attendance::AttendanceRecord;
use crate::models::auth::VerificationStatus;
use crate::models::driver::DriverProfile;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::student::{DriverId, Student};
use crate::models::trip::{TripDetail, TripSummary};
use crate::utils::errors::{AppError, AppResult};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Cliente REST/JSON del backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("driver-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("🔗 Cliente del backend listo: {}", config.api_base_url);
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Envía la petición y decodifica el cuerpo de una respuesta correcta
    ///
    /// Una respuesta no 2xx se convierte en `AppError::Backend` con el
    /// mensaje que traiga el cuerpo (`message`, luego `error`).
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> AppResult<T> {
        let request_id = Uuid::new_v4();
        info!("📡 {} {} [{}]", method, path, request_id);

        let response = builder
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                error!("❌ {} {} [{}] sin respuesta: {}", method, path, request_id, e);
                AppError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiMessage>(&body)
                .unwrap_or_default()
                .notice();
            warn!("❌ {} {} [{}] -> {}: {}", method, path, request_id, status, message);
            return Err(AppError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        debug!("📄 {} {} [{}] -> {} ({} bytes)", method, path, request_id, status, body.len());
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            error!("❌ Respuesta ilegible de {} [{}]: {}", path, request_id, e);
            AppError::Decode(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(self.request(Method::GET, path), &Method::GET, path).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.execute(builder, &method, path).await
    }
}

/// Segmento de ruta codificado
fn segment(value: impl ToString) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

#[async_trait]
impl AccountGateway for BackendClient {
    async fn register(&self, request: &RegisterRequest) -> AppResult<String> {
        let reply: ApiMessage = self
            .send_json(Method::POST, "/api/users/register", request)
            .await?;
        Ok(reply.message.unwrap_or_else(|| "Registration successful".to_string()))
    }

    async fn sign_in(&self, request: &SignInRequest) -> AppResult<SignInResponse> {
        self.send_json(Method::POST, "/api/users/sign-in", request).await
    }

    async fn verification_status(&self, user_id: DriverId) -> AppResult<VerificationStatus> {
        let path = format!("/api/users/verification-status/{}", segment(user_id));
        let reply: VerificationStatusResponse = self.get(&path).await?;
        Ok(reply.verification_status)
    }

    async fn submit_driver(&self, user_id: DriverId, form: &DriverVerificationForm) -> AppResult<String> {
        let path = "/api/drivers/add-driver";
        let mut multipart = Form::new();
        for (name, value) in form.text_fields(user_id) {
            multipart = multipart.text(name, value);
        }
        for (name, document) in form.documents() {
            let part = Part::bytes(document.bytes.clone())
                .file_name(document.file_name.clone())
                .mime_str(&document.content_type)?;
            multipart = multipart.part(name, part);
        }

        let builder = self.request(Method::POST, path).multipart(multipart);
        let reply: ApiMessage = self.execute(builder, &Method::POST, path).await?;
        Ok(reply.message.unwrap_or_else(|| "Documents submitted".to_string()))
    }

    async fn driver_details(&self, user_id: DriverId) -> AppResult<DriverProfile> {
        let path = format!("/api/drivers/get-driver-details/{}", segment(user_id));
        self.get(&path).await
    }
}

#[async_trait]
impl StudentGateway for BackendClient {
    async fn add_student(&self, request: &AddStudentRequest) -> AppResult<String> {
        let reply: ApiMessage = self
            .send_json(Method::POST, "/api/students/add-student", request)
            .await?;
        Ok(reply.message.unwrap_or_else(|| "Student added".to_string()))
    }

    async fn fetch_students(&self, driver_id: DriverId) -> AppResult<Vec<Student>> {
        let path = format!("/api/students/get-students/{}", segment(driver_id));
        let students: Vec<Student> = self.get(&path).await?;
        info!("✅ {} estudiantes recibidos para el conductor {}", students.len(), driver_id);
        Ok(students)
    }

    async fn fetch_attendance(&self, driver_id: DriverId, date: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        let query = AttendanceQuery::new(driver_id, date);
        let records: Vec<AttendanceRecord> = self
            .send_json(Method::POST, "/api/students/get-attendance", &query)
            .await?;
        info!("✅ {} registros de asistencia para {}", records.len(), date);
        Ok(records)
    }

    async fn mark_attendance(&self, request: &MarkAttendanceRequest) -> AppResult<Option<String>> {
        let reply: ApiMessage = self
            .send_json(Method::POST, "/api/students/mark-attendance", request)
            .await?;
        Ok(reply.message)
    }
}

#[async_trait]
impl TripGateway for BackendClient {
    async fn trip_summaries(&self, driver_id: DriverId) -> AppResult<Vec<TripSummary>> {
        let path = format!("/api/drivers/summaries/{}", segment(driver_id));
        self.get(&path).await
    }

    async fn trip_details(&self, driver_id: DriverId, date: NaiveDate) -> AppResult<Vec<TripDetail>> {
        let path = format!(
            "/api/drivers/details/{}/{}",
            segment(driver_id),
            segment(date.format("%Y-%m-%d"))
        );
        self.get(&path).await
    }
}

#[async_trait]
impl PaymentGateway for BackendClient {
    async fn payments(&self, driver_id: DriverId) -> AppResult<Vec<Payment>> {
        let path = format!("/api/students/visualize-payments/{}", segment(driver_id));
        self.get(&path).await
    }

    async fn notify_all_due(&self, driver_id: DriverId) -> AppResult<String> {
        let path = format!("/api/students/send-due-payment-emails/{}", segment(driver_id));
        let reply: ApiMessage = self.get(&path).await?;
        Ok(reply.message.unwrap_or_else(|| "Reminders sent".to_string()))
    }

    async fn notify_due(&self, driver_id: DriverId, student_id: &str) -> AppResult<String> {
        let path = format!(
            "/api/students/notify-specific-person/{}/{}",
            segment(driver_id),
            segment(student_id)
        );
        let reply: ApiMessage = self.get(&path).await?;
        Ok(reply.message.unwrap_or_else(|| "Reminder sent".to_string()))
    }

    async fn update_payment_status(&self, student_id: &str, status: &PaymentStatus) -> AppResult<()> {
        let path = format!("/api/students/update-payment-status/{}", segment(student_id));
        let body = UpdatePaymentStatusRequest {
            status: status.as_str().to_string(),
        };
        let _: ApiMessage = self.send_json(Method::PUT, &path, &body).await?;
        Ok(())
    }
}
