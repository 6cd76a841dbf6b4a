#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::sync::Notify;

use school_transport_client::cache::{MemoryStore, SessionStore};
use school_transport_client::clients::{AccountGateway, PaymentGateway, StudentGateway, TripGateway};
use school_transport_client::config::environment::EnvironmentConfig;
use school_transport_client::dto::attendance_dto::MarkAttendanceRequest;
use school_transport_client::dto::auth_dto::{RegisterRequest, SignInRequest, SignInResponse};
use school_transport_client::dto::driver_dto::DriverVerificationForm;
use school_transport_client::dto::student_dto::AddStudentRequest;
use school_transport_client::models::{
    AttendanceRecord, AttendanceStatus, DriverId, DriverProfile, Payment, PaymentStatus, RideStatus,
    Student, StudentId, TripDetail, TripSummary, VerificationStatus,
};
use school_transport_client::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Datos de prueba
// ---------------------------------------------------------------------------

pub fn student(id: StudentId, name: &str) -> Student {
    Student {
        id,
        full_name: name.to_string(),
        grade: "4".to_string(),
        school: "Ananda College".to_string(),
        address: "Colombo".to_string(),
        phone: "0711234567".to_string(),
        parent_name: None,
        monthly_fee: None,
        pickup_location_latitude: 6.91,
        pickup_location_longitude: 79.86,
        dropoff_location_latitude: 6.93,
        dropoff_location_longitude: 79.85,
    }
}

pub fn record(
    student_id: StudentId,
    morning: (Option<AttendanceStatus>, Option<RideStatus>),
    afternoon: (Option<AttendanceStatus>, Option<RideStatus>),
) -> AttendanceRecord {
    AttendanceRecord {
        student_id,
        morning_attendance_status: morning.0,
        morning_ride_status: morning.1,
        afternoon_attendance_status: afternoon.0,
        afternoon_ride_status: afternoon.1,
    }
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// Sesión en memoria con un conductor autenticado
pub async fn signed_in_session(driver_id: DriverId) -> SessionStore {
    let session = SessionStore::new(Arc::new(MemoryStore::new()));
    session
        .record_sign_in(driver_id, &VerificationStatus::Verified)
        .await
        .unwrap();
    session
}

/// Error de transporte real de reqwest, sin tocar la red
pub async fn transport_error() -> AppError {
    match reqwest::Client::new().get("not a url").send().await {
        Err(e) => AppError::Transport(e),
        Ok(_) => panic!("request unexpectedly succeeded"),
    }
}

// ---------------------------------------------------------------------------
// Gateway falso en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeBackend {
    pub roster: Mutex<Vec<Student>>,
    pub records: Mutex<Vec<AttendanceRecord>>,
    pub payments: Mutex<Vec<Payment>>,
    pub status: Mutex<Option<VerificationStatus>>,
    pub profile: Mutex<Option<DriverProfile>>,

    pub fail_roster: AtomicBool,
    pub fail_attendance: AtomicBool,
    pub fail_marks: AtomicBool,
    pub fail_status: AtomicBool,

    pub marks: Mutex<Vec<MarkAttendanceRequest>>,
    pub added: Mutex<Vec<AddStudentRequest>>,
    pub submitted: Mutex<Vec<DriverId>>,
    pub reminders: Mutex<Vec<String>>,
    pub payment_updates: Mutex<Vec<(String, String)>>,
    pub roster_calls: AtomicUsize,

    /// Estudiante cuyo `mark_attendance` espera a `gate`
    pub blocked_student: Mutex<Option<StudentId>>,
    /// `fetch_attendance` espera a `gate`
    pub block_attendance: AtomicBool,
    /// Pago cuyo `update_payment_status` espera a `gate`
    pub blocked_payment: Mutex<Option<String>>,
    /// Se notifica al entrar en la petición bloqueada
    pub entered: Notify,
    pub gate: Notify,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_data(roster: Vec<Student>, records: Vec<AttendanceRecord>) -> Arc<Self> {
        let fake = Self::default();
        *fake.roster.lock().unwrap() = roster;
        *fake.records.lock().unwrap() = records;
        Arc::new(fake)
    }

    pub fn block_student(&self, student_id: StudentId) {
        *self.blocked_student.lock().unwrap() = Some(student_id);
    }

    pub fn block_payment(&self, student_id: &str) {
        *self.blocked_payment.lock().unwrap() = Some(student_id.to_string());
    }

    pub fn marks(&self) -> Vec<MarkAttendanceRequest> {
        self.marks.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountGateway for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> AppResult<String> {
        Ok(format!("Welcome {}", request.name))
    }

    async fn sign_in(&self, request: &SignInRequest) -> AppResult<SignInResponse> {
        if request.password != "secret" {
            return Err(AppError::Backend {
                status: 401,
                message: "Invalid credentials".to_string(),
            });
        }
        let status = self
            .status
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(VerificationStatus::NotVerified);
        Ok(SignInResponse {
            user_id: 12,
            verification_status: status,
            message: Some("Login successful".to_string()),
        })
    }

    async fn verification_status(&self, _user_id: DriverId) -> AppResult<VerificationStatus> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(transport_error().await);
        }
        Ok(self
            .status
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(VerificationStatus::NotVerified))
    }

    async fn submit_driver(&self, user_id: DriverId, _form: &DriverVerificationForm) -> AppResult<String> {
        self.submitted.lock().unwrap().push(user_id);
        Ok("Driver details submitted".to_string())
    }

    async fn driver_details(&self, _user_id: DriverId) -> AppResult<DriverProfile> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Backend {
                status: 404,
                message: "Driver not found".to_string(),
            })
    }
}

#[async_trait]
impl StudentGateway for FakeBackend {
    async fn add_student(&self, request: &AddStudentRequest) -> AppResult<String> {
        self.added.lock().unwrap().push(request.clone());
        let mut roster = self.roster.lock().unwrap();
        let id = roster.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        roster.push(student(id, &request.student_name));
        Ok("Student added successfully".to_string())
    }

    async fn fetch_students(&self, _driver_id: DriverId) -> AppResult<Vec<Student>> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_roster.load(Ordering::SeqCst) {
            return Err(transport_error().await);
        }
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn fetch_attendance(&self, _driver_id: DriverId, _date: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        if self.block_attendance.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        if self.fail_attendance.load(Ordering::SeqCst) {
            return Err(AppError::Backend {
                status: 500,
                message: "Failed to fetch attendance".to_string(),
            });
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn mark_attendance(&self, request: &MarkAttendanceRequest) -> AppResult<Option<String>> {
        let blocked = *self.blocked_student.lock().unwrap();
        if blocked.map(|id| id.to_string()) == Some(request.student_id.clone()) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        if self.fail_marks.load(Ordering::SeqCst) {
            return Err(transport_error().await);
        }
        self.marks.lock().unwrap().push(request.clone());
        Ok(Some("Attendance marked".to_string()))
    }
}

#[async_trait]
impl TripGateway for FakeBackend {
    async fn trip_summaries(&self, _driver_id: DriverId) -> AppResult<Vec<TripSummary>> {
        Ok(vec![TripSummary {
            date: day(),
            morning_count: 3,
            afternoon_count: 2,
        }])
    }

    async fn trip_details(&self, _driver_id: DriverId, _date: NaiveDate) -> AppResult<Vec<TripDetail>> {
        Ok(vec![TripDetail {
            student_name: "Kasun".to_string(),
            morning_attendance_status: Some(AttendanceStatus::Present),
            afternoon_attendance_status: None,
        }])
    }
}

#[async_trait]
impl PaymentGateway for FakeBackend {
    async fn payments(&self, _driver_id: DriverId) -> AppResult<Vec<Payment>> {
        Ok(self.payments.lock().unwrap().clone())
    }

    async fn notify_all_due(&self, _driver_id: DriverId) -> AppResult<String> {
        Ok("Emails sent".to_string())
    }

    async fn notify_due(&self, _driver_id: DriverId, student_id: &str) -> AppResult<String> {
        self.reminders.lock().unwrap().push(student_id.to_string());
        Ok("Email sent".to_string())
    }

    async fn update_payment_status(&self, student_id: &str, status: &PaymentStatus) -> AppResult<()> {
        let blocked = self.blocked_payment.lock().unwrap().clone();
        if blocked.as_deref() == Some(student_id) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        self.payment_updates
            .lock()
            .unwrap()
            .push((student_id.to_string(), status.as_str().to_string()));
        for payment in self.payments.lock().unwrap().iter_mut() {
            if payment.id.as_deref() == Some(student_id) {
                payment.payment_status = status.clone();
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backend HTTP simulado (axum)
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockData {
    pub fail_attendance: bool,
    pub request_ids: Vec<String>,
    pub attendance_queries: Vec<Value>,
    pub marks: Vec<Value>,
    pub added_students: Vec<Value>,
    pub multipart_parts: Vec<(String, Option<String>)>,
    pub payment_updates: Vec<(String, Value)>,
    pub detail_paths: Vec<(String, String)>,
}

pub type SharedMock = Arc<Mutex<MockData>>;

pub struct MockBackend {
    pub base_url: String,
    pub data: SharedMock,
}

impl MockBackend {
    pub fn config(&self) -> EnvironmentConfig {
        EnvironmentConfig {
            api_base_url: self.base_url.clone(),
            ..EnvironmentConfig::default()
        }
    }
}

pub async fn spawn_backend() -> MockBackend {
    let data: SharedMock = Arc::new(Mutex::new(MockData::default()));

    let app = Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/sign-in", post(sign_in))
        .route("/api/users/verification-status/:user_id", get(verification_status))
        .route("/api/drivers/add-driver", post(add_driver))
        .route("/api/drivers/get-driver-details/:user_id", get(driver_details))
        .route("/api/drivers/summaries/:driver_id", get(summaries))
        .route("/api/drivers/details/:driver_id/:date", get(details))
        .route("/api/students/add-student", post(add_student))
        .route("/api/students/get-students/:driver_id", get(get_students))
        .route("/api/students/get-attendance", post(get_attendance))
        .route("/api/students/mark-attendance", post(mark_attendance))
        .route("/api/students/visualize-payments/:driver_id", get(payments))
        .route("/api/students/send-due-payment-emails/:driver_id", get(remind_all))
        .route("/api/students/notify-specific-person/:driver_id/:student_id", get(remind_one))
        .route("/api/students/update-payment-status/:student_id", put(update_payment))
        .with_state(data.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        data,
    }
}

fn record_request_id(data: &SharedMock, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        data.lock().unwrap().request_ids.push(id.to_string());
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Email is required"}))).into_response();
    }
    (StatusCode::CREATED, Json(json!({"message": "User registered successfully"}))).into_response()
}

async fn sign_in(Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"}))).into_response();
    }
    Json(json!({
        "message": "Login successful",
        "userId": "12",
        "verification_status": "verified"
    }))
    .into_response()
}

async fn verification_status(Path(user_id): Path<String>) -> Response {
    if user_id != "12" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "User not found"}))).into_response();
    }
    Json(json!({"verification_status": "auto_approved"})).into_response()
}

async fn add_driver(State(data): State<SharedMock>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let _ = field.bytes().await;
        data.lock().unwrap().multipart_parts.push((name, file_name));
    }
    (StatusCode::CREATED, Json(json!({"message": "Driver added successfully"}))).into_response()
}

async fn driver_details(Path(user_id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": 3,
        "user_id": user_id,
        "full_name": "Sunil Silva",
        "nic_number": "901234567V",
        "license_number": "B1234567",
        "phone_num": "0711234567",
        "selfie_url": "uploads/selfie.jpg",
        "address": "Kandy",
        "date_of_birth": "1990-03-04T00:00:00.000Z",
        "is_verified": 1,
        "is_pending": 0
    }))
}

async fn summaries(Path(_driver_id): Path<String>) -> Json<Value> {
    Json(json!([
        {"date": "2025-03-14T00:00:00.000Z", "morningCount": 4, "afternoonCount": "3"},
        {"date": "2025-03-13", "morningCount": 2, "afternoonCount": 2}
    ]))
}

async fn details(State(data): State<SharedMock>, Path((driver_id, date)): Path<(String, String)>) -> Json<Value> {
    data.lock().unwrap().detail_paths.push((driver_id, date));
    Json(json!([
        {"studentName": "Kasun", "morning_attendance_status": "present", "afternoon_attendance_status": null},
        {"studentName": "Nimal", "morning_attendance_status": "ABSENT", "afternoon_attendance_status": ""}
    ]))
}

async fn add_student(State(data): State<SharedMock>, Json(body): Json<Value>) -> Response {
    data.lock().unwrap().added_students.push(body);
    (StatusCode::CREATED, Json(json!({"message": "Student added successfully"}))).into_response()
}

async fn get_students(
    State(data): State<SharedMock>,
    headers: HeaderMap,
    Path(driver_id): Path<String>,
) -> Response {
    record_request_id(&data, &headers);
    if driver_id != "12" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "No students found"}))).into_response();
    }
    Json(json!([
        {
            "id": 1, "full_name": "Kasun Perera", "grade": "4", "school": "Ananda College",
            "address": "Colombo 7", "phone": "0711234567",
            "pickup_location_latitude": "6.9100", "pickup_location_longitude": "79.8600",
            "dropoff_location_latitude": 6.93, "dropoff_location_longitude": 79.85
        },
        {
            "id": "2", "full_name": "Nimali Silva", "grade": "6", "school": "Visakha Vidyalaya",
            "address": null, "phone": "0779876543",
            "pickup_location_latitude": "6.8800", "pickup_location_longitude": "79.8700",
            "dropoff_location_latitude": "6.8900", "dropoff_location_longitude": "79.8650"
        }
    ]))
    .into_response()
}

async fn get_attendance(State(data): State<SharedMock>, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().unwrap();
    data.attendance_queries.push(body);
    if data.fail_attendance {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "Database error"}))).into_response();
    }
    Json(json!([
        {
            "student_id": 1,
            "morning_attendance_status": "PRESENT", "morning_ride_status": "PICKED_UP",
            "afternoon_attendance_status": null, "afternoon_ride_status": null
        },
        {
            "student_id": "2",
            "morning_attendance_status": "ABSENT", "morning_ride_status": "PICKED_UP",
            "afternoon_attendance_status": "", "afternoon_ride_status": ""
        }
    ]))
    .into_response()
}

async fn mark_attendance(State(data): State<SharedMock>, Json(body): Json<Value>) -> Response {
    if body["student_id"] == "404" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Student not assigned to driver"}))).into_response();
    }
    data.lock().unwrap().marks.push(body);
    Json(json!({"message": "Attendance marked successfully"})).into_response()
}

async fn payments(Path(_driver_id): Path<String>) -> Json<Value> {
    Json(json!([
        {"id": 1, "student_name": "Kasun Perera", "month": "March", "payment_status": "paid", "amount": "2500.00", "due_date": "2025-03-10"},
        {"id": 2, "student_name": "Nimali Silva", "month": "March", "payment_status": "Pending", "amount": 3000, "due_date": "2025-03-10T00:00:00.000Z"}
    ]))
}

async fn remind_all(Path(_driver_id): Path<String>) -> Json<Value> {
    Json(json!({"message": "Emails sent to 1 parent"}))
}

async fn remind_one(Path((_driver_id, student_id)): Path<(String, String)>) -> Json<Value> {
    Json(json!({"message": format!("Email sent for student {}", student_id)}))
}

async fn update_payment(
    State(data): State<SharedMock>,
    Path(student_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    data.lock().unwrap().payment_updates.push((student_id, body));
    Json(json!({"message": "Payment status updated"}))
}
