//! Servicio de pagos
//!
//! Lista de pagos, totales, recordatorios por correo y marcado como pagado.
//! Recordatorios y marcado como pagado usan el mismo bloqueo que la
//! asistencia: no se repite una petición mientras la anterior está en curso.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::cache::SessionStore;
use crate::clients::PaymentGateway;
use crate::models::payment::{Payment, PaymentStatus, PaymentSummary};
use crate::utils::errors::{precondition_error, AppResult};

use super::attendance_mutator::InFlightGuard;

#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentGateway>,
    session: SessionStore,
    reminders: InFlightGuard<String>,
    updates: InFlightGuard<String>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentGateway>, session: SessionStore) -> Self {
        Self {
            payments,
            session,
            reminders: InFlightGuard::new(),
            updates: InFlightGuard::new(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Payment>> {
        let driver_id = self.session.driver_id().await?;
        let payments = self.payments.payments(driver_id).await?;
        info!("💰 {} pagos para el conductor {}", payments.len(), driver_id);
        Ok(payments)
    }

    pub async fn summary(&self) -> AppResult<PaymentSummary> {
        let payments = self.list().await?;
        Ok(PaymentSummary::from_payments(&payments, today()))
    }

    pub fn is_reminder_in_flight(&self, student_id: &str) -> bool {
        self.reminders.is_locked(&student_id.to_string())
    }

    pub fn is_update_in_flight(&self, student_id: &str) -> bool {
        self.updates.is_locked(&student_id.to_string())
    }

    /// Recordatorio de pago a un estudiante
    pub async fn remind(&self, student_id: &str) -> AppResult<String> {
        let driver_id = self.session.driver_id().await?;
        let Some(_permit) = self.reminders.try_acquire(student_id.to_string()) else {
            warn!("⏳ Recordatorio para {} ya en curso", student_id);
            return Err(precondition_error("A reminder for this student is already being sent"));
        };

        let message = self.payments.notify_due(driver_id, student_id).await?;
        info!("📧 Recordatorio enviado a {}", student_id);
        Ok(message)
    }

    /// Recordatorios para todos los pagos pendientes
    pub async fn remind_all(&self) -> AppResult<String> {
        let driver_id = self.session.driver_id().await?;
        let message = self.payments.notify_all_due(driver_id).await?;
        info!("📧 Recordatorios enviados para el conductor {}", driver_id);
        Ok(message)
    }

    /// Marca como pagado y devuelve la lista actualizada
    pub async fn mark_paid(&self, student_id: &str) -> AppResult<Vec<Payment>> {
        let Some(permit) = self.updates.try_acquire(student_id.to_string()) else {
            warn!("⏳ Pago de {} ya se está actualizando", student_id);
            return Err(precondition_error("This payment is already being updated"));
        };

        self.payments
            .update_payment_status(student_id, &PaymentStatus::Paid)
            .await?;
        drop(permit);
        info!("✅ Pago de {} marcado como pagado", student_id);
        self.list().await
    }
}

/// Pagos vencidos a fecha `today`
pub fn overdue(payments: &[Payment], today: NaiveDate) -> Vec<&Payment> {
    payments.iter().filter(|p| p.is_overdue(today)).collect()
}

/// Pagos cuyo estudiante contiene `query`
pub fn search<'a>(payments: &'a [Payment], query: &str) -> Vec<&'a Payment> {
    payments.iter().filter(|p| p.matches(query)).collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
