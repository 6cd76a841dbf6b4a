use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::wire::{lenient_date_opt, opt_id_string, string_or_empty};

/// Estado de un pago mensual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
    Other(String),
}

impl PaymentStatus {
    /// Valor que espera el backend al actualizar (`paid` va en minúsculas)
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Overdue => "Overdue",
            PaymentStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "pending" => PaymentStatus::Pending,
            "overdue" => PaymentStatus::Overdue,
            _ => PaymentStatus::Other(s.to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(PaymentStatus::parse(&raw))
    }
}

/// Pago mensual de un estudiante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Id del estudiante al que corresponde el pago
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub student_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub month: String,
    pub payment_status: PaymentStatus,
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_date_opt")]
    pub due_date: Option<NaiveDate>,
}

impl Payment {
    /// Vencido: no pagado y con fecha límite anterior a hoy
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.payment_status.is_paid() && self.due_date.map_or(false, |due| due < today)
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.student_name.to_lowercase().contains(&needle)
    }
}

/// Totales de la pantalla de pagos
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub total_count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub collected: Decimal,
    pub outstanding: Decimal,
    pub overdue_amount: Decimal,
}

impl PaymentSummary {
    pub fn from_payments(payments: &[Payment], today: NaiveDate) -> Self {
        let mut summary = PaymentSummary {
            total_count: payments.len(),
            ..Default::default()
        };

        for payment in payments {
            if payment.payment_status.is_paid() {
                summary.paid_count += 1;
                summary.collected += payment.amount;
                continue;
            }

            summary.pending_count += 1;
            summary.outstanding += payment.amount;
            if payment.is_overdue(today) {
                summary.overdue_count += 1;
                summary.overdue_amount += payment.amount;
            }
        }

        summary
    }
}
