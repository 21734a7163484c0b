use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment_record::{PaymentMethod, PaymentRecord, PaymentStatus};

/// Input for recording a payment against an invoice
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub invoice_id: String,

    pub amount: Decimal,

    pub method: PaymentMethod,

    /// When the tenant paid; defaults to now
    pub paid_at: Option<DateTime<Utc>>,

    pub reference: Option<String>,

    pub notes: Option<String>,

    pub recorded_by: Option<String>,
}

/// Correction of an existing payment record. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaymentRequest {
    pub amount: Option<Decimal>,

    pub status: Option<PaymentStatus>,

    pub reference: Option<String>,

    pub notes: Option<String>,
}

/// Payment projection exposed to callers, with display-formatted labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecordResponse {
    pub id: String,
    pub invoice_id: String,
    pub amount: String,
    pub method: PaymentMethod,
    pub method_label: String,
    pub status: PaymentStatus,
    pub status_label: String,
    pub paid_at: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<String>,
}

impl From<PaymentRecord> for PaymentRecordResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            invoice_id: record.invoice_id,
            amount: record.amount.to_string(),
            method: record.method,
            method_label: record.method.label().to_string(),
            status: record.status,
            status_label: record.status.label().to_string(),
            paid_at: record.paid_at,
            reference: record.reference,
            notes: record.notes,
            recorded_by: record.recorded_by,
        }
    }
}
