use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// How a payment arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(rename = "cash")]
    Cash,

    #[serde(rename = "bank_transfer")]
    BankTransfer,

    #[serde(rename = "qr")]
    Qr,

    #[serde(rename = "card")]
    Card,

    #[serde(rename = "mobile_banking")]
    MobileBanking,
}

impl PaymentMethod {
    /// Display label for receipts and exports
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Qr => "QR payment",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileBanking => "Mobile banking",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Qr => write!(f, "qr"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::MobileBanking => write!(f, "mobile_banking"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "qr" => Ok(PaymentMethod::Qr),
            "card" => Ok(PaymentMethod::Card),
            "mobile_banking" => Ok(PaymentMethod::MobileBanking),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// Confirmation state of a payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded, awaiting confirmation
    #[serde(rename = "pending")]
    Pending,

    /// Confirmed received
    #[serde(rename = "confirmed")]
    Confirmed,

    /// Bounced or otherwise invalid; never counts toward settlement
    #[serde(rename = "rejected")]
    Rejected,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl PaymentStatus {
    /// Whether this record counts toward the invoice's paid amount.
    ///
    /// Pending and confirmed both count; a pending record is money the
    /// tenant claims to have sent, and the books treat it as received until
    /// it is rejected.
    pub fn counts_as_received(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Confirmed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Confirmed => "Confirmed",
            PaymentStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Confirmed => write!(f, "confirmed"),
            PaymentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "confirmed" => Ok(PaymentStatus::Confirmed),
            "rejected" => Ok(PaymentStatus::Rejected),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// One payment event against an invoice
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRecord {
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub invoice_id: String,

    pub amount: Decimal,

    pub method: PaymentMethod,

    #[serde(skip_deserializing)]
    pub status: PaymentStatus,

    /// When the tenant paid (as reported), not when the record was entered
    pub paid_at: DateTime<Utc>,

    /// Free-text reference (slip number, transfer reference)
    pub reference: Option<String>,

    pub notes: Option<String>,

    pub recorded_by: Option<String>,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Create a new payment record with validation.
    ///
    /// Amounts are not checked against the invoice's remaining balance;
    /// overpayment is accepted and surfaces as a negative remaining balance.
    pub fn new(
        invoice_id: String,
        amount: Decimal,
        method: PaymentMethod,
        paid_at: DateTime<Utc>,
        reference: Option<String>,
        notes: Option<String>,
        recorded_by: Option<String>,
    ) -> Result<Self> {
        if invoice_id.trim().is_empty() {
            return Err(AppError::validation("Invoice ID cannot be empty"));
        }

        Self::validate_amount(amount)?;

        let now = Utc::now();

        Ok(Self {
            id: Some(Uuid::new_v4().to_string()),
            invoice_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            paid_at,
            reference,
            notes,
            recorded_by,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    pub fn validate_amount(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Payment amount must be positive, got: {}",
                amount
            )));
        }

        Ok(())
    }

    /// Whether this record counts toward the invoice's paid amount
    pub fn counts_as_received(&self) -> bool {
        self.status.counts_as_received()
    }
}

/// Aggregated ledger totals for one invoice.
///
/// This is the single place the received-payment policy lives: pending and
/// confirmed records count, rejected records never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub confirmed: Decimal,
    pub pending: Decimal,
}

impl LedgerTotals {
    pub fn from_records(records: &[PaymentRecord]) -> Self {
        let mut confirmed = Decimal::ZERO;
        let mut pending = Decimal::ZERO;

        for record in records {
            match record.status {
                PaymentStatus::Confirmed => confirmed += record.amount,
                PaymentStatus::Pending => pending += record.amount,
                PaymentStatus::Rejected => {}
            }
        }

        Self { confirmed, pending }
    }

    /// Total counting toward paid amount and settlement
    pub fn received(&self) -> Decimal {
        self.confirmed + self.pending
    }
}
