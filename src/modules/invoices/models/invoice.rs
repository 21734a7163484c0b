use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::breakdown::ChargeBreakdown;
use crate::core::money;

/// Invoice settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Received payments do not yet cover the net amount
    #[serde(rename = "unpaid")]
    Unpaid,

    /// Received payments cover the net amount in full
    #[serde(rename = "settled")]
    Settled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Unpaid
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "unpaid"),
            InvoiceStatus::Settled => write!(f, "settled"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            "settled" => Ok(InvoiceStatus::Settled),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// One billing period's charge document for a contract.
///
/// Amounts are derived once at construction and only ever mutated through
/// `apply_received` (payment ledger) and `apply_late_penalty` (penalty
/// sweep), which both re-establish the invariants:
/// `sub_total = rent + water + electricity + addon_total + previous_balance`,
/// `net_amount = sub_total + penalty_total`,
/// `remaining_balance = net_amount - paid_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub contract_id: String,

    pub create_date: NaiveDate,

    pub due_date: NaiveDate,

    #[serde(skip_deserializing)]
    pub status: InvoiceStatus,

    /// Requested rent for the period (snapshot of the contract rent)
    pub rent: Decimal,

    pub water_unit: Decimal,

    pub water: Decimal,

    pub electricity_unit: Decimal,

    pub electricity: Decimal,

    /// Recurring addon fees of the room's associated assets
    pub addon_total: Decimal,

    /// Unpaid remainder carried from prior invoices; snapshot taken at
    /// creation time, never updated retroactively
    pub previous_balance: Decimal,

    pub sub_total: Decimal,

    pub penalty_total: Decimal,

    pub net_amount: Decimal,

    /// Sum of received ledger records, maintained by the payment ledger
    pub paid_amount: Decimal,

    /// May go negative on overpayment; excess is the caller's responsibility
    pub remaining_balance: Decimal,

    /// Whether this invoice was created as a rollover of prior unpaid balance
    pub has_outstanding_balance: bool,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Create a fresh period invoice (no balance carried forward)
    pub fn issue(
        contract_id: String,
        breakdown: &ChargeBreakdown,
        penalty_total: Decimal,
        create_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self::build(
            contract_id,
            breakdown,
            Decimal::ZERO,
            penalty_total,
            create_date,
            due_date,
        )
    }

    /// Create a rollover invoice carrying a contract's outstanding balance
    pub fn rollover(
        contract_id: String,
        breakdown: &ChargeBreakdown,
        previous_balance: Decimal,
        create_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self::build(
            contract_id,
            breakdown,
            previous_balance,
            Decimal::ZERO,
            create_date,
            due_date,
        )
    }

    fn build(
        contract_id: String,
        breakdown: &ChargeBreakdown,
        previous_balance: Decimal,
        penalty_total: Decimal,
        create_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        let sub_total = money::round_amount(breakdown.current_charges() + previous_balance);
        let net_amount = sub_total + penalty_total;

        Self {
            id: Some(Uuid::new_v4().to_string()),
            contract_id,
            create_date,
            due_date,
            status: InvoiceStatus::Unpaid,
            rent: breakdown.rent,
            water_unit: breakdown.water_unit,
            water: breakdown.water,
            electricity_unit: breakdown.electricity_unit,
            electricity: breakdown.electricity,
            addon_total: breakdown.addon_total,
            previous_balance,
            sub_total,
            penalty_total,
            net_amount,
            paid_amount: Decimal::ZERO,
            remaining_balance: net_amount,
            has_outstanding_balance: !previous_balance.is_zero(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Re-derive net and remaining after a penalty change
    fn recompute_derived(&mut self) {
        self.net_amount = self.sub_total + self.penalty_total;
        self.remaining_balance = self.net_amount - self.paid_amount;
        self.updated_at = Some(Utc::now());
    }

    /// Fold the ledger's received total into this invoice.
    ///
    /// Status follows the remaining balance: settled once received payments
    /// cover the net amount, unpaid again if they stop covering it (payment
    /// deletion or correction). Returns true when any field changed.
    pub fn apply_received(&mut self, received: Decimal) -> bool {
        let remaining = self.net_amount - received;
        let status = if remaining <= Decimal::ZERO {
            InvoiceStatus::Settled
        } else {
            InvoiceStatus::Unpaid
        };

        let changed = self.paid_amount != received
            || self.remaining_balance != remaining
            || self.status != status;

        if changed {
            self.paid_amount = received;
            self.remaining_balance = remaining;
            self.status = status;
            self.updated_at = Some(Utc::now());
        }

        changed
    }

    /// Apply the 10%-of-rent late penalty.
    ///
    /// No-op (returns false) when the invoice already carries a penalty or is
    /// settled, which is what makes the sweep idempotent.
    pub fn apply_late_penalty(&mut self) -> bool {
        if self.status == InvoiceStatus::Settled || !self.penalty_total.is_zero() {
            return false;
        }

        self.penalty_total = money::late_penalty(self.rent);
        self.recompute_derived();
        true
    }

    /// Unpaid remainder of this invoice
    pub fn outstanding(&self) -> Decimal {
        self.net_amount - self.paid_amount
    }

    pub fn is_settled(&self) -> bool {
        self.status == InvoiceStatus::Settled
    }

    /// Strictly past due on the billing-local calendar
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}
