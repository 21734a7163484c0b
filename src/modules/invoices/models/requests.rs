use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::{Invoice, InvoiceStatus};

/// Input for invoice creation.
///
/// The contract may be referenced by id, by floor + room, or not at all;
/// resolution degrades gracefully (see `ContractResolver`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub contract_id: Option<String>,

    pub floor: Option<i32>,

    pub room: Option<String>,

    pub rent_amount: Decimal,

    pub water_unit: Decimal,

    pub water_rate: Decimal,

    pub electricity_unit: Decimal,

    pub electricity_rate: Decimal,

    /// Billing date of the invoice; defaults to the billing-local today
    pub create_date: Option<NaiveDate>,

    /// Explicit penalty, overriding the back-dated-invoice rule
    pub penalty_override: Option<Decimal>,

    /// Roll the contract's outstanding balance into this invoice
    #[serde(default)]
    pub include_outstanding_balance: bool,
}

/// Invoice projection exposed to callers (export, dashboards). Amounts are
/// serialized as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub contract_id: String,
    pub create_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub rent: String,
    pub water_unit: String,
    pub water: String,
    pub electricity_unit: String,
    pub electricity: String,
    pub addon_total: String,
    pub sub_total: String,
    pub penalty_total: String,
    pub net_amount: String,
    pub previous_balance: String,
    pub paid_amount: String,
    pub remaining_balance: String,
    pub has_outstanding_balance: bool,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id.unwrap_or_default(),
            contract_id: invoice.contract_id,
            create_date: invoice.create_date,
            due_date: invoice.due_date,
            status: invoice.status,
            rent: invoice.rent.to_string(),
            water_unit: invoice.water_unit.to_string(),
            water: invoice.water.to_string(),
            electricity_unit: invoice.electricity_unit.to_string(),
            electricity: invoice.electricity.to_string(),
            addon_total: invoice.addon_total.to_string(),
            sub_total: invoice.sub_total.to_string(),
            penalty_total: invoice.penalty_total.to_string(),
            net_amount: invoice.net_amount.to_string(),
            previous_balance: invoice.previous_balance.to_string(),
            paid_amount: invoice.paid_amount.to_string(),
            remaining_balance: invoice.remaining_balance.to_string(),
            has_outstanding_balance: invoice.has_outstanding_balance,
        }
    }
}
