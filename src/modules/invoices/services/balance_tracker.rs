use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::billing_date;
use crate::core::{AppError, Result};
use crate::modules::invoices::models::{ChargeBreakdown, Invoice};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::payments::models::LedgerTotals;
use crate::modules::payments::repositories::PaymentRepository;

/// Aggregate view of a contract's unsettled invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingSummary {
    pub total_outstanding: Decimal,
    pub total_penalty: Decimal,
    pub overdue_count: usize,
    pub total_invoices: usize,
}

/// Total unpaid remainder across a set of unsettled invoices.
///
/// Reuses each invoice's stored net amount; the tracker never re-derives
/// charge arithmetic of its own.
pub fn outstanding_total(invoices: &[Invoice]) -> Decimal {
    invoices.iter().map(|invoice| invoice.outstanding()).sum()
}

/// Summary over a set of unsettled invoices. Pure; `today` is the
/// billing-local calendar day the overdue check runs against.
pub fn summarize(invoices: &[Invoice], today: NaiveDate) -> OutstandingSummary {
    OutstandingSummary {
        total_outstanding: outstanding_total(invoices),
        total_penalty: invoices.iter().map(|i| i.penalty_total).sum(),
        overdue_count: invoices.iter().filter(|i| i.is_overdue(today)).count(),
        total_invoices: invoices.len(),
    }
}

/// Tracks a contract's unpaid balance across invoices and rolls it forward
/// into successor invoices.
///
/// The legacy "read that also settles" is split in two: `summarize` /
/// `outstanding_total` are pure queries, `reconcile_settled_invoices` is the
/// explicit mutation, and `calculate_outstanding_balance` composes them to
/// keep the historical contract (callers must expect invoice status to
/// change underneath the sum).
pub struct BalanceTracker {
    invoice_repo: InvoiceRepository,
    payment_repo: PaymentRepository,
    timezone_offset_hours: i32,
}

impl BalanceTracker {
    pub fn new(
        invoice_repo: InvoiceRepository,
        payment_repo: PaymentRepository,
        timezone_offset_hours: i32,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
            timezone_offset_hours,
        }
    }

    /// Walk the contract's unsettled invoices oldest-first and mark any whose
    /// received ledger total already covers its net amount as settled.
    ///
    /// Returns how many invoices changed. Each invoice is re-read and locked
    /// individually, so invoices changing state mid-iteration are picked up
    /// rather than summed stale.
    pub async fn reconcile_settled_invoices(&self, contract_id: &str) -> Result<usize> {
        let invoices = self
            .invoice_repo
            .find_unsettled_by_contract(contract_id)
            .await?;

        let mut reconciled = 0;

        for invoice in invoices {
            let Some(invoice_id) = invoice.id.clone() else {
                continue;
            };

            if self.reconcile_one(&invoice_id).await? {
                reconciled += 1;
            }
        }

        if reconciled > 0 {
            info!(
                contract_id = contract_id,
                reconciled = reconciled,
                "Marked fully covered invoices as settled"
            );
        }

        Ok(reconciled)
    }

    /// Total unpaid balance across the contract's unsettled invoices.
    ///
    /// Composes reconciliation and the pure sum: invoices already covered by
    /// their payments are settled first, then the remainder is summed over
    /// what is still open.
    pub async fn calculate_outstanding_balance(&self, contract_id: &str) -> Result<Decimal> {
        self.reconcile_settled_invoices(contract_id).await?;

        let invoices = self
            .invoice_repo
            .find_unsettled_by_contract(contract_id)
            .await?;

        Ok(outstanding_total(&invoices))
    }

    /// Create a successor invoice that carries the contract's outstanding
    /// balance forward.
    ///
    /// `previous_balance` snapshots the outstanding total computed
    /// immediately before creation; prior invoices are not modified beyond
    /// the reconciliation above.
    pub async fn create_invoice_with_outstanding_balance(
        &self,
        contract_id: &str,
        breakdown: &ChargeBreakdown,
        create_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Invoice> {
        let outstanding = self.calculate_outstanding_balance(contract_id).await?;

        let invoice = Invoice::rollover(
            contract_id.to_string(),
            breakdown,
            outstanding,
            create_date,
            due_date,
        );

        let created = self.invoice_repo.create(&invoice).await?;

        info!(
            contract_id = contract_id,
            invoice_id = created.id.as_deref().unwrap_or_default(),
            previous_balance = %created.previous_balance,
            net_amount = %created.net_amount,
            "Created rollover invoice"
        );

        Ok(created)
    }

    /// Aggregate view over the contract's unsettled invoices
    pub async fn outstanding_summary(&self, contract_id: &str) -> Result<OutstandingSummary> {
        let invoices = self
            .invoice_repo
            .find_unsettled_by_contract(contract_id)
            .await?;

        let today = billing_date::billing_today(self.timezone_offset_hours);
        Ok(summarize(&invoices, today))
    }

    /// Lock one invoice, re-read its ledger, and persist refreshed totals if
    /// they drifted. Returns true when the row changed.
    async fn reconcile_one(&self, invoice_id: &str) -> Result<bool> {
        let mut tx = self
            .invoice_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let Some(mut invoice) = InvoiceRepository::find_by_id_for_update(&mut tx, invoice_id).await?
        else {
            // Deleted underneath us; nothing to reconcile
            return Ok(false);
        };

        let records = PaymentRepository::find_by_invoice_with_tx(&mut tx, invoice_id).await?;
        let totals = LedgerTotals::from_records(&records);

        let changed = invoice.apply_received(totals.received());
        if changed {
            InvoiceRepository::apply_payment_totals(&mut tx, &invoice).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(changed)
    }
}
