use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{MySql, Transaction};
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::payments::models::{
    LedgerTotals, PaymentRecord, PaymentRecordResponse, RecordPaymentRequest,
    UpdatePaymentRequest,
};
use crate::modules::payments::repositories::PaymentRepository;

/// Payment ledger: the only writer of an invoice's paid/remaining amounts.
///
/// Every mutation runs inside one database transaction that locks the parent
/// invoice row, so concurrent postings (or a racing penalty sweep) serialize
/// their read-modify-write instead of losing updates. After each mutation the
/// invoice's totals are recomputed from the full ledger, never incremented.
pub struct PaymentLedger {
    payment_repo: PaymentRepository,
    invoice_repo: InvoiceRepository,
}

impl PaymentLedger {
    pub fn new(payment_repo: PaymentRepository, invoice_repo: InvoiceRepository) -> Self {
        Self {
            payment_repo,
            invoice_repo,
        }
    }

    /// Record a payment against an invoice.
    ///
    /// The amount is not checked against the remaining balance: overpayment
    /// is accepted as-is and the invoice's remaining balance goes negative.
    pub async fn record_payment(
        &self,
        request: RecordPaymentRequest,
    ) -> Result<PaymentRecordResponse> {
        let record = PaymentRecord::new(
            request.invoice_id.clone(),
            request.amount,
            request.method,
            request.paid_at.unwrap_or_else(Utc::now),
            request.reference,
            request.notes,
            request.recorded_by,
        )?;

        let mut tx = self.begin().await?;

        let invoice = Self::lock_invoice(&mut tx, &request.invoice_id).await?;

        PaymentRepository::create_with_tx(&mut tx, &record).await?;

        let updated = Self::recompute_invoice(&mut tx, invoice).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        if updated.remaining_balance < Decimal::ZERO {
            let overshoot = -updated.remaining_balance;
            info!(
                invoice_id = %request.invoice_id,
                overshoot = %overshoot,
                "Payment overshoots invoice net amount"
            );
        }

        info!(
            invoice_id = %request.invoice_id,
            amount = %request.amount,
            method = %request.method,
            remaining_balance = %updated.remaining_balance,
            status = %updated.status,
            "Payment recorded"
        );

        Ok(record.into())
    }

    /// Correct an existing payment record (amount, status, reference, notes)
    /// and recompute the parent invoice.
    ///
    /// Rejecting a record or lowering its amount can revert a settled
    /// invoice back to unpaid.
    pub async fn update_payment(
        &self,
        payment_id: &str,
        request: UpdatePaymentRequest,
    ) -> Result<PaymentRecordResponse> {
        let mut record = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Payment record '{}' not found", payment_id))
            })?;

        if let Some(amount) = request.amount {
            PaymentRecord::validate_amount(amount)?;
            record.amount = amount;
        }
        if let Some(status) = request.status {
            record.status = status;
        }
        if request.reference.is_some() {
            record.reference = request.reference;
        }
        if request.notes.is_some() {
            record.notes = request.notes;
        }

        let mut tx = self.begin().await?;

        let invoice = Self::lock_invoice(&mut tx, &record.invoice_id).await?;

        PaymentRepository::update_with_tx(&mut tx, &record).await?;

        let updated = Self::recompute_invoice(&mut tx, invoice).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        info!(
            payment_id = payment_id,
            invoice_id = %record.invoice_id,
            status = %record.status,
            invoice_status = %updated.status,
            "Payment record updated"
        );

        Ok(record.into())
    }

    /// Delete a payment record and recompute the parent invoice; an invoice
    /// the record had settled reverts to unpaid.
    pub async fn delete_payment(&self, payment_id: &str) -> Result<()> {
        let record = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Payment record '{}' not found", payment_id))
            })?;

        let mut tx = self.begin().await?;

        let invoice = Self::lock_invoice(&mut tx, &record.invoice_id).await?;

        PaymentRepository::delete_with_tx(&mut tx, payment_id).await?;

        let updated = Self::recompute_invoice(&mut tx, invoice).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        info!(
            payment_id = payment_id,
            invoice_id = %record.invoice_id,
            invoice_status = %updated.status,
            remaining_balance = %updated.remaining_balance,
            "Payment record deleted"
        );

        Ok(())
    }

    /// Ledger totals for an invoice
    pub async fn invoice_totals(&self, invoice_id: &str) -> Result<LedgerTotals> {
        self.invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", invoice_id)))?;

        let records = self.payment_repo.find_by_invoice(invoice_id).await?;
        Ok(LedgerTotals::from_records(&records))
    }

    /// All payment records of an invoice
    pub async fn list_invoice_payments(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<PaymentRecordResponse>> {
        self.invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", invoice_id)))?;

        let records = self.payment_repo.find_by_invoice(invoice_id).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn begin(&self) -> Result<Transaction<'static, MySql>> {
        self.payment_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))
    }

    async fn lock_invoice(
        tx: &mut Transaction<'_, MySql>,
        invoice_id: &str,
    ) -> Result<Invoice> {
        InvoiceRepository::find_by_id_for_update(tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", invoice_id)))
    }

    /// Re-derive the invoice's paid/remaining/status from the full ledger,
    /// within the lock-holding transaction
    async fn recompute_invoice(
        tx: &mut Transaction<'_, MySql>,
        mut invoice: Invoice,
    ) -> Result<Invoice> {
        let invoice_id = invoice
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("Locked invoice is missing its ID".to_string()))?;

        let records = PaymentRepository::find_by_invoice_with_tx(tx, &invoice_id).await?;
        let totals = LedgerTotals::from_records(&records);

        if invoice.apply_received(totals.received()) {
            InvoiceRepository::apply_payment_totals(tx, &invoice).await?;
        }

        Ok(invoice)
    }
}
