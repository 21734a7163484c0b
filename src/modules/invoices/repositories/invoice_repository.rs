use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::Invoice;

/// Repository for invoice persistence.
///
/// Amount-bearing columns are only written through three paths: `create`,
/// `apply_payment_totals` (ledger recompute) and `apply_late_penalty`
/// (sweep), mirroring the three mutation rules on the model.
pub struct InvoiceRepository {
    pool: MySqlPool,
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Persist a newly issued invoice
    pub async fn create(&self, invoice: &Invoice) -> Result<Invoice> {
        let id = invoice
            .id
            .as_ref()
            .ok_or_else(|| AppError::Internal("Invoice ID is required for creation".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&invoice.contract_id)
        .bind(invoice.create_date)
        .bind(invoice.due_date)
        .bind(invoice.status)
        .bind(invoice.rent)
        .bind(invoice.water_unit)
        .bind(invoice.water)
        .bind(invoice.electricity_unit)
        .bind(invoice.electricity)
        .bind(invoice.addon_total)
        .bind(invoice.previous_balance)
        .bind(invoice.sub_total)
        .bind(invoice.penalty_total)
        .bind(invoice.net_amount)
        .bind(invoice.paid_amount)
        .bind(invoice.remaining_balance)
        .bind(invoice.has_outstanding_balance)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create invoice: {}", e)))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Invoice was created but not found".to_string()))
    }

    /// Find invoice by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance,
                created_at, updated_at
            FROM invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch invoice: {}", e)))?;

        Ok(invoice)
    }

    /// Find invoice by ID with a row lock, inside an open transaction.
    ///
    /// Payment postings and any racing sweep serialize on this lock so both
    /// read-modify-write cycles land.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance,
                created_at, updated_at
            FROM invoices
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to lock invoice: {}", e)))?;

        Ok(invoice)
    }

    /// All unsettled invoices of a contract, oldest first.
    ///
    /// Creation-date order is the tie-break rule for balance summation and
    /// reconciliation, so audit trails see settlements in billing order.
    pub async fn find_unsettled_by_contract(&self, contract_id: &str) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance,
                created_at, updated_at
            FROM invoices
            WHERE contract_id = ? AND status = 'unpaid'
            ORDER BY create_date ASC, id ASC
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list unsettled invoices: {}", e)))?;

        Ok(invoices)
    }

    /// List all invoices of a contract, newest first
    pub async fn list_by_contract(&self, contract_id: &str) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance,
                created_at, updated_at
            FROM invoices
            WHERE contract_id = ?
            ORDER BY create_date DESC, id DESC
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list invoices: {}", e)))?;

        Ok(invoices)
    }

    /// Invoices eligible for the penalty sweep: unsettled, strictly past
    /// due, and not yet penalized
    pub async fn find_due_for_penalty(&self, today: NaiveDate) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, contract_id, create_date, due_date, status,
                rent, water_unit, water, electricity_unit, electricity,
                addon_total, previous_balance, sub_total, penalty_total,
                net_amount, paid_amount, remaining_balance, has_outstanding_balance,
                created_at, updated_at
            FROM invoices
            WHERE status = 'unpaid' AND due_date < ? AND penalty_total = 0
            ORDER BY due_date ASC, id ASC
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list overdue invoices: {}", e)))?;

        Ok(invoices)
    }

    /// Write the ledger-derived payment totals and status, inside the
    /// transaction that holds the invoice's row lock
    pub async fn apply_payment_totals(
        tx: &mut Transaction<'_, MySql>,
        invoice: &Invoice,
    ) -> Result<()> {
        let id = invoice
            .id
            .as_ref()
            .ok_or_else(|| AppError::Internal("Invoice ID is required for update".to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET paid_amount = ?, remaining_balance = ?, status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(invoice.paid_amount)
        .bind(invoice.remaining_balance)
        .bind(invoice.status)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment totals: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Persist a sweep-applied penalty.
    ///
    /// The WHERE guard repeats the sweep's eligibility so a concurrent run
    /// (or a payment that settled the invoice in between) makes this a
    /// harmless no-op; returns whether the penalty landed.
    pub async fn apply_late_penalty(&self, invoice: &Invoice) -> Result<bool> {
        let id = invoice
            .id
            .as_ref()
            .ok_or_else(|| AppError::Internal("Invoice ID is required for update".to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET penalty_total = ?, net_amount = ?, remaining_balance = ?, updated_at = NOW()
            WHERE id = ? AND penalty_total = 0 AND status = 'unpaid'
            "#,
        )
        .bind(invoice.penalty_total)
        .bind(invoice.net_amount)
        .bind(invoice.remaining_balance)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to apply late penalty: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
