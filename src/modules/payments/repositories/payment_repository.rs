use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::payments::models::PaymentRecord;

/// Repository for payment record persistence
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a payment record inside the transaction holding the parent
    /// invoice's row lock
    pub async fn create_with_tx(
        tx: &mut Transaction<'_, MySql>,
        record: &PaymentRecord,
    ) -> Result<()> {
        let id = record.id.as_ref().ok_or_else(|| {
            AppError::Internal("Payment record ID is required for creation".to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO payment_records (
                id, invoice_id, amount, method, status, paid_at,
                reference, notes, recorded_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&record.invoice_id)
        .bind(record.amount)
        .bind(record.method)
        .bind(record.status)
        .bind(record.paid_at)
        .bind(&record.reference)
        .bind(&record.notes)
        .bind(&record.recorded_by)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create payment record: {}", e)))?;

        Ok(())
    }

    /// Find payment record by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>> {
        let record = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT
                id, invoice_id, amount, method, status, paid_at,
                reference, notes, recorded_by, created_at, updated_at
            FROM payment_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch payment record: {}", e)))?;

        Ok(record)
    }

    /// All payment records of an invoice, in entry order
    pub async fn find_by_invoice(&self, invoice_id: &str) -> Result<Vec<PaymentRecord>> {
        let records = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT
                id, invoice_id, amount, method, status, paid_at,
                reference, notes, recorded_by, created_at, updated_at
            FROM payment_records
            WHERE invoice_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list payment records: {}", e)))?;

        Ok(records)
    }

    /// Same as `find_by_invoice`, but reading through an open transaction so
    /// the ledger recompute sees its own uncommitted writes
    pub async fn find_by_invoice_with_tx(
        tx: &mut Transaction<'_, MySql>,
        invoice_id: &str,
    ) -> Result<Vec<PaymentRecord>> {
        let records = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT
                id, invoice_id, amount, method, status, paid_at,
                reference, notes, recorded_by, created_at, updated_at
            FROM payment_records
            WHERE invoice_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list payment records: {}", e)))?;

        Ok(records)
    }

    /// Update a corrected record inside the invoice-lock transaction
    pub async fn update_with_tx(
        tx: &mut Transaction<'_, MySql>,
        record: &PaymentRecord,
    ) -> Result<()> {
        let id = record.id.as_ref().ok_or_else(|| {
            AppError::Internal("Payment record ID is required for update".to_string())
        })?;

        let result = sqlx::query(
            r#"
            UPDATE payment_records
            SET amount = ?, status = ?, reference = ?, notes = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(record.amount)
        .bind(record.status)
        .bind(&record.reference)
        .bind(&record.notes)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment record: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment record with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Delete a record inside the invoice-lock transaction
    pub async fn delete_with_tx(tx: &mut Transaction<'_, MySql>, id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM payment_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to delete payment record: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment record with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
