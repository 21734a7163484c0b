use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::contracts::models::Contract;

/// Read-side repository for contracts. The billing engine never writes
/// contract rows; contract lifecycle lives in a separate subsystem.
pub struct ContractRepository {
    pool: MySqlPool,
}

impl ContractRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Find contract by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, room_id, tenant_id, floor, room_number, rent_amount,
                signed_date, start_date, end_date, status, created_at, updated_at
            FROM contracts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch contract: {}", e)))?;

        Ok(contract)
    }

    /// Find the active contract for a floor + room number.
    ///
    /// When several contracts match (stale data), the most recently signed
    /// active one wins.
    pub async fn find_active_by_room(
        &self,
        floor: i32,
        room_number: &str,
    ) -> Result<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, room_id, tenant_id, floor, room_number, rent_amount,
                signed_date, start_date, end_date, status, created_at, updated_at
            FROM contracts
            WHERE floor = ? AND room_number = ? AND status = 'active'
            ORDER BY signed_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(floor)
        .bind(room_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch contract by room: {}", e)))?;

        Ok(contract)
    }

    /// Latest active contract across the whole property; the last resort of
    /// the fallback chain
    pub async fn find_latest_active(&self) -> Result<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, room_id, tenant_id, floor, room_number, rent_amount,
                signed_date, start_date, end_date, status, created_at, updated_at
            FROM contracts
            WHERE status = 'active'
            ORDER BY signed_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch latest contract: {}", e)))?;

        Ok(contract)
    }
}
