use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::assets::models::RoomAddon;

/// Repository for asset/addon reads used by billing
pub struct AssetRepository {
    pool: MySqlPool,
}

impl AssetRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Every asset currently associated with a room, with its group's
    /// monthly fee.
    ///
    /// An unknown room id simply matches no association rows and yields an
    /// empty list.
    pub async fn addons_for_room(&self, room_id: &str) -> Result<Vec<RoomAddon>> {
        let addons = sqlx::query_as::<_, RoomAddon>(
            r#"
            SELECT
                a.id AS asset_id,
                a.name AS asset_name,
                g.id AS group_id,
                g.name AS group_name,
                g.monthly_addon_fee
            FROM room_assets ra
            INNER JOIN assets a ON a.id = ra.asset_id
            INNER JOIN asset_groups g ON g.id = a.group_id
            WHERE ra.room_id = ?
            ORDER BY a.name ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch room addons: {}", e)))?;

        Ok(addons)
    }
}
