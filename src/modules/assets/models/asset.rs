use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One asset currently associated with a room, joined with its group's
/// recurring fee.
///
/// Assets belong to exactly one asset group; the group defines the
/// `monthly_addon_fee` billed for each associated asset. The association
/// itself (`room_assets`) is mutated by room/asset management, never here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomAddon {
    pub asset_id: String,

    pub asset_name: String,

    pub group_id: String,

    pub group_name: String,

    /// Recurring fee billed each month while the association exists
    pub monthly_addon_fee: Decimal,
}
