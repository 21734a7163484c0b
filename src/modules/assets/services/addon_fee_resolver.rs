use rust_decimal::Decimal;
use tracing::debug;

use crate::core::money;
use crate::core::Result;
use crate::modules::assets::models::RoomAddon;
use crate::modules::assets::repositories::AssetRepository;

/// Resolves the recurring addon total a room contributes to each new invoice.
///
/// Pure read: sums the monthly fee of every asset currently associated with
/// the room. A room with no associations, or a room id that does not exist,
/// contributes zero; addon resolution never fails an invoice.
pub struct AddonFeeResolver {
    asset_repo: AssetRepository,
}

impl AddonFeeResolver {
    pub fn new(asset_repo: AssetRepository) -> Self {
        Self { asset_repo }
    }

    pub async fn monthly_total(&self, room_id: &str) -> Result<Decimal> {
        let addons = self.asset_repo.addons_for_room(room_id).await?;
        let total = Self::total_of(&addons);

        debug!(
            room_id = room_id,
            asset_count = addons.len(),
            addon_total = %total,
            "Resolved room addon fees"
        );

        Ok(total)
    }

    /// The room's addon assets with their fees, for line-item display
    pub async fn room_addons(&self, room_id: &str) -> Result<Vec<RoomAddon>> {
        self.asset_repo.addons_for_room(room_id).await
    }

    fn total_of(addons: &[RoomAddon]) -> Decimal {
        money::sum_amounts(addons.iter().map(|a| a.monthly_addon_fee))
    }
}
