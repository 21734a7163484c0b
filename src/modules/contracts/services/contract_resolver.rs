use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::contracts::models::ContractResolution;
use crate::modules::contracts::repositories::ContractRepository;

/// Resolves the contract a billing request refers to.
///
/// Billing availability beats strict lookup: a missing or wrong contract
/// reference degrades to the best available contract instead of failing the
/// run. Every degraded resolution is tagged and logged for audit; only an
/// empty contract table is fatal.
pub struct ContractResolver {
    contract_repo: ContractRepository,
}

impl ContractResolver {
    pub fn new(contract_repo: ContractRepository) -> Self {
        Self { contract_repo }
    }

    pub async fn resolve(
        &self,
        contract_id: Option<&str>,
        floor: Option<i32>,
        room_number: Option<&str>,
    ) -> Result<ContractResolution> {
        if let Some(id) = contract_id {
            if let Some(contract) = self.contract_repo.find_by_id(id).await? {
                return Ok(ContractResolution::Resolved(contract));
            }

            let reason = format!("contract '{}' not found", id);
            return self.fall_back(floor, room_number, reason).await;
        }

        if let (Some(floor), Some(room)) = (floor, room_number) {
            if let Some(contract) = self.contract_repo.find_active_by_room(floor, room).await? {
                return Ok(ContractResolution::Resolved(contract));
            }

            let reason = format!("no active contract for floor {} room '{}'", floor, room);
            return self.fall_back(None, None, reason).await;
        }

        self.fall_back(None, None, "no contract reference supplied".to_string())
            .await
    }

    /// Fallback chain: floor+room lookup (when available), then the latest
    /// active contract anywhere in the property.
    async fn fall_back(
        &self,
        floor: Option<i32>,
        room_number: Option<&str>,
        reason: String,
    ) -> Result<ContractResolution> {
        if let (Some(floor), Some(room)) = (floor, room_number) {
            if let Some(contract) = self.contract_repo.find_active_by_room(floor, room).await? {
                warn!(
                    contract_id = %contract.id,
                    reason = %reason,
                    "Contract resolved by floor/room fallback"
                );
                return Ok(ContractResolution::Fallback { contract, reason });
            }
        }

        let contract = self
            .contract_repo
            .find_latest_active()
            .await?
            .ok_or_else(|| AppError::not_found("No active contract available for billing"))?;

        warn!(
            contract_id = %contract.id,
            reason = %reason,
            "Contract resolved by latest-active fallback"
        );

        Ok(ContractResolution::Fallback { contract, reason })
    }
}
