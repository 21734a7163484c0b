use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;
use crate::core::{AppError, Result};

/// The canonical line-item computation for one billing period.
///
/// Everything that bills an amount goes through here: the calculator for
/// fresh invoices, and the outstanding-balance tracker for rollover
/// invoices. Utility amounts are unit * rate, rounded to the amount scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub rent: Decimal,
    pub water_unit: Decimal,
    pub water: Decimal,
    pub electricity_unit: Decimal,
    pub electricity: Decimal,
    pub addon_total: Decimal,
}

impl ChargeBreakdown {
    /// Build and validate the period charges.
    ///
    /// # Arguments
    /// * `rent` - Requested rent (must be positive)
    /// * `water_unit` / `water_rate` - Metered water usage and unit price
    /// * `electricity_unit` / `electricity_rate` - Metered electricity usage and unit price
    /// * `addon_total` - Resolved recurring addon total for the room
    pub fn new(
        rent: Decimal,
        water_unit: Decimal,
        water_rate: Decimal,
        electricity_unit: Decimal,
        electricity_rate: Decimal,
        addon_total: Decimal,
    ) -> Result<Self> {
        if rent <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Rent amount must be positive, got: {}",
                rent
            )));
        }

        Self::validate_non_negative("Water unit", water_unit)?;
        Self::validate_non_negative("Water rate", water_rate)?;
        Self::validate_non_negative("Electricity unit", electricity_unit)?;
        Self::validate_non_negative("Electricity rate", electricity_rate)?;
        Self::validate_non_negative("Addon total", addon_total)?;

        Ok(Self {
            rent: money::round_amount(rent),
            water_unit,
            water: money::round_amount(water_unit * water_rate),
            electricity_unit,
            electricity: money::round_amount(electricity_unit * electricity_rate),
            addon_total: money::round_amount(addon_total),
        })
    }

    /// Total charges for the period: rent + utilities + addons
    pub fn current_charges(&self) -> Decimal {
        self.rent + self.water + self.electricity + self.addon_total
    }

    fn validate_non_negative(field: &str, value: Decimal) -> Result<()> {
        if value < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "{} must be non-negative, got: {}",
                field, value
            )));
        }

        Ok(())
    }
}
